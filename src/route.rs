//! Route definitions and ordered route tables
//!
//! A [`RouteDefinition`] is the user-facing record: a path pattern plus
//! either a component or a redirect target. [`RouteTable::build`] validates
//! and compiles definitions into [`Route`] entries; declaration order is match
//! priority. Tables are immutable: [`RouteTable::extend`] returns a new table
//! and leaves the original untouched.

use crate::error::RouterError;
use crate::matcher::RoutePattern;
use crate::resolver::{ComponentLoader, ComponentRef};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Route Validation
// ============================================================================

/// Validate a route path pattern
///
/// # Validation Rules
///
/// - Path can be empty (root route)
/// - No consecutive slashes (`//`)
/// - Parameter names must be non-empty and alphanumeric (underscores allowed)
/// - No duplicate parameter names
pub fn validate_route_path(path: &str) -> Result<(), RouterError> {
    if path.contains("//") {
        return Err(RouterError::config(format!(
            "route path '{}' cannot contain consecutive slashes",
            path
        )));
    }

    let mut param_names = HashSet::new();
    for segment in path.split('/') {
        let Some(param) = segment.strip_prefix(':') else {
            continue;
        };

        let name = param.split('<').next().unwrap_or(param);
        if name.is_empty() {
            return Err(RouterError::config(format!(
                "route parameter name cannot be empty in '{}'",
                path
            )));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(RouterError::config(format!(
                "route parameter '{}' must contain only alphanumeric characters and underscores",
                name
            )));
        }

        if !param_names.insert(name) {
            return Err(RouterError::config(format!(
                "duplicate route parameter '{}' in '{}'",
                name, path
            )));
        }
    }

    Ok(())
}

// ============================================================================
// RouteDefinition
// ============================================================================

/// A rule mapping a path pattern to a component or a redirect.
///
/// Exactly one of `component` and `redirect_to` must be set; the fields are
/// public so tables can be assembled from any source, and [`RouteTable::build`]
/// rejects records that set both or neither.
///
/// # Example
///
/// ```
/// use slot_navigator::{RouteDefinition, RouteTable};
///
/// let table = RouteTable::build(vec![
///     RouteDefinition::component("", "home"),
///     RouteDefinition::lazy("demo", || async { Ok::<_, String>("demo") }),
///     RouteDefinition::redirect("**", ""),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 3);
/// assert!(table.has_catch_all());
/// ```
pub struct RouteDefinition<C> {
    /// Path pattern (e.g. `"users/:id"`, `""`, `"**"`)
    pub path: String,
    /// Component rendered for this route
    pub component: Option<ComponentRef<C>>,
    /// Path to resolve instead of this one
    pub redirect_to: Option<String>,
}

impl<C> RouteDefinition<C> {
    /// Route rendering an already available component
    pub fn component(path: impl Into<String>, component: C) -> Self {
        Self {
            path: path.into(),
            component: Some(ComponentRef::Direct(component)),
            redirect_to: None,
        }
    }

    /// Route whose component is produced by a deferred loader
    pub fn lazy<L>(path: impl Into<String>, loader: L) -> Self
    where
        L: ComponentLoader<C>,
    {
        Self {
            path: path.into(),
            component: Some(ComponentRef::deferred(loader)),
            redirect_to: None,
        }
    }

    /// Route redirecting to another path
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: None,
            redirect_to: Some(to.into()),
        }
    }
}

impl<C> fmt::Debug for RouteDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("path", &self.path)
            .field("component", &self.component.as_ref().map(ComponentRef::kind))
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}

// ============================================================================
// Route
// ============================================================================

/// Position of a route in its table.
///
/// Stable across [`RouteTable::extend`], since extension only appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub usize);

/// What a matched route leads to
pub enum RouteTarget<C> {
    Component(ComponentRef<C>),
    Redirect(String),
}

/// A validated, compiled route table entry
pub struct Route<C> {
    id: RouteId,
    path: String,
    pattern: RoutePattern,
    target: RouteTarget<C>,
}

impl<C> Route<C> {
    fn compile(id: RouteId, definition: RouteDefinition<C>) -> Result<Self, RouterError> {
        let RouteDefinition {
            path,
            component,
            redirect_to,
        } = definition;

        let target = match (component, redirect_to) {
            (Some(component), None) => RouteTarget::Component(component),
            (None, Some(to)) => RouteTarget::Redirect(to),
            (Some(_), Some(_)) => {
                return Err(RouterError::config(format!(
                    "route '{}' sets both a component and a redirect",
                    path
                )))
            }
            (None, None) => {
                return Err(RouterError::config(format!(
                    "route '{}' sets neither a component nor a redirect",
                    path
                )))
            }
        };

        validate_route_path(&path)?;
        let pattern = RoutePattern::parse(&path)?;

        Ok(Self {
            id,
            path,
            pattern,
            target,
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Pattern text as declared
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn target(&self) -> &RouteTarget<C> {
        &self.target
    }

    /// Component reference, unless this is a redirect
    pub fn component(&self) -> Option<&ComponentRef<C>> {
        match &self.target {
            RouteTarget::Component(component) => Some(component),
            RouteTarget::Redirect(_) => None,
        }
    }

    /// Redirect target, if this is a redirect
    pub fn redirect_to(&self) -> Option<&str> {
        match &self.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::Component(_) => None,
        }
    }
}

impl<C> fmt::Debug for Route<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("component", &self.component().map(ComponentRef::kind))
            .field("redirect_to", &self.redirect_to())
            .finish()
    }
}

// ============================================================================
// RouteTable
// ============================================================================

/// Ordered, immutable collection of routes.
///
/// Insertion order is match priority; entries are shared between a table and
/// the tables extended from it.
pub struct RouteTable<C> {
    routes: Vec<Arc<Route<C>>>,
}

impl<C> RouteTable<C> {
    /// Table with no routes
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Validate and compile definitions, in order.
    ///
    /// Fails with [`RouterError::Config`] on the first malformed definition.
    pub fn build(
        definitions: impl IntoIterator<Item = RouteDefinition<C>>,
    ) -> Result<Self, RouterError> {
        Self::empty().extend(definitions)
    }

    /// New table with `more` appended after the existing routes.
    ///
    /// `self` is left unchanged; on error nothing is appended.
    pub fn extend(
        &self,
        more: impl IntoIterator<Item = RouteDefinition<C>>,
    ) -> Result<Self, RouterError> {
        let mut routes = self.routes.clone();
        for definition in more {
            let id = RouteId(routes.len());
            routes.push(Arc::new(Route::compile(id, definition)?));
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Arc<Route<C>>] {
        &self.routes
    }

    pub fn get(&self, id: RouteId) -> Option<&Arc<Route<C>>> {
        self.routes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Check if any route ends in a wildcard
    pub fn has_catch_all(&self) -> bool {
        self.routes.iter().any(|route| route.pattern().is_catch_all())
    }
}

impl<C> Clone for RouteTable<C> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<C> Default for RouteTable<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> fmt::Debug for RouteTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
