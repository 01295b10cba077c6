//! Path normalization and first-match route resolution
//!
//! Patterns are compiled once when a table is built. A request path is
//! normalized into segments and compared against each definition in
//! declaration order; the first full match wins and redirects are followed
//! until a component definition is reached.
//!
//! Segment kinds:
//! - `"users"` - literal, matches identical text only
//! - `":id"` - parameter, matches any single segment and binds it
//! - `":id<\d+>"`, `":id<uuid>"` - constrained parameter
//! - `"**"` - wildcard, matches the remainder of the path (zero or more segments)

use crate::error::RouterError;
use crate::params::{QueryParams, RouteParams};
use crate::route::{Route, RouteId, RouteTable, RouteTarget};
use crate::{debug_log, trace_log};
use std::sync::Arc;

/// Token that matches any remaining path.
pub const WILDCARD: &str = "**";

/// Default cap on the number of redirects followed in one resolution.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

// ============================================================================
// Patterns
// ============================================================================

/// A compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern such as `"users/:id"`, `""` or `"**"`.
    ///
    /// Leading, trailing and repeated separators are ignored, so `"/demo/"`
    /// and `"demo"` compile to the same pattern.
    pub fn parse(path: &str) -> Result<Self, RouterError> {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(pos) = segments.iter().position(|s| *s == Segment::Wildcard) {
            if pos + 1 != segments.len() {
                return Err(RouterError::config(format!(
                    "wildcard '{}' must be the last segment of '{}'",
                    WILDCARD, path
                )));
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if this pattern ends in a wildcard
    pub fn is_catch_all(&self) -> bool {
        self.segments.last() == Some(&Segment::Wildcard)
    }

    /// Match against normalized path segments.
    ///
    /// Returns the bound parameters on a full match.
    pub fn matches(&self, path_segments: &[&str]) -> Option<RouteParams> {
        let mut params = RouteParams::new();
        let mut remaining = path_segments;

        for segment in &self.segments {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Static(expected) => {
                    let (first, rest) = remaining.split_first()?;
                    if first != expected {
                        return None;
                    }
                    remaining = rest;
                }
                Segment::Param { name, constraint } => {
                    let (first, rest) = remaining.split_first()?;
                    if let Some(constraint) = constraint {
                        if !constraint.validate(first) {
                            return None;
                        }
                    }
                    params.insert(name.clone(), *first);
                    remaining = rest;
                }
            }
        }

        remaining.is_empty().then_some(params)
    }
}

/// A single segment in a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly
    Static(String),
    /// Parameter that captures one segment
    Param {
        name: String,
        constraint: Option<Constraint>,
    },
    /// Matches everything that is left
    Wildcard,
}

impl Segment {
    fn parse(s: &str) -> Result<Self, RouterError> {
        if s == WILDCARD {
            return Ok(Segment::Wildcard);
        }

        let Some(rest) = s.strip_prefix(':') else {
            return Ok(Segment::Static(s.to_string()));
        };

        let (name, constraint) = match rest.split_once('<') {
            Some((name, tail)) => {
                let body = tail.strip_suffix('>').ok_or_else(|| {
                    RouterError::config(format!("unterminated constraint in segment '{}'", s))
                })?;
                (name, Some(Constraint::parse(body)?))
            }
            None => (rest, None),
        };

        Ok(Segment::Param {
            name: name.to_string(),
            constraint,
        })
    }
}

/// Constraint restricting the values a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `<\d+>`: ASCII digits only
    Numeric,
    /// `<uuid>`: 8-4-4-4-12 hex groups
    Uuid,
}

impl Constraint {
    fn parse(s: &str) -> Result<Self, RouterError> {
        match s {
            "\\d+" => Ok(Constraint::Numeric),
            "uuid" => Ok(Constraint::Uuid),
            other => Err(RouterError::config(format!(
                "unknown parameter constraint '<{}>'",
                other
            ))),
        }
    }

    /// Validate a value against this constraint
    pub fn validate(&self, value: &str) -> bool {
        match self {
            Constraint::Numeric => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            Constraint::Uuid => {
                let groups: Vec<&str> = value.split('-').collect();
                groups.len() == 5
                    && groups
                        .iter()
                        .zip([8, 4, 4, 4, 12])
                        .all(|(group, len)| {
                            group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit())
                        })
            }
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// A request path split into segments, with its query string set aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Segments joined by `/`, without leading or trailing separators
    pub path: String,
    /// Parsed `?` tail
    pub query: QueryParams,
}

impl NormalizedPath {
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Normalize a request path.
///
/// Drops any `#fragment`, splits off the `?query`, strips leading and
/// trailing separators and collapses empty segments.
///
/// ```
/// use slot_navigator::normalize_path;
///
/// let normalized = normalize_path("//docs//api/?tab=2#top");
/// assert_eq!(normalized.path, "docs/api");
/// assert_eq!(normalized.query.get("tab"), Some("2"));
/// ```
pub fn normalize_path(raw: &str) -> NormalizedPath {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let path = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    NormalizedPath {
        path,
        query: QueryParams::parse(query),
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Result of resolving a path against a table
pub struct RouteMatch<C> {
    /// Normalized path that was requested
    pub requested_path: String,
    /// Path that finally matched a component definition
    pub path: String,
    /// The component definition that matched
    pub route: Arc<Route<C>>,
    /// Parameters bound by the final pattern
    pub params: RouteParams,
    /// Query of the request, or of the last redirect target that carried one
    pub query: QueryParams,
    /// Redirect targets followed to get here, in order
    pub redirects: Vec<String>,
}

impl<C> Clone for RouteMatch<C> {
    fn clone(&self) -> Self {
        Self {
            requested_path: self.requested_path.clone(),
            path: self.path.clone(),
            route: Arc::clone(&self.route),
            params: self.params.clone(),
            query: self.query.clone(),
            redirects: self.redirects.clone(),
        }
    }
}

impl<C> std::fmt::Debug for RouteMatch<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("requested_path", &self.requested_path)
            .field("path", &self.path)
            .field("route", &self.route.path())
            .field("params", &self.params)
            .field("redirects", &self.redirects)
            .finish_non_exhaustive()
    }
}

impl<C> RouteMatch<C> {
    /// Check if at least one redirect was followed
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Resolves request paths against a [`RouteTable`].
///
/// Stateless apart from its redirect cap; one matcher can serve any number
/// of tables.
#[derive(Debug, Clone, Copy)]
pub struct PathMatcher {
    max_redirects: usize,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Set the maximum number of redirects followed before giving up
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Resolve `path` to a component definition.
    ///
    /// Returns `Ok(None)` when nothing matches. A redirect definition fires at
    /// most once per resolution: after following it, the target is matched
    /// against the table without it, so a catch-all redirecting to an unknown
    /// path ends in `Ok(None)` rather than bouncing on itself. Revisiting a
    /// path already in the chain fails with [`RouterError::RedirectLoop`].
    pub fn match_path<C>(
        &self,
        table: &RouteTable<C>,
        path: &str,
    ) -> Result<Option<RouteMatch<C>>, RouterError> {
        let normalized = normalize_path(path);
        let requested_path = normalized.path.clone();
        let mut query = normalized.query;
        let mut current = normalized.path;
        let mut chain = vec![current.clone()];
        let mut fired: Vec<RouteId> = Vec::new();

        loop {
            let segments: Vec<&str> = current.split('/').filter(|s| !s.is_empty()).collect();
            let Some((route, params)) = first_match(table, &segments, &fired) else {
                trace_log!("No route matches '{}'", current);
                return Ok(None);
            };

            match route.target() {
                RouteTarget::Component(_) => {
                    trace_log!("'{}' matched route '{}'", current, route.path());
                    return Ok(Some(RouteMatch {
                        requested_path,
                        path: current,
                        route: Arc::clone(route),
                        params,
                        query,
                        redirects: chain.split_off(1),
                    }));
                }
                RouteTarget::Redirect(to) => {
                    let target = normalize_path(&params.substitute(to));
                    debug_log!("Redirecting '{}' -> '{}'", current, target.path);

                    if chain.contains(&target.path) || chain.len() > self.max_redirects {
                        chain.push(target.path.clone());
                        return Err(RouterError::RedirectLoop {
                            path: target.path,
                            chain,
                        });
                    }

                    if !target.query.is_empty() {
                        query = target.query;
                    }
                    fired.push(route.id());
                    chain.push(target.path.clone());
                    current = target.path;
                }
            }
        }
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `path` with the default redirect cap.
pub fn match_path<C>(
    table: &RouteTable<C>,
    path: &str,
) -> Result<Option<RouteMatch<C>>, RouterError> {
    PathMatcher::new().match_path(table, path)
}

fn first_match<'t, C>(
    table: &'t RouteTable<C>,
    segments: &[&str],
    skip: &[RouteId],
) -> Option<(&'t Arc<Route<C>>, RouteParams)> {
    table
        .routes()
        .iter()
        .filter(|route| !skip.contains(&route.id()))
        .find_map(|route| route.pattern().matches(segments).map(|params| (route, params)))
}
