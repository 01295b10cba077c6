//! Component references and their resolution
//!
//! A route's component is either available up front ([`ComponentRef::Direct`])
//! or produced on demand by a [`ComponentLoader`] ([`ComponentRef::Deferred`]),
//! the equivalent of a lazily imported page chunk.
//!
//! The resolver never cancels a load in flight. A navigation that is
//! superseded while its component is loading lets the load finish and the
//! controller drops the result.

use crate::error::RouterError;
use crate::route::Route;
#[cfg(feature = "cache")]
use crate::cache::ComponentCache;
use crate::{debug_log, trace_log, warn_log};
use futures::future::{self, BoxFuture, FutureExt};
#[cfg(feature = "cache")]
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
#[cfg(feature = "cache")]
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Result of a deferred load; the error is a human readable reason.
pub type LoadResult<C> = Result<C, String>;

/// Future returned by [`ComponentLoader::load`]
pub type LoadFuture<C> = BoxFuture<'static, LoadResult<C>>;

/// Asynchronous producer of a component.
///
/// Implemented for any `Fn() -> impl Future<Output = LoadResult<C>>`, so a
/// closure returning an `async` block is a loader:
///
/// ```
/// use slot_navigator::{ComponentLoader, LoadResult};
///
/// let loader = || async { Ok::<_, String>("settings page") };
/// let page: LoadResult<&str> = pollster::block_on(loader.load());
/// assert_eq!(page.unwrap(), "settings page");
/// ```
pub trait ComponentLoader<C>: Send + Sync + 'static {
    /// Start loading. Called at most once per navigation.
    fn load(&self) -> LoadFuture<C>;
}

impl<C, F, Fut> ComponentLoader<C> for F
where
    C: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = LoadResult<C>> + Send + 'static,
{
    fn load(&self) -> LoadFuture<C> {
        self().boxed()
    }
}

/// Type-erased loader for dynamic dispatch
pub type BoxedLoader<C> = Arc<dyn ComponentLoader<C>>;

/// Reference to a route's component
pub enum ComponentRef<C> {
    /// Component value available immediately
    Direct(C),
    /// Component produced by a loader on each navigation
    Deferred(BoxedLoader<C>),
}

impl<C> ComponentRef<C> {
    /// Wrap a loader
    pub fn deferred<L>(loader: L) -> Self
    where
        L: ComponentLoader<C>,
    {
        Self::Deferred(Arc::new(loader))
    }

    /// Check if resolving this reference involves a loader
    pub fn is_deferred(&self) -> bool {
        matches!(self, ComponentRef::Deferred(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ComponentRef::Direct(_) => "direct",
            ComponentRef::Deferred(_) => "deferred",
        }
    }
}

impl<C: Clone> Clone for ComponentRef<C> {
    fn clone(&self) -> Self {
        match self {
            ComponentRef::Direct(component) => ComponentRef::Direct(component.clone()),
            ComponentRef::Deferred(loader) => ComponentRef::Deferred(Arc::clone(loader)),
        }
    }
}

impl<C> fmt::Debug for ComponentRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentRef::{}", self.kind())
    }
}

// ============================================================================
// ComponentResolver
// ============================================================================

/// Turns component references into component values.
///
/// By default every resolution of a deferred reference invokes its loader.
/// With the `cache` feature, [`ComponentResolver::memoized`] keeps loaded
/// components per route so later navigations skip the loader.
pub struct ComponentResolver<C> {
    #[cfg(feature = "cache")]
    memo: Option<Arc<Mutex<ComponentCache<C>>>>,
    _marker: std::marker::PhantomData<fn() -> C>,
}

impl<C> ComponentResolver<C>
where
    C: Clone + Send + 'static,
{
    /// Resolver without memoization
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "cache")]
            memo: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Resolver remembering up to `capacity` loaded components
    #[cfg(feature = "cache")]
    pub fn memoized(capacity: NonZeroUsize) -> Self {
        Self {
            memo: Some(Arc::new(Mutex::new(ComponentCache::new(capacity)))),
            _marker: std::marker::PhantomData,
        }
    }

    /// Check if loaded components are remembered across navigations
    pub fn is_memoized(&self) -> bool {
        #[cfg(feature = "cache")]
        {
            self.memo.is_some()
        }
        #[cfg(not(feature = "cache"))]
        {
            false
        }
    }

    /// Memo statistics, if memoization is enabled
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<crate::cache::CacheStats> {
        self.memo.as_ref().map(|memo| memo.lock().stats().clone())
    }

    /// Resolve a component reference for `path`.
    ///
    /// Direct values resolve immediately. Deferred references invoke their
    /// loader exactly once; a loader error becomes [`RouterError::Load`].
    pub fn resolve(
        &self,
        component: &ComponentRef<C>,
        path: &str,
    ) -> BoxFuture<'static, Result<C, RouterError>> {
        match component {
            ComponentRef::Direct(component) => future::ready(Ok(component.clone())).boxed(),
            ComponentRef::Deferred(loader) => {
                debug_log!("Loading component for '{}'", path);
                let path = path.to_string();
                loader
                    .load()
                    .map(move |result| {
                        result.map_err(|reason| {
                            warn_log!("Component for '{}' failed to load: {}", path, reason);
                            RouterError::Load { path, reason }
                        })
                    })
                    .boxed()
            }
        }
    }

    /// Resolve the component of a matched route, consulting the memo.
    ///
    /// Redirect routes carry no component and fail with
    /// [`RouterError::RouteNotFound`].
    pub fn resolve_route(
        &self,
        route: &Route<C>,
        path: &str,
    ) -> BoxFuture<'static, Result<C, RouterError>> {
        let Some(component) = route.component() else {
            return future::ready(Err(RouterError::RouteNotFound {
                path: path.to_string(),
            }))
            .boxed();
        };

        #[cfg(feature = "cache")]
        if let (Some(memo), ComponentRef::Deferred(_)) = (&self.memo, component) {
            if let Some(hit) = memo.lock().get(route.id()) {
                return future::ready(Ok(hit)).boxed();
            }

            let memo = Arc::clone(memo);
            let id = route.id();
            return self
                .resolve(component, path)
                .map(move |result| {
                    if let Ok(component) = &result {
                        memo.lock().insert(id, component.clone());
                    }
                    result
                })
                .boxed();
        }

        trace_log!("Resolving {:?} component for '{}'", component, path);
        self.resolve(component, path)
    }
}

impl<C> Default for ComponentResolver<C>
where
    C: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
