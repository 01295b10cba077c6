//! Navigation orchestration
//!
//! [`NavigationController`] drives every navigation through
//! match → resolve → mount and publishes the lifecycle on its [`EventBus`].
//!
//! Each call to [`NavigationController::navigate`] becomes the authoritative
//! navigation immediately. Earlier navigations still loading their component
//! are superseded: their loads run to completion but the result is dropped,
//! they publish `NavigationCancel` and never reach the mount slot. Last
//! request wins, not first resolved.

use crate::error::{NavigationOutcome, RouterError};
use crate::events::{EventBus, LifecycleEvent};
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::lifecycle::{BoxedLifecycle, MountedRoute, RouteLifecycle};
use crate::matcher::{PathMatcher, RouteMatch, DEFAULT_MAX_REDIRECTS};
use crate::resolver::ComponentResolver;
use crate::route::{RouteDefinition, RouteTable};
use crate::state::{NavigationContext, NavigationId, NavigationState};
use crate::{debug_log, info_log, warn_log};
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::fmt;
#[cfg(feature = "cache")]
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Future of one navigation; always settles, never panics or errors
pub type Navigation = BoxFuture<'static, NavigationOutcome>;

// ============================================================================
// NavigatorOptions
// ============================================================================

/// Runtime configuration of a [`NavigationController`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorOptions {
    /// Redirects followed per navigation before failing
    pub max_redirects: usize,
    /// History entries kept (0 = unlimited)
    pub history_limit: usize,
    /// Path the history starts at and [`NavigationController::start`] visits
    pub initial_path: String,
    /// Remember up to this many lazily loaded components across navigations
    #[cfg(feature = "cache")]
    pub memoize_components: Option<NonZeroUsize>,
}

impl NavigatorOptions {
    pub fn new() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            initial_path: String::new(),
            #[cfg(feature = "cache")]
            memoize_components: None,
        }
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub fn initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = path.into();
        self
    }

    /// Keep loaded components so revisiting a route skips its loader
    #[cfg(feature = "cache")]
    pub fn memoize_components(mut self, capacity: NonZeroUsize) -> Self {
        self.memoize_components = Some(capacity);
        self
    }
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NavigationController
// ============================================================================

struct Inner<C> {
    table: Mutex<Arc<RouteTable<C>>>,
    matcher: PathMatcher,
    resolver: ComponentResolver<C>,
    bus: EventBus,
    /// Id of the most recently requested navigation
    latest: AtomicU64,
    mounted: Mutex<Option<MountedRoute<C>>>,
    history: Mutex<History>,
    hooks: Mutex<Vec<BoxedLifecycle<C>>>,
    options: NavigatorOptions,
}

/// Orchestrates navigations against a route table.
///
/// Cloning yields another handle to the same controller.
///
/// # Example
///
/// ```
/// use slot_navigator::{EventBus, NavigationController, RouteDefinition, RouteTable};
///
/// let table = RouteTable::build(vec![
///     RouteDefinition::component("", "home"),
///     RouteDefinition::lazy("demo", || async { Ok::<_, String>("demo") }),
///     RouteDefinition::redirect("**", ""),
/// ])
/// .unwrap();
///
/// let router = NavigationController::new(table, EventBus::new());
///
/// let outcome = pollster::block_on(router.navigate("demo"));
/// assert!(outcome.is_completed());
/// assert_eq!(router.mounted_component(), Some("demo"));
///
/// let outcome = pollster::block_on(router.navigate("nowhere"));
/// assert!(outcome.is_completed());
/// assert_eq!(router.mounted_component(), Some("home"));
/// ```
pub struct NavigationController<C> {
    inner: Arc<Inner<C>>,
}

impl<C> NavigationController<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Controller with default options
    pub fn new(table: RouteTable<C>, bus: EventBus) -> Self {
        Self::with_options(table, bus, NavigatorOptions::default())
    }

    pub fn with_options(table: RouteTable<C>, bus: EventBus, options: NavigatorOptions) -> Self {
        #[cfg(feature = "cache")]
        let resolver = match options.memoize_components {
            Some(capacity) => ComponentResolver::memoized(capacity),
            None => ComponentResolver::new(),
        };
        #[cfg(not(feature = "cache"))]
        let resolver = ComponentResolver::new();

        Self {
            inner: Arc::new(Inner {
                table: Mutex::new(Arc::new(table)),
                matcher: PathMatcher::new().with_max_redirects(options.max_redirects),
                resolver,
                bus,
                latest: AtomicU64::new(0),
                mounted: Mutex::new(None),
                history: Mutex::new(History::with_limit(
                    options.initial_path.clone(),
                    options.history_limit,
                )),
                hooks: Mutex::new(Vec::new()),
                options,
            }),
        }
    }

    /// Append route definitions.
    ///
    /// The extended table takes effect for navigations requested after this
    /// call; navigations already in flight keep the table they started with.
    pub fn add(
        &self,
        definitions: impl IntoIterator<Item = RouteDefinition<C>>,
    ) -> Result<(), RouterError> {
        let mut table = self.inner.table.lock();
        let extended = table.extend(definitions)?;
        debug_log!("Route table extended to {} routes", extended.len());
        *table = Arc::new(extended);
        Ok(())
    }

    /// Snapshot of the current route table
    pub fn table(&self) -> Arc<RouteTable<C>> {
        self.inner.table.lock().clone()
    }

    /// Register hooks observing the mount slot
    pub fn add_lifecycle<L>(&self, hooks: L)
    where
        L: RouteLifecycle<C>,
    {
        self.inner.hooks.lock().push(Arc::new(hooks));
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn options(&self) -> &NavigatorOptions {
        &self.inner.options
    }

    /// Currently mounted route, if any navigation completed
    pub fn mounted(&self) -> Option<MountedRoute<C>> {
        self.inner.mounted.lock().clone()
    }

    /// Currently mounted component
    pub fn mounted_component(&self) -> Option<C> {
        self.inner
            .mounted
            .lock()
            .as_ref()
            .map(|mounted| mounted.component.clone())
    }

    /// Id of the most recently requested navigation
    pub fn latest_navigation(&self) -> Option<NavigationId> {
        match self.inner.latest.load(Ordering::SeqCst) {
            0 => None,
            id => Some(NavigationId(id)),
        }
    }

    /// Navigate to `path`.
    ///
    /// `NavigationStart` is published and matching happens before this
    /// returns; the returned future finishes resolving and mounting. Errors
    /// are reported through the outcome and a `NavigationError` event.
    pub fn navigate(&self, path: impl Into<String>) -> Navigation {
        let path = path.into();
        let id = NavigationId(self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let mut context = NavigationContext::new(id, path.clone());

        context.advance(NavigationState::Matching);
        self.inner.bus.publish(LifecycleEvent::start(path.clone()));

        let table = self.table();
        let matched = match self.inner.matcher.match_path(&table, &path) {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                let outcome = self.inner.fail(context, RouterError::RouteNotFound { path });
                return future::ready(outcome).boxed();
            }
            Err(error) => {
                let outcome = self.inner.fail(context, error);
                return future::ready(outcome).boxed();
            }
        };

        context.set_match(matched.path.clone(), matched.route.path());
        context.advance(NavigationState::Resolving);
        let resolving = self
            .inner
            .resolver
            .resolve_route(&matched.route, &matched.path);

        let inner = Arc::clone(&self.inner);
        async move {
            let result = resolving.await;
            inner.complete(context, matched, result)
        }
        .boxed()
    }

    /// Visit the current history entry (the initial path on a fresh controller)
    pub fn start(&self) -> Navigation {
        let path = self.current_path();
        self.navigate(path)
    }

    /// Record `path` in history and navigate to it
    pub fn push(&self, path: impl Into<String>) -> Navigation {
        let path = path.into();
        self.inner.history.lock().push(path.clone());
        self.navigate(path)
    }

    /// Overwrite the current history entry with `path` and navigate to it
    pub fn replace(&self, path: impl Into<String>) -> Navigation {
        let path = path.into();
        self.inner.history.lock().replace(path.clone());
        self.navigate(path)
    }

    /// Navigate to the previous history entry, if there is one
    pub fn back(&self) -> Option<Navigation> {
        let change = self.inner.history.lock().back()?;
        Some(self.navigate(change.to))
    }

    /// Navigate to the next history entry, if there is one
    pub fn forward(&self) -> Option<Navigation> {
        let change = self.inner.history.lock().forward()?;
        Some(self.navigate(change.to))
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.history.lock().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.inner.history.lock().can_go_forward()
    }

    /// Path of the current history entry
    pub fn current_path(&self) -> String {
        self.inner.history.lock().current_path().to_string()
    }
}

impl<C> Inner<C>
where
    C: Clone + Send + Sync + 'static,
{
    fn is_current(&self, id: NavigationId) -> bool {
        self.latest.load(Ordering::SeqCst) == id.0
    }

    fn complete(
        &self,
        mut context: NavigationContext,
        matched: RouteMatch<C>,
        result: Result<C, RouterError>,
    ) -> NavigationOutcome {
        if !self.is_current(context.id()) {
            return self.cancel(context);
        }

        let component = match result {
            Ok(component) => component,
            Err(error) => return self.fail(context, error),
        };

        context.advance(NavigationState::Mounting);
        let RouteMatch {
            requested_path,
            path: resolved_path,
            route,
            params,
            query,
            ..
        } = matched;

        self.mount(MountedRoute {
            navigation: context.id(),
            requested_path,
            path: resolved_path.clone(),
            route: route.path().to_string(),
            params,
            query,
            component,
        });

        context.advance(NavigationState::Completed);
        info_log!(
            "Navigation {} to '{}' completed (route '{}')",
            context.id(),
            context.requested_path(),
            route.path()
        );

        let path = context.requested_path().to_string();
        self.bus
            .publish(LifecycleEvent::end(path.clone(), resolved_path.clone()));
        NavigationOutcome::Completed {
            path,
            resolved_path,
        }
    }

    fn fail(&self, mut context: NavigationContext, error: RouterError) -> NavigationOutcome {
        if !self.is_current(context.id()) {
            return self.cancel(context);
        }

        context.advance(NavigationState::Failed);
        warn_log!(
            "Navigation {} to '{}' failed: {}",
            context.id(),
            context.requested_path(),
            error
        );
        self.bus.publish(LifecycleEvent::error(
            context.requested_path(),
            error.clone(),
        ));
        NavigationOutcome::Failed(error)
    }

    fn cancel(&self, mut context: NavigationContext) -> NavigationOutcome {
        context.advance(NavigationState::Cancelled);
        debug_log!(
            "Navigation {} to '{}' superseded, dropping its result",
            context.id(),
            context.requested_path()
        );

        let path = context.requested_path().to_string();
        self.bus.publish(LifecycleEvent::cancel(path.clone()));
        NavigationOutcome::Cancelled { path }
    }

    fn mount(&self, mounted: MountedRoute<C>) {
        let previous = self.mounted.lock().replace(mounted.clone());
        let hooks: Vec<BoxedLifecycle<C>> = self.hooks.lock().clone();

        if let Some(previous) = &previous {
            for hook in &hooks {
                hook.on_unmount(previous);
            }
        }
        for hook in &hooks {
            hook.on_mount(&mounted);
        }
    }
}

impl<C> Clone for NavigationController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for NavigationController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("routes", &self.inner.table.lock().len())
            .field("latest", &self.inner.latest.load(Ordering::SeqCst))
            .field("bus", &self.inner.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, SubscribeOptions};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    type Page = &'static str;

    fn record_events(bus: &EventBus) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for kind in [
            EventKind::NavigationStart,
            EventKind::NavigationEnd,
            EventKind::NavigationCancel,
            EventKind::NavigationError,
        ] {
            let log = Arc::clone(&log);
            bus.subscribe(kind, SubscribeOptions::always(), move |event| {
                log.lock().push(format!("{:?}:{}", event.kind(), event.path()));
            });
        }
        log
    }

    fn delayed(page: Page, millis: u64) -> impl crate::ComponentLoader<Page> {
        move || async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok::<_, String>(page)
        }
    }

    fn controller(
        definitions: Vec<RouteDefinition<Page>>,
    ) -> (NavigationController<Page>, Arc<Mutex<Vec<String>>>) {
        let bus = EventBus::new();
        let log = record_events(&bus);
        let table = RouteTable::build(definitions).unwrap();
        (NavigationController::new(table, bus), log)
    }

    #[test]
    fn test_navigate_direct_component() {
        let (router, log) = controller(vec![RouteDefinition::component("", "Home")]);

        let outcome = pollster::block_on(router.navigate(""));
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                path: String::new(),
                resolved_path: String::new(),
            }
        );
        assert_eq!(router.mounted_component(), Some("Home"));
        assert_eq!(*log.lock(), vec!["NavigationStart:", "NavigationEnd:"]);
    }

    #[test]
    fn test_start_event_published_before_future_runs() {
        let (router, log) = controller(vec![RouteDefinition::lazy("demo", || async {
            Ok::<_, String>("Demo")
        })]);

        let pending = router.navigate("demo");
        assert_eq!(*log.lock(), vec!["NavigationStart:demo"]);
        assert!(router.mounted().is_none());

        pollster::block_on(pending);
        assert_eq!(router.mounted_component(), Some("Demo"));
    }

    #[test]
    fn test_not_found_keeps_previous_mount() {
        let (router, log) = controller(vec![RouteDefinition::component("", "Home")]);
        pollster::block_on(router.navigate(""));

        let outcome = pollster::block_on(router.navigate("missing"));
        assert_eq!(
            outcome.error(),
            Some(&RouterError::RouteNotFound {
                path: "missing".to_string()
            })
        );
        assert_eq!(router.mounted_component(), Some("Home"));
        assert_eq!(log.lock().last().map(String::as_str), Some("NavigationError:missing"));
    }

    #[test]
    fn test_redirect_loop_fails_navigation() {
        let (router, _log) = controller(vec![
            RouteDefinition::redirect("a", "b"),
            RouteDefinition::redirect("b", "a"),
        ]);

        let outcome = pollster::block_on(router.navigate("a"));
        assert!(matches!(outcome.error(), Some(RouterError::RedirectLoop { .. })));
    }

    #[test]
    fn test_load_failure_keeps_previous_mount() {
        let (router, log) = controller(vec![
            RouteDefinition::component("", "Home"),
            RouteDefinition::lazy("broken", || async { Err::<Page, _>("404 chunk".to_string()) }),
        ]);
        pollster::block_on(router.navigate(""));

        let outcome = pollster::block_on(router.navigate("broken"));
        assert!(matches!(outcome.error(), Some(RouterError::Load { path, .. }) if path == "broken"));
        assert_eq!(router.mounted_component(), Some("Home"));
        assert!(!log.lock().iter().any(|entry| entry == "NavigationEnd:broken"));
    }

    #[test]
    fn test_loader_invoked_once_per_navigation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (router, _log) = controller(vec![RouteDefinition::lazy("demo", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            future::ready(Ok::<Page, String>("Demo"))
        })]);

        pollster::block_on(router.navigate("demo"));
        pollster::block_on(router.navigate("demo"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_memoized_components_skip_loader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let table = RouteTable::build(vec![RouteDefinition::lazy("demo", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            future::ready(Ok::<Page, String>("Demo"))
        })])
        .unwrap();
        let options =
            NavigatorOptions::new().memoize_components(NonZeroUsize::new(8).unwrap());
        let router = NavigationController::with_options(table, EventBus::new(), options);

        pollster::block_on(router.navigate("demo"));
        pollster::block_on(router.navigate("demo"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_last_request_wins_when_earlier_resolves_later() {
        let (router, log) = controller(vec![
            RouteDefinition::lazy("demo", delayed("Demo", 50)),
            RouteDefinition::lazy("get-started", delayed("GetStarted", 10)),
        ]);

        let (demo, get_started) =
            tokio::join!(router.navigate("demo"), router.navigate("get-started"));

        assert!(demo.is_cancelled());
        assert!(get_started.is_completed());
        assert_eq!(router.mounted_component(), Some("GetStarted"));
        assert_eq!(
            *log.lock(),
            vec![
                "NavigationStart:demo",
                "NavigationStart:get-started",
                "NavigationEnd:get-started",
                "NavigationCancel:demo",
            ]
        );
    }

    #[tokio::test]
    async fn test_last_request_wins_when_earlier_resolves_first() {
        let (router, log) = controller(vec![
            RouteDefinition::lazy("fast", delayed("Fast", 5)),
            RouteDefinition::lazy("slow", delayed("Slow", 30)),
        ]);

        let (fast, slow) = tokio::join!(router.navigate("fast"), router.navigate("slow"));

        assert!(fast.is_cancelled());
        assert!(slow.is_completed());
        assert_eq!(router.mounted_component(), Some("Slow"));
        let ends = log
            .lock()
            .iter()
            .filter(|entry| entry.starts_with("NavigationEnd"))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_add_takes_effect_on_next_navigation() {
        let (router, _log) = controller(vec![]);
        assert!(pollster::block_on(router.navigate("late")).is_failed());

        router.add(vec![RouteDefinition::component("late", "Late")]).unwrap();
        assert!(pollster::block_on(router.navigate("late")).is_completed());
        assert!(router.add(vec![RouteDefinition::component("a//b", "Bad")]).is_err());
        assert_eq!(router.table().len(), 1);
    }

    #[test]
    fn test_history_navigation() {
        let (router, _log) = controller(vec![
            RouteDefinition::component("", "Home"),
            RouteDefinition::component("demo", "Demo"),
        ]);

        pollster::block_on(router.start());
        pollster::block_on(router.push("demo"));
        assert_eq!(router.current_path(), "demo");
        assert!(router.can_go_back());

        pollster::block_on(router.back().unwrap());
        assert_eq!(router.mounted_component(), Some("Home"));
        assert!(router.back().is_none());

        pollster::block_on(router.forward().unwrap());
        assert_eq!(router.mounted_component(), Some("Demo"));
        assert!(!router.can_go_forward());
    }

    #[test]
    fn test_mount_records_match_details() {
        let (router, _log) = controller(vec![
            RouteDefinition::component("users/:id", "User"),
            RouteDefinition::redirect("u/:id", "users/:id"),
        ]);

        pollster::block_on(router.navigate("/u/42?tab=posts"));
        let mounted = router.mounted().unwrap();
        assert_eq!(mounted.requested_path, "u/42");
        assert_eq!(mounted.path, "users/42");
        assert_eq!(mounted.route, "users/:id");
        assert_eq!(mounted.params.get("id"), Some("42"));
        assert_eq!(mounted.query.get("tab"), Some("posts"));
        assert_eq!(Some(mounted.navigation), router.latest_navigation());
    }

    #[test]
    fn test_lifecycle_hooks_unmount_before_mount() {
        struct Journal(Arc<Mutex<Vec<String>>>);

        impl RouteLifecycle<Page> for Journal {
            fn on_mount(&self, mounted: &MountedRoute<Page>) {
                self.0.lock().push(format!("mount {}", mounted.component));
            }

            fn on_unmount(&self, unmounted: &MountedRoute<Page>) {
                self.0.lock().push(format!("unmount {}", unmounted.component));
            }
        }

        let (router, _log) = controller(vec![
            RouteDefinition::component("", "Home"),
            RouteDefinition::component("demo", "Demo"),
        ]);
        let journal = Arc::new(Mutex::new(Vec::new()));
        router.add_lifecycle(Journal(Arc::clone(&journal)));

        pollster::block_on(router.navigate(""));
        pollster::block_on(router.navigate("missing"));
        pollster::block_on(router.navigate("demo"));

        assert_eq!(
            *journal.lock(),
            vec!["mount Home", "unmount Home", "mount Demo"]
        );
    }

    #[test]
    fn test_navigate_from_event_handler() {
        let (router, _log) = controller(vec![
            RouteDefinition::component("", "Home"),
            RouteDefinition::component("next", "Next"),
        ]);

        let handle = router.clone();
        let follow_up = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&follow_up);
        router.bus().once(EventKind::NavigationEnd, move |_| {
            *slot.lock() = Some(handle.navigate("next"));
        });

        pollster::block_on(router.navigate(""));
        let pending = follow_up.lock().take().unwrap();
        assert!(pollster::block_on(pending).is_completed());
        assert_eq!(router.mounted_component(), Some("Next"));
    }
}
