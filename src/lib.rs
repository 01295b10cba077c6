//! # Slot Navigator
//!
//! Client-side navigation for single-page shells that render one route at a
//! time into a single mount slot:
//!
//! - **Ordered Route Tables** - Static segments, `:params`, constraints and a `**` catch-all, first match wins
//! - **Redirects** - Chains with parameter substitution and loop detection
//! - **Lazy Components** - Deferred producers loaded once per navigation, optionally memoized
//! - **Last Request Wins** - Superseded navigations are cancelled, never mounted
//! - **Lifecycle Events** - Start / end / cancel / error on a synchronous event bus
//! - **History** - Push, replace, back and forward
//! - **Readiness Gate** - Register routes once the router host exists
//!
//! # Quick Start
//!
//! ```
//! use slot_navigator::*;
//!
//! let bus = EventBus::new();
//! let router = NavigationController::new(RouteTable::empty(), bus.clone());
//!
//! router
//!     .add(vec![
//!         RouteDefinition::component("demo", "DemoComponent"),
//!         RouteDefinition::lazy("", || async { Ok::<_, String>("HomeComponent") }),
//!         RouteDefinition::redirect("**", ""),
//!     ])
//!     .unwrap();
//!
//! bus.once(EventKind::NavigationEnd, |event| {
//!     println!("navigated to {:?}", event.path());
//! });
//!
//! let outcome = pollster::block_on(router.navigate("demo"));
//! assert!(outcome.is_completed());
//! assert_eq!(router.mounted_component(), Some("DemoComponent"));
//! ```
//!
//! # Matching
//!
//! Routes are tried in declaration order and the first match wins, so a
//! catch-all declared early shadows everything after it:
//!
//! ```
//! use slot_navigator::*;
//!
//! let table = RouteTable::build(vec![
//!     RouteDefinition::component("users/:id<\\d+>", "User"),
//!     RouteDefinition::redirect("u/:id", "users/:id"),
//! ])
//! .unwrap();
//!
//! let matched = match_path(&table, "/u/42?tab=posts").unwrap().unwrap();
//! assert_eq!(matched.path, "users/42");
//! assert_eq!(matched.params.get_as::<u32>("id"), Some(42));
//! assert_eq!(matched.query.get("tab"), Some("posts"));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU memo for lazily loaded components

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod matcher;
pub mod params;
pub mod resolver;
pub mod route;

// Navigation lifecycle
pub mod controller;
pub mod events;
pub mod history;
pub mod lifecycle;
pub mod state;

// Error handling
pub mod error;

// Router host readiness
pub mod gate;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ComponentCache};
pub use controller::{Navigation, NavigationController, NavigatorOptions};
pub use error::{NavigationOutcome, RouterError};
pub use events::{
    EventBus, EventHandler, EventKind, LifecycleEvent, SubscribeOptions, Subscription,
};
pub use gate::{readiness, ReadySignal, RouterHost, WhenReady};
pub use history::{History, HistoryChange};
pub use lifecycle::{BoxedLifecycle, MountedRoute, RouteLifecycle};
pub use matcher::{
    match_path, normalize_path, Constraint, NormalizedPath, PathMatcher, RouteMatch, RoutePattern,
    Segment,
};
pub use params::{QueryParams, RouteParams};
pub use resolver::{
    BoxedLoader, ComponentLoader, ComponentRef, ComponentResolver, LoadFuture, LoadResult,
};
pub use route::{validate_route_path, Route, RouteDefinition, RouteId, RouteTable, RouteTarget};
pub use state::{NavigationContext, NavigationId, NavigationState};

/// Direction of a history move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    /// New entry, or moving forward through existing entries
    Forward,
    /// Moving back through existing entries
    Back,
    /// Current entry overwritten
    Replace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let table = RouteTable::build(vec![
            RouteDefinition::component("", 0_u8),
            RouteDefinition::redirect("**", ""),
        ])
        .unwrap();
        let router = NavigationController::new(table, EventBus::new());

        let outcome = pollster::block_on(router.navigate("anything/at/all"));
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                path: "anything/at/all".to_string(),
                resolved_path: String::new(),
            }
        );
    }

    #[test]
    fn test_navigation_direction_eq() {
        assert_ne!(NavigationDirection::Forward, NavigationDirection::Back);
        assert_eq!(NavigationDirection::Replace, NavigationDirection::Replace);
    }
}
