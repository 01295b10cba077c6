//! The mounted-route slot and its lifecycle hooks
//!
//! Exactly one route is mounted at a time. When a navigation completes, the
//! previously mounted route is unmounted first, then the new one is mounted;
//! hooks observe both steps. A failed or superseded navigation never touches
//! the slot.

use crate::params::{QueryParams, RouteParams};
use crate::state::NavigationId;
use std::sync::Arc;

/// A component installed in the mount slot
#[derive(Debug, Clone, PartialEq)]
pub struct MountedRoute<C> {
    /// Navigation that mounted it
    pub navigation: NavigationId,
    /// Path that was requested
    pub requested_path: String,
    /// Path that matched after redirects
    pub path: String,
    /// Pattern of the matched route
    pub route: String,
    pub params: RouteParams,
    pub query: QueryParams,
    pub component: C,
}

/// Hooks observing the mount slot.
///
/// # Example
///
/// ```
/// use slot_navigator::{MountedRoute, RouteLifecycle};
///
/// struct TitleUpdater;
///
/// impl RouteLifecycle<&'static str> for TitleUpdater {
///     fn on_mount(&self, mounted: &MountedRoute<&'static str>) {
///         println!("now showing {}", mounted.component);
///     }
/// }
/// ```
pub trait RouteLifecycle<C>: Send + Sync + 'static {
    /// Called after `mounted` was installed
    fn on_mount(&self, mounted: &MountedRoute<C>);

    /// Called after `unmounted` was removed to make room for a new route
    fn on_unmount(&self, unmounted: &MountedRoute<C>) {
        let _ = unmounted;
    }
}

/// Type-erased lifecycle for dynamic dispatch
pub type BoxedLifecycle<C> = Arc<dyn RouteLifecycle<C>>;
