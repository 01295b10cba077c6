//! Per-navigation state machine
//!
//! ```text
//! Pending -> Matching -> Resolving -> Mounting -> Completed
//!               |            |           |
//!               +------------+-----------+--> Cancelled | Failed
//! ```
//!
//! A [`NavigationContext`] lives for exactly one navigation attempt and is
//! owned by the controller until the attempt reaches a terminal state.

use crate::debug_log;
use std::fmt;

/// Monotonic identifier of a navigation attempt.
///
/// Later requests get larger ids; the controller uses this to tell the most
/// recent request apart from superseded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationId(pub u64);

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of one navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationState {
    Pending,
    Matching,
    Resolving,
    Mounting,
    Completed,
    Cancelled,
    Failed,
}

impl NavigationState {
    /// Check if no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NavigationState::Completed | NavigationState::Cancelled | NavigationState::Failed
        )
    }

    /// Check if moving from `self` to `next` is allowed
    pub fn can_transition_to(self, next: NavigationState) -> bool {
        use NavigationState::*;

        match (self, next) {
            (Pending, Matching)
            | (Matching, Resolving)
            | (Resolving, Mounting)
            | (Mounting, Completed) => true,
            (Matching | Resolving | Mounting, Cancelled | Failed) => true,
            _ => false,
        }
    }
}

/// Ephemeral record of one navigation attempt
#[derive(Debug, Clone)]
pub struct NavigationContext {
    id: NavigationId,
    requested_path: String,
    matched_path: Option<String>,
    matched_route: Option<String>,
    state: NavigationState,
}

impl NavigationContext {
    /// New context in the `Pending` state
    pub fn new(id: NavigationId, requested_path: impl Into<String>) -> Self {
        Self {
            id,
            requested_path: requested_path.into(),
            matched_path: None,
            matched_route: None,
            state: NavigationState::Pending,
        }
    }

    pub fn id(&self) -> NavigationId {
        self.id
    }

    pub fn requested_path(&self) -> &str {
        &self.requested_path
    }

    /// Path that matched, after redirects
    pub fn matched_path(&self) -> Option<&str> {
        self.matched_path.as_deref()
    }

    /// Pattern of the route that matched
    pub fn matched_route(&self) -> Option<&str> {
        self.matched_route.as_deref()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == NavigationState::Cancelled
    }

    /// Record the outcome of matching
    pub fn set_match(&mut self, path: impl Into<String>, route: impl Into<String>) {
        self.matched_path = Some(path.into());
        self.matched_route = Some(route.into());
    }

    /// Move to `next`.
    ///
    /// Returns `false` and leaves the state unchanged if the transition is
    /// not allowed.
    pub fn advance(&mut self, next: NavigationState) -> bool {
        if !self.state.can_transition_to(next) {
            debug_log!(
                "Navigation {} ignored transition {:?} -> {:?}",
                self.id,
                self.state,
                next
            );
            return false;
        }

        debug_log!(
            "Navigation {} '{}': {:?} -> {:?}",
            self.id,
            self.requested_path,
            self.state,
            next
        );
        self.state = next;
        true
    }
}
