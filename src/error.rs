//! Error handling for the navigator
//!
//! Provides the error taxonomy shared by table building, matching, component
//! loading and host discovery, plus the settled result of a navigation.

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while building route tables or navigating
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Malformed route definition, raised when the table is built
    #[error("Invalid route configuration: {message}")]
    Config { message: String },

    /// A redirect chain revisited a path it already passed through
    #[error("Redirect loop detected at '{path}' (chain: {})", .chain.join(" -> "))]
    RedirectLoop { path: String, chain: Vec<String> },

    /// No definition matched and the table has no catch-all
    #[error("Route not found: '{path}'")]
    RouteNotFound { path: String },

    /// The matched route's component failed to load
    #[error("Failed to load component for '{path}': {reason}")]
    Load { path: String, reason: String },

    /// The readiness signal was dropped without ever firing
    #[error("Router host was never defined")]
    HostUnavailable,

    /// The readiness signal was fired more than once
    #[error("Router host is already defined")]
    AlreadyReady,
}

impl RouterError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            RouterError::RedirectLoop { path, .. }
            | RouterError::RouteNotFound { path }
            | RouterError::Load { path, .. } => Some(path),
            _ => None,
        }
    }
}

// ============================================================================
// Navigation Outcome
// ============================================================================

/// Settled result of one navigation attempt.
///
/// Navigation futures never fail; errors are carried here and published on
/// the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The component was mounted
    Completed {
        /// Path that was requested
        path: String,
        /// Path that actually matched after following redirects
        resolved_path: String,
    },
    /// A newer navigation superseded this one
    Cancelled { path: String },
    /// Matching or loading failed; the previous mount is untouched
    Failed(RouterError),
}

impl NavigationOutcome {
    /// Check if the navigation mounted its component
    pub fn is_completed(&self) -> bool {
        matches!(self, NavigationOutcome::Completed { .. })
    }

    /// Check if the navigation was superseded
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationOutcome::Cancelled { .. })
    }

    /// Check if the navigation failed
    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationOutcome::Failed(_))
    }

    /// Get the failure, if any
    pub fn error(&self) -> Option<&RouterError> {
        match self {
            NavigationOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}
