//! Logging facade
//!
//! Navigation code logs through the macros below so the backend can be picked
//! at compile time:
//!
//! - `log` (default) - forwards to the `log` crate
//! - `tracing` - forwards to the `tracing` crate
//!
//! Every record is emitted under the [`LOG_TARGET`] target, which makes it easy
//! to filter router chatter, e.g. `RUST_LOG=slot_navigator=debug`.
//!
//! ```ignore
//! use slot_navigator::{debug_log, warn_log};
//!
//! debug_log!("matching '{}'", path);
//! warn_log!("component for '{}' failed to load", path);
//! ```

/// Target used for every record emitted by this crate.
pub const LOG_TARGET: &str = "slot_navigator";

#[doc(hidden)]
#[macro_export]
macro_rules! __router_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Trace-level record (cache hits, per-segment matching).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__router_log!(trace, $($arg)*) };
}

/// Debug-level record (navigation state transitions).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__router_log!(debug, $($arg)*) };
}

/// Info-level record.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__router_log!(info, $($arg)*) };
}

/// Warn-level record (failed navigations).
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__router_log!(warn, $($arg)*) };
}

/// Error-level record.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__router_log!(error, $($arg)*) };
}
