//! A set of logging macros that print not only timestamp and log level,
//! but also filename, line and column.
//!
//! `trace`, `debug` and `info` are plain `tracing` macros. `warn` and `error`
//! prepend the location of the call site, since those are the messages one
//! usually wants to trace back to the code.
//!
//! Libraries only emit events. Whoever owns the process (a binary or a test)
//! calls [`init`] once to print them.
pub use tracing::{debug, info, trace};

#[doc(hidden)]
pub use tracing as __tracing;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Repeated calls are no-ops, so every test may call it.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(
            "[{}:{}:{}] {}",
            file!(),
            line!(),
            column!(),
            format!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(
            "[{}:{}:{}] {}",
            file!(),
            line!(),
            column!(),
            format!($($arg)*)
        );
    };
}
