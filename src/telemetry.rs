//! Opt-in tracing setup for hosts embedding `scatter-rs`.
//!
//! Fetch, join and composition events are emitted under the `scatter_rs`
//! target. Hosts that already install a subscriber can ignore this module.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "scatter_rs=info";

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`, falling
/// back to [`DEFAULT_DIRECTIVE`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVE)
}

/// Like [`init_default_tracing`] with a caller supplied fallback directive,
/// e.g. `"scatter_rs=trace"` to follow individual fetches.
#[must_use]
pub fn init_tracing(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
