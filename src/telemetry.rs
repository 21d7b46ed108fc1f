//! Opt-in tracing setup for hosts embedding `waterfall-chart`.
//!
//! Chart code emits `tracing` events under the `waterfall_chart` target:
//! `debug` for props/domain recomputation, `trace` for layout passes and
//! pointer routing, `warn` for recoverable fallbacks such as an invalid
//! `numbers_format`. Hosts that already own a subscriber need nothing here.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_TRACING_FILTER: &str = "waterfall_chart=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_TRACING_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_TRACING_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive.
#[must_use]
pub fn init_tracing_with_filter(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::init_default_tracing;

    #[test]
    fn second_initialization_is_rejected() {
        let first = init_default_tracing();
        assert!(!init_default_tracing());
        if cfg!(not(feature = "telemetry")) {
            assert!(!first);
        }
    }
}
