//! Tracing initialization.
//!
//! Uses `config::ObservabilityConfig` for CASAPIP_QUIET, CASAPIP_LOG_LEVEL and
//! CASAPIP_LOG_JSON. Output goes to stderr so stdout stays free for `info --json`.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call once at process startup.
/// When CASAPIP_QUIET=1 only WARN and above are logged. `RUST_LOG` wins when set.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(cfg);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .try_init()
    };
}

/// Quiet-mode aware check for progress output; see `casapip_bootstrap::info_log!`.
pub fn is_quiet() -> bool {
    ObservabilityConfig::from_env().quiet
}

fn filter_directive(cfg: &ObservabilityConfig) -> String {
    if cfg.quiet {
        "casapip=warn".to_string()
    } else {
        cfg.log_level.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_overrides_level() {
        let cfg = ObservabilityConfig {
            quiet: true,
            log_level: "casapip=debug".to_string(),
            log_json: false,
        };
        assert_eq!(filter_directive(&cfg), "casapip=warn");
    }

    #[test]
    fn test_level_passes_through() {
        let cfg = ObservabilityConfig {
            quiet: false,
            log_level: "casapip=debug".to_string(),
            log_json: true,
        };
        assert_eq!(filter_directive(&cfg), "casapip=debug");
    }
}
