use env_logger::Env;

/// Log filter used when `RUST_LOG` is not set.
///
/// Runs skipped because of a missing or invalid `metadata.json` are logged at `warn`, so they are
/// reported by default.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Logger settings from `RUST_LOG` and `RUST_LOG_STYLE`, defaulting to [`DEFAULT_LOG_FILTER`]
pub fn log_env() -> Env<'static> {
    Env::default().default_filter_or(DEFAULT_LOG_FILTER)
}

/// Install the global logger
pub fn init_logging() {
    env_logger::Builder::from_env(log_env()).init();
}

#[cfg(test)]
mod tests {
    use log::{Level, Log, Metadata};

    use super::*;

    fn enabled(logger: &env_logger::Logger, level: Level) -> bool {
        logger.enabled(
            &Metadata::builder()
                .level(level)
                .target("styx_run_browser::scan")
                .build(),
        )
    }

    #[test]
    fn skipped_runs_are_logged_by_default() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let logger = env_logger::Builder::from_env(log_env()).build();
        assert!(enabled(&logger, Level::Warn));
        assert!(!enabled(&logger, Level::Info));
    }
}
