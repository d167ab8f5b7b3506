//! Tracing subscriber setup.

use std::io;

use tern_config::LogConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Picks the filter directive: `--verbose` and `--quiet` win, then
/// `RUST_LOG`, then the configured filter.
pub fn filter_directive(global: &GlobalArgs, config: &LogConfig, env: Option<&str>) -> String {
    if global.verbose {
        "debug".to_string()
    } else if global.quiet {
        "error".to_string()
    } else if let Some(env) = env.filter(|e| !e.trim().is_empty()) {
        env.to_string()
    } else {
        config.filter.clone()
    }
}

/// Installs the global subscriber, logging to stderr.
pub fn init(global: &GlobalArgs, config: &LogConfig) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(global, config, env.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(global.color)
                .with_target(true)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        }
    }

    fn config(filter: &str) -> LogConfig {
        LogConfig {
            filter: filter.to_string(),
        }
    }

    #[test]
    fn verbose_wins() {
        let d = filter_directive(&global(true, true), &config("warn"), Some("trace"));
        assert_eq!(d, "debug");
    }

    #[test]
    fn quiet_overrides_env() {
        let d = filter_directive(&global(true, false), &config("warn"), Some("trace"));
        assert_eq!(d, "error");
    }

    #[test]
    fn env_overrides_config() {
        let d = filter_directive(&global(false, false), &config("warn"), Some("tern_cache=trace"));
        assert_eq!(d, "tern_cache=trace");
    }

    #[test]
    fn config_is_the_fallback() {
        let d = filter_directive(&global(false, false), &config("warn"), None);
        assert_eq!(d, "warn");
        let d = filter_directive(&global(false, false), &config("warn"), Some("  "));
        assert_eq!(d, "warn");
    }
}
