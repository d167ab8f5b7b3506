//! Configuration types deserialized from `tern.toml`.

use serde::{Deserialize, Serialize};

/// The top-level configuration parsed from `tern.toml`.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TernConfig {
    /// Parse cache sizing.
    #[serde(default)]
    pub parse_cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Sizing of the shared parse cache.
///
/// Fixed when the cache is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of resident parse results. Must be positive.
    pub capacity: usize,
    /// Extra position-space slack reserved after each file, absorbing
    /// positions the parser invents during error recovery.
    pub padding: u64,
}

impl CacheConfig {
    /// Default number of resident parse results.
    pub const DEFAULT_CAPACITY: usize = 200;
    /// Default per-file position-space slack.
    pub const DEFAULT_PADDING: u64 = 1000;

    /// Creates a cache configuration.
    pub fn new(capacity: usize, padding: u64) -> Self {
        Self { capacity, padding }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_PADDING)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `"info"` or `"tern_cache=debug"`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 200);
        assert_eq!(config.padding, 1000);
    }

    #[test]
    fn log_default_filter() {
        assert_eq!(LogConfig::default().filter, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: TernConfig = toml::from_str("[parse_cache]\npadding = 0\n").unwrap();
        assert_eq!(config.parse_cache.capacity, 200);
        assert_eq!(config.parse_cache.padding, 0);
        assert_eq!(config.log, LogConfig::default());
    }
}
