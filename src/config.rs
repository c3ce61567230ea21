use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ColsumError, ColsumResult};

/// Persisted settings: the autorun preference plus the two debounce
/// windows and the log level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColsumConfig {
    /// Process pages automatically instead of waiting for an explicit run
    pub autorun: bool,

    /// Debounce window for per-table recomputation (ms)
    pub recompute_delay_ms: u64,

    /// Debounce window for page-wide table rescans (ms)
    pub rescan_delay_ms: u64,

    /// Log level when RUST_LOG is not set
    pub log_level: String,
}

impl Default for ColsumConfig {
    fn default() -> Self {
        Self {
            autorun: false,
            recompute_delay_ms: crate::engine::DEFAULT_RECOMPUTE_DELAY_MS,
            rescan_delay_ms: crate::discover::DEFAULT_RESCAN_DELAY_MS,
            log_level: "info".to_string(),
        }
    }
}

impl ColsumConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ColsumResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ColsumError::file_io(path.as_ref().to_string_lossy(), e))?;

        toml::from_str(&content)
            .map_err(|e| ColsumError::configuration(format!("Failed to parse config file: {}", e)))
    }

    /// A missing config file means defaults, not an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> ColsumResult<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Environment variables override whatever the file said.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(autorun) = std::env::var("COLSUM_AUTORUN") {
            self.autorun = autorun.to_lowercase() == "true";
        }
        if let Ok(delay) = std::env::var("COLSUM_RECOMPUTE_DELAY_MS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.recompute_delay_ms = value;
            }
        }
        if let Ok(delay) = std::env::var("COLSUM_RESCAN_DELAY_MS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.rescan_delay_ms = value;
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ColsumResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ColsumError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| ColsumError::file_io(path.as_ref().to_string_lossy(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ColsumConfig::default();
        assert!(!config.autorun);
        assert_eq!(config.recompute_delay_ms, 200);
        assert_eq!(config.rescan_delay_ms, 400);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = ColsumConfig::default();
        config.autorun = true;
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("colsum.toml");

        config.save_to_file(&config_path).unwrap();

        let loaded = ColsumConfig::load_from_file(&config_path).unwrap();
        assert!(loaded.autorun);
        assert_eq!(loaded.recompute_delay_ms, 200);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = ColsumConfig::load_or_default(temp_dir.path().join("absent.toml")).unwrap();
        assert!(!config.autorun);
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("COLSUM_AUTORUN", "TRUE");
        std::env::set_var("COLSUM_RECOMPUTE_DELAY_MS", "50");
        std::env::set_var("COLSUM_RESCAN_DELAY_MS", "75");

        let mut config = ColsumConfig::default();
        config.apply_env_overrides();
        assert!(config.autorun);
        assert_eq!(config.recompute_delay_ms, 50);
        assert_eq!(config.rescan_delay_ms, 75);

        // Unparseable delays are ignored, values that are not "true" turn
        // autorun off
        std::env::set_var("COLSUM_AUTORUN", "maybe");
        std::env::set_var("COLSUM_RECOMPUTE_DELAY_MS", "soon");
        config.apply_env_overrides();
        assert!(!config.autorun);
        assert_eq!(config.recompute_delay_ms, 50);

        std::env::remove_var("COLSUM_AUTORUN");
        std::env::remove_var("COLSUM_RECOMPUTE_DELAY_MS");
        std::env::remove_var("COLSUM_RESCAN_DELAY_MS");

        let mut config = ColsumConfig::default();
        config.apply_env_overrides();
        assert!(!config.autorun);
        assert_eq!(config.recompute_delay_ms, 200);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("colsum.toml");
        std::fs::write(&config_path, "autorun = \"maybe").unwrap();
        assert!(ColsumConfig::load_from_file(&config_path).is_err());
    }
}
