use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Suppress the per-command info log line.
    pub quiet: bool,
    /// Whether this node's writes are shipped to a replica set. When false
    /// the consistency gate is bypassed (standalone / recovery tooling).
    pub writes_are_replicated: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: false,
            writes_are_replicated: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.quiet);
        assert!(config.writes_are_replicated);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("docdb.toml");

        let mut config = Config::default();
        config.quiet = true;
        config.log_level = "debug".to_string();
        config.save(&path).expect("save");

        let loaded = Config::load(&path).expect("load");
        assert!(loaded.quiet);
        assert!(loaded.writes_are_replicated);
        assert_eq!(loaded.log_level, "debug");
    }
}
