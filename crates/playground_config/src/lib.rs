use std::time::Duration;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use harness_codegen::HarnessOptions;
use log::debug;
use serde::{Deserialize, Serialize};

/// Contents of `tutorjs.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options of the generated harness document
    pub harness: HarnessOptions,
    pub executor: ExecutorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Watchdog in seconds, `0` disables it
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    pub fn default_path() -> Utf8PathBuf {
        Utf8PathBuf::from("tutorjs.json")
    }

    /// Reads the config at `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {path}, using defaults");
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(path).context(format!("Failed to read config file {path}"))?;
        serde_json::from_str(&contents).context(format!("Failed to parse config file {path}"))
    }

    /// Writes the config to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails on serialization or filesystem errors.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents + "\n").context(format!("Failed to write config file {path}"))?;

        debug!("wrote config to {path}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("temp dir is utf-8")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = Config::load(&temp_path(&dir, "absent.json")).expect("defaults");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.executor.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = temp_path(&dir, "nested/tutorjs.json");

        let mut cfg = Config::default();
        cfg.harness.relay_object = "Bridge".into();
        cfg.executor.timeout_secs = 0;
        cfg.save(&path).expect("save");

        let loaded = Config::load(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.executor.timeout(), None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = temp_path(&dir, "tutorjs.json");
        std::fs::write(&path, r#"{ "harness": { "title": "Space Game" } }"#).expect("write");

        let cfg = Config::load(&path).expect("load");
        assert_eq!(cfg.harness.title, "Space Game");
        assert_eq!(cfg.harness.relay_method, "showLog");
        assert_eq!(cfg.executor, ExecutorConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = temp_path(&dir, "tutorjs.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = Config::load(&path).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse config file"), "{err}");
    }
}
