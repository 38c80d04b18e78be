//! Orchestrator configuration.

use std::path::Path;

use casetrack_source::SourceConfig;
use chrono::TimeDelta;
use config::{ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};

/// Runtime configuration, deserialised from an optional TOML file and
/// `CASETRACK_*` environment variables (nested keys joined with `__`, e.g.
/// `CASETRACK_SOURCE__KIND=files`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  /// How long loaded data stays fresh, in milliseconds.
  pub validity_ms: u64,
  /// Defer the region-detail tier until a query needs it.
  pub lazy_detail: bool,
  pub source:      SourceConfig,
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      validity_ms: 60 * 60 * 1000,
      lazy_detail: true,
      source:      SourceConfig::default(),
    }
  }
}

impl SyncConfig {
  /// Layer `path` (if it exists) and the environment over the defaults.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    Self::load_from(path.as_ref(), None)
  }

  /// As [`load`](Self::load), reading variables from `env` instead of the
  /// process environment when given.
  fn load_from(path: &Path, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
    config::Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(
        Environment::with_prefix("CASETRACK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .source(env),
      )
      .build()?
      .try_deserialize()
  }

  /// The validity window; saturates for values beyond what `TimeDelta` holds.
  pub fn validity(&self) -> TimeDelta {
    i64::try_from(self.validity_ms)
      .ok()
      .and_then(TimeDelta::try_milliseconds)
      .unwrap_or(TimeDelta::MAX)
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use casetrack_source::FilePaths;

  use super::*;

  fn temp_toml(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("casetrack-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn defaults() {
    let config = SyncConfig::default();
    assert_eq!(config.validity(), TimeDelta::hours(1));
    assert!(config.lazy_detail);
    assert_eq!(config.source, SourceConfig::default());
  }

  #[test]
  fn missing_file_gives_defaults() {
    let config = SyncConfig::load("/nonexistent/casetrack.toml").unwrap();
    assert!(config.lazy_detail);
    assert_eq!(config.source, SourceConfig::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let path = temp_toml(
      r#"
lazy_detail = false

[source]
kind = "files"
global_confirmed = "/data/gc.csv"
"#,
    );

    let config = SyncConfig::load(&path).unwrap();
    assert!(!config.lazy_detail);
    match config.source {
      SourceConfig::Files(paths) => {
        assert_eq!(paths.global_confirmed, PathBuf::from("/data/gc.csv"));
        assert_eq!(paths.region_deaths, FilePaths::default().region_deaths);
      }
      other => panic!("unexpected source: {other:?}"),
    }

    std::fs::remove_file(path).unwrap();
  }

  fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
    Some(vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
  }

  #[test]
  fn environment_overrides_file() {
    let path = temp_toml("validity_ms = 5000\nlazy_detail = false\n");

    let config = SyncConfig::load_from(
      &path,
      env(&[("CASETRACK_VALIDITY_MS", "250"), ("CASETRACK_SOURCE__KIND", "files")]),
    )
    .unwrap();
    assert_eq!(config.validity(), TimeDelta::milliseconds(250));
    assert!(!config.lazy_detail);
    assert_eq!(config.source, SourceConfig::Files(FilePaths::default()));

    std::fs::remove_file(path).unwrap();
  }

  #[test]
  fn unprefixed_variables_are_ignored() {
    let config =
      SyncConfig::load_from(Path::new("/nonexistent/casetrack.toml"), env(&[("VALIDITY_MS", "1")]))
        .unwrap();
    assert_eq!(config, SyncConfig::default());
  }

  #[test]
  fn huge_validity_saturates() {
    let config = SyncConfig { validity_ms: u64::MAX, ..SyncConfig::default() };
    assert_eq!(config.validity(), TimeDelta::MAX);
  }
}
