//! Where to read the upstream files from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ─── Upstream file names ─────────────────────────────────────────────────────

pub const GLOBAL_CONFIRMED_FILE: &str = "time_series_covid19_confirmed_global.csv";
pub const GLOBAL_DEATHS_FILE: &str = "time_series_covid19_deaths_global.csv";
pub const GLOBAL_RECOVERED_FILE: &str = "time_series_covid19_recovered_global.csv";
pub const REGION_CONFIRMED_FILE: &str = "time_series_covid19_confirmed_US.csv";
pub const REGION_DEATHS_FILE: &str = "time_series_covid19_deaths_US.csv";

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/";

/// Latest commit touching the time-series directory.
pub const DEFAULT_COMMITS_URL: &str = "https://api.github.com/repos/CSSEGISandData/COVID-19/commits?path=csse_covid_19_data%2Fcsse_covid_19_time_series&page=1&per_page=1";

// ─── Config ──────────────────────────────────────────────────────────────────

/// Selects and configures a [`DataSource`](casetrack_core::source::DataSource).
///
/// ```toml
/// [source]
/// kind = "files"
/// global_confirmed = "/data/confirmed_global.csv"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
  #[serde(rename = "github")]
  GitHub {
    #[serde(default = "default_base_url")]
    base_url:    String,
    #[serde(default = "default_commits_url")]
    commits_url: String,
  },
  Files(FilePaths),
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self::GitHub { base_url: default_base_url(), commits_url: default_commits_url() }
  }
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_commits_url() -> String { DEFAULT_COMMITS_URL.to_owned() }

/// Paths of the five local files. Each defaults to the upstream file name,
/// relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePaths {
  pub global_confirmed: PathBuf,
  pub global_deaths:    PathBuf,
  pub global_recovered: PathBuf,
  pub region_confirmed: PathBuf,
  pub region_deaths:    PathBuf,
}

impl FilePaths {
  /// The upstream file names inside `dir`.
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    Self {
      global_confirmed: dir.join(GLOBAL_CONFIRMED_FILE),
      global_deaths:    dir.join(GLOBAL_DEATHS_FILE),
      global_recovered: dir.join(GLOBAL_RECOVERED_FILE),
      region_confirmed: dir.join(REGION_CONFIRMED_FILE),
      region_deaths:    dir.join(REGION_DEATHS_FILE),
    }
  }
}

impl Default for FilePaths {
  fn default() -> Self { Self::in_dir("") }
}
