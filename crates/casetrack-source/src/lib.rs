//! Data sources for casetrack.
//!
//! [`GitHubSource`] reads the upstream time-series files over HTTP and asks
//! the GitHub commits API when they last changed; [`FileSource`] reads the
//! same files from local disk. [`AnySource`] picks one from a
//! [`SourceConfig`].

pub mod config;
mod files;
mod github;

use casetrack_core::{FetchError, source::DataSource};
use chrono::{DateTime, Utc};
pub use config::{FilePaths, SourceConfig};
pub use files::FileSource;
pub use github::GitHubSource;

/// A source chosen at runtime.
#[derive(Clone)]
pub enum AnySource {
  GitHub(GitHubSource),
  Files(FileSource),
}

impl AnySource {
  pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
    Ok(match config {
      SourceConfig::GitHub { base_url, commits_url } => {
        Self::GitHub(GitHubSource::with_urls(base_url.clone(), commits_url.clone())?)
      }
      SourceConfig::Files(paths) => Self::Files(FileSource::new(paths.clone())),
    })
  }
}

macro_rules! dispatch {
  ($self:ident . $method:ident()) => {
    match $self {
      AnySource::GitHub(s) => s.$method().await,
      AnySource::Files(s) => s.$method().await,
    }
  };
}

impl DataSource for AnySource {
  async fn global_confirmed(&self) -> Result<String, FetchError> {
    dispatch!(self.global_confirmed())
  }

  async fn global_deaths(&self) -> Result<String, FetchError> {
    dispatch!(self.global_deaths())
  }

  async fn global_recovered(&self) -> Result<String, FetchError> {
    dispatch!(self.global_recovered())
  }

  async fn region_confirmed(&self) -> Result<String, FetchError> {
    dispatch!(self.region_confirmed())
  }

  async fn region_deaths(&self) -> Result<String, FetchError> {
    dispatch!(self.region_deaths())
  }

  async fn source_updated_at(&self) -> Result<Option<DateTime<Utc>>, FetchError> {
    dispatch!(self.source_updated_at())
  }
}

#[cfg(test)]
mod tests;
