//! [`FileSource`]: the upstream files from local disk.

use std::path::Path;

use casetrack_core::{FetchError, source::DataSource};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::FilePaths;

#[derive(Debug, Clone)]
pub struct FileSource {
  paths: FilePaths,
}

impl FileSource {
  pub fn new(paths: FilePaths) -> Self { Self { paths } }

  pub fn paths(&self) -> &FilePaths { &self.paths }
}

async fn read(path: &Path) -> Result<String, FetchError> {
  debug!(?path, "reading");
  tokio::fs::read_to_string(path)
    .await
    .map_err(|source| FetchError::Io { path: path.to_owned(), source })
}

impl DataSource for FileSource {
  async fn global_confirmed(&self) -> Result<String, FetchError> {
    read(&self.paths.global_confirmed).await
  }

  async fn global_deaths(&self) -> Result<String, FetchError> {
    read(&self.paths.global_deaths).await
  }

  async fn global_recovered(&self) -> Result<String, FetchError> {
    read(&self.paths.global_recovered).await
  }

  async fn region_confirmed(&self) -> Result<String, FetchError> {
    read(&self.paths.region_confirmed).await
  }

  async fn region_deaths(&self) -> Result<String, FetchError> {
    read(&self.paths.region_deaths).await
  }

  /// Local files carry no upstream update time.
  async fn source_updated_at(&self) -> Result<Option<DateTime<Utc>>, FetchError> {
    Ok(None)
  }
}
