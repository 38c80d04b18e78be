//! [`GitHubSource`]: raw CSV files plus the GitHub commits API.

use std::time::Duration;

use casetrack_core::{FetchError, source::DataSource};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::{
  DEFAULT_BASE_URL, DEFAULT_COMMITS_URL, GLOBAL_CONFIRMED_FILE, GLOBAL_DEATHS_FILE,
  GLOBAL_RECOVERED_FILE, REGION_CONFIRMED_FILE, REGION_DEATHS_FILE,
};

/// Reads the upstream files over HTTP.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GitHubSource {
  client:      Client,
  base_url:    String,
  commits_url: String,
}

#[derive(Deserialize)]
struct CommitEntry {
  commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
  author: CommitAuthor,
}

#[derive(Deserialize)]
struct CommitAuthor {
  date: DateTime<Utc>,
}

fn transport(url: &str, e: reqwest::Error) -> FetchError {
  FetchError::Transport { url: url.to_owned(), message: e.to_string() }
}

impl GitHubSource {
  /// A source for the public JHU CSSE repository.
  pub fn new() -> Result<Self, FetchError> {
    Self::with_urls(DEFAULT_BASE_URL, DEFAULT_COMMITS_URL)
  }

  /// A source reading `<base_url>/<file name>` and taking the update time
  /// from the first entry of a commits-API listing at `commits_url`.
  pub fn with_urls(
    base_url: impl Into<String>,
    commits_url: impl Into<String>,
  ) -> Result<Self, FetchError> {
    let base_url = base_url.into();
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(concat!("casetrack/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| transport(&base_url, e))?;

    Ok(Self { client, base_url, commits_url: commits_url.into() })
  }

  fn file_url(&self, file: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), file)
  }

  /// `GET url`, failing on any non-success status.
  async fn get(&self, url: &str) -> Result<Response, FetchError> {
    debug!(url, "fetching");
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| transport(url, e))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url:    url.to_owned(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_owned(),
      });
    }
    Ok(resp)
  }

  async fn fetch_file(&self, file: &str) -> Result<String, FetchError> {
    let url = self.file_url(file);
    self
      .get(&url)
      .await?
      .text()
      .await
      .map_err(|e| transport(&url, e))
  }
}

impl DataSource for GitHubSource {
  async fn global_confirmed(&self) -> Result<String, FetchError> {
    self.fetch_file(GLOBAL_CONFIRMED_FILE).await
  }

  async fn global_deaths(&self) -> Result<String, FetchError> {
    self.fetch_file(GLOBAL_DEATHS_FILE).await
  }

  async fn global_recovered(&self) -> Result<String, FetchError> {
    self.fetch_file(GLOBAL_RECOVERED_FILE).await
  }

  async fn region_confirmed(&self) -> Result<String, FetchError> {
    self.fetch_file(REGION_CONFIRMED_FILE).await
  }

  async fn region_deaths(&self) -> Result<String, FetchError> {
    self.fetch_file(REGION_DEATHS_FILE).await
  }

  /// The author date of the latest commit, or `None` if the listing is empty.
  async fn source_updated_at(&self) -> Result<Option<DateTime<Utc>>, FetchError> {
    let url = &self.commits_url;
    let resp = self.get(url).await?;
    let commits: Vec<CommitEntry> = resp
      .json()
      .await
      .map_err(|e| FetchError::Decode { url: url.clone(), message: e.to_string() })?;

    Ok(commits.first().map(|c| c.commit.author.date))
  }
}
