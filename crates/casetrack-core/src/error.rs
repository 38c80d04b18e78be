//! Error types for `casetrack-core`.
//!
//! [`Error`] is the taxonomy every public operation reports. Backend crates
//! keep their own error enums and convert into this one, so callers can branch
//! on the kind (retry on [`Error::DataFetch`], treat
//! [`Error::InvalidLocation`] as a user-input problem) without knowing which
//! store or source is in use.

use std::path::PathBuf;

use thiserror::Error;

use crate::key::LocationKey;

#[derive(Debug, Error)]
pub enum Error {
  /// An operation was invoked before `init` completed successfully.
  #[error("not initialized: call `init` first")]
  NotInitialized,

  #[error("already initialized")]
  AlreadyInitialized,

  /// The first requested key that could not be resolved.
  #[error("invalid location: \"{0}\"")]
  InvalidLocation(LocationKey),

  #[error("data fetch error: {0}")]
  DataFetch(#[from] FetchError),

  /// Store metadata is present but empty or malformed where it is required.
  #[error("persisted data anomaly: {0}")]
  PersistedDataAnomaly(String),

  #[error("malformed source data: {0}")]
  Ingest(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for failures of the raw fetch transport, the only kind a caller
  /// can reasonably retry unchanged.
  pub fn is_fetch(&self) -> bool { matches!(self, Self::DataFetch(_)) }
}

/// A failure reported by a [`DataSource`](crate::source::DataSource).
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("{url} responded {status} {reason}")]
  Status {
    url:    String,
    status: u16,
    reason: String,
  },

  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("failed to read {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to decode response from {url}: {message}")]
  Decode { url: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
