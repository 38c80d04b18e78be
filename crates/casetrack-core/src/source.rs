//! The `DataSource` trait, where raw CSV text comes from.
//!
//! Implementations live in `casetrack-source` (GitHub, local files). Sources
//! do not retry; a failure surfaces as a [`FetchError`] and aborts the load
//! cycle that asked for it.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// Raw access to the five upstream time-series files.
///
/// The *global* files cover every country, partly at subregion granularity.
/// The *region* files cover one country at county granularity and are much
/// larger.
pub trait DataSource: Send + Sync {
  fn global_confirmed(
    &self,
  ) -> impl Future<Output = Result<String, FetchError>> + Send + '_;

  fn global_deaths(&self) -> impl Future<Output = Result<String, FetchError>> + Send + '_;

  fn global_recovered(
    &self,
  ) -> impl Future<Output = Result<String, FetchError>> + Send + '_;

  fn region_confirmed(
    &self,
  ) -> impl Future<Output = Result<String, FetchError>> + Send + '_;

  fn region_deaths(&self) -> impl Future<Output = Result<String, FetchError>> + Send + '_;

  /// When the upstream data last changed, if the source can tell.
  fn source_updated_at(
    &self,
  ) -> impl Future<Output = Result<Option<DateTime<Utc>>, FetchError>> + Send + '_;
}
