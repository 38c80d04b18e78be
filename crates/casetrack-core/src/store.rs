//! The `LocationStore` trait.
//!
//! The trait is implemented by storage backends ([`MemoryStore`] here,
//! `casetrack-store-sqlite` for a durable store). The sync orchestrator depends
//! on this abstraction, not on any concrete backend.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  key::LocationKey,
  series::{DatasetMetadata, LocationSeries},
};

/// A keyed, indexed repository of per-location series.
///
/// Every read returns owned copies; nothing a caller receives aliases the
/// store's own state. Reads fail with [`Error::NotInitialized`] until
/// [`init`](LocationStore::init) has run. `upsert`, `replace` and `clear`
/// initialise the store implicitly.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
///
/// [`Error::NotInitialized`]: crate::Error::NotInitialized
pub trait LocationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Prepare the store for use. Idempotent: existing data is kept.
  fn init(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every series and reset the metadata.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert or replace series by key, maintain the hierarchy indices, and
  /// refresh `saved_at`.
  fn upsert(
    &self,
    series: Vec<LocationSeries>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_source_updated_at(
    &self,
    at: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Swap the whole contents for `series` in one atomic step: clear, upsert
  /// and set `source_updated_at`. On failure the previous contents remain.
  fn replace(
    &self,
    series: Vec<LocationSeries>,
    source_updated_at: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Return the series for every key, in order. All-or-nothing: the first
  /// unknown key fails the whole read with [`Error::InvalidLocation`].
  ///
  /// [`Error::InvalidLocation`]: crate::Error::InvalidLocation
  fn get<'a>(
    &'a self,
    keys: &'a [LocationKey],
  ) -> impl Future<Output = Result<Vec<LocationSeries>, Self::Error>> + Send + 'a;

  /// Subregion-level series of `country`. County rows are excluded.
  fn by_country<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<Vec<LocationSeries>, Self::Error>> + Send + 'a;

  /// County-level series of one subregion of `country`.
  fn by_subregion<'a>(
    &'a self,
    country: &'a str,
    subregion: &'a str,
  ) -> impl Future<Output = Result<Vec<LocationSeries>, Self::Error>> + Send + 'a;

  /// Every stored key, in first-insertion order.
  fn list_keys(
    &self,
  ) -> impl Future<Output = Result<Vec<LocationKey>, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn metadata(
    &self,
  ) -> impl Future<Output = Result<DatasetMetadata, Self::Error>> + Send + '_;
}
