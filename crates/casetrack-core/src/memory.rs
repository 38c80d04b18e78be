//! A process-local [`LocationStore`].

use std::{
  collections::HashMap,
  sync::{PoisonError, RwLock},
};

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  key::LocationKey,
  series::{DatasetMetadata, LocationSeries},
  store::LocationStore,
};

#[derive(Default)]
struct Inner {
  series:            HashMap<LocationKey, LocationSeries>,
  /// Keys in first-insertion order.
  order:             Vec<LocationKey>,
  /// country → subregion-level keys
  subregions:        HashMap<String, Vec<LocationKey>>,
  /// country → subregion → county-level keys
  counties:          HashMap<String, HashMap<String, Vec<LocationKey>>>,
  saved_at:          Option<DateTime<Utc>>,
  source_updated_at: Option<DateTime<Utc>>,
}

impl Inner {
  fn insert(&mut self, series: LocationSeries) {
    let key = series.key.clone();

    match (&series.subregion, &series.county) {
      (Some(subregion), Some(_)) => push_unique(
        self
          .counties
          .entry(series.country.clone())
          .or_default()
          .entry(subregion.clone())
          .or_default(),
        &key,
      ),
      (Some(_), None) => push_unique(
        self.subregions.entry(series.country.clone()).or_default(),
        &key,
      ),
      (None, _) => {}
    }

    if self.series.insert(key.clone(), series).is_none() {
      self.order.push(key);
    }
  }

  fn clone_all(&self, keys: &[LocationKey]) -> Vec<LocationSeries> {
    keys
      .iter()
      .filter_map(|key| self.series.get(key))
      .cloned()
      .collect()
  }
}

fn push_unique(keys: &mut Vec<LocationKey>, key: &LocationKey) {
  if !keys.contains(key) {
    keys.push(key.clone());
  }
}

/// A store that keeps everything in memory.
///
/// The hierarchy indices are updated inside `upsert` under the same write
/// lock as the series themselves, so readers never observe a half-applied
/// batch.
#[derive(Default)]
pub struct MemoryStore {
  inner: RwLock<Option<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read<T>(&self, f: impl FnOnce(&Inner) -> Result<T>) -> Result<T> {
    let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
    match guard.as_ref() {
      Some(inner) => f(inner),
      None => Err(Error::NotInitialized),
    }
  }

  fn write<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
    let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    f(guard.get_or_insert_with(Inner::default))
  }
}

impl LocationStore for MemoryStore {
  type Error = Error;

  async fn init(&self) -> Result<()> {
    self.write(|_| ());
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self.write(|inner| *inner = Inner::default());
    Ok(())
  }

  async fn upsert(&self, series: Vec<LocationSeries>) -> Result<()> {
    self.write(|inner| {
      for s in series {
        inner.insert(s);
      }
      inner.saved_at = Some(Utc::now());
    });
    Ok(())
  }

  async fn replace(
    &self,
    series: Vec<LocationSeries>,
    source_updated_at: Option<DateTime<Utc>>,
  ) -> Result<()> {
    self.write(|inner| {
      let mut fresh = Inner::default();
      for s in series {
        fresh.insert(s);
      }
      fresh.saved_at = Some(Utc::now());
      fresh.source_updated_at = source_updated_at;
      *inner = fresh;
    });
    Ok(())
  }

  async fn set_source_updated_at(&self, at: Option<DateTime<Utc>>) -> Result<()> {
    // Reads may not run before init, and neither may metadata writes.
    self.read(|_| Ok(()))?;
    self.write(|inner| inner.source_updated_at = at);
    Ok(())
  }

  async fn get(&self, keys: &[LocationKey]) -> Result<Vec<LocationSeries>> {
    self.read(|inner| {
      if let Some(missing) = keys.iter().find(|k| !inner.series.contains_key(*k)) {
        return Err(Error::InvalidLocation(missing.clone()));
      }
      Ok(inner.clone_all(keys))
    })
  }

  async fn by_country(&self, country: &str) -> Result<Vec<LocationSeries>> {
    self.read(|inner| {
      Ok(
        inner
          .subregions
          .get(country)
          .map(|keys| inner.clone_all(keys))
          .unwrap_or_default(),
      )
    })
  }

  async fn by_subregion(
    &self,
    country: &str,
    subregion: &str,
  ) -> Result<Vec<LocationSeries>> {
    self.read(|inner| {
      Ok(
        inner
          .counties
          .get(country)
          .and_then(|by_subregion| by_subregion.get(subregion))
          .map(|keys| inner.clone_all(keys))
          .unwrap_or_default(),
      )
    })
  }

  async fn list_keys(&self) -> Result<Vec<LocationKey>> {
    self.read(|inner| Ok(inner.order.clone()))
  }

  async fn count(&self) -> Result<usize> { self.read(|inner| Ok(inner.series.len())) }

  async fn metadata(&self) -> Result<DatasetMetadata> {
    self.read(|inner| {
      Ok(DatasetMetadata {
        saved_at:          inner.saved_at,
        source_updated_at: inner.source_updated_at,
        location_count:    inner.series.len(),
      })
    })
  }
}
