//! The orchestrator: freshness decisions, tiered loads and the query surface.

use std::slice;

use casetrack_core::{
  DatasetMetadata, DecoratedRecord, DecoratedSeries, Error, LocationKey, LocationSeries, Result,
  metrics::decorate, source::DataSource, store::LocationStore,
};
use casetrack_ingest::{DETAIL_COUNTRY, announced_detail_keys, build_base_tier, build_detail_tier};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info};

use crate::{
  config::SyncConfig,
  status::{LoadStatus, Tier},
};

fn store_err<E: Into<Error>>(err: E) -> Error { err.into() }

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Uninitialized,
  Initializing,
  Ready,
}

/// Values derived from the store after each load cycle.
#[derive(Debug, Clone)]
struct Snapshot {
  locations:         Vec<LocationKey>,
  source_updated_at: Option<DateTime<Utc>>,
  first_date:        NaiveDate,
  last_date:         NaiveDate,
}

#[derive(Debug)]
struct SyncState {
  phase:         Phase,
  detail_loaded: bool,
  snapshot:      Option<Snapshot>,
}

/// Data is fresh when the store holds something and `saved_at` lies within
/// the validity window of `now`.
fn is_fresh(meta: &DatasetMetadata, validity: TimeDelta, now: DateTime<Utc>) -> bool {
  meta.location_count > 0
    && meta.saved_at.is_some_and(|saved| {
      saved
        .checked_add_signed(validity)
        .is_none_or(|expires| now < expires)
    })
}

// ─── SeriesApi ───────────────────────────────────────────────────────────────

/// The query API over a [`LocationStore`] kept in sync with a [`DataSource`].
///
/// Every query first checks freshness and, when needed, runs a load cycle.
/// Load decisions and the reads that follow them happen under one lock, so
/// concurrent callers share a single in-flight load instead of repeating it.
pub struct SeriesApi<S, D> {
  store:       S,
  source:      D,
  validity:    TimeDelta,
  lazy_detail: bool,
  state:       Mutex<SyncState>,
  status:      watch::Sender<LoadStatus>,
}

impl<S: LocationStore, D: DataSource> SeriesApi<S, D> {
  pub fn new(store: S, source: D, config: &SyncConfig) -> Self {
    let (status, _) = watch::channel(LoadStatus::Idle);
    Self {
      store,
      source,
      validity: config.validity(),
      lazy_detail: config.lazy_detail,
      state: Mutex::new(SyncState {
        phase:         Phase::Uninitialized,
        detail_loaded: false,
        snapshot:      None,
      }),
      status,
    }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn source(&self) -> &D { &self.source }

  /// Receive a notification whenever a load cycle starts or ends.
  pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> { self.status.subscribe() }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Initialise the store, bring it up to date, and compute the snapshot.
  ///
  /// Fails with [`Error::AlreadyInitialized`] on a second call. A failed
  /// `init` leaves the API uninitialised and may be retried.
  pub async fn init(&self) -> Result<()> {
    let mut state = self.state.lock().await;
    if state.phase != Phase::Uninitialized {
      return Err(Error::AlreadyInitialized);
    }
    state.phase = Phase::Initializing;

    match self.initialize(&mut state).await {
      Ok(()) => {
        state.phase = Phase::Ready;
        info!(detail_loaded = state.detail_loaded, "series api initialised");
        Ok(())
      }
      Err(err) => {
        state.phase = Phase::Uninitialized;
        state.detail_loaded = false;
        state.snapshot = None;
        Err(err)
      }
    }
  }

  async fn initialize(&self, state: &mut SyncState) -> Result<()> {
    self.store.init().await.map_err(store_err)?;

    // A durable store may already hold the detail tier from an earlier run.
    state.detail_loaded = self
      .store
      .list_keys()
      .await
      .map_err(store_err)?
      .iter()
      .any(|key| key.is_within(DETAIL_COUNTRY));

    self.ensure_fresh(state, !self.lazy_detail).await?;
    state.snapshot = Some(self.snapshot(state.detail_loaded).await?);
    Ok(())
  }

  /// Lock the state, check that `init` has completed, and run a load cycle
  /// if the data is stale or the detail tier is needed and missing.
  async fn ready(&self, needs_detail: bool) -> Result<MutexGuard<'_, SyncState>> {
    let mut state = self.state.lock().await;
    if state.phase != Phase::Ready {
      return Err(Error::NotInitialized);
    }

    if self.ensure_fresh(&mut state, needs_detail).await? {
      state.snapshot = Some(self.snapshot(state.detail_loaded).await?);
    }
    Ok(state)
  }

  // ── Load cycle ────────────────────────────────────────────────────────────

  /// Run the load decision once. Returns whether anything was loaded.
  async fn ensure_fresh(&self, state: &mut SyncState, needs_detail: bool) -> Result<bool> {
    let result = self.load_if_needed(state, needs_detail).await;
    self
      .status
      .send_if_modified(|status| std::mem::take(status) != LoadStatus::Idle);
    result
  }

  async fn load_if_needed(&self, state: &mut SyncState, needs_detail: bool) -> Result<bool> {
    let meta = self.store.metadata().await.map_err(store_err)?;
    let now = Utc::now();
    let fresh = is_fresh(&meta, self.validity, now);
    debug!(
      saved_at = ?meta.saved_at,
      validity_ms = self.validity.num_milliseconds(),
      fresh,
      needs_detail,
      detail_loaded = state.detail_loaded,
      "freshness check"
    );

    if needs_detail && !state.detail_loaded {
      debug!("loading the detail tier on first use");
      let mut detail = self.fetch_detail().await?;
      let source_updated_at = self.source.source_updated_at().await?;

      let base_needed = !fresh || source_updated_at.is_some_and(|at| at > now);
      let mut series = if base_needed { self.fetch_base().await? } else { Vec::new() };
      series.append(&mut detail);

      self.store.upsert(series).await.map_err(store_err)?;
      self
        .store
        .set_source_updated_at(source_updated_at)
        .await
        .map_err(store_err)?;
      state.detail_loaded = true;
      return Ok(true);
    }

    if fresh {
      debug!("data is fresh; nothing to load");
      return Ok(false);
    }

    debug!("data is stale; reloading every loaded tier");
    let mut series = self.fetch_base().await?;
    if state.detail_loaded {
      series.append(&mut self.fetch_detail().await?);
    }
    let source_updated_at = self.source.source_updated_at().await?;

    self
      .store
      .replace(series, source_updated_at)
      .await
      .map_err(store_err)?;
    Ok(true)
  }

  async fn fetch_base(&self) -> Result<Vec<LocationSeries>> {
    self.status.send_replace(LoadStatus::Loading { tier: Tier::Base });
    info!(tier = %Tier::Base, "load started");

    let confirmed = self.source.global_confirmed().await?;
    let deaths = self.source.global_deaths().await?;
    let recovered = self.source.global_recovered().await?;
    let series = build_base_tier(&confirmed, &deaths, &recovered)?;

    info!(tier = %Tier::Base, locations = series.len(), "load finished");
    Ok(series)
  }

  async fn fetch_detail(&self) -> Result<Vec<LocationSeries>> {
    self.status.send_replace(LoadStatus::Loading { tier: Tier::Detail });
    info!(tier = %Tier::Detail, "load started");

    let confirmed = self.source.region_confirmed().await?;
    let deaths = self.source.region_deaths().await?;
    let series = build_detail_tier(&confirmed, &deaths)?;

    info!(tier = %Tier::Detail, locations = series.len(), "load finished");
    Ok(series)
  }

  async fn snapshot(&self, detail_loaded: bool) -> Result<Snapshot> {
    let stored = self.store.list_keys().await.map_err(store_err)?;

    let sample = stored
      .iter()
      .find(|key| !key.is_within(DETAIL_COUNTRY))
      .ok_or_else(|| Error::PersistedDataAnomaly("store holds no base-tier series".into()))?;
    let series = self
      .store
      .get(slice::from_ref(sample))
      .await
      .map_err(store_err)?;
    let (first_date, last_date) = series
      .first()
      .and_then(|s| Some((s.first_date()?, s.last_date()?)))
      .ok_or_else(|| Error::PersistedDataAnomaly(format!("series {sample} has no records")))?;

    let meta = self.store.metadata().await.map_err(store_err)?;

    let mut locations = stored;
    if !detail_loaded {
      locations.extend(announced_detail_keys());
    }

    Ok(Snapshot {
      locations,
      source_updated_at: meta.source_updated_at,
      first_date,
      last_date,
    })
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// The decorated series for every key, in request order.
  ///
  /// All-or-nothing: one unknown key fails the whole query with
  /// [`Error::InvalidLocation`].
  pub async fn query(&self, keys: &[LocationKey]) -> Result<Vec<DecoratedSeries>> {
    let needs_detail = keys.iter().any(|key| key.is_within(DETAIL_COUNTRY));
    let _state = self.ready(needs_detail).await?;

    let series = self.store.get(keys).await.map_err(store_err)?;
    Ok(series.into_iter().map(decorate).collect())
  }

  pub async fn query_one(&self, key: &LocationKey) -> Result<DecoratedSeries> {
    let mut series = self.query(slice::from_ref(key)).await?;
    series
      .pop()
      .ok_or_else(|| Error::InvalidLocation(key.clone()))
  }

  /// The decorated record of `key` on `date`, or `None` outside its range.
  pub async fn query_on_date(
    &self,
    key: &LocationKey,
    date: NaiveDate,
  ) -> Result<Option<DecoratedRecord>> {
    Ok(self.query_one(key).await?.record_on(date).copied())
  }

  /// Subregion-level series of `country`.
  pub async fn query_by_country(&self, country: &str) -> Result<Vec<DecoratedSeries>> {
    let _state = self.ready(country == DETAIL_COUNTRY).await?;

    let series = self.store.by_country(country).await.map_err(store_err)?;
    Ok(series.into_iter().map(decorate).collect())
  }

  /// County-level series of one subregion of `country`.
  pub async fn query_by_subregion(
    &self,
    country: &str,
    subregion: &str,
  ) -> Result<Vec<DecoratedSeries>> {
    let _state = self.ready(country == DETAIL_COUNTRY).await?;

    let series = self
      .store
      .by_subregion(country, subregion)
      .await
      .map_err(store_err)?;
    Ok(series.into_iter().map(decorate).collect())
  }

  // ── Snapshot getters ──────────────────────────────────────────────────────

  async fn with_snapshot<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Result<T> {
    let state = self.state.lock().await;
    match (&state.phase, &state.snapshot) {
      (Phase::Ready, Some(snapshot)) => Ok(f(snapshot)),
      _ => Err(Error::NotInitialized),
    }
  }

  /// Every known location key, including detail-tier names that have been
  /// announced but not yet loaded.
  pub async fn locations(&self) -> Result<Vec<LocationKey>> {
    self.with_snapshot(|s| s.locations.clone()).await
  }

  pub async fn source_updated_at(&self) -> Result<Option<DateTime<Utc>>> {
    self.with_snapshot(|s| s.source_updated_at).await
  }

  pub async fn first_date(&self) -> Result<NaiveDate> {
    self.with_snapshot(|s| s.first_date).await
  }

  pub async fn last_date(&self) -> Result<NaiveDate> { self.with_snapshot(|s| s.last_date).await }

  /// The store's current metadata.
  pub async fn metadata(&self) -> Result<DatasetMetadata> {
    let state = self.state.lock().await;
    if state.phase != Phase::Ready {
      return Err(Error::NotInitialized);
    }
    self.store.metadata().await.map_err(store_err)
  }
}
