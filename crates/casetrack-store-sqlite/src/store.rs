//! The SQLite implementation of [`LocationStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use casetrack_core::{
  DatasetMetadata, LocationKey, LocationSeries, store::LocationStore,
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawSeries, SERIES_COLUMNS, decode_dt, encode_dt},
  schema::{SAVED_AT, SCHEMA, SOURCE_UPDATED_AT},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A location store backed by a single SQLite file.
///
/// Cloning is cheap; clones share the connection and the initialised flag.
#[derive(Clone)]
pub struct SqliteStore {
  conn:        tokio_rusqlite::Connection,
  initialized: Arc<AtomicBool>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn, initialized: Arc::new(AtomicBool::new(false)) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  fn mark_initialized(&self) { self.initialized.store(true, Ordering::Release); }

  fn ensure_initialized(&self) -> Result<()> {
    if self.initialized.load(Ordering::Acquire) {
      Ok(())
    } else {
      Err(casetrack_core::Error::NotInitialized.into())
    }
  }

  /// Run a `SELECT` over `series` (with [`SERIES_COLUMNS`]) and decode it.
  async fn select_series(
    &self,
    filter: &'static str,
    params: Vec<String>,
  ) -> Result<Vec<LocationSeries>> {
    self.ensure_initialized()?;

    let raws: Vec<RawSeries> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {SERIES_COLUMNS} FROM series WHERE {filter} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawSeries::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeries::into_series).collect()
  }

  async fn read_setting(&self, name: &'static str) -> Result<Option<DateTime<Utc>>> {
    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE name = ?1",
              rusqlite::params![name],
              |r| r.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten(),
        )
      })
      .await?;

    value.as_deref().map(decode_dt).transpose()
  }
}

// ─── Statements ──────────────────────────────────────────────────────────────

const INSERT_SERIES: &str = "INSERT INTO series (
     location_key, country, subregion, county,
     latitude, longitude, records_json
   ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
   ON CONFLICT (location_key) DO UPDATE SET
     country      = excluded.country,
     subregion    = excluded.subregion,
     county       = excluded.county,
     latitude     = excluded.latitude,
     longitude    = excluded.longitude,
     records_json = excluded.records_json";

fn encode_all(series: &[LocationSeries]) -> Result<Vec<RawSeries>> {
  series.iter().map(RawSeries::encode).collect()
}

fn delete_all(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM series", [])?;
  conn.execute("DELETE FROM settings", [])?;
  Ok(())
}

fn insert_series(conn: &rusqlite::Connection, raws: &[RawSeries]) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(INSERT_SERIES)?;
  for raw in raws {
    stmt.execute(rusqlite::params![
      raw.location_key,
      raw.country,
      raw.subregion,
      raw.county,
      raw.latitude,
      raw.longitude,
      raw.records_json,
    ])?;
  }
  Ok(())
}

fn write_setting(
  conn: &rusqlite::Connection,
  name: &str,
  value: Option<&str>,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO settings (name, value) VALUES (?1, ?2)
     ON CONFLICT (name) DO UPDATE SET value = excluded.value",
    rusqlite::params![name, value],
  )?;
  Ok(())
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteStore {
  type Error = Error;

  /// The schema is created on open; this only unlocks reads. Rows from an
  /// earlier process stay in place.
  async fn init(&self) -> Result<()> {
    self.mark_initialized();
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self.mark_initialized();
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        delete_all(&tx)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert(&self, series: Vec<LocationSeries>) -> Result<()> {
    self.mark_initialized();

    let raws = encode_all(&series)?;
    let saved_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_series(&tx, &raws)?;
        write_setting(&tx, SAVED_AT, Some(&saved_at))?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn replace(
    &self,
    series: Vec<LocationSeries>,
    source_updated_at: Option<DateTime<Utc>>,
  ) -> Result<()> {
    self.mark_initialized();

    let raws = encode_all(&series)?;
    let saved_at = encode_dt(Utc::now());
    let source_updated_at = source_updated_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        delete_all(&tx)?;
        insert_series(&tx, &raws)?;
        write_setting(&tx, SAVED_AT, Some(&saved_at))?;
        write_setting(&tx, SOURCE_UPDATED_AT, source_updated_at.as_deref())?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn set_source_updated_at(&self, at: Option<DateTime<Utc>>) -> Result<()> {
    self.ensure_initialized()?;
    let value = at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        write_setting(conn, SOURCE_UPDATED_AT, value.as_deref())?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, keys: &[LocationKey]) -> Result<Vec<LocationSeries>> {
    self.ensure_initialized()?;

    let wanted: Vec<String> = keys.iter().map(|k| k.as_str().to_owned()).collect();
    let found: Vec<Option<RawSeries>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SERIES_COLUMNS} FROM series WHERE location_key = ?1"
        ))?;
        let mut found = Vec::with_capacity(wanted.len());
        for key in &wanted {
          found.push(
            stmt
              .query_row(rusqlite::params![key], RawSeries::from_row)
              .optional()?,
          );
        }
        Ok(found)
      })
      .await?;

    if let Some(missing) = keys.iter().zip(&found).find(|(_, raw)| raw.is_none()) {
      return Err(casetrack_core::Error::InvalidLocation(missing.0.clone()).into());
    }

    found
      .into_iter()
      .flatten()
      .map(RawSeries::into_series)
      .collect()
  }

  async fn by_country(&self, country: &str) -> Result<Vec<LocationSeries>> {
    self
      .select_series(
        "country = ?1 AND subregion IS NOT NULL AND county IS NULL",
        vec![country.to_owned()],
      )
      .await
  }

  async fn by_subregion(
    &self,
    country: &str,
    subregion: &str,
  ) -> Result<Vec<LocationSeries>> {
    self
      .select_series(
        "country = ?1 AND subregion = ?2 AND county IS NOT NULL",
        vec![country.to_owned(), subregion.to_owned()],
      )
      .await
  }

  async fn list_keys(&self) -> Result<Vec<LocationKey>> {
    self.ensure_initialized()?;

    let keys: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT location_key FROM series ORDER BY rowid")?;
        let keys = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
      })
      .await?;

    Ok(keys.into_iter().map(LocationKey::from).collect())
  }

  async fn count(&self) -> Result<usize> {
    self.ensure_initialized()?;

    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM series", [], |r| r.get(0))?))
      .await?;

    Ok(usize::try_from(n).unwrap_or_default())
  }

  async fn metadata(&self) -> Result<DatasetMetadata> {
    let location_count = self.count().await?;

    Ok(DatasetMetadata {
      saved_at: self.read_setting(SAVED_AT).await?,
      source_updated_at: self.read_setting(SOURCE_UPDATED_AT).await?,
      location_count,
    })
  }
}
