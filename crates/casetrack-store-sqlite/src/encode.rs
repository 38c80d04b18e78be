//! Encoding and decoding helpers between casetrack types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. A series' records are stored as
//! one compact JSON array per row.

use casetrack_core::{DailyRecord, LocationSeries};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Series rows ─────────────────────────────────────────────────────────────

/// Column list matching [`RawSeries::from_row`].
pub const SERIES_COLUMNS: &str =
  "location_key, country, subregion, county, latitude, longitude, records_json";

/// Values read directly from, or about to be written to, a `series` row.
pub struct RawSeries {
  pub location_key: String,
  pub country:      String,
  pub subregion:    Option<String>,
  pub county:       Option<String>,
  pub latitude:     Option<f64>,
  pub longitude:    Option<f64>,
  pub records_json: String,
}

impl RawSeries {
  pub fn encode(series: &LocationSeries) -> Result<Self> {
    Ok(Self {
      location_key: series.key.as_str().to_owned(),
      country:      series.country.clone(),
      subregion:    series.subregion.clone(),
      county:       series.county.clone(),
      latitude:     series.latitude,
      longitude:    series.longitude,
      records_json: serde_json::to_string(&series.records)?,
    })
  }

  /// Read a row selected with [`SERIES_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      location_key: row.get(0)?,
      country:      row.get(1)?,
      subregion:    row.get(2)?,
      county:       row.get(3)?,
      latitude:     row.get(4)?,
      longitude:    row.get(5)?,
      records_json: row.get(6)?,
    })
  }

  pub fn into_series(self) -> Result<LocationSeries> {
    let records: Vec<DailyRecord> = serde_json::from_str(&self.records_json)?;

    Ok(LocationSeries {
      key: self.location_key.into(),
      country: self.country,
      subregion: self.subregion,
      county: self.county,
      latitude: self.latitude,
      longitude: self.longitude,
      records,
    })
  }
}
