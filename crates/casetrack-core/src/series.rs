//! Per-location time series and the records they are made of.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::key::LocationKey;

// ─── Records ─────────────────────────────────────────────────────────────────

/// The cumulative counts for one location on one calendar day.
///
/// `deaths` and `recovered` are `None` when the source does not report the
/// metric for the location. That is different from a reported zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
  pub date:      NaiveDate,
  pub confirmed: i64,
  pub deaths:    Option<i64>,
  pub recovered: Option<i64>,
}

impl DailyRecord {
  /// A record with nothing confirmed and no other metric reported.
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, confirmed: 0, deaths: None, recovered: None }
  }
}

// ─── Series ──────────────────────────────────────────────────────────────────

/// Where in the country → subregion → county hierarchy a series sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Country,
  Subregion,
  County,
}

/// The full chronological series for one location.
///
/// Within one populated store every series covers the same dates, one record
/// per day and no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSeries {
  pub key:       LocationKey,
  pub country:   String,
  pub subregion: Option<String>,
  pub county:    Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  pub records:   Vec<DailyRecord>,
}

impl LocationSeries {
  pub fn level(&self) -> Level {
    match (&self.subregion, &self.county) {
      (Some(_), Some(_)) => Level::County,
      (Some(_), None) => Level::Subregion,
      (None, _) => Level::Country,
    }
  }

  /// Rebuild the key from this series' own location fields.
  pub fn derived_key(&self) -> LocationKey {
    let place = self
      .subregion
      .as_deref()
      .map(|subregion| (subregion, self.county.as_deref()));
    LocationKey::new(&self.country, place)
  }

  pub fn record_on(&self, date: NaiveDate) -> Option<&DailyRecord> {
    self.records.iter().find(|r| r.date == date)
  }

  pub fn first_date(&self) -> Option<NaiveDate> { self.records.first().map(|r| r.date) }

  pub fn last_date(&self) -> Option<NaiveDate> { self.records.last().map(|r| r.date) }
}

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Dataset-wide bookkeeping kept alongside the series in a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
  /// When series were last written; refreshed by every upsert.
  pub saved_at:          Option<DateTime<Utc>>,
  /// When the upstream source reported its last update.
  pub source_updated_at: Option<DateTime<Utc>>,
  pub location_count:    usize,
}

// ─── Query-time view ─────────────────────────────────────────────────────────

/// A [`DailyRecord`] with the day-over-day values derived from its
/// predecessor. Computed on read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecoratedRecord {
  #[serde(flatten)]
  pub record:         DailyRecord,
  pub new_confirmed:  i64,
  pub new_deaths:     Option<i64>,
  pub new_recovered:  Option<i64>,
  pub mortality_rate: Option<f64>,
  pub recovery_rate:  Option<f64>,
}

/// A [`LocationSeries`] whose records have been decorated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratedSeries {
  pub key:       LocationKey,
  pub country:   String,
  pub subregion: Option<String>,
  pub county:    Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  pub records:   Vec<DecoratedRecord>,
}

impl DecoratedSeries {
  pub fn record_on(&self, date: NaiveDate) -> Option<&DecoratedRecord> {
    self.records.iter().find(|r| r.record.date == date)
  }
}
