//! Derived metrics: day-over-day deltas and rates.
//!
//! Pure functions over one series. Nothing here is persisted; the orchestrator
//! applies [`decorate`] to every series it returns.

use crate::series::{DailyRecord, DecoratedRecord, DecoratedSeries, LocationSeries};

pub fn decorate(series: LocationSeries) -> DecoratedSeries {
  let records = decorate_records(&series.records);

  DecoratedSeries {
    key: series.key,
    country: series.country,
    subregion: series.subregion,
    county: series.county,
    latitude: series.latitude,
    longitude: series.longitude,
    records,
  }
}

/// Decorate each record by comparing it with the one before it.
///
/// The first record has no predecessor: its confirmed delta is `0` and its
/// other deltas are absent.
pub fn decorate_records(records: &[DailyRecord]) -> Vec<DecoratedRecord> {
  let previous = std::iter::once(None).chain(records.iter().map(Some));

  records
    .iter()
    .zip(previous)
    .map(|(record, prev)| decorate_one(record, prev))
    .collect()
}

fn decorate_one(record: &DailyRecord, prev: Option<&DailyRecord>) -> DecoratedRecord {
  let (new_confirmed, new_deaths, new_recovered) = match prev {
    Some(prev) => (
      record.confirmed - prev.confirmed,
      delta(record.deaths, prev.deaths),
      delta(record.recovered, prev.recovered),
    ),
    None => (0, None, None),
  };

  DecoratedRecord {
    record: *record,
    new_confirmed,
    new_deaths,
    new_recovered,
    mortality_rate: rate(record.deaths, record.confirmed),
    recovery_rate: rate(record.recovered, record.confirmed),
  }
}

fn delta(current: Option<i64>, previous: Option<i64>) -> Option<i64> {
  Some(current? - previous?)
}

/// `numerator / confirmed`. With nothing confirmed the rate is a known zero,
/// otherwise it is absent whenever the numerator is.
fn rate(numerator: Option<i64>, confirmed: i64) -> Option<f64> {
  if confirmed > 0 {
    numerator.map(|n| n as f64 / confirmed as f64)
  } else {
    Some(0.0)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2020, 1, d).unwrap() }

  fn rec(d: u32, confirmed: i64, deaths: Option<i64>, recovered: Option<i64>) -> DailyRecord {
    DailyRecord { date: day(d), confirmed, deaths, recovered }
  }

  #[test]
  fn first_record_has_no_deltas() {
    let out = decorate_records(&[rec(22, 10, Some(1), Some(2))]);
    let first = &out[0];

    assert_eq!(first.new_confirmed, 0);
    assert_eq!(first.new_deaths, None);
    assert_eq!(first.new_recovered, None);
    assert_eq!(first.mortality_rate, Some(0.1));
    assert_eq!(first.recovery_rate, Some(0.2));
  }

  #[test]
  fn first_record_with_nothing_confirmed_has_zero_rates() {
    let out = decorate_records(&[rec(22, 0, None, None)]);
    assert_eq!(out[0].mortality_rate, Some(0.0));
    assert_eq!(out[0].recovery_rate, Some(0.0));
  }

  #[test]
  fn deltas_between_consecutive_days() {
    let out = decorate_records(&[
      rec(22, 4, Some(1), Some(0)),
      rec(23, 10, Some(2), Some(5)),
    ]);
    let second = &out[1];

    assert_eq!(second.record.confirmed, 10);
    assert_eq!(second.new_confirmed, 6);
    assert_eq!(second.new_deaths, Some(1));
    assert_eq!(second.new_recovered, Some(5));
    assert_eq!(second.mortality_rate, Some(0.2));
    assert_eq!(second.recovery_rate, Some(0.5));
  }

  #[test]
  fn absent_metric_gives_absent_delta_and_rate() {
    let out = decorate_records(&[rec(22, 4, Some(1), None), rec(23, 8, Some(2), None)]);

    assert_eq!(out[1].new_recovered, None);
    assert_eq!(out[1].recovery_rate, None);
    assert_eq!(out[1].new_deaths, Some(1));
  }

  #[test]
  fn delta_needs_both_sides() {
    let out = decorate_records(&[rec(22, 4, None, None), rec(23, 8, Some(2), None)]);
    assert_eq!(out[1].new_deaths, None);
    assert_eq!(out[1].mortality_rate, Some(0.25));
  }

  #[test]
  fn zero_confirmed_rates_are_zero_not_absent() {
    let out = decorate_records(&[rec(22, 0, None, None), rec(23, 0, None, None)]);
    assert_eq!(out[1].mortality_rate, Some(0.0));
    assert_eq!(out[1].recovery_rate, Some(0.0));
  }

  #[test]
  fn corrections_produce_negative_deltas() {
    let out = decorate_records(&[rec(22, 10, Some(3), None), rec(23, 9, Some(2), None)]);
    assert_eq!(out[1].new_confirmed, -1);
    assert_eq!(out[1].new_deaths, Some(-1));
  }
}
