//! Aggregator: synthesises the totals the upstream files leave out.

use std::collections::{HashMap, HashSet};

use casetrack_core::{DailyRecord, Level, LocationKey, LocationSeries};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
  regions::{COUNTRY_ROLLUPS, CountryRollup, DETAIL_COUNTRY, US_STATES, state_coordinates},
  rows::{RowTable, aligned_count},
};

/// Field-wise sum of `children`, date by date.
///
/// An absent `deaths`/`recovered` does not contribute, but the first child
/// that reports the metric starts the sum at zero, so the total is absent only
/// when no child reports it at all. Sums saturate at `i64::MAX`.
pub fn sum_records(dates: &[NaiveDate], children: &[&LocationSeries]) -> Vec<DailyRecord> {
  let mut sums: Vec<DailyRecord> = dates.iter().map(|&d| DailyRecord::empty(d)).collect();

  for child in children {
    for (sum, record) in sums.iter_mut().zip(&child.records) {
      sum.confirmed = sum.confirmed.saturating_add(record.confirmed);
      if let Some(deaths) = record.deaths {
        let total = sum.deaths.get_or_insert(0);
        *total = total.saturating_add(deaths);
      }
      if let Some(recovered) = record.recovered {
        let total = sum.recovered.get_or_insert(0);
        *total = total.saturating_add(recovered);
      }
    }
  }

  sums
}

// ─── Country rollups (base tier) ─────────────────────────────────────────────

/// One synthetic country-level series per entry of [`COUNTRY_ROLLUPS`].
///
/// A country that already has a country-level row is left alone, as is one
/// with no subregions to sum.
pub fn country_rollups(
  series: &[LocationSeries],
  dates: &[NaiveDate],
  recovered: &RowTable,
) -> Vec<LocationSeries> {
  COUNTRY_ROLLUPS
    .iter()
    .filter_map(|rollup| country_rollup(rollup, series, dates, recovered))
    .collect()
}

fn country_rollup(
  rollup: &CountryRollup,
  series: &[LocationSeries],
  dates: &[NaiveDate],
  recovered: &RowTable,
) -> Option<LocationSeries> {
  let country = rollup.country;

  if series
    .iter()
    .any(|s| s.country == country && s.level() == Level::Country)
  {
    debug!(country, "country row present; no rollup needed");
    return None;
  }

  let children: Vec<&LocationSeries> = series
    .iter()
    .filter(|s| s.country == country && s.level() == Level::Subregion)
    .collect();
  if children.is_empty() {
    warn!(country, "no subregion rows to roll up");
    return None;
  }

  let key = LocationKey::new(country, None);
  let mut records = sum_records(dates, &children);

  if rollup.recovered_from_country_row {
    match recovered.get(&key) {
      Some(row) => {
        let positions = recovered.align(dates);
        for (record, position) in records.iter_mut().zip(positions) {
          record.recovered = aligned_count(row, position);
        }
      }
      None => warn!(country, "recovered file has no country row; keeping summed values"),
    }
  }

  Some(LocationSeries {
    key,
    country: country.to_owned(),
    subregion: None,
    county: None,
    latitude: Some(rollup.latitude),
    longitude: Some(rollup.longitude),
    records,
  })
}

// ─── Subregion rollups (detail tier) ─────────────────────────────────────────

/// One synthetic subregion-level series per subregion of the county rows,
/// plus one for every listed state of [`DETAIL_COUNTRY`] even when it has no
/// counties in this batch.
///
/// Subregions that already have a row of their own are skipped.
pub fn subregion_rollups(series: &[LocationSeries], dates: &[NaiveDate]) -> Vec<LocationSeries> {
  let direct: HashSet<(&str, &str)> = series
    .iter()
    .filter(|s| s.level() != Level::County)
    .filter_map(|s| Some((s.country.as_str(), s.subregion.as_deref()?)))
    .collect();

  let mut groups: Vec<((&str, &str), Vec<&LocationSeries>)> = US_STATES
    .iter()
    .map(|&(state, ..)| ((DETAIL_COUNTRY, state), Vec::new()))
    .collect();
  let mut index: HashMap<(&str, &str), usize> =
    groups.iter().enumerate().map(|(i, (g, _))| (*g, i)).collect();

  for s in series.iter().filter(|s| s.level() == Level::County) {
    let Some(subregion) = s.subregion.as_deref() else {
      continue;
    };
    let group = (s.country.as_str(), subregion);
    let i = *index.entry(group).or_insert_with(|| {
      groups.push((group, Vec::new()));
      groups.len() - 1
    });
    groups[i].1.push(s);
  }

  groups
    .into_iter()
    .filter(|(group, _)| !direct.contains(group))
    .map(|((country, subregion), children)| {
      let coordinates = if country == DETAIL_COUNTRY {
        state_coordinates(subregion)
      } else {
        None
      };
      if coordinates.is_none() {
        warn!(country, subregion, "no reference coordinates for subregion");
      }

      let records = if children.is_empty() {
        dates
          .iter()
          .map(|&date| DailyRecord { date, confirmed: 0, deaths: Some(0), recovered: None })
          .collect()
      } else {
        sum_records(dates, &children)
      };

      LocationSeries {
        key: LocationKey::new(country, Some((subregion, None))),
        country: country.to_owned(),
        subregion: Some(subregion.to_owned()),
        county: None,
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, long)| long),
        records,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2020, 1, d).unwrap() }

  fn series(
    country: &str,
    subregion: Option<&str>,
    county: Option<&str>,
    counts: &[(i64, Option<i64>, Option<i64>)],
  ) -> LocationSeries {
    LocationSeries {
      key:       LocationKey::new(country, subregion.map(|s| (s, county))),
      country:   country.into(),
      subregion: subregion.map(Into::into),
      county:    county.map(Into::into),
      latitude:  None,
      longitude: None,
      records:   counts
        .iter()
        .enumerate()
        .map(|(i, &(confirmed, deaths, recovered))| DailyRecord {
          date: day(22 + i as u32),
          confirmed,
          deaths,
          recovered,
        })
        .collect(),
    }
  }

  #[test]
  fn sum_starts_reported_metrics_at_zero() {
    let a = series("X", Some("A"), None, &[(1, None, None), (2, Some(1), None)]);
    let b = series("X", Some("B"), None, &[(3, None, None), (4, Some(2), None)]);
    let sums = sum_records(&[day(22), day(23)], &[&a, &b]);

    assert_eq!(sums[0], DailyRecord { date: day(22), confirmed: 4, deaths: None, recovered: None });
    assert_eq!(sums[1], DailyRecord { date: day(23), confirmed: 6, deaths: Some(3), recovered: None });
  }

  #[test]
  fn sum_saturates_instead_of_overflowing() {
    let a = series("X", Some("A"), None, &[(i64::MAX - 1, Some(i64::MAX), None)]);
    let b = series("X", Some("B"), None, &[(5, Some(1), Some(2))]);
    let sums = sum_records(&[day(22)], &[&a, &b]);

    assert_eq!(sums[0].confirmed, i64::MAX);
    assert_eq!(sums[0].deaths, Some(i64::MAX));
    assert_eq!(sums[0].recovered, Some(2));
  }

  #[test]
  fn country_rollup_sums_subregions() {
    let input = vec![
      series("Australia", Some("A"), None, &[(0, Some(0), Some(0)), (4, Some(1), Some(2))]),
      series("Australia", Some("B"), None, &[(0, Some(0), Some(0)), (5, Some(1), Some(2))]),
      series("Turkey", None, None, &[(0, Some(0), None), (4, Some(1), None)]),
    ];
    let rollups = country_rollups(&input, &[day(22), day(23)], &RowTable::default());

    assert_eq!(rollups.len(), 1);
    let australia = &rollups[0];
    assert_eq!(australia.key.as_str(), "Australia");
    assert_eq!(australia.latitude, Some(-25.274399));
    assert_eq!(australia.records[1].confirmed, 9);
    assert_eq!(australia.records[1].deaths, Some(2));
    assert_eq!(australia.records[1].recovered, Some(4));
  }

  #[test]
  fn existing_country_row_is_not_rolled_up() {
    let input = vec![
      series("China", None, None, &[(1, None, None)]),
      series("China", Some("Anhui"), None, &[(1, None, None)]),
    ];
    assert!(country_rollups(&input, &[day(22)], &RowTable::default()).is_empty());
  }

  #[test]
  fn canada_recovered_comes_from_country_row() {
    let input = vec![
      series("Canada", Some("Alberta"), None, &[(0, Some(0), None), (4, Some(1), None)]),
      series("Canada", Some("British Columbia"), None, &[(0, Some(0), None), (5, Some(1), None)]),
    ];
    let recovered = RowTable::parse(
      "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Canada,56.1304,-106.3468,1,3\n",
    )
    .unwrap();

    let rollups = country_rollups(&input, &[day(22), day(23)], &recovered);
    let canada = &rollups[0];
    assert_eq!(canada.key.as_str(), "Canada");
    assert_eq!(canada.records[0].recovered, Some(1));
    assert_eq!(canada.records[1].recovered, Some(3));
    assert_eq!(canada.records[1].confirmed, 9);
  }

  #[test]
  fn canada_without_recovered_row_keeps_sum() {
    let input =
      vec![series("Canada", Some("Alberta"), None, &[(4, Some(1), None)])];
    let rollups = country_rollups(&input, &[day(22)], &RowTable::default());
    assert_eq!(rollups[0].records[0].recovered, None);
  }

  #[test]
  fn every_state_gets_a_rollup() {
    let input = vec![
      series("US", Some("American Samoa"), None, &[(0, Some(0), None), (4, Some(1), None)]),
      series("US", Some("Alabama"), Some("Autauga"), &[(0, Some(0), None), (4, Some(1), None)]),
      series("US", Some("Alabama"), Some("Baldwin"), &[(1, Some(0), None), (6, Some(2), None)]),
    ];
    let rollups = subregion_rollups(&input, &[day(22), day(23)]);

    assert_eq!(rollups.len(), 51);
    assert!(rollups.iter().all(|s| s.county.is_none()));

    let alabama = rollups.iter().find(|s| s.key.as_str() == "US (Alabama)").unwrap();
    assert_eq!(alabama.records[0].confirmed, 1);
    assert_eq!(alabama.records[1].confirmed, 10);
    assert_eq!(alabama.records[1].deaths, Some(3));
    assert_eq!(alabama.latitude, Some(32.318230));

    let wyoming = rollups.iter().find(|s| s.key.as_str() == "US (Wyoming)").unwrap();
    assert_eq!(wyoming.records.len(), 2);
    assert!(wyoming.records.iter().all(|r| r.confirmed == 0 && r.deaths == Some(0)));
  }

  #[test]
  fn unlisted_subregion_with_counties_is_rolled_up() {
    let input = vec![series("US", Some("Guam"), Some("North"), &[(2, Some(0), None)])];
    let rollups = subregion_rollups(&input, &[day(22)]);

    assert_eq!(rollups.len(), 52);
    let guam = rollups.iter().find(|s| s.key.as_str() == "US (Guam)").unwrap();
    assert_eq!(guam.records[0].confirmed, 2);
    assert_eq!(guam.latitude, None);
  }

  #[test]
  fn subregion_with_its_own_row_is_skipped() {
    let input = vec![
      series("US", Some("Utah"), None, &[(7, None, None)]),
      series("US", Some("Utah"), Some("Southwest Utah"), &[(2, None, None)]),
    ];
    let rollups = subregion_rollups(&input, &[day(22)]);
    assert!(rollups.iter().all(|s| s.key.as_str() != "US (Utah)"));
  }
}
