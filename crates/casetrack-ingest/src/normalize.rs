//! Row Normalizer: pairs each confirmed row with its sibling rows.

use casetrack_core::{DailyRecord, LocationSeries};
use tracing::warn;

use crate::{
  regions::is_artifact,
  rows::{RawRow, RowTable, aligned_count},
};

/// A sibling table and, per confirmed date, where that date sits in it.
struct Sibling<'a> {
  table:     &'a RowTable,
  positions: Vec<Option<usize>>,
}

impl<'a> Sibling<'a> {
  fn new(table: &'a RowTable, confirmed: &RowTable) -> Self {
    Self { table, positions: table.align(confirmed.dates()) }
  }

  /// The sibling's counts for `row`, or `None` per date when the sibling has
  /// no row for that location.
  fn counts(&self, row: &RawRow) -> Vec<Option<i64>> {
    match self.table.get(&row.key) {
      Some(sibling) => self
        .positions
        .iter()
        .map(|&p| aligned_count(sibling, p))
        .collect(),
      None => vec![None; self.positions.len()],
    }
  }
}

/// Build one [`LocationSeries`] per row of `confirmed`.
///
/// `deaths` and `recovered` are matched by location key; a location missing
/// from a sibling table reports that metric as absent on every date, never as
/// zero. Known artifact rows are dropped.
pub fn normalize(
  confirmed: &RowTable,
  deaths: &RowTable,
  recovered: Option<&RowTable>,
) -> Vec<LocationSeries> {
  let deaths = Sibling::new(deaths, confirmed);
  let recovered = recovered.map(|r| Sibling::new(r, confirmed));

  confirmed
    .rows()
    .iter()
    .filter(|row| {
      let artifact = is_artifact(&row.country, row.subregion.as_deref());
      if artifact {
        warn!(key = %row.key, "dropping artifact row");
      }
      !artifact
    })
    .map(|row| {
      let death_counts = deaths.counts(row);
      let recovered_counts = match &recovered {
        Some(sibling) => sibling.counts(row),
        None => vec![None; row.counts.len()],
      };

      let records = confirmed
        .dates()
        .iter()
        .zip(&row.counts)
        .zip(death_counts.into_iter().zip(recovered_counts))
        .map(|((&date, &confirmed), (deaths, recovered))| DailyRecord {
          date,
          confirmed,
          deaths,
          recovered,
        })
        .collect();

      LocationSeries {
        key: row.key.clone(),
        country: row.country.clone(),
        subregion: row.subregion.clone(),
        county: row.county.clone(),
        latitude: row.latitude,
        longitude: row.longitude,
        records,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const HEADER: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n";

  fn table(rows: &str) -> RowTable { RowTable::parse(&format!("{HEADER}{rows}")).unwrap() }

  #[test]
  fn pairs_sibling_rows_by_key() {
    let confirmed = table("Alberta,Canada,53.9,-116.5,1,4\n,Turkey,38.9,35.2,2,5\n");
    let deaths = table(",Turkey,38.9,35.2,0,1\nAlberta,Canada,53.9,-116.5,0,2\n");
    let recovered = table(",Turkey,38.9,35.2,1,3\n");

    let series = normalize(&confirmed, &deaths, Some(&recovered));
    assert_eq!(series.len(), 2);

    let alberta = &series[0];
    assert_eq!(alberta.key.as_str(), "Canada (Alberta)");
    assert_eq!(alberta.records[1].confirmed, 4);
    assert_eq!(alberta.records[1].deaths, Some(2));
    assert!(alberta.records.iter().all(|r| r.recovered.is_none()));

    let turkey = &series[1];
    assert_eq!(turkey.records[0].recovered, Some(1));
    assert_eq!(turkey.records[1].recovered, Some(3));
    assert_eq!(turkey.derived_key(), turkey.key);
  }

  #[test]
  fn drops_artifact_rows() {
    let confirmed = table(
      "Recovered,Canada,0,0,0,0\nDiamond Princess,Canada,0,0,0,1\nAlberta,Canada,0,0,0,1\n",
    );
    let series = normalize(&confirmed, &RowTable::default(), None);

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].key.as_str(), "Canada (Alberta)");
  }

  #[test]
  fn without_recovered_table_recovered_is_absent() {
    let confirmed = table(",Turkey,0,0,1,2\n");
    let deaths = table(",Turkey,0,0,0,0\n");
    let series = normalize(&confirmed, &deaths, None);

    assert!(series[0].records.iter().all(|r| r.recovered.is_none()));
    assert_eq!(series[0].records[0].deaths, Some(0));
  }

  #[test]
  fn sibling_with_missing_date_reports_absent_on_that_date() {
    let confirmed = table(",Turkey,0,0,1,2\n");
    let deaths =
      RowTable::parse("Province/State,Country/Region,1/23/20\n,Turkey,7\n").unwrap();
    let series = normalize(&confirmed, &deaths, None);

    assert_eq!(series[0].records[0].deaths, None);
    assert_eq!(series[0].records[1].deaths, Some(7));
  }
}
