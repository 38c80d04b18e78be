//! Row source: turns one upstream CSV file into a [`RowTable`].
//!
//! Pipeline:
//!   raw &str
//!     └─ csv::Reader (trimmed)
//!          └─ canonical_header()   → unified column names
//!               └─ parse_date_column() → date columns
//!                    └─ RawRow per LocationKey

use std::collections::HashMap;

use casetrack_core::LocationKey;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::error::{Error, Result};

// ─── Column names ────────────────────────────────────────────────────────────

pub const COUNTRY: &str = "Country/Region";
pub const SUBREGION: &str = "Province/State";
pub const COUNTY: &str = "County";
pub const LATITUDE: &str = "Lat";
pub const LONGITUDE: &str = "Long";

/// Region-file headers and the global-file names they stand for.
const HEADER_ALIASES: &[(&str, &str)] = &[
  ("Country_Region", COUNTRY),
  ("Province_State", SUBREGION),
  ("Admin2", COUNTY),
  ("Long_", LONGITUDE),
];

/// Translate a region-file header to the name the global files use.
pub fn canonical_header(header: &str) -> &str {
  HEADER_ALIASES
    .iter()
    .find(|(alias, _)| *alias == header)
    .map_or(header, |(_, canonical)| *canonical)
}

/// Parse a `M/D/YY` header cell, e.g. `1/22/20` for 2020-01-22.
///
/// Anything else (`Lat`, `Population`, `2020-01-22`, …) is not a date column.
pub fn parse_date_column(header: &str) -> Option<NaiveDate> {
  let mut parts = header.split('/');
  let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
  if parts.next().is_some() {
    return None;
  }

  let digits = |s: &str, min: usize, max: usize| {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
  };
  if !(digits(month, 1, 2) && digits(day, 1, 2) && digits(year, 2, 2)) {
    return None;
  }

  NaiveDate::from_ymd_opt(
    2000 + year.parse::<i32>().ok()?,
    month.parse().ok()?,
    day.parse().ok()?,
  )
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One location's row, before it is paired with its sibling tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
  pub key:       LocationKey,
  pub country:   String,
  pub subregion: Option<String>,
  pub county:    Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  /// One count per entry of [`RowTable::dates`]. Empty cells read as `0`.
  pub counts:    Vec<i64>,
}

/// Every row of one file, keyed by location.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
  dates: Vec<NaiveDate>,
  rows:  Vec<RawRow>,
  index: HashMap<LocationKey, usize>,
}

struct Columns {
  country:   usize,
  subregion: usize,
  county:    Option<usize>,
  latitude:  Option<usize>,
  longitude: Option<usize>,
  dates:     Vec<(usize, NaiveDate)>,
}

impl Columns {
  fn locate(headers: &[String]) -> Result<Self> {
    let find = |name: &str| headers.iter().position(|h| h == name);

    Ok(Self {
      country:   find(COUNTRY).ok_or(Error::MissingColumn(COUNTRY))?,
      subregion: find(SUBREGION).ok_or(Error::MissingColumn(SUBREGION))?,
      county:    find(COUNTY),
      latitude:  find(LATITUDE),
      longitude: find(LONGITUDE),
      dates:     headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| parse_date_column(h).map(|d| (i, d)))
        .collect(),
    })
  }
}

fn cell(record: &StringRecord, column: Option<usize>) -> Option<&str> {
  column.and_then(|i| record.get(i)).filter(|s| !s.is_empty())
}

impl RowTable {
  pub fn parse(text: &str) -> Result<Self> {
    let mut reader = ReaderBuilder::new()
      .trim(Trim::All)
      .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
      .headers()?
      .iter()
      .map(|h| canonical_header(h).to_owned())
      .collect();
    let columns = Columns::locate(&headers)?;

    let mut table = Self {
      dates: columns.dates.iter().map(|(_, d)| *d).collect(),
      ..Self::default()
    };

    for record in reader.records() {
      let record = record?;
      let line = record.position().map_or(0, |p| p.line());

      let country = cell(&record, Some(columns.country))
        .ok_or(Error::MissingValue { line, column: COUNTRY })?;
      let subregion = cell(&record, Some(columns.subregion));
      let county = cell(&record, columns.county);

      if county.is_some() && subregion.is_none() {
        warn!(line, country, county, "dropping county row without a subregion");
        continue;
      }

      let mut counts = Vec::with_capacity(columns.dates.len());
      for (i, _) in &columns.dates {
        let value = record.get(*i).unwrap_or_default();
        let count = if value.is_empty() {
          0
        } else {
          value.parse::<i64>().map_err(|_| Error::InvalidCount {
            line,
            column: headers[*i].clone(),
            value: value.to_owned(),
          })?
        };
        counts.push(count);
      }

      let coordinate = |column| -> Option<f64> {
        cell(&record, column).and_then(|s| s.parse().ok())
      };

      table.insert(RawRow {
        key: LocationKey::new(country, subregion.map(|s| (s, county))),
        country: country.to_owned(),
        subregion: subregion.map(str::to_owned),
        county: county.map(str::to_owned),
        latitude: coordinate(columns.latitude),
        longitude: coordinate(columns.longitude),
        counts,
      });
    }

    Ok(table)
  }

  /// Later rows win over earlier rows with the same key.
  fn insert(&mut self, row: RawRow) {
    match self.index.get(&row.key) {
      Some(&i) => {
        warn!(key = %row.key, "duplicate location row; keeping the later one");
        self.rows[i] = row;
      }
      None => {
        self.index.insert(row.key.clone(), self.rows.len());
        self.rows.push(row);
      }
    }
  }

  /// The date columns, in file order.
  pub fn dates(&self) -> &[NaiveDate] { &self.dates }

  /// Rows in first-appearance order.
  pub fn rows(&self) -> &[RawRow] { &self.rows }

  pub fn get(&self, key: &LocationKey) -> Option<&RawRow> {
    self.index.get(key).map(|&i| &self.rows[i])
  }

  /// For each of `dates`, the position of the same date among this table's
  /// columns, so counts can be looked up without searching per cell.
  pub fn align(&self, dates: &[NaiveDate]) -> Vec<Option<usize>> {
    let positions: HashMap<NaiveDate, usize> =
      self.dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    dates.iter().map(|d| positions.get(d).copied()).collect()
  }
}

/// The count in `row` at an aligned position, if the column exists.
pub fn aligned_count(row: &RawRow, position: Option<usize>) -> Option<i64> {
  position.and_then(|i| row.counts.get(i)).copied()
}
