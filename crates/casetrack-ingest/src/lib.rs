//! CSV ingest for casetrack.
//!
//! Turns the raw text of the upstream time-series files into
//! [`casetrack_core::LocationSeries`]: rows are read into a [`RowTable`],
//! paired with their deaths/recovered siblings by [`normalize`], and completed
//! with the country and subregion totals the files leave out by the
//! [`aggregate`] functions. Pure synchronous; no I/O.
//!
//! # Quick start
//!
//! ```no_run
//! # fn demo(confirmed: &str, deaths: &str, recovered: &str) -> casetrack_ingest::Result<()> {
//! let base = casetrack_ingest::build_base_tier(confirmed, deaths, recovered)?;
//! println!("{} locations", base.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod normalize;
pub mod regions;
pub mod rows;

use casetrack_core::LocationSeries;
pub use error::{Error, Result};
pub use normalize::normalize;
pub use regions::{DETAIL_COUNTRY, announced_detail_keys};
pub use rows::RowTable;

/// Build the base tier from the three global files.
///
/// The result holds every country and subregion row of `confirmed` (minus
/// known artifacts) followed by the synthesised country totals.
pub fn build_base_tier(
  confirmed: &str,
  deaths: &str,
  recovered: &str,
) -> Result<Vec<LocationSeries>> {
  let confirmed = RowTable::parse(confirmed)?;
  let deaths = RowTable::parse(deaths)?;
  let recovered = RowTable::parse(recovered)?;

  let mut series = normalize(&confirmed, &deaths, Some(&recovered));
  let rollups = aggregate::country_rollups(&series, confirmed.dates(), &recovered);
  series.extend(rollups);

  Ok(series)
}

/// Build the detail tier from the two county-level files.
///
/// The region files carry no recovered counts, so `recovered` is absent
/// throughout. Every state gets a synthesised total.
pub fn build_detail_tier(confirmed: &str, deaths: &str) -> Result<Vec<LocationSeries>> {
  let confirmed = RowTable::parse(confirmed)?;
  let deaths = RowTable::parse(deaths)?;

  let mut series = normalize(&confirmed, &deaths, None);
  let rollups = aggregate::subregion_rollups(&series, confirmed.dates());
  series.extend(rollups);

  Ok(series)
}
