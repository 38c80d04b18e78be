//! Fixed reference data about the upstream files.

use casetrack_core::LocationKey;

/// The country whose county-level file forms the detail tier.
pub const DETAIL_COUNTRY: &str = "US";

/// `(country, subregion)` rows of the global files that are data-entry
/// artifacts rather than real subregions.
pub const ARTIFACT_ROWS: &[(&str, &str)] =
  &[("Canada", "Recovered"), ("Canada", "Diamond Princess")];

pub fn is_artifact(country: &str, subregion: Option<&str>) -> bool {
  subregion.is_some_and(|s| {
    ARTIFACT_ROWS
      .iter()
      .any(|&(c, r)| c == country && r == s)
  })
}

/// A country reported only per subregion, for which a country total is
/// synthesised.
#[derive(Debug, Clone, Copy)]
pub struct CountryRollup {
  pub country:                    &'static str,
  pub latitude:                   f64,
  pub longitude:                  f64,
  /// Take `recovered` from the country's own row in the recovered file
  /// instead of summing subregions (which report none).
  pub recovered_from_country_row: bool,
}

pub const COUNTRY_ROLLUPS: &[CountryRollup] = &[
  CountryRollup {
    country:                    "Australia",
    latitude:                   -25.274399,
    longitude:                  133.775131,
    recovered_from_country_row: false,
  },
  CountryRollup {
    country:                    "Canada",
    latitude:                   56.1304,
    longitude:                  -106.3468,
    recovered_from_country_row: true,
  },
  CountryRollup {
    country:                    "China",
    latitude:                   35.861660,
    longitude:                  104.195396,
    recovered_from_country_row: false,
  },
];

/// Subregions of [`DETAIL_COUNTRY`] with their reference coordinates
/// (name, latitude, longitude). Each gets a rollup row in the detail tier.
pub const US_STATES: &[(&str, f64, f64)] = &[
  ("Alabama",              32.318230, -86.902298),
  ("Alaska",               66.160507, -153.369141),
  ("Arizona",              34.048927, -111.093735),
  ("Arkansas",             34.799999, -92.199997),
  ("California",           36.778259, -119.417931),
  ("Colorado",             39.113014, -105.358887),
  ("Connecticut",          41.599998, -72.699997),
  ("Delaware",             39.000000, -75.500000),
  ("District of Columbia", 47.751076, -120.740135),
  ("Florida",              27.994402, -81.760254),
  ("Georgia",              33.247875, -83.441162),
  ("Hawaii",               19.741755, -155.844437),
  ("Idaho",                44.068203, -114.742043),
  ("Illinois",             40.000000, -89.000000),
  ("Indiana",              40.273502, -86.126976),
  ("Iowa",                 42.032974, -93.581543),
  ("Kansas",               38.500000, -98.000000),
  ("Kentucky",             37.839333, -84.270020),
  ("Louisiana",            30.391830, -92.329102),
  ("Maine",                45.367584, -68.972168),
  ("Maryland",             39.045753, -76.641273),
  ("Massachusetts",        42.407211, -71.382439),
  ("Michigan",             44.182205, -84.506836),
  ("Minnesota",            46.392410, -94.636230),
  ("Mississippi",          33.000000, -90.000000),
  ("Missouri",             38.573936, -92.603760),
  ("Montana",              46.965260, -109.533691),
  ("Nebraska",             41.500000, -100.000000),
  ("Nevada",               39.876019, -117.224121),
  ("New Hampshire",        44.000000, -71.500000),
  ("New Jersey",           39.833851, -74.871826),
  ("New Mexico",           34.307144, -106.018066),
  ("New York",             43.000000, -75.000000),
  ("North Carolina",       35.782169, -80.793457),
  ("North Dakota",         47.650589, -100.437012),
  ("Ohio",                 40.367474, -82.996216),
  ("Oklahoma",             36.084621, -96.921387),
  ("Oregon",               44.000000, -120.500000),
  ("Pennsylvania",         41.203323, -77.194527),
  ("Rhode Island",         41.700001, -71.500000),
  ("South Carolina",       33.836082, -81.163727),
  ("South Dakota",         44.500000, -100.000000),
  ("Tennessee",            35.860119, -86.660156),
  ("Texas",                31.000000, -100.000000),
  ("Utah",                 39.419220, -111.950684),
  ("Vermont",              44.000000, -72.699997),
  ("Virginia",             37.926868, -78.024902),
  ("Washington",           47.751076, -120.740135),
  ("West Virginia",        39.000000, -80.500000),
  ("Wisconsin",            44.500000, -89.500000),
  ("Wyoming",              43.075970, -107.290283),
];

/// Reference coordinates of a detail-country subregion, if it is listed.
pub fn state_coordinates(name: &str) -> Option<(f64, f64)> {
  US_STATES
    .iter()
    .find(|(state, ..)| *state == name)
    .map(|&(_, lat, long)| (lat, long))
}

/// Keys the detail tier is known to provide, before it has been loaded.
pub fn announced_detail_keys() -> impl Iterator<Item = LocationKey> {
  US_STATES
    .iter()
    .map(|&(state, ..)| LocationKey::new(DETAIL_COUNTRY, Some((state, None))))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_state_is_announced_once() {
    let keys: Vec<_> = announced_detail_keys().collect();
    assert_eq!(keys.len(), 51);
    assert_eq!(keys[0].as_str(), "US (Alabama)");
    assert!(keys.iter().any(|k| k.as_str() == "US (District of Columbia)"));

    let unique: std::collections::HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());
  }

  #[test]
  fn artifacts() {
    assert!(is_artifact("Canada", Some("Recovered")));
    assert!(is_artifact("Canada", Some("Diamond Princess")));
    assert!(!is_artifact("Canada", Some("Alberta")));
    assert!(!is_artifact("Canada", None));
    assert!(!is_artifact("US", Some("Recovered")));
  }

  #[test]
  fn coordinates_lookup() {
    assert_eq!(state_coordinates("Utah"), Some((39.419220, -111.950684)));
    assert_eq!(state_coordinates("American Samoa"), None);
  }
}
