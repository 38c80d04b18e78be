//! `LocationKey`: the canonical name of a geographic entity.
//!
//! Keys double as store identifiers and as presentation names, e.g.
//! `"Turkey"`, `"Canada (British Columbia)"`, `"US (Autauga, Alabama)"`.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
  /// Build the key for a country, optionally narrowed to a subregion and
  /// then to a county of that subregion.
  ///
  /// ```
  /// # use casetrack_core::LocationKey;
  /// let key = LocationKey::new("US", Some(("Alabama", Some("Autauga"))));
  /// assert_eq!(key.as_str(), "US (Autauga, Alabama)");
  /// ```
  pub fn new(country: &str, place: Option<(&str, Option<&str>)>) -> Self {
    match place {
      Some((subregion, Some(county))) => Self(format!("{country} ({county}, {subregion})")),
      Some((subregion, None)) => Self(format!("{country} ({subregion})")),
      None => Self(country.to_owned()),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// `true` if this key names a subregion or county of `country`, but not the
  /// country itself.
  pub fn is_within(&self, country: &str) -> bool {
    self
      .0
      .strip_prefix(country)
      .is_some_and(|rest| rest.starts_with(" ("))
  }
}

impl fmt::Display for LocationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for LocationKey {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for LocationKey {
  fn from(s: String) -> Self { Self(s) }
}

impl AsRef<str> for LocationKey {
  fn as_ref(&self) -> &str { &self.0 }
}

impl Borrow<str> for LocationKey {
  fn borrow(&self) -> &str { &self.0 }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn builds_the_three_shapes() {
    assert_eq!(LocationKey::new("Turkey", None).as_str(), "Turkey");
    assert_eq!(
      LocationKey::new("Canada", Some(("British Columbia", None))).as_str(),
      "Canada (British Columbia)"
    );
    assert_eq!(
      LocationKey::new("US", Some(("Alabama", Some("Autauga")))).as_str(),
      "US (Autauga, Alabama)"
    );
  }

  #[test]
  fn distinct_tuples_give_distinct_keys() {
    let tuples = [
      ("US", None),
      ("US", Some(("Alabama", None))),
      ("US", Some(("Alabama", Some("Autauga")))),
      ("US", Some(("Alabama", Some("Baldwin")))),
      // A subregion sharing its name with a county elsewhere.
      ("US", Some(("Autauga", None))),
      ("US", Some(("Autauga", Some("Alabama")))),
      ("US", Some(("Utah", None))),
      ("US", Some(("Utah", Some("Southeast Utah")))),
      ("Canada", Some(("Alberta", None))),
      ("Canada", None),
    ];

    let keys: HashSet<_> = tuples
      .iter()
      .map(|&(country, place)| LocationKey::new(country, place))
      .collect();
    assert_eq!(keys.len(), tuples.len());
  }

  #[test]
  fn is_within_excludes_the_country_itself() {
    assert!(LocationKey::from("US (Alabama)").is_within("US"));
    assert!(LocationKey::from("US (Autauga, Alabama)").is_within("US"));
    assert!(!LocationKey::from("US").is_within("US"));
    assert!(!LocationKey::from("Uruguay").is_within("US"));
    assert!(!LocationKey::from("USSR (Moscow)").is_within("US"));
  }
}
