//! Load-status notifications.

use std::fmt;

/// The two datasets a load cycle can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  /// The global files: every country, some at subregion granularity.
  Base,
  /// The county-level region files.
  Detail,
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Base => "base",
      Self::Detail => "detail",
    })
  }
}

/// Published through [`SeriesApi::subscribe_status`](crate::SeriesApi::subscribe_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
  #[default]
  Idle,
  Loading { tier: Tier },
}
