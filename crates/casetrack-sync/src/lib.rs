//! Sync orchestrator for casetrack.
//!
//! [`SeriesApi`] sits between callers and a [`LocationStore`]: each query
//! checks whether the stored data is still fresh, reloads it from a
//! [`DataSource`] when it is not, and decorates what it returns with the
//! derived day-over-day metrics.
//!
//! The upstream data comes in two tiers. The base tier (the global files) is
//! always loaded. The detail tier (county-level files for one country) is
//! large, so by default it is loaded only when a query first touches one of
//! its locations.
//!
//! [`LocationStore`]: casetrack_core::store::LocationStore
//! [`DataSource`]: casetrack_core::source::DataSource

pub mod api;
pub mod config;
pub mod status;

use casetrack_core::{MemoryStore, Result};
use casetrack_source::AnySource;

pub use api::SeriesApi;
pub use config::SyncConfig;
pub use status::{LoadStatus, Tier};

impl SeriesApi<MemoryStore, AnySource> {
  /// An in-memory API reading from the source named in `config`.
  pub fn from_config(config: &SyncConfig) -> Result<Self> {
    let source = AnySource::from_config(&config.source)?;
    Ok(Self::new(MemoryStore::new(), source, config))
  }
}
