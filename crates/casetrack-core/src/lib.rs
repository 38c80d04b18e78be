//! Core types and trait definitions for casetrack.
//!
//! This crate is deliberately free of HTTP, CSV and database dependencies.
//! Every other crate depends on it: the ingest pipeline produces its
//! [`LocationSeries`], storage backends implement its [`LocationStore`], and
//! data sources implement its [`DataSource`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod key;
pub mod memory;
pub mod metrics;
pub mod series;
pub mod source;
pub mod store;

pub use error::{Error, FetchError, Result};
pub use key::LocationKey;
pub use memory::MemoryStore;
pub use series::{
  DailyRecord, DatasetMetadata, DecoratedRecord, DecoratedSeries, Level,
  LocationSeries,
};
