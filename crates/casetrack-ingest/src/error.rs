//! Error types for the casetrack-ingest pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("missing column {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: empty {column:?}")]
  MissingValue { line: u64, column: &'static str },

  #[error("line {line}: invalid count in column {column:?}: {value:?}")]
  InvalidCount {
    line:   u64,
    column: String,
    value:  String,
  },
}

impl From<Error> for casetrack_core::Error {
  fn from(e: Error) -> Self { casetrack_core::Error::Ingest(Box::new(e)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
