//! SQL schema for the casetrack SQLite store.
//!
//! Executed at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per location. Insertion order (rowid) is the listing order;
-- upserts update in place and keep it.
CREATE TABLE IF NOT EXISTS series (
    location_key TEXT PRIMARY KEY,
    country      TEXT NOT NULL,
    subregion    TEXT,
    county       TEXT,
    latitude     REAL,
    longitude    REAL,
    records_json TEXT NOT NULL     -- JSON array of DailyRecord
);

-- Scalar dataset metadata: 'saved_at', 'source_updated_at'.
CREATE TABLE IF NOT EXISTS settings (
    name  TEXT PRIMARY KEY,
    value TEXT                     -- RFC 3339 UTC or NULL
);

CREATE INDEX IF NOT EXISTS series_country_idx   ON series(country);
CREATE INDEX IF NOT EXISTS series_subregion_idx ON series(country, subregion);

PRAGMA user_version = 1;
";

pub const SAVED_AT: &str = "saved_at";
pub const SOURCE_UPDATED_AT: &str = "source_updated_at";
