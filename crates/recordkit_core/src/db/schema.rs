//! Baseline table layout for the bundled record types.
//!
//! # Invariants
//! - Column order of every table matches the owning record's `COLUMNS`.
//! - Timestamps are epoch milliseconds assigned by the store.

use crate::db::DbResult;
use rusqlite::Connection;

const BASELINE_SQL: &str = include_str!("baseline.sql");

/// Tables created by [`apply_baseline`].
pub const BASELINE_TABLES: &[&str] = &[
    "categories",
    "products",
    "users",
    "destinations",
    "stations",
];

/// Creates any missing baseline tables and indexes.
pub fn apply_baseline(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(BASELINE_SQL)?;
    Ok(())
}
