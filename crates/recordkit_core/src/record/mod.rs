//! Record contract shared by every entity table.
//!
//! # Responsibility
//! - Describe a table to the generic executors: name, key, columns, defaults.
//! - Bind one row into a typed value without runtime reflection.
//!
//! # Invariants
//! - `COLUMNS[0]` is the primary key and `scan` reads columns in `COLUMNS` order.
//! - `writable_values()` yields one value per `WRITABLE_COLUMNS` entry, same order.
//! - Every identifier constant is a compile-time string, never caller input.

pub mod scan;
pub mod schema;
pub mod validation;

use crate::repo::RepoResult;
use rusqlite::types::Value;

pub use scan::{bind_all, bind_one, RowScanner};
pub use schema::{AttributeMap, FieldKind, UpdateSchema};
pub use validation::ValidationError;

/// Capability set every entity type implements to use the generic executors.
pub trait Record: Default + Sized {
    /// Backing relation name.
    const TABLE: &'static str;
    /// Single identity column.
    const PRIMARY_KEY: &'static str = "id";
    /// Fallback ordering column when a listing does not request one.
    const SORT_BY: &'static str = "updated_at";
    /// Selected columns, in the order `scan` consumes them.
    const COLUMNS: &'static [&'static str];
    /// Columns written by insert and full update.
    const WRITABLE_COLUMNS: &'static [&'static str];
    /// Columns a listing may order by.
    const SORTABLE_COLUMNS: &'static [&'static str];
    /// Columns a listing may filter on from untrusted input.
    const FILTERABLE_COLUMNS: &'static [&'static str];
    /// Fields accepted by partial update, with their expected kinds.
    const UPDATE_SCHEMA: UpdateSchema;
    /// Store-assigned creation timestamp column, if any.
    const CREATED_AT: Option<&'static str> = Some("created_at");
    /// Store-refreshed modification timestamp column, if any.
    const UPDATED_AT: Option<&'static str> = Some("updated_at");

    /// Identity value; `0` for records not yet persisted.
    fn id(&self) -> i64;

    /// Cheap structural completeness check run before insert and full update.
    fn validate_insert(&self) -> bool;

    /// Bind values for `WRITABLE_COLUMNS`.
    fn writable_values(&self) -> Vec<Value>;

    /// Reads one row into `self`, column by column.
    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()>;
}

/// Returns the position of `column` in the record's selected columns.
pub fn column_index<R: Record>(column: &str) -> Option<usize> {
    R::COLUMNS.iter().position(|candidate| *candidate == column)
}

/// Fails with `MissingRequiredFields` unless `record` passes its insert check.
pub fn ensure_insertable<R: Record>(record: &R) -> Result<(), ValidationError> {
    if record.validate_insert() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields { table: R::TABLE })
    }
}

/// Full update additionally needs a persisted identity.
pub fn ensure_updatable<R: Record>(record: &R) -> Result<(), ValidationError> {
    if record.id() <= 0 {
        return Err(ValidationError::MissingIdentity { table: R::TABLE });
    }
    ensure_insertable(record)
}
