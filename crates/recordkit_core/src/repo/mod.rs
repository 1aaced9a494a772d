//! Generic record repositories.
//!
//! # Responsibility
//! - Define one data-access contract shared by every `Record` type.
//! - Provide a SQLite executor and an in-memory executor behind it.
//!
//! # Invariants
//! - Writes validate input before any statement is issued; a rejected batch
//!   or attribute map touches nothing.
//! - Reads that match nothing fail with `NoRows`; writes that match nothing
//!   report `0` affected rows, not an error.
//! - Store errors pass through unchanged; nothing is retried or logged here.

use crate::db::DbError;
use crate::query::ListOptions;
use crate::record::{AttributeMap, Record, UpdateSchema, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory_repo;
pub mod sql;
pub mod sqlite_repo;

pub use memory_repo::MemoryRepository;
pub use sqlite_repo::SqliteRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure taxonomy.
#[derive(Debug)]
pub enum RepoError {
    /// The read succeeded but matched zero rows.
    NoRows,
    /// Input failed a validation contract before reaching the store.
    Unprocessable(ValidationError),
    /// Underlying store failure.
    Db(DbError),
    /// A row could not be bound into its record type.
    InvalidData(String),
}

impl RepoError {
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    pub fn is_unprocessable(&self) -> bool {
        matches!(self, Self::Unprocessable(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRows => write!(f, "no rows in result set"),
            Self::Unprocessable(err) => write!(f, "unprocessable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoRows => None,
            Self::Unprocessable(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Unprocessable(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract, generic over any `Record`.
///
/// Implementations are safe to share across threads; each call is one
/// logical operation with no state carried between calls.
pub trait Repository {
    /// Loads one record by primary key.
    fn get_by_id<R: Record>(&self, id: i64) -> RepoResult<R>;
    /// Loads one bounded page of records.
    fn list<R: Record>(&self, options: &ListOptions) -> RepoResult<Vec<R>>;
    /// Inserts one record and returns its store-assigned id.
    fn insert<R: Record>(&self, record: &R) -> RepoResult<i64>;
    /// Inserts every record in one statement; an empty slice is a no-op.
    fn batch_insert<R: Record>(&self, records: &[R]) -> RepoResult<usize>;
    /// Rewrites every writable column of the record identified by `record.id()`.
    fn update<R: Record>(&self, record: &R) -> RepoResult<usize>;
    /// Updates only the attributes accepted by `schema`.
    fn partial_update<R: Record>(
        &self,
        id: i64,
        schema: &UpdateSchema,
        attrs: &AttributeMap,
    ) -> RepoResult<usize>;
    /// Counts every row of the record's table.
    fn count<R: Record>(&self) -> RepoResult<i64>;
    /// Deletes by primary key.
    fn delete_by_id<R: Record>(&self, id: i64) -> RepoResult<usize>;
}

macro_rules! forward_repository {
    ($($wrapper:ty),+) => {$(
        impl<T: Repository> Repository for $wrapper {
            fn get_by_id<R: Record>(&self, id: i64) -> RepoResult<R> {
                (**self).get_by_id(id)
            }

            fn list<R: Record>(&self, options: &ListOptions) -> RepoResult<Vec<R>> {
                (**self).list(options)
            }

            fn insert<R: Record>(&self, record: &R) -> RepoResult<i64> {
                (**self).insert(record)
            }

            fn batch_insert<R: Record>(&self, records: &[R]) -> RepoResult<usize> {
                (**self).batch_insert(records)
            }

            fn update<R: Record>(&self, record: &R) -> RepoResult<usize> {
                (**self).update(record)
            }

            fn partial_update<R: Record>(
                &self,
                id: i64,
                schema: &UpdateSchema,
                attrs: &AttributeMap,
            ) -> RepoResult<usize> {
                (**self).partial_update::<R>(id, schema, attrs)
            }

            fn count<R: Record>(&self) -> RepoResult<i64> {
                (**self).count::<R>()
            }

            fn delete_by_id<R: Record>(&self, id: i64) -> RepoResult<usize> {
                (**self).delete_by_id::<R>(id)
            }
        }
    )+};
}

forward_repository!(&T, Arc<T>);
