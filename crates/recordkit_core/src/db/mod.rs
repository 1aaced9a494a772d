//! SQLite storage bootstrap.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the record executors.
//! - Apply the baseline table layout before handing a connection out.
//!
//! # Invariants
//! - Core code must not read/write record data before the baseline is applied.
//! - The baseline script is idempotent; reopening a database never fails on it.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, open_db_with_config};

pub type DbResult<T> = Result<T, DbError>;

/// Transport-level store failure, passed through the repository layer unchanged.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A thread panicked while holding the shared connection.
    ConnectionPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::ConnectionPoisoned => write!(f, "database connection lock is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::ConnectionPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
