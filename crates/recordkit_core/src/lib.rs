//! Generic record store: one CRUD and listing engine shared by every table.
//!
//! Entity types implement [`Record`]; [`SqliteRepository`] and
//! [`MemoryRepository`] execute list/get/insert/update/delete for any of them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod record;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::{Category, Destination, Product, Station, User};
pub use query::{ListOptions, OrderDirection};
pub use record::{AttributeMap, FieldKind, Record, UpdateSchema, ValidationError};
pub use repo::{MemoryRepository, RepoError, RepoResult, Repository, SqliteRepository};
pub use service::RecordService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
