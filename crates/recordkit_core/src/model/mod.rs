//! Bundled entity records.
//!
//! # Responsibility
//! - Declare per-table column layouts, allow-lists and update schemas.
//! - Keep each entity's insert check local and cheap.
//!
//! # Invariants
//! - Every type here satisfies the `Record` column-order invariants.
//! - Timestamps are epoch milliseconds owned by the store.

pub mod category;
pub mod destination;
pub mod product;
pub mod station;
pub mod user;

pub use category::Category;
pub use destination::Destination;
pub use product::Product;
pub use station::Station;
pub use user::User;

/// Serializes a string list for a JSON text column.
pub(crate) fn json_list(items: &[String]) -> rusqlite::types::Value {
    rusqlite::types::Value::Text(serde_json::Value::from(items.to_vec()).to_string())
}
