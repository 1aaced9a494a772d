//! Read-query descriptors.
//!
//! # See also
//! - `repo::sql` for how a resolved plan becomes a statement.

pub mod list_options;

pub use list_options::{
    Filter, ListOptions, ListPlan, OrderDirection, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
