//! User account record.
//!
//! Credentials live outside this table; only profile columns are managed here.

use crate::record::{FieldKind, Record, RowScanner, UpdateSchema};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub username: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] =
        &["id", "firstname", "username", "created_at", "updated_at"];
    const WRITABLE_COLUMNS: &'static [&'static str] = &["firstname", "username"];
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "firstname", "username", "created_at", "updated_at"];
    const FILTERABLE_COLUMNS: &'static [&'static str] = &["username"];
    const UPDATE_SCHEMA: UpdateSchema = UpdateSchema::new(&[
        ("firstname", FieldKind::Text),
        ("username", FieldKind::Text),
    ]);

    fn id(&self) -> i64 {
        self.id
    }

    fn validate_insert(&self) -> bool {
        !self.firstname.is_empty() && !self.username.is_empty()
    }

    fn writable_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.firstname.clone()),
            Value::Text(self.username.clone()),
        ]
    }

    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()> {
        self.id = row.next()?;
        self.firstname = row.next()?;
        self.username = row.next()?;
        self.created_at = row.next()?;
        self.updated_at = row.next()?;
        Ok(())
    }
}
