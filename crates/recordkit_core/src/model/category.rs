//! Catalog category record.

use crate::record::{FieldKind, Record, RowScanner, UpdateSchema};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// A node of the catalog tree; `parent_id` points at another category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: i64,
    pub parent_id: i64,
    pub title: String,
    /// Display order among siblings.
    pub position: i64,
    pub image_url: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "parent_id",
        "title",
        "position",
        "image_url",
        "description",
        "created_at",
        "updated_at",
    ];
    const WRITABLE_COLUMNS: &'static [&'static str] =
        &["parent_id", "title", "position", "image_url", "description"];
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "title", "position", "created_at", "updated_at"];
    const FILTERABLE_COLUMNS: &'static [&'static str] = &["parent_id"];
    const UPDATE_SCHEMA: UpdateSchema = UpdateSchema::new(&[
        ("parent_id", FieldKind::Integer),
        ("title", FieldKind::Text),
        ("position", FieldKind::Integer),
        ("image_url", FieldKind::Text),
        ("description", FieldKind::Text),
    ]);

    fn id(&self) -> i64 {
        self.id
    }

    fn validate_insert(&self) -> bool {
        self.parent_id > 0
            && !self.title.is_empty()
            && !self.image_url.is_empty()
            && !self.description.is_empty()
    }

    fn writable_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.parent_id),
            Value::Text(self.title.clone()),
            Value::Integer(self.position),
            Value::Text(self.image_url.clone()),
            Value::Text(self.description.clone()),
        ]
    }

    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()> {
        self.id = row.next()?;
        self.parent_id = row.next()?;
        self.title = row.next()?;
        self.position = row.next()?;
        self.image_url = row.next()?;
        self.description = row.next()?;
        self.created_at = row.next()?;
        self.updated_at = row.next()?;
        Ok(())
    }
}
