//! Catalog product record.

use crate::record::{FieldKind, Record, RowScanner, UpdateSchema};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "category_id",
        "title",
        "image_url",
        "price",
        "description",
        "created_at",
        "updated_at",
    ];
    const WRITABLE_COLUMNS: &'static [&'static str] =
        &["category_id", "title", "image_url", "price", "description"];
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "title", "price", "created_at", "updated_at"];
    const FILTERABLE_COLUMNS: &'static [&'static str] = &["category_id"];
    const UPDATE_SCHEMA: UpdateSchema = UpdateSchema::new(&[
        ("category_id", FieldKind::Integer),
        ("title", FieldKind::Text),
        ("image_url", FieldKind::Text),
        ("price", FieldKind::Float),
        ("description", FieldKind::Text),
    ]);

    fn id(&self) -> i64 {
        self.id
    }

    fn validate_insert(&self) -> bool {
        self.category_id > 0
            && !self.title.is_empty()
            && !self.image_url.is_empty()
            && self.price > 0.0
            && !self.description.is_empty()
    }

    fn writable_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.category_id),
            Value::Text(self.title.clone()),
            Value::Text(self.image_url.clone()),
            Value::Real(self.price),
            Value::Text(self.description.clone()),
        ]
    }

    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()> {
        self.id = row.next()?;
        self.category_id = row.next()?;
        self.title = row.next()?;
        self.image_url = row.next()?;
        self.price = row.next()?;
        self.description = row.next()?;
        self.created_at = row.next()?;
        self.updated_at = row.next()?;
        Ok(())
    }
}
