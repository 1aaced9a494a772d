//! Travel destination record.

use crate::model::json_list;
use crate::record::{FieldKind, Record, RowScanner, UpdateSchema};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// A place listed under a category, with bilingual copy and coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    pub id: i64,
    pub category_id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub images_urls: Vec<String>,
    pub description_en: String,
    pub description_ar: String,
    pub address_en: String,
    pub address_ar: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for Destination {
    const TABLE: &'static str = "destinations";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "category_id",
        "name_en",
        "name_ar",
        "images_urls",
        "description_en",
        "description_ar",
        "address_en",
        "address_ar",
        "latitude",
        "longitude",
        "created_at",
        "updated_at",
    ];
    const WRITABLE_COLUMNS: &'static [&'static str] = &[
        "category_id",
        "name_en",
        "name_ar",
        "images_urls",
        "description_en",
        "description_ar",
        "address_en",
        "address_ar",
        "latitude",
        "longitude",
    ];
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "name_en", "name_ar", "created_at", "updated_at"];
    const FILTERABLE_COLUMNS: &'static [&'static str] = &["category_id"];
    const UPDATE_SCHEMA: UpdateSchema = UpdateSchema::new(&[
        ("category_id", FieldKind::Integer),
        ("name_en", FieldKind::Text),
        ("name_ar", FieldKind::Text),
        ("description_en", FieldKind::Text),
        ("description_ar", FieldKind::Text),
        ("address_en", FieldKind::Text),
        ("address_ar", FieldKind::Text),
        ("latitude", FieldKind::Float),
        ("longitude", FieldKind::Float),
    ]);

    fn id(&self) -> i64 {
        self.id
    }

    fn validate_insert(&self) -> bool {
        self.category_id > 0
            && !self.name_en.is_empty()
            && !self.name_ar.is_empty()
            && !self.images_urls.is_empty()
            && !self.description_en.is_empty()
            && !self.description_ar.is_empty()
            && !self.address_en.is_empty()
            && !self.address_ar.is_empty()
            && self.latitude > 0.0
            && self.longitude > 0.0
    }

    fn writable_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.category_id),
            Value::Text(self.name_en.clone()),
            Value::Text(self.name_ar.clone()),
            json_list(&self.images_urls),
            Value::Text(self.description_en.clone()),
            Value::Text(self.description_ar.clone()),
            Value::Text(self.address_en.clone()),
            Value::Text(self.address_ar.clone()),
            Value::Real(self.latitude),
            Value::Real(self.longitude),
        ]
    }

    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()> {
        self.id = row.next()?;
        self.category_id = row.next()?;
        self.name_en = row.next()?;
        self.name_ar = row.next()?;
        self.images_urls = row.next_json()?;
        self.description_en = row.next()?;
        self.description_ar = row.next()?;
        self.address_en = row.next()?;
        self.address_ar = row.next()?;
        self.latitude = row.next()?;
        self.longitude = row.next()?;
        self.created_at = row.next()?;
        self.updated_at = row.next()?;
        Ok(())
    }
}
