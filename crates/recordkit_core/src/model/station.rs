//! Transit station record.

use crate::model::json_list;
use crate::record::{FieldKind, Record, RowScanner, UpdateSchema};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    pub id: i64,
    pub name_en: String,
    pub name_ar: String,
    /// Stored as a JSON array in a text column.
    pub images_urls: Vec<String>,
    pub address_en: String,
    pub address_ar: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record for Station {
    const TABLE: &'static str = "stations";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name_en",
        "name_ar",
        "images_urls",
        "address_en",
        "address_ar",
        "latitude",
        "longitude",
        "created_at",
        "updated_at",
    ];
    const WRITABLE_COLUMNS: &'static [&'static str] = &[
        "name_en",
        "name_ar",
        "images_urls",
        "address_en",
        "address_ar",
        "latitude",
        "longitude",
    ];
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "name_en", "name_ar", "created_at", "updated_at"];
    const FILTERABLE_COLUMNS: &'static [&'static str] = &["name_en", "name_ar"];
    const UPDATE_SCHEMA: UpdateSchema = UpdateSchema::new(&[
        ("name_en", FieldKind::Text),
        ("name_ar", FieldKind::Text),
        ("address_en", FieldKind::Text),
        ("address_ar", FieldKind::Text),
        ("latitude", FieldKind::Float),
        ("longitude", FieldKind::Float),
    ]);

    fn id(&self) -> i64 {
        self.id
    }

    fn validate_insert(&self) -> bool {
        !self.name_en.is_empty()
            && !self.name_ar.is_empty()
            && !self.images_urls.is_empty()
            && !self.address_en.is_empty()
            && !self.address_ar.is_empty()
            && self.latitude > 0.0
            && self.longitude > 0.0
    }

    fn writable_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name_en.clone()),
            Value::Text(self.name_ar.clone()),
            json_list(&self.images_urls),
            Value::Text(self.address_en.clone()),
            Value::Text(self.address_ar.clone()),
            Value::Real(self.latitude),
            Value::Real(self.longitude),
        ]
    }

    fn scan(&mut self, row: &mut RowScanner<'_>) -> RepoResult<()> {
        self.id = row.next()?;
        self.name_en = row.next()?;
        self.name_ar = row.next()?;
        self.images_urls = row.next_json()?;
        self.address_en = row.next()?;
        self.address_ar = row.next()?;
        self.latitude = row.next()?;
        self.longitude = row.next()?;
        self.created_at = row.next()?;
        self.updated_at = row.next()?;
        Ok(())
    }
}
