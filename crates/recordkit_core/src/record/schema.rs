//! Per-entity partial-update whitelist.
//!
//! # Invariants
//! - Validation is all-or-nothing: one bad attribute rejects the whole map.
//! - Accepted assignments come out in schema declaration order.

use crate::record::validation::ValidationError;
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};

/// Untyped attribute map, typically decoded from a request body.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// Semantic type expected for one updatable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Bool,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
        };
        f.write_str(name)
    }
}

impl FieldKind {
    /// Converts a JSON value into a bind value when it matches this kind.
    ///
    /// Integers accept whole floats (`3.0`); floats accept any number; `null`
    /// never matches.
    pub fn coerce(self, value: &serde_json::Value) -> Option<Value> {
        match (self, value) {
            (Self::Text, serde_json::Value::String(text)) => Some(Value::Text(text.clone())),
            (Self::Integer, serde_json::Value::Number(number)) => match number.as_i64() {
                Some(int) => Some(Value::Integer(int)),
                None => number
                    .as_f64()
                    .filter(|float| {
                        float.fract() == 0.0
                            && *float >= i64::MIN as f64
                            && *float < i64::MAX as f64
                    })
                    .map(|float| Value::Integer(float as i64)),
            },
            (Self::Float, serde_json::Value::Number(number)) => number.as_f64().map(Value::Real),
            (Self::Bool, serde_json::Value::Bool(flag)) => Some(Value::Integer(i64::from(*flag))),
            _ => None,
        }
    }
}

/// Closed mapping from updatable field name to expected kind.
#[derive(Debug, Clone, Copy)]
pub struct UpdateSchema {
    fields: &'static [(&'static str, FieldKind)],
}

impl UpdateSchema {
    pub const fn new(fields: &'static [(&'static str, FieldKind)]) -> Self {
        Self { fields }
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
    }

    pub fn fields(&self) -> &'static [(&'static str, FieldKind)] {
        self.fields
    }

    /// Checks every attribute and returns column assignments.
    ///
    /// An empty map yields an empty assignment list.
    pub fn validate(
        &self,
        attrs: &AttributeMap,
    ) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        for (name, value) in attrs {
            let kind = self
                .kind_of(name)
                .ok_or_else(|| ValidationError::UnknownAttribute(name.clone()))?;
            if kind.coerce(value).is_none() {
                return Err(ValidationError::AttributeTypeMismatch {
                    attribute: name.clone(),
                    expected: kind,
                });
            }
        }

        Ok(self
            .fields
            .iter()
            .filter_map(|(field, kind)| {
                attrs
                    .get(*field)
                    .and_then(|value| kind.coerce(value))
                    .map(|value| (*field, value))
            })
            .collect())
    }
}
