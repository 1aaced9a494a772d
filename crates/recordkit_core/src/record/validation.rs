//! Input contract violations detected before any statement reaches the store.

use crate::record::schema::FieldKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an input was rejected as unprocessable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `validate_insert()` returned false.
    MissingRequiredFields { table: &'static str },
    /// Full update of a record without a persisted id.
    MissingIdentity { table: &'static str },
    /// Partial-update key not present in the update schema.
    UnknownAttribute(String),
    /// Partial-update value does not match the schema's declared kind.
    AttributeTypeMismatch {
        attribute: String,
        expected: FieldKind,
    },
    /// A listing identifier is not one of the record's declared columns.
    InvalidIdentifier(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredFields { table } => {
                write!(f, "{table}: required fields are missing")
            }
            Self::MissingIdentity { table } => write!(f, "{table}: record has no identity"),
            Self::UnknownAttribute(name) => write!(f, "attribute `{name}` is not updatable"),
            Self::AttributeTypeMismatch {
                attribute,
                expected,
            } => write!(f, "attribute `{attribute}` expects a {expected} value"),
            Self::InvalidIdentifier(name) => write!(f, "identifier `{name}` is not allowed"),
        }
    }
}

impl Error for ValidationError {}
