//! Bounded list descriptor and its query-string parser.
//!
//! # Responsibility
//! - Turn untrusted `limit/offset/by/order/where` parameters into safe options.
//! - Resolve options against a record's declared columns before execution.
//!
//! # Invariants
//! - Parsing never fails; invalid input falls back to defaults.
//! - Identifiers kept in options are `&'static str` taken from allow-lists,
//!   never the caller's text; only filter values become bind parameters.
//! - `limit` is always within `1..=MAX_LIST_LIMIT`.

use crate::record::{column_index, Record, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 100;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Sort direction; most-recent-first by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Single equality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

/// One bounded read: table, page window, ordering and optional filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    /// Overrides the record's table, e.g. for a sub-resource listing.
    pub table: Option<&'static str>,
    pub limit: u32,
    pub offset: u32,
    /// `None` orders by the record's `SORT_BY`.
    pub order_by: Option<&'static str>,
    pub direction: OrderDirection,
    pub filter: Option<Filter>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            table: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
            order_by: None,
            direction: OrderDirection::default(),
            filter: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string such as `limit=30&by=price&order=asc`.
    pub fn parse<R: Record>(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('?');
        Self::from_pairs::<R, _, _, _>(url::form_urlencoded::parse(raw.as_bytes()))
    }

    /// Builds options from already-split key/value pairs.
    ///
    /// Later duplicates win. Unknown keys are ignored.
    pub fn from_pairs<R, I, K, V>(pairs: I) -> Self
    where
        R: Record,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::new();
        options.order_by = Some(R::SORT_BY);

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "limit" => options.limit = parse_limit(value),
                "offset" => options.offset = value.trim().parse().unwrap_or(0),
                "by" => {
                    options.order_by =
                        Some(allowed_column(R::SORTABLE_COLUMNS, value).unwrap_or(R::SORT_BY));
                }
                "order" => {
                    options.direction = OrderDirection::parse(value).unwrap_or_default();
                }
                "where" => options.filter = parse_filter(R::FILTERABLE_COLUMNS, value),
                _ => {}
            }
        }

        options
    }

    pub fn with_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the page size, clamped to `1..=MAX_LIST_LIMIT` (`0` means default).
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = clamp_limit(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: OrderDirection) -> Self {
        self.order_by = Some(column);
        self.direction = direction;
        self
    }

    /// Attaches a trusted equality filter, replacing any parsed one.
    pub fn where_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter {
            column,
            value: value.into(),
        });
        self
    }

    /// Resolves defaults and checks every identifier against `R`.
    pub fn resolve<R: Record>(&self) -> Result<ListPlan, ValidationError> {
        let table = self.table.unwrap_or(R::TABLE);
        ensure_identifier(table)?;

        let order_by = self.order_by.unwrap_or(R::SORT_BY);
        ensure_declared_column::<R>(order_by)?;
        if let Some(filter) = &self.filter {
            ensure_declared_column::<R>(filter.column)?;
        }

        Ok(ListPlan {
            table,
            order_by,
            direction: self.direction,
            filter: self.filter.clone(),
            limit: clamp_limit(self.limit),
            offset: self.offset,
        })
    }
}

/// Options with every default applied and every identifier checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan {
    pub table: &'static str,
    pub order_by: &'static str,
    pub direction: OrderDirection,
    pub filter: Option<Filter>,
    pub limit: u32,
    pub offset: u32,
}

fn parse_limit(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .map(clamp_limit)
        .unwrap_or(DEFAULT_LIST_LIMIT)
}

fn clamp_limit(limit: u32) -> u32 {
    match limit {
        0 => DEFAULT_LIST_LIMIT,
        value => value.min(MAX_LIST_LIMIT),
    }
}

fn allowed_column(allowed: &'static [&'static str], raw: &str) -> Option<&'static str> {
    let wanted = raw.trim();
    allowed.iter().copied().find(|column| *column == wanted)
}

// `where=column:value` or `where=column=value`; unknown columns drop the filter.
fn parse_filter(allowed: &'static [&'static str], raw: &str) -> Option<Filter> {
    let (column, value) = raw.split_once(|c: char| c == ':' || c == '=')?;
    let column = allowed_column(allowed, column)?;
    Some(Filter {
        column,
        value: Value::Text(value.trim().to_string()),
    })
}

fn ensure_identifier(name: &str) -> Result<(), ValidationError> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier(name.to_string()))
    }
}

fn ensure_declared_column<R: Record>(column: &str) -> Result<(), ValidationError> {
    ensure_identifier(column)?;
    if column_index::<R>(column).is_none() {
        return Err(ValidationError::InvalidIdentifier(column.to_string()));
    }
    Ok(())
}
