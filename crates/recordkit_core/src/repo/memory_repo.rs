//! In-memory generic repository for tests and demos.
//!
//! # Responsibility
//! - Mirror the SQLite executor's observable semantics without a database.
//!
//! # Invariants
//! - One `RwLock` guards all tables: reads share it, writes take it exclusively,
//!   and it is released before rows are bound into records.
//! - Rows are stored in the record's `COLUMNS` order.
//! - Ids are assigned sequentially per table starting at 1 and never reused.

use crate::db::DbError;
use crate::query::{ListOptions, OrderDirection};
use crate::record::{
    bind_all, bind_one, column_index, ensure_insertable, ensure_updatable, AttributeMap, Record,
    UpdateSchema,
};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::types::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

type Row = Vec<Value>;

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: BTreeMap<i64, Row>,
}

/// Map-backed repository selected in place of `SqliteRepository` by injection.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<BTreeMap<&'static str, MemoryTable>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<&'static str, MemoryTable>>> {
        self.tables
            .read()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<&'static str, MemoryTable>>> {
        self.tables
            .write()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }
}

impl Repository for MemoryRepository {
    fn get_by_id<R: Record>(&self, id: i64) -> RepoResult<R> {
        let row = {
            let tables = self.read()?;
            tables
                .get(R::TABLE)
                .and_then(|table| table.rows.get(&id))
                .cloned()
        };
        match row {
            Some(row) => bind_one(&row),
            None => Err(RepoError::NoRows),
        }
    }

    fn list<R: Record>(&self, options: &ListOptions) -> RepoResult<Vec<R>> {
        let plan = options.resolve::<R>()?;
        let order_index = column_index::<R>(plan.order_by).unwrap_or(0);
        let filter = plan
            .filter
            .as_ref()
            .and_then(|filter| column_index::<R>(filter.column).map(|index| (index, &filter.value)));

        let mut rows: Vec<Row> = {
            let tables = self.read()?;
            let Some(table) = tables.get(plan.table) else {
                return Err(RepoError::NoRows);
            };
            // Every row must carry exactly `R::COLUMNS` before it is indexed.
            if table.rows.values().any(|row| row.len() != R::COLUMNS.len()) {
                return Err(RepoError::InvalidData(format!(
                    "{}: rows do not carry the {} columns of {}",
                    plan.table,
                    R::COLUMNS.len(),
                    R::TABLE
                )));
            }
            table
                .rows
                .values()
                .filter(|row| match filter {
                    Some((index, wanted)) => values_equal(&row[index], wanted),
                    None => true,
                })
                .cloned()
                .collect()
        };

        rows.sort_by(|left, right| {
            let primary = compare_values(&left[order_index], &right[order_index]);
            let primary = match plan.direction {
                OrderDirection::Asc => primary,
                OrderDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| compare_values(&left[0], &right[0]))
        });

        bind_all(
            rows.into_iter()
                .skip(plan.offset as usize)
                .take(plan.limit as usize),
        )
    }

    fn insert<R: Record>(&self, record: &R) -> RepoResult<i64> {
        ensure_insertable(record)?;

        let mut tables = self.write()?;
        let table = tables.entry(R::TABLE).or_default();
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, build_row(id, record, now_ms()));
        Ok(id)
    }

    fn batch_insert<R: Record>(&self, records: &[R]) -> RepoResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        for record in records {
            ensure_insertable(record)?;
        }

        let now = now_ms();
        let mut tables = self.write()?;
        let table = tables.entry(R::TABLE).or_default();
        for record in records {
            table.last_id += 1;
            let id = table.last_id;
            table.rows.insert(id, build_row(id, record, now));
        }
        Ok(records.len())
    }

    fn update<R: Record>(&self, record: &R) -> RepoResult<usize> {
        ensure_updatable(record)?;

        let assignments = R::WRITABLE_COLUMNS
            .iter()
            .copied()
            .zip(record.writable_values())
            .collect();
        let mut tables = self.write()?;
        Ok(apply_assignments::<R>(&mut tables, record.id(), assignments))
    }

    fn partial_update<R: Record>(
        &self,
        id: i64,
        schema: &UpdateSchema,
        attrs: &AttributeMap,
    ) -> RepoResult<usize> {
        let assignments = schema.validate(attrs)?;
        if assignments.is_empty() {
            return Ok(0);
        }
        for (column, _) in &assignments {
            if column_index::<R>(column).is_none() {
                return Err(RepoError::InvalidData(format!(
                    "{}: update schema names undeclared column `{column}`",
                    R::TABLE
                )));
            }
        }

        let mut tables = self.write()?;
        Ok(apply_assignments::<R>(&mut tables, id, assignments))
    }

    fn count<R: Record>(&self) -> RepoResult<i64> {
        let tables = self.read()?;
        let total = tables.get(R::TABLE).map_or(0, |table| table.rows.len());
        Ok(total as i64)
    }

    fn delete_by_id<R: Record>(&self, id: i64) -> RepoResult<usize> {
        let mut tables = self.write()?;
        let removed = tables
            .get_mut(R::TABLE)
            .and_then(|table| table.rows.remove(&id));
        Ok(usize::from(removed.is_some()))
    }
}

fn build_row<R: Record>(id: i64, record: &R, now: i64) -> Row {
    let writable = record.writable_values();
    R::COLUMNS
        .iter()
        .map(|column| {
            if *column == R::PRIMARY_KEY {
                return Value::Integer(id);
            }
            if let Some(index) = R::WRITABLE_COLUMNS.iter().position(|c| c == column) {
                return writable[index].clone();
            }
            if Some(*column) == R::CREATED_AT || Some(*column) == R::UPDATED_AT {
                return Value::Integer(now);
            }
            Value::Null
        })
        .collect()
}

fn apply_assignments<R: Record>(
    tables: &mut BTreeMap<&'static str, MemoryTable>,
    id: i64,
    assignments: Vec<(&str, Value)>,
) -> usize {
    let Some(row) = tables
        .get_mut(R::TABLE)
        .and_then(|table| table.rows.get_mut(&id))
    else {
        return 0;
    };

    for (column, value) in assignments {
        if let Some(index) = column_index::<R>(column) {
            row[index] = value;
        }
    }
    if let Some(index) = R::UPDATED_AT.and_then(column_index::<R>) {
        row[index] = Value::Integer(now_ms());
    }
    1
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(int) => Some(*int as f64),
        Value::Real(float) => Some(*float),
        _ => None,
    }
}

// Text compared against a numeric column is converted first, as SQLite does.
fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Integer(_) | Value::Real(_), Value::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .zip(numeric(stored))
            .is_some_and(|(parsed, number)| parsed == number),
        (Value::Text(text), Value::Integer(_) | Value::Real(_)) => {
            values_equal(wanted, &Value::Text(text.clone()))
        }
        (Value::Integer(left), Value::Integer(right)) => left == right,
        _ => match (numeric(stored), numeric(wanted)) {
            (Some(left), Some(right)) => left == right,
            _ => stored == wanted,
        },
    }
}

// SQLite storage-class order: NULL < numbers < TEXT < BLOB.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    fn class(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Integer(_) | Value::Real(_) => 1,
            Value::Text(_) => 2,
            Value::Blob(_) => 3,
        }
    }

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Blob(a), Value::Blob(b)) => a.cmp(b),
        _ => match (numeric(left), numeric(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => class(left).cmp(&class(right)),
        },
    }
}
