//! SQL statement builders for the generic executor.
//!
//! # Invariants
//! - Only record constants and resolved `ListPlan` identifiers are
//!   interpolated into SQL text; every value is a positional bind parameter.
//! - Builders are pure; they never touch a connection.

use crate::query::ListPlan;
use crate::record::Record;
use rusqlite::types::Value;

const NOW_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

/// SQL text plus its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

pub fn select_by_id<R: Record>(id: i64) -> Statement {
    Statement::new(
        format!(
            "SELECT {} FROM {} WHERE {} = ?;",
            R::COLUMNS.join(", "),
            R::TABLE,
            R::PRIMARY_KEY
        ),
        vec![Value::Integer(id)],
    )
}

/// Builds a page query; the primary key breaks ordering ties.
pub fn select_list<R: Record>(plan: &ListPlan) -> Statement {
    let mut sql = format!("SELECT {} FROM {}", R::COLUMNS.join(", "), plan.table);
    let mut params = Vec::with_capacity(3);

    if let Some(filter) = &plan.filter {
        sql.push_str(&format!(" WHERE {} = ?", filter.column));
        params.push(filter.value.clone());
    }

    sql.push_str(&format!(
        " ORDER BY {} {}",
        plan.order_by,
        plan.direction.as_sql()
    ));
    if plan.order_by != R::PRIMARY_KEY {
        sql.push_str(&format!(", {} ASC", R::PRIMARY_KEY));
    }

    sql.push_str(" LIMIT ? OFFSET ?;");
    params.push(Value::Integer(i64::from(plan.limit)));
    params.push(Value::Integer(i64::from(plan.offset)));

    Statement::new(sql, params)
}

pub fn insert<R: Record>(record: &R) -> Statement {
    Statement::new(
        format!(
            "INSERT INTO {} ({}) VALUES {};",
            R::TABLE,
            R::WRITABLE_COLUMNS.join(", "),
            placeholder_tuple(R::WRITABLE_COLUMNS.len())
        ),
        record.writable_values(),
    )
}

/// One multi-row insert; callers must not pass an empty slice.
pub fn batch_insert<R: Record>(records: &[R]) -> Statement {
    let tuple = placeholder_tuple(R::WRITABLE_COLUMNS.len());
    let tuples = vec![tuple.as_str(); records.len()].join(", ");
    let params = records
        .iter()
        .flat_map(|record| record.writable_values())
        .collect();

    Statement::new(
        format!(
            "INSERT INTO {} ({}) VALUES {};",
            R::TABLE,
            R::WRITABLE_COLUMNS.join(", "),
            tuples
        ),
        params,
    )
}

pub fn update<R: Record>(record: &R) -> Statement {
    let assignments: Vec<(&str, Value)> = R::WRITABLE_COLUMNS
        .iter()
        .copied()
        .zip(record.writable_values())
        .collect();
    update_columns::<R>(record.id(), assignments)
}

/// Builds `UPDATE ... SET` for already-validated assignments.
pub fn partial_update<R: Record>(id: i64, assignments: Vec<(&'static str, Value)>) -> Statement {
    update_columns::<R>(id, assignments)
}

pub fn count<R: Record>() -> Statement {
    Statement::new(format!("SELECT COUNT(*) FROM {};", R::TABLE), Vec::new())
}

pub fn delete_by_id<R: Record>(id: i64) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE {} = ?;", R::TABLE, R::PRIMARY_KEY),
        vec![Value::Integer(id)],
    )
}

fn update_columns<R: Record>(id: i64, assignments: Vec<(&str, Value)>) -> Statement {
    let mut set_clauses: Vec<String> = Vec::with_capacity(assignments.len() + 1);
    let mut params: Vec<Value> = Vec::with_capacity(assignments.len() + 1);
    for (column, value) in assignments {
        set_clauses.push(format!("{column} = ?"));
        params.push(value);
    }
    if let Some(updated_at) = R::UPDATED_AT {
        set_clauses.push(format!("{updated_at} = {NOW_MS_SQL}"));
    }
    params.push(Value::Integer(id));

    Statement::new(
        format!(
            "UPDATE {} SET {} WHERE {} = ?;",
            R::TABLE,
            set_clauses.join(", "),
            R::PRIMARY_KEY
        ),
        params,
    )
}

fn placeholder_tuple(width: usize) -> String {
    format!("({})", vec!["?"; width].join(", "))
}
