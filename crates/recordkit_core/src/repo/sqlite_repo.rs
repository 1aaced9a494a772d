//! SQLite-backed generic repository.
//!
//! # Responsibility
//! - Execute builder statements against one shared connection.
//! - Map raw rows into records through the binder.
//!
//! # Invariants
//! - One round-trip per logical operation; batch insert is one statement.
//! - The connection lock is held for exactly one operation.

use crate::db::DbError;
use crate::query::ListOptions;
use crate::record::{
    bind_all, bind_one, ensure_insertable, ensure_updatable, AttributeMap, Record, UpdateSchema,
};
use crate::repo::sql::{self, Statement};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::{Mutex, MutexGuard};

/// Generic repository over a migrated SQLite connection.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Locks the shared connection for direct use.
    pub fn connection(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }

    pub fn into_inner(self) -> RepoResult<Connection> {
        self.conn
            .into_inner()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }

    fn query_rows(&self, statement: &Statement) -> RepoResult<Vec<Vec<Value>>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;

        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..column_count)
                .map(|index| row.get::<_, Value>(index))
                .collect::<rusqlite::Result<Vec<Value>>>()?;
            collected.push(values);
        }
        Ok(collected)
    }

    fn execute(&self, statement: &Statement) -> RepoResult<usize> {
        let conn = self.connection()?;
        let affected = conn.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        Ok(affected)
    }
}

impl Repository for SqliteRepository {
    fn get_by_id<R: Record>(&self, id: i64) -> RepoResult<R> {
        let rows = self.query_rows(&sql::select_by_id::<R>(id))?;
        match rows.first() {
            Some(row) => bind_one(row),
            None => Err(RepoError::NoRows),
        }
    }

    fn list<R: Record>(&self, options: &ListOptions) -> RepoResult<Vec<R>> {
        let plan = options.resolve::<R>()?;
        let rows = self.query_rows(&sql::select_list::<R>(&plan))?;
        bind_all(rows)
    }

    fn insert<R: Record>(&self, record: &R) -> RepoResult<i64> {
        ensure_insertable(record)?;

        let statement = sql::insert(record);
        let conn = self.connection()?;
        conn.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn batch_insert<R: Record>(&self, records: &[R]) -> RepoResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        for record in records {
            ensure_insertable(record)?;
        }

        self.execute(&sql::batch_insert(records))
    }

    fn update<R: Record>(&self, record: &R) -> RepoResult<usize> {
        ensure_updatable(record)?;
        self.execute(&sql::update(record))
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

        self.execute(&sql::partial_update::<R>(id, assignments))
    }

    fn count<R: Record>(&self) -> RepoResult<i64> {
        let statement = sql::count::<R>();
        let conn = self.connection()?;
        let total = conn.query_row(&statement.sql, [], |row| row.get::<_, i64>(0))?;
        Ok(total)
    }

    fn delete_by_id<R: Record>(&self, id: i64) -> RepoResult<usize> {
        self.execute(&sql::delete_by_id::<R>(id))
    }
}
