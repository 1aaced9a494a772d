//! Per-entity use-case service.
//!
//! # Responsibility
//! - Give callers one typed entry point per record type.
//! - Own failure logging, which the repository layer never does.
//!
//! # Invariants
//! - Listing treats `NoRows` as an empty page; every other error passes through.
//! - Partial updates always use the record's own `UPDATE_SCHEMA`.

use crate::query::ListOptions;
use crate::record::{AttributeMap, Record};
use crate::repo::{RepoError, RepoResult, Repository};
use log::debug;
use rusqlite::types::Value;
use std::marker::PhantomData;

/// Use-case wrapper binding one record type to a repository implementation.
pub struct RecordService<R: Record, S: Repository> {
    repo: S,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: Repository> RecordService<R, S> {
    pub fn new(repo: S) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    pub fn repository(&self) -> &S {
        &self.repo
    }

    pub fn get(&self, id: i64) -> RepoResult<R> {
        self.repo
            .get_by_id::<R>(id)
            .inspect_err(|err| log_failure::<R>("record_get", err))
    }

    /// Lists one page described by a raw query string.
    pub fn list(&self, raw_query: &str) -> RepoResult<Vec<R>> {
        self.list_with(&ListOptions::parse::<R>(raw_query))
    }

    /// Lists records whose `column` equals `value`, e.g. products of a category.
    ///
    /// The programmatic filter replaces any `where` in `raw_query`.
    pub fn list_where(
        &self,
        column: &'static str,
        value: impl Into<Value>,
        raw_query: &str,
    ) -> RepoResult<Vec<R>> {
        let options = ListOptions::parse::<R>(raw_query).where_eq(column, value);
        self.list_with(&options)
    }

    pub fn list_with(&self, options: &ListOptions) -> RepoResult<Vec<R>> {
        match self.repo.list::<R>(options) {
            Ok(records) => Ok(records),
            Err(RepoError::NoRows) => Ok(Vec::new()),
            Err(err) => {
                debug!(
                    "event=record_list module=service status=error table={} limit={} offset={} filter={:?} error={}",
                    options.table.unwrap_or(R::TABLE),
                    options.limit,
                    options.offset,
                    options.filter.as_ref().map(|filter| filter.column),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn create(&self, record: &R) -> RepoResult<i64> {
        self.repo
            .insert(record)
            .inspect_err(|err| log_failure::<R>("record_create", err))
    }

    pub fn create_many(&self, records: &[R]) -> RepoResult<usize> {
        self.repo
            .batch_insert(records)
            .inspect_err(|err| log_failure::<R>("record_create_many", err))
    }

    pub fn update(&self, record: &R) -> RepoResult<usize> {
        self.repo
            .update(record)
            .inspect_err(|err| log_failure::<R>("record_update", err))
    }

    pub fn patch(&self, id: i64, attrs: &AttributeMap) -> RepoResult<usize> {
        self.repo
            .partial_update::<R>(id, &R::UPDATE_SCHEMA, attrs)
            .inspect_err(|err| log_failure::<R>("record_patch", err))
    }

    pub fn delete(&self, id: i64) -> RepoResult<usize> {
        self.repo
            .delete_by_id::<R>(id)
            .inspect_err(|err| log_failure::<R>("record_delete", err))
    }

    pub fn count(&self) -> RepoResult<i64> {
        self.repo
            .count::<R>()
            .inspect_err(|err| log_failure::<R>("record_count", err))
    }
}

fn log_failure<R: Record>(event: &str, err: &RepoError) {
    let status = match err {
        RepoError::NoRows => "not_found",
        RepoError::Unprocessable(_) => "rejected",
        RepoError::Db(_) | RepoError::InvalidData(_) => "error",
    };
    debug!(
        "event={event} module=service status={status} table={} error={err}",
        R::TABLE
    );
}
