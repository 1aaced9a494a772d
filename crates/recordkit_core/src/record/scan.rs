//! Row binder: materializes records from positional column values.
//!
//! # Invariants
//! - A record must consume exactly the columns the row carries.
//! - An empty row set is reported as `NoRows`, never as an empty collection.

use crate::record::Record;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::{FromSql, Value, ValueRef};
use serde::de::DeserializeOwned;

/// Sequential cursor over one row's column values.
pub struct RowScanner<'row> {
    table: &'static str,
    values: &'row [Value],
    position: usize,
}

impl<'row> RowScanner<'row> {
    pub fn new(table: &'static str, values: &'row [Value]) -> Self {
        Self {
            table,
            values,
            position: 0,
        }
    }

    /// Reads the next column as `T`.
    pub fn next<T: FromSql>(&mut self) -> RepoResult<T> {
        let index = self.position;
        let value = self.values.get(index).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "{}: row has {} columns, record reads column {index}",
                self.table,
                self.values.len()
            ))
        })?;
        self.position += 1;

        T::column_result(ValueRef::from(value)).map_err(|err| {
            RepoError::InvalidData(format!("{}: column {index}: {err}", self.table))
        })
    }

    /// Reads the next column as JSON-encoded text.
    pub fn next_json<T: DeserializeOwned>(&mut self) -> RepoResult<T> {
        let index = self.position;
        let text: String = self.next()?;
        serde_json::from_str(&text).map_err(|err| {
            RepoError::InvalidData(format!("{}: column {index}: {err}", self.table))
        })
    }

    /// Fails when columns were left unread.
    pub fn finish(&self) -> RepoResult<()> {
        if self.position != self.values.len() {
            return Err(RepoError::InvalidData(format!(
                "{}: row has {} columns, record read {}",
                self.table,
                self.values.len(),
                self.position
            )));
        }
        Ok(())
    }
}

/// Binds one row into a fresh record.
pub fn bind_one<R: Record>(values: &[Value]) -> RepoResult<R> {
    let mut record = R::default();
    let mut scanner = RowScanner::new(R::TABLE, values);
    record.scan(&mut scanner)?;
    scanner.finish()?;
    Ok(record)
}

/// Binds every row, preserving order; zero rows is `NoRows`.
pub fn bind_all<R: Record>(rows: impl IntoIterator<Item = Vec<Value>>) -> RepoResult<Vec<R>> {
    let records = rows
        .into_iter()
        .map(|row| bind_one::<R>(&row))
        .collect::<RepoResult<Vec<R>>>()?;

    if records.is_empty() {
        return Err(RepoError::NoRows);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{bind_all, bind_one, RowScanner};
    use crate::model::User;
    use crate::repo::RepoError;
    use rusqlite::types::Value;

    fn user_row(id: i64, username: &str) -> Vec<Value> {
        vec![
            Value::Integer(id),
            Value::Text("Ada".to_string()),
            Value::Text(username.to_string()),
            Value::Integer(1_000),
            Value::Integer(2_000),
        ]
    }

    #[test]
    fn bind_one_reads_columns_in_declared_order() {
        let user: User = bind_one(&user_row(4, "ada")).unwrap();
        assert_eq!(user.id, 4);
        assert_eq!(user.firstname, "Ada");
        assert_eq!(user.username, "ada");
        assert_eq!(user.updated_at, 2_000);
    }

    #[test]
    fn bind_one_rejects_short_and_long_rows() {
        let mut short = user_row(1, "a");
        short.pop();
        assert!(matches!(
            bind_one::<User>(&short),
            Err(RepoError::InvalidData(_))
        ));

        let mut long = user_row(1, "a");
        long.push(Value::Null);
        let err = bind_one::<User>(&long).unwrap_err();
        assert!(err.to_string().contains("record read 5"));
    }

    #[test]
    fn bind_one_reports_type_mismatch_with_column_index() {
        let mut row = user_row(1, "a");
        row[0] = Value::Text("not a number".to_string());
        let err = bind_one::<User>(&row).unwrap_err();
        assert!(err.to_string().contains("column 0"));
    }

    #[test]
    fn bind_all_collapses_empty_set_into_no_rows() {
        let err = bind_all::<User>(Vec::new()).unwrap_err();
        assert!(err.is_no_rows());

        let users = bind_all::<User>(vec![user_row(1, "a"), user_row(2, "b")]).unwrap();
        assert_eq!(
            users.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn next_json_decodes_text_columns() {
        let values = vec![Value::Text(r#"["a.png","b.png"]"#.to_string())];
        let mut scanner = RowScanner::new("stations", &values);
        let urls: Vec<String> = scanner.next_json().unwrap();
        assert_eq!(urls, vec!["a.png", "b.png"]);
        scanner.finish().unwrap();
    }
}
