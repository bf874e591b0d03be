// store.rs
//
// Copyright 2017 Jordan Petridis <jpetridis@gnome.org>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generic keyed-table engine over SQLite.
//!
//! The store knows nothing about podcasts. It creates tables, runs
//! parameterized inserts/updates and serves [`Query`] reads; everything on
//! top of it is somebody else's schema. Values are always bound as
//! parameters, never interpolated into statement text.

use rusqlite::{params_from_iter, Connection, ErrorCode};

use std::path::Path;
use std::time::Duration;

use crate::errors::DataError;
use crate::query::{render_where, Filter, Projection, Query, QueryBuilder, Value};

/// One result row, field values in column order.
pub type Row = Vec<Value>;

/// Handle to an open store. Owns the connection; writes are serialized
/// through it and committed one statement at a time.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Store, DataError> {
        let conn = Connection::open(path)?;
        configure(&conn)?;
        Ok(Store { conn })
    }

    /// An in-memory store, mainly useful for tests and scratch work.
    pub fn open_in_memory() -> Result<Store, DataError> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Store { conn })
    }

    /// Issue a `CREATE TABLE` from the given column definitions.
    ///
    /// Not idempotent: creating a table that already exists is a
    /// [`DataError::Schema`]. Callers that want create-if-absent do their
    /// own existence check first.
    pub fn create_table(&self, name: &str, columns: &[&str]) -> Result<(), DataError> {
        let sql = format!("CREATE TABLE {} ({});", name, columns.join(", "));
        debug!("{}", sql);

        self.conn
            .execute(&sql, [])
            .map(|_| ())
            .map_err(|err| DataError::Schema {
                table: name.to_string(),
                reason: err.to_string(),
            })
    }

    /// Parameterized insert. Column list and placeholders are derived from
    /// the field pairs in the order given; the statement commits
    /// immediately.
    ///
    /// A primary-key or not-null violation maps to
    /// [`DataError::Constraint`], which is what the sync diff leans on for
    /// at-most-once insertion.
    pub fn insert(&self, table: &str, fields: &[(&str, Value)]) -> Result<(), DataError> {
        let columns: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let marks: Vec<&str> = fields.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(","),
            marks.join(",")
        );

        let values = fields.iter().map(|(_, value)| value);
        self.conn
            .execute(&sql, params_from_iter(values))
            .map(|_| ())
            .map_err(|err| constraint_or_sql(table, err))
    }

    /// Parameterized update of every row matching `filters`.
    ///
    /// Returns the number of rows touched. The `SET` values are bound
    /// first, then the filter values, matching placeholder order.
    pub fn update(
        &self,
        table: &str,
        fields: &[(&str, Value)],
        filters: &[Filter],
    ) -> Result<usize, DataError> {
        let assignments: Vec<String> = fields.iter().map(|(name, _)| format!("{name}=?")).collect();
        let (clause, mut bound) = render_where(filters);
        let sql = format!("UPDATE {} SET {}{}", table, assignments.join(","), clause);

        let mut values: Vec<Value> = fields.iter().map(|(_, value)| value.clone()).collect();
        values.append(&mut bound);

        self.conn
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(|err| constraint_or_sql(table, err))
    }

    /// Run a [`Query`] and collect every matching row.
    ///
    /// An empty result is an empty vector, not an error.
    pub fn select_all(&self, query: &Query) -> Result<Vec<Row>, DataError> {
        let (sql, bound) = query.to_sql();
        debug!("{}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(bound.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut fields = Row::with_capacity(columns);
            for i in 0..columns {
                fields.push(row.get(i)?);
            }
            out.push(fields);
        }
        Ok(out)
    }

    /// Like [`Store::select_all`] constrained to the first row.
    ///
    /// Zero matches is an explicit [`DataError::NotFound`]; there is no
    /// "empty row" value to accidentally read garbage out of.
    pub fn select_one(
        &self,
        table: &str,
        projection: Projection,
        filters: Vec<Filter>,
    ) -> Result<Row, DataError> {
        let query = QueryBuilder::default()
            .table(table)
            .projection(projection)
            .filters(filters)
            .limit(1u32)
            .build()
            .map_err(|err| DataError::Builder(err.to_string()))?;

        self.select_all(&query)?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::NotFound {
                table: table.to_string(),
            })
    }

    /// Names of every table in the store's own catalog. Diagnostics only.
    pub fn list_tables(&self) -> Result<Vec<String>, DataError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table';")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

fn configure(conn: &Connection) -> Result<(), DataError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn constraint_or_sql(table: &str, err: rusqlite::Error) -> DataError {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            DataError::Constraint {
                table: table.to_string(),
                reason: msg.unwrap_or_else(|| e.to_string()),
            }
        }
        err => DataError::Sql(err),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use super::*;

    fn people_store() -> Result<Store> {
        let store = Store::open_in_memory()?;
        store.create_table(
            "people",
            &[
                "name TEXT PRIMARY KEY NOT NULL",
                "age INT NOT NULL",
                "email TEXT",
            ],
        )?;
        store.insert(
            "people",
            &[
                ("name", "ferris".to_string().into()),
                ("age", 13.into()),
                ("email", "ferris@example.com".to_string().into()),
            ],
        )?;
        store.insert(
            "people",
            &[
                ("name", "corro".to_string().into()),
                ("age", 7.into()),
                ("email", Value::Null),
            ],
        )?;
        Ok(store)
    }

    #[test]
    fn test_create_existing_table_is_schema_error() -> Result<()> {
        let store = people_store()?;
        let err = store
            .create_table("people", &["name TEXT"])
            .unwrap_err();
        assert!(matches!(err, DataError::Schema { .. }));
        Ok(())
    }

    #[test]
    fn test_duplicate_key_is_rejected_not_duplicated() -> Result<()> {
        let store = people_store()?;

        for _ in 0..3 {
            let err = store
                .insert("people", &[("name", "ferris".to_string().into()), ("age", 14.into())])
                .unwrap_err();
            assert!(err.is_constraint());
        }

        let rows = store.select_all(
            &QueryBuilder::default()
                .table("people")
                .filters(vec![Filter::equal("name", "ferris".to_string())])
                .build()?,
        )?;
        assert_eq!(rows.len(), 1);
        // The original row survived untouched.
        assert_eq!(rows[0][1], Value::Integer(13));
        Ok(())
    }

    #[test]
    fn test_select_all_filters_and_projects() -> Result<()> {
        let store = people_store()?;

        let query = QueryBuilder::default()
            .table("people")
            .projection(Projection::columns(&["name"]))
            .filters(vec![Filter::from_key("age >=", 10)])
            .build()?;

        let rows = store.select_all(&query)?;
        assert_eq!(rows, vec![vec![Value::Text("ferris".to_string())]]);
        Ok(())
    }

    #[test]
    fn test_select_all_null_filter() -> Result<()> {
        let store = people_store()?;

        let query = QueryBuilder::default()
            .table("people")
            .projection(Projection::columns(&["name"]))
            .filters(vec![Filter::is_null("email")])
            .build()?;

        let rows = store.select_all(&query)?;
        assert_eq!(rows, vec![vec![Value::Text("corro".to_string())]]);
        Ok(())
    }

    #[test]
    fn test_select_all_no_matches_is_empty_not_error() -> Result<()> {
        let store = people_store()?;

        let query = QueryBuilder::default()
            .table("people")
            .filters(vec![Filter::from_key("age >", 100)])
            .build()?;

        assert_eq!(store.select_all(&query)?, Vec::<Row>::new());
        Ok(())
    }

    #[test]
    fn test_select_one_miss_is_not_found() -> Result<()> {
        let store = people_store()?;

        let err = store
            .select_one(
                "people",
                Projection::All,
                vec![Filter::equal("name", "nobody".to_string())],
            )
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
        Ok(())
    }

    #[test]
    fn test_update_touches_matching_rows_only() -> Result<()> {
        let store = people_store()?;

        let touched = store.update(
            "people",
            &[("age", 8.into())],
            &[Filter::equal("name", "corro".to_string())],
        )?;
        assert_eq!(touched, 1);

        let row = store.select_one(
            "people",
            Projection::columns(&["age"]),
            vec![Filter::equal("name", "corro".to_string())],
        )?;
        assert_eq!(row, vec![Value::Integer(8)]);
        Ok(())
    }

    #[test]
    fn test_list_tables() -> Result<()> {
        let store = people_store()?;
        store.create_table("pets", &["name TEXT"])?;

        let tables = store.list_tables()?;
        assert!(tables.contains(&"people".to_string()));
        assert!(tables.contains(&"pets".to_string()));
        Ok(())
    }
}
