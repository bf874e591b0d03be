// export.rs
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

//! Serialize result sets to JSON files. Pure formatting, no sync
//! invariants live here.

use serde_json::Value as Json;

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::DataError;
use crate::query::{QueryBuilder, Value};
use crate::store::{Row, Store};

/// Write `rows` to `path` as a JSON array of arrays, appending a `.json`
/// extension when the path lacks one. Returns the path actually written.
pub fn export_rows<P: AsRef<Path>>(
    path: P,
    rows: &[Row],
    pretty: bool,
) -> Result<PathBuf, DataError> {
    let path = with_json_extension(path.as_ref());
    let file = File::create(&path)?;

    let json = Json::Array(rows.iter().map(row_to_json).collect());
    if pretty {
        serde_json::to_writer_pretty(file, &json)?;
    } else {
        serde_json::to_writer(file, &json)?;
    }

    info!("Exported {} rows to {}.", rows.len(), path.display());
    Ok(path)
}

/// Dump a whole table, all columns in storage order.
pub fn export_table<P: AsRef<Path>>(
    store: &Store,
    table: &str,
    path: P,
    pretty: bool,
) -> Result<PathBuf, DataError> {
    let query = QueryBuilder::default()
        .table(table)
        .build()
        .map_err(|err| DataError::Builder(err.to_string()))?;

    let rows = store.select_all(&query)?;
    export_rows(path, &rows, pretty)
}

fn with_json_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == "json" => path.to_path_buf(),
        _ => {
            let mut os = path.as_os_str().to_owned();
            os.push(".json");
            PathBuf::from(os)
        }
    }
}

fn row_to_json(row: &Row) -> Json {
    Json::Array(row.iter().map(value_to_json).collect())
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(int) => (*int).into(),
        Value::Real(real) => serde_json::Number::from_f64(*real)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Text(text) => text.clone().into(),
        Value::Blob(blob) => Json::Array(blob.iter().map(|byte| (*byte).into()).collect()),
    }
}
