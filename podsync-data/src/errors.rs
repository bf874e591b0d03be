// errors.rs
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

use thiserror::Error;

use std::io;

/// Error type of the data crate.
///
/// Containment boundaries: `DateFormat` is contained at the item boundary,
/// `Transport` and `XmlReader` at the subscription boundary. `Schema`,
/// `NotFound` and `UnknownSubscription` always surface to the caller.
/// `Constraint` is swallowed while diffing a known feed and loud everywhere
/// else. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("SQL Query failed: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("XML Reader Error: {0}")]
    XmlReader(#[from] xml::reader::Error),
    #[error("Failed to parse a url: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),
    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Schema statement for table {table} failed: {reason}")]
    Schema { table: String, reason: String },
    #[error("Constraint violated on table {table}: {reason}")]
    Constraint { table: String, reason: String },
    #[error("Query against {table} matched no rows")]
    NotFound { table: String },
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(String),
    #[error("Malformed publish date {date:?}: {reason}")]
    DateFormat { date: String, reason: String },
    #[error("Builder error: {0}")]
    Builder(String),
    #[error("Error: {0}")]
    Bail(String),
}

impl DataError {
    /// Whether an insert was rejected because the row already exists.
    ///
    /// The sync diff relies on this to treat duplicate keys as
    /// "already known" instead of failing the whole pass.
    pub fn is_constraint(&self) -> bool {
        matches!(self, DataError::Constraint { .. })
    }
}
