// subscription.rs
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

use serde::Serialize;

use super::{text_field, DataError};
use crate::query::Value;
use crate::store::Row;

/// One row of the subscription catalog.
///
/// `table_id` is the podcast identity, a pure function of the title. It
/// never changes for a given title, which is why the sync engine offers no
/// rename path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    table_id: String,
    title: String,
    feed_url: String,
    image_url: String,
    hash: String,
}

impl Subscription {
    pub(crate) fn new(
        table_id: String,
        title: String,
        feed_url: String,
        image_url: String,
        hash: String,
    ) -> Subscription {
        Subscription {
            table_id,
            title,
            feed_url,
            image_url,
            hash,
        }
    }

    /// The podcast identity, primary key of the catalog.
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Digest of the last ingested raw feed payload.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Name of this subscription's episode table.
    pub fn episode_table(&self) -> String {
        format!("pn_{}", self.table_id)
    }

    pub(crate) fn from_row(row: &Row) -> Result<Subscription, DataError> {
        if row.len() != 5 {
            return Err(DataError::Bail(format!(
                "expected 5 catalog columns, got {}",
                row.len()
            )));
        }

        Ok(Subscription {
            table_id: text_field(row, 0)?,
            title: text_field(row, 1)?,
            feed_url: text_field(row, 2)?,
            image_url: text_field(row, 3)?,
            hash: text_field(row, 4)?,
        })
    }

    pub(crate) fn to_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("table_id", self.table_id.clone().into()),
            ("title", self.title.clone().into()),
            ("feed_url", self.feed_url.clone().into()),
            ("image_url", self.image_url.clone().into()),
            ("hash", self.hash.clone().into()),
        ]
    }
}
