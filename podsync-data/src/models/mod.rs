// mod.rs
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

mod episode;
mod subscription;

pub use self::episode::{Episode, NewEpisode};
pub use self::subscription::Subscription;

pub(crate) use self::episode::EPISODE_COLUMNS;

use crate::errors::DataError;
use crate::query::Value;
use crate::store::Row;

// Row decoding expects `SELECT *` results, so indexes follow storage order.

pub(crate) fn text_field(row: &Row, index: usize) -> Result<String, DataError> {
    match row.get(index) {
        Some(Value::Text(text)) => Ok(text.clone()),
        other => Err(DataError::Bail(format!(
            "expected text in column {index}, got {other:?}"
        ))),
    }
}

pub(crate) fn integer_field(row: &Row, index: usize) -> Result<i64, DataError> {
    match row.get(index) {
        Some(Value::Integer(int)) => Ok(*int),
        other => Err(DataError::Bail(format!(
            "expected an integer in column {index}, got {other:?}"
        ))),
    }
}
