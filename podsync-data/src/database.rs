// database.rs
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

//! Database setup: on-disk location and first-run catalog bootstrap.

use std::path::{Path, PathBuf};

use crate::errors::DataError;
use crate::store::Store;
use crate::xdg_dirs;

/// Name of the subscription catalog table.
pub const CATALOG_TABLE: &str = "subscribed_podcasts";

const CATALOG_COLUMNS: &[&str] = &[
    "table_id CHAR(64) PRIMARY KEY NOT NULL",
    "title TEXT NOT NULL",
    "feed_url TEXT NOT NULL",
    "image_url TEXT NOT NULL",
    "hash CHAR(64) NOT NULL",
];

/// Default location of the store, `podsync.db` under the XDG data home.
pub fn default_path() -> Result<PathBuf, DataError> {
    xdg_dirs::PODSYNC_XDG
        .place_data_file("podsync.db")
        .map_err(From::from)
}

/// Open the store at `path`, creating the subscription catalog when the
/// file does not exist yet.
///
/// Table creation itself is not idempotent; the file-existence check here
/// is what keeps repeat opens from tripping over the catalog.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Store, DataError> {
    let first_run = !path.as_ref().exists();
    let store = Store::open(path)?;

    if first_run {
        info!("First run, creating the subscription catalog.");
        store.create_table(CATALOG_TABLE, CATALOG_COLUMNS)?;
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn test_open_bootstraps_the_catalog_once() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("podsync.db");

        let store = open(&path)?;
        assert!(store.list_tables()?.contains(&CATALOG_TABLE.to_string()));
        drop(store);

        // Second open must not re-issue the CREATE.
        let store = open(&path)?;
        assert!(store.list_tables()?.contains(&CATALOG_TABLE.to_string()));
        Ok(())
    }
}
