// dbqueries.rs
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

//! CRUD helpers over the generic store.

use crate::database::CATALOG_TABLE;
use crate::errors::DataError;
use crate::models::{Episode, Subscription};
use crate::query::{Filter, Projection, QueryBuilder};
use crate::store::Store;

/// Every catalog row, ordered by title.
pub fn get_subscriptions(store: &Store) -> Result<Vec<Subscription>, DataError> {
    let query = QueryBuilder::default()
        .table(CATALOG_TABLE)
        .order_by("title ASC")
        .build()
        .map_err(|err| DataError::Builder(err.to_string()))?;

    store
        .select_all(&query)?
        .iter()
        .map(Subscription::from_row)
        .collect()
}

/// Single catalog lookup by podcast identity.
pub fn get_subscription(store: &Store, identity: &str) -> Result<Subscription, DataError> {
    let row = store.select_one(
        CATALOG_TABLE,
        Projection::All,
        vec![Filter::equal("table_id", identity.to_string())],
    )?;

    Subscription::from_row(&row)
}

/// A subscription's recorded episodes, newest first.
pub fn get_episodes(
    store: &Store,
    subscription: &Subscription,
) -> Result<Vec<Episode>, DataError> {
    let query = QueryBuilder::default()
        .table(subscription.episode_table())
        .order_by("date_published DESC")
        .build()
        .map_err(|err| DataError::Builder(err.to_string()))?;

    store
        .select_all(&query)?
        .iter()
        .map(Episode::from_row)
        .collect()
}
