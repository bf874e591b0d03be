// lib.rs
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

// Enable lint group collections
#![warn(nonstandard_style, unused)]
// standalone lints
#![warn(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    elided_lifetime_in_paths
)]

//! Track podcast subscriptions and keep their episode tables current.
//!
//! The pieces, bottom up: [`checksum`] derives storage identities and feed
//! digests, [`store`] is a generic keyed-table engine over SQLite,
//! [`parser`] turns feed XML into episode models, and [`pipeline`] wires
//! them into the fetch-compare-diff cycle.

#[cfg(test)]
#[macro_use]
extern crate maplit;

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;

pub mod checksum;
pub mod database;
pub mod dbqueries;
pub mod errors;
pub mod export;
mod feed;
pub mod fetcher;
pub(crate) mod models;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod store;

#[cfg(test)]
pub(crate) mod test_feeds;

pub use crate::feed::Feed;
pub use crate::fetcher::{FeedFetcher, HttpFetcher};
pub use crate::models::{Episode, NewEpisode, Subscription};
pub use crate::parser::{ChannelInfo, ItemOutcome, SkipReason};
pub use crate::pipeline::SyncOutcome;

// Some feed hosts refuse requests with an unfamiliar UA.
/// The user-agent to be used for all the requests.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; rv:52.0) Gecko/20100101 Firefox/52.0";

/// [XDG Base Directory](https://specifications.freedesktop.org/basedir-spec/basedir-spec-latest.html) Paths.
pub mod xdg_dirs {
    use std::path::PathBuf;
    use std::sync::LazyLock;

    pub(crate) static PODSYNC_XDG: LazyLock<xdg::BaseDirectories> =
        LazyLock::new(|| xdg::BaseDirectories::with_prefix("podsync").unwrap());

    /// XDG_DATA Directory `PathBuf`.
    pub static PODSYNC_DATA: LazyLock<PathBuf> = LazyLock::new(|| {
        PODSYNC_XDG
            .create_data_directory(PODSYNC_XDG.get_data_home())
            .unwrap()
    });
}
