// feed.rs
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

//! One fetched feed, parsed and fingerprinted.

use crate::checksum;
use crate::errors::DataError;
use crate::models::NewEpisode;
use crate::parser::{self, ChannelInfo, ItemOutcome, SkipReason};

/// The model extracted from one raw feed payload: the payload digest,
/// channel metadata and an outcome per scanned item.
#[derive(Debug)]
pub struct Feed {
    digest: String,
    channel: ChannelInfo,
    items: Vec<ItemOutcome>,
}

impl Feed {
    /// Parse a raw feed payload.
    ///
    /// `limit` caps how many items are scanned, skipped ones included.
    /// Fails only on a malformed document; incomplete items are reported
    /// through [`Feed::skipped`] instead.
    pub fn parse(raw: &str, limit: Option<usize>) -> Result<Feed, DataError> {
        let scan = parser::scan_feed(raw.as_bytes(), limit)?;

        Ok(Feed {
            digest: checksum::feed_digest(raw),
            channel: scan.channel,
            items: scan.items,
        })
    }

    /// Digest of the raw payload this model came from.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn channel(&self) -> &ChannelInfo {
        &self.channel
    }

    pub fn items(&self) -> &[ItemOutcome] {
        &self.items
    }

    /// The items that parsed into complete episodes, in document order.
    pub fn episodes(&self) -> impl Iterator<Item = &NewEpisode> {
        self.items.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Episode(episode) => Some(episode),
            ItemOutcome::Skipped { .. } => None,
        })
    }

    /// The items that were dropped, with their position and reason.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, &SkipReason)> {
        self.items.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Episode(_) => None,
            ItemOutcome::Skipped { index, reason } => Some((*index, reason)),
        })
    }
}
