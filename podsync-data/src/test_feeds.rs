// test_feeds.rs
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

//! Shared fixtures for the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::DataError;
use crate::fetcher::FeedFetcher;

/// "The Tip Off", three complete items, newest first.
pub(crate) const FEED_THREE_ITEMS: &str = include_str!("../tests/feeds/thetipoff.xml");

/// Same channel after publishing a fourth episode.
pub(crate) const FEED_THREE_ITEMS_GROWN: &str =
    include_str!("../tests/feeds/thetipoff-grown.xml");

/// "Intercepted", four items, the last one missing its title.
pub(crate) const FEED_PARTIAL: &str = include_str!("../tests/feeds/intercepted-partial.xml");

/// In-memory [`FeedFetcher`]: serves preset bodies, everything else is a
/// transport error.
pub(crate) struct MockFetcher {
    bodies: RefCell<HashMap<String, String>>,
}

impl MockFetcher {
    pub(crate) fn new() -> MockFetcher {
        MockFetcher::with_bodies(HashMap::new())
    }

    pub(crate) fn with_bodies(bodies: HashMap<String, String>) -> MockFetcher {
        MockFetcher {
            bodies: RefCell::new(bodies),
        }
    }

    pub(crate) fn serve(&self, url: &str, body: &str) {
        self.bodies
            .borrow_mut()
            .insert(url.to_string(), body.to_string());
    }

    pub(crate) fn take_down(&self, url: &str) {
        self.bodies.borrow_mut().remove(url);
    }
}

impl FeedFetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<String, DataError> {
        self.bodies
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| DataError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}
