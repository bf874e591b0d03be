// fetcher.rs
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

//! Fetching raw feed payloads.

use std::time::Duration;

use crate::errors::DataError;
use crate::USER_AGENT;

/// The contract the sync engine needs from the network layer: the full
/// response body as text, or a transport error. No streaming, no partial
/// bodies, no retries — bounding a hung request is this side's job.
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> Result<String, DataError>;
}

/// Blocking `reqwest` implementation of [`FeedFetcher`].
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<HttpFetcher, DataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DataError::Bail(format!("failed to build the http client: {err}")))?;

        Ok(HttpFetcher { client })
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, DataError> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| transport(url, &err))?;

        response.text().map_err(|err| transport(url, &err))
    }
}

fn transport(url: &str, err: &reqwest::Error) -> DataError {
    DataError::Transport {
        url: url.to_string(),
        reason: err.to_string(),
    }
}
