// pipeline.rs
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

//! The sync pipeline: fetch, compare digests, diff episodes, record.

use url::Url;

use crate::checksum;
use crate::database::CATALOG_TABLE;
use crate::dbqueries;
use crate::errors::DataError;
use crate::feed::Feed;
use crate::fetcher::FeedFetcher;
use crate::models::{NewEpisode, Subscription, EPISODE_COLUMNS};
use crate::query::Filter;
use crate::store::Store;

/// How one sync pass ended for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Feed bytes identical to the last ingested payload; nothing touched.
    Unchanged,
    /// The digest differed and the diff ran.
    Updated {
        /// Episodes recorded for the first time.
        fresh: usize,
        /// Insert attempts rejected as duplicates, i.e. already recorded.
        /// A changed digest does not mean every item is new.
        known: usize,
        /// Items dropped by the extractor.
        skipped: usize,
    },
}

/// Subscribe to the feed at `url`: create the episode table, record the
/// catalog row, then record every currently-present episode.
///
/// This is a sync pass against an empty prior episode set, so duplicate
/// keys are *not* tolerated here — one firing means the table name or the
/// episode keys collided, and that has to surface. An already-existing
/// table is a loud [`DataError::Schema`] for the same reason.
pub fn subscribe<F: FeedFetcher>(
    store: &Store,
    fetcher: &F,
    url: &str,
    limit: Option<usize>,
) -> Result<Subscription, DataError> {
    Url::parse(url)?;

    let raw = fetcher.fetch(url)?;
    let feed = Feed::parse(&raw, limit)?;

    let identity = checksum::podcast_identity(feed.channel().title());
    let subscription = Subscription::new(
        identity,
        feed.channel().title().to_string(),
        url.to_string(),
        feed.channel().image_url().to_string(),
        feed.digest().to_string(),
    );

    store.create_table(&subscription.episode_table(), EPISODE_COLUMNS)?;
    store.insert(CATALOG_TABLE, &subscription.to_fields())?;

    let (fresh, _) = record_episodes(store, &subscription, &feed, false)?;
    info!(
        "Subscribed to {}: {} episodes recorded, {} items skipped.",
        subscription.title(),
        fresh,
        feed.skipped().count()
    );

    Ok(subscription)
}

/// Run one sync pass for the subscription with the given identity.
///
/// State machine: look the row up, fetch, compare digests; on a change,
/// diff the episodes against what is already recorded and bump the stored
/// digest afterwards.
pub fn sync<F: FeedFetcher>(
    store: &Store,
    fetcher: &F,
    identity: &str,
    limit: Option<usize>,
) -> Result<SyncOutcome, DataError> {
    let subscription = dbqueries::get_subscription(store, identity).map_err(|err| match err {
        DataError::NotFound { .. } => DataError::UnknownSubscription(identity.to_string()),
        err => err,
    })?;

    let raw = fetcher.fetch(subscription.feed_url())?;
    let digest = checksum::feed_digest(&raw);

    if digest == subscription.hash() {
        debug!("{}: feed is up to date.", subscription.title());
        return Ok(SyncOutcome::Unchanged);
    }

    let feed = Feed::parse(&raw, limit)?;
    let (fresh, known) = record_episodes(store, &subscription, &feed, true)?;
    let skipped = feed.skipped().count();

    store.update(
        CATALOG_TABLE,
        &[("hash", digest.into())],
        &[Filter::equal("table_id", identity.to_string())],
    )?;

    info!(
        "Synced {}: {} fresh, {} already known, {} skipped.",
        subscription.title(),
        fresh,
        known,
        skipped
    );

    Ok(SyncOutcome::Updated {
        fresh,
        known,
        skipped,
    })
}

/// Sync every subscription in the catalog, one at a time.
///
/// Failures stay contained to their subscription; the rest of the batch
/// keeps going. The per-row result is reported back alongside the row.
pub fn sync_all<F: FeedFetcher>(
    store: &Store,
    fetcher: &F,
    limit: Option<usize>,
) -> Result<Vec<(Subscription, Result<SyncOutcome, DataError>)>, DataError> {
    let subscriptions = dbqueries::get_subscriptions(store)?;

    Ok(subscriptions
        .into_iter()
        .map(|subscription| {
            let outcome = sync(store, fetcher, subscription.table_id(), limit);
            if let Err(ref err) = outcome {
                error!("Failed to sync {}: {}", subscription.title(), err);
            }
            (subscription, outcome)
        })
        .collect())
}

/// Insert every parsed episode into the subscription's table.
///
/// With `tolerate_duplicates`, a constraint rejection counts the episode as
/// already known instead of failing the pass. Extractor skips are logged
/// here; they were already counted per item.
fn record_episodes(
    store: &Store,
    subscription: &Subscription,
    feed: &Feed,
    tolerate_duplicates: bool,
) -> Result<(usize, usize), DataError> {
    for (index, reason) in feed.skipped() {
        warn!(
            "{}: skipping item {}: {}.",
            subscription.title(),
            index,
            reason
        );
    }

    let table = subscription.episode_table();
    let mut fresh = 0;
    let mut known = 0;

    for episode in feed.episodes() {
        match insert_episode(store, &table, episode) {
            Ok(()) => fresh += 1,
            Err(err) if tolerate_duplicates && err.is_constraint() => known += 1,
            Err(err) => return Err(err),
        }
    }

    Ok((fresh, known))
}

fn insert_episode(store: &Store, table: &str, episode: &NewEpisode) -> Result<(), DataError> {
    let guid = checksum::episode_identity(episode.guid_source());
    store.insert(table, &episode.to_fields(&guid))
}
