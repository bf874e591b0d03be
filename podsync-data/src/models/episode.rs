// episode.rs
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

use super::{integer_field, text_field, DataError};
use crate::parser::{parse_publish_date, RawItem, SkipReason};
use crate::query::Value;
use crate::store::Row;

/// Column definitions of a per-subscription episode table.
pub(crate) const EPISODE_COLUMNS: &[&str] = &[
    "guid CHAR(64) PRIMARY KEY NOT NULL",
    "title TEXT NOT NULL",
    "audio TEXT NOT NULL",
    "duration TEXT NOT NULL",
    "site_url TEXT NOT NULL",
    "date_published INT NOT NULL",
    "downloaded INT NOT NULL DEFAULT 0",
];

/// An episode parsed out of one feed item, not yet recorded anywhere.
///
/// Field validation happens here: every slot the item did not provide turns
/// into a [`SkipReason`] instead of a half-filled episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    title: String,
    audio: String,
    duration: String,
    site_url: String,
    epoch: i64,
    guid_source: String,
}

impl NewEpisode {
    pub(crate) fn new(raw: &RawItem) -> Result<NewEpisode, SkipReason> {
        let title = field(&raw.title).ok_or(SkipReason::MissingTitle)?;
        let audio = field(&raw.audio).ok_or(SkipReason::MissingEnclosure)?;
        let duration = field(&raw.duration).ok_or(SkipReason::MissingEnclosure)?;
        let site_url = field(&raw.site_url).ok_or(SkipReason::MissingLink)?;
        let published = field(&raw.published).ok_or(SkipReason::MissingDate)?;
        let guid_source = field(&raw.guid).ok_or(SkipReason::MissingGuid)?;

        let epoch = parse_publish_date(&published)
            .map_err(|err| SkipReason::BadDate(err.to_string()))?;

        Ok(NewEpisode {
            title,
            audio,
            duration,
            site_url,
            epoch,
            guid_source,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn audio(&self) -> &str {
        &self.audio
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// The item's unique string as it appeared in the feed, before it is
    /// digested into a storage key.
    pub fn guid_source(&self) -> &str {
        &self.guid_source
    }

    /// Field pairs for the insert, `downloaded` left to its column default.
    pub(crate) fn to_fields(&self, guid: &str) -> Vec<(&'static str, Value)> {
        vec![
            ("guid", guid.to_string().into()),
            ("title", self.title.clone().into()),
            ("audio", self.audio.clone().into()),
            ("duration", self.duration.clone().into()),
            ("site_url", self.site_url.clone().into()),
            ("date_published", self.epoch.into()),
        ]
    }
}

fn field(slot: &Option<String>) -> Option<String> {
    slot.as_deref().map(str::trim).map(ToOwned::to_owned)
}

/// An episode row read back from a subscription's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    guid: String,
    title: String,
    audio: String,
    duration: String,
    site_url: String,
    date_published: i64,
    downloaded: bool,
}

impl Episode {
    pub(crate) fn from_row(row: &Row) -> Result<Episode, DataError> {
        if row.len() != EPISODE_COLUMNS.len() {
            return Err(DataError::Bail(format!(
                "expected {} episode columns, got {}",
                EPISODE_COLUMNS.len(),
                row.len()
            )));
        }

        Ok(Episode {
            guid: text_field(row, 0)?,
            title: text_field(row, 1)?,
            audio: text_field(row, 2)?,
            duration: text_field(row, 3)?,
            site_url: text_field(row, 4)?,
            date_published: integer_field(row, 5)?,
            downloaded: integer_field(row, 6)? != 0,
        })
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn audio(&self) -> &str {
        &self.audio
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn date_published(&self) -> i64 {
        self.date_published
    }

    pub fn downloaded(&self) -> bool {
        self.downloaded
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw_item() -> RawItem {
        RawItem {
            title: Some("  Episode 1 ".into()),
            audio: Some("http://example.com/1.mp3".into()),
            duration: Some("123456".into()),
            site_url: Some("http://example.com/1".into()),
            published: Some("Tue, 16 Jan 2018 22:00:00 +0000".into()),
            guid: Some("tip-off-ep-1".into()),
        }
    }

    #[test]
    fn test_new_episode_trims_text_slots() -> anyhow::Result<()> {
        let episode = NewEpisode::new(&raw_item()).expect("item is complete");
        assert_eq!(episode.title(), "Episode 1");
        assert_eq!(episode.guid_source(), "tip-off-ep-1");
        Ok(())
    }

    #[test]
    fn test_every_missing_slot_names_its_reason() {
        let mut raw = raw_item();
        raw.audio = None;
        assert_eq!(
            NewEpisode::new(&raw).unwrap_err(),
            SkipReason::MissingEnclosure
        );

        let mut raw = raw_item();
        raw.guid = None;
        assert_eq!(NewEpisode::new(&raw).unwrap_err(), SkipReason::MissingGuid);

        let mut raw = raw_item();
        raw.published = Some("not a date".into());
        assert!(matches!(
            NewEpisode::new(&raw).unwrap_err(),
            SkipReason::BadDate(_)
        ));
    }

    #[test]
    fn test_insert_fields_leave_downloaded_to_the_default() {
        let episode = NewEpisode::new(&raw_item()).expect("item is complete");
        let fields = episode.to_fields("abcd");

        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["guid", "title", "audio", "duration", "site_url", "date_published"]
        );
    }

    #[test]
    fn test_row_decoding_flags_downloaded() -> anyhow::Result<()> {
        let row: Row = vec![
            Value::Text("abcd".into()),
            Value::Text("Episode 1".into()),
            Value::Text("http://example.com/1.mp3".into()),
            Value::Text("123456".into()),
            Value::Text("http://example.com/1".into()),
            Value::Integer(1516140000),
            Value::Integer(1),
        ];

        let episode = Episode::from_row(&row)?;
        assert!(episode.downloaded());
        assert_eq!(episode.date_published(), 1516140000);
        Ok(())
    }
}
