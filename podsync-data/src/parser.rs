// parser.rs
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

//! Extract a feed model out of RSS XML.
//!
//! The walk is a single pass over the reader events, in document order.
//! One malformed item never aborts the feed: every `<item>` produces an
//! [`ItemOutcome`], either a parsed episode or a named skip reason.

use chrono::prelude::*;
use xml::reader::{EventReader, XmlEvent};

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use crate::errors::DataError;
use crate::models::NewEpisode;

/// Channel-level metadata. Fields default to empty when the feed does not
/// provide them; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    pub(crate) title: String,
    pub(crate) image_url: String,
}

impl ChannelInfo {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

/// Why an `<item>` was dropped instead of parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    MissingEnclosure,
    MissingLink,
    MissingDate,
    MissingGuid,
    /// The unique string already appeared earlier in the same feed; the
    /// first occurrence wins.
    DuplicateGuid,
    BadDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTitle => write!(f, "no title element"),
            SkipReason::MissingEnclosure => write!(f, "no enclosure element"),
            SkipReason::MissingLink => write!(f, "no link element"),
            SkipReason::MissingDate => write!(f, "no pubDate element"),
            SkipReason::MissingGuid => write!(f, "no guid element"),
            SkipReason::DuplicateGuid => write!(f, "guid already seen in this feed"),
            SkipReason::BadDate(reason) => write!(f, "{reason}"),
        }
    }
}

/// What became of one scanned `<item>`.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Episode(NewEpisode),
    Skipped { index: usize, reason: SkipReason },
}

/// Raw text slots collected for one `<item>` before validation.
#[derive(Debug, Default)]
pub(crate) struct RawItem {
    pub(crate) title: Option<String>,
    pub(crate) audio: Option<String>,
    pub(crate) duration: Option<String>,
    pub(crate) site_url: Option<String>,
    pub(crate) published: Option<String>,
    pub(crate) guid: Option<String>,
}

#[derive(Debug)]
pub(crate) struct FeedScan {
    pub(crate) channel: ChannelInfo,
    pub(crate) items: Vec<ItemOutcome>,
}

/// Read the channel-level title and the first nested image URL.
pub fn extract_channel_info<R: Read>(reader: R) -> Result<ChannelInfo, DataError> {
    scan_feed(reader, None).map(|scan| scan.channel)
}

/// Walk the feed items in document order and report an outcome per item.
///
/// `limit` bounds the number of items *scanned*, not collected: an item
/// that ends up skipped still counts toward it.
pub fn extract_episodes<R: Read>(
    reader: R,
    limit: Option<usize>,
) -> Result<Vec<ItemOutcome>, DataError> {
    scan_feed(reader, limit).map(|scan| scan.items)
}

pub(crate) fn scan_feed<R: Read>(reader: R, limit: Option<usize>) -> Result<FeedScan, DataError> {
    let parser = EventReader::new(reader);

    let mut channel = ChannelInfo::default();
    let mut items = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut item: Option<RawItem> = None;
    let mut seen = HashSet::new();
    let mut scanned = 0;

    for event in parser {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(element_name(&name));

                if item.is_none() && name.prefix.is_none() && name.local_name == "item" {
                    item = Some(RawItem::default());
                } else if let Some(raw) = item.as_mut() {
                    if name.prefix.is_none() && name.local_name == "enclosure" {
                        // The audio url and the duration come from the first
                        // two attribute slots by position, not by attribute
                        // name. Feeds that order their attributes
                        // differently land the wrong values here.
                        raw.audio = attributes.first().map(|a| a.value.clone());
                        raw.duration = attributes.get(1).map(|a| a.value.clone());
                    }
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                let leaf = stack.last().map(String::as_str);
                let parent = stack
                    .len()
                    .checked_sub(2)
                    .and_then(|i| stack.get(i))
                    .map(String::as_str);

                if let Some(raw) = item.as_mut() {
                    if parent == Some("item") {
                        match leaf {
                            Some("title") => append(&mut raw.title, &text),
                            Some("link") => append(&mut raw.site_url, &text),
                            Some("pubDate") => append(&mut raw.published, &text),
                            Some("guid") => append(&mut raw.guid, &text),
                            _ => {}
                        }
                    }
                } else if parent == Some("channel") && leaf == Some("title") {
                    channel.title.push_str(&text);
                } else if parent == Some("image") && leaf == Some("url") {
                    channel.image_url.push_str(&text);
                }
            }
            XmlEvent::EndElement { name } => {
                stack.pop();

                if name.prefix.is_none() && name.local_name == "item" {
                    if let Some(raw) = item.take() {
                        items.push(finalize_item(raw, scanned, &mut seen));
                        scanned += 1;
                        if limit == Some(scanned) {
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    channel.title = channel.title.trim().to_string();
    channel.image_url = channel.image_url.trim().to_string();
    Ok(FeedScan { channel, items })
}

fn element_name(name: &xml::name::OwnedName) -> String {
    match name.prefix {
        Some(ref prefix) => format!("{}:{}", prefix, name.local_name),
        None => name.local_name.clone(),
    }
}

fn append(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}

fn finalize_item(raw: RawItem, index: usize, seen: &mut HashSet<String>) -> ItemOutcome {
    match NewEpisode::new(&raw) {
        Ok(episode) => {
            if seen.insert(episode.guid_source().to_string()) {
                ItemOutcome::Episode(episode)
            } else {
                ItemOutcome::Skipped {
                    index,
                    reason: SkipReason::DuplicateGuid,
                }
            }
        }
        Err(reason) => ItemOutcome::Skipped { index, reason },
    }
}

/// Parse a feed publish date into epoch seconds.
///
/// The layout is positional: the weekday token is ignored, then
/// day-of-month, three-letter month, year, `HH:MM:SS`. Anything after the
/// clock (usually the producer's stated offset) is ignored too, so the
/// conversion happens in the local timezone of the running process.
pub fn parse_publish_date(text: &str) -> Result<i64, DataError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(bad_date(text, "expected `Day, DD Mon YYYY HH:MM:SS`"));
    }

    let day: u32 = parts[1]
        .parse()
        .map_err(|_| bad_date(text, "day of month is not a number"))?;
    let month = month_number(parts[2]).ok_or_else(|| bad_date(text, "unrecognized month"))?;
    let year: i32 = parts[3]
        .parse()
        .map_err(|_| bad_date(text, "year is not a number"))?;

    let clock: Vec<&str> = parts[4].split(':').collect();
    if clock.len() != 3 {
        return Err(bad_date(text, "expected a HH:MM:SS clock"));
    }
    let hour: u32 = clock[0]
        .parse()
        .map_err(|_| bad_date(text, "hour is not a number"))?;
    let minute: u32 = clock[1]
        .parse()
        .map_err(|_| bad_date(text, "minute is not a number"))?;
    let second: u32 = clock[2]
        .parse()
        .map_err(|_| bad_date(text, "second is not a number"))?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| bad_date(text, "no such wall-clock time"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|date_time| date_time.timestamp())
        .ok_or_else(|| bad_date(text, "time does not exist in the local timezone"))
}

fn month_number(month: &str) -> Option<u32> {
    match month {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

fn bad_date(date: &str, reason: &str) -> DataError {
    DataError::DateFormat {
        date: date.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_feeds::{FEED_PARTIAL, FEED_THREE_ITEMS};

    use super::*;

    #[test]
    fn test_channel_info() -> anyhow::Result<()> {
        let channel = extract_channel_info(FEED_THREE_ITEMS.as_bytes())?;
        assert_eq!(channel.title(), "The Tip Off");
        assert_eq!(
            channel.image_url(),
            "https://static.example.com/covers/thetipoff.jpg"
        );
        Ok(())
    }

    #[test]
    fn test_channel_info_defaults_to_empty() -> anyhow::Result<()> {
        let feed = "<rss><channel></channel></rss>";
        let channel = extract_channel_info(feed.as_bytes())?;
        assert_eq!(channel.title(), "");
        assert_eq!(channel.image_url(), "");
        Ok(())
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let err = extract_channel_info("<rss><channel>".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::XmlReader(_)));
    }

    #[test]
    fn test_items_parse_in_document_order() -> anyhow::Result<()> {
        let outcomes = extract_episodes(FEED_THREE_ITEMS.as_bytes(), None)?;
        assert_eq!(outcomes.len(), 3);

        let titles: Vec<&str> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ItemOutcome::Episode(ep) => Some(ep.title()),
                ItemOutcome::Skipped { .. } => None,
            })
            .collect();
        assert_eq!(titles, vec!["Episode 3", "Episode 2", "Episode 1"]);
        Ok(())
    }

    #[test]
    fn test_item_missing_title_is_skipped_not_fatal() -> anyhow::Result<()> {
        let outcomes = extract_episodes(FEED_PARTIAL.as_bytes(), None)?;
        assert_eq!(outcomes.len(), 4);

        let episodes = outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Episode(_)))
            .count();
        assert_eq!(episodes, 3);
        assert_eq!(
            outcomes[3],
            ItemOutcome::Skipped {
                index: 3,
                reason: SkipReason::MissingTitle,
            }
        );
        Ok(())
    }

    #[test]
    fn test_limit_counts_scanned_items_not_collected_ones() -> anyhow::Result<()> {
        let feed = FEED_PARTIAL.replace(
            "<title>Episode 1</title>",
            "<!-- first item now has no title either -->",
        );

        let outcomes = extract_episodes(feed.as_bytes(), Some(2))?;
        // The skipped first item still used up one slot of the limit.
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0],
            ItemOutcome::Skipped {
                index: 0,
                reason: SkipReason::MissingTitle,
            }
        ));
        assert!(matches!(outcomes[1], ItemOutcome::Episode(_)));
        Ok(())
    }

    #[test]
    fn test_enclosure_attributes_are_read_by_position() -> anyhow::Result<()> {
        // length comes first here, so it lands in the audio slot. Known
        // fragility of the positional contract.
        let feed = r#"<rss><channel><title>Backwards</title>
            <item>
              <title>Oops</title>
              <enclosure length="999" url="http://example.com/1.mp3" type="audio/mpeg"/>
              <link>http://example.com/1</link>
              <pubDate>Tue, 16 Jan 2018 22:00:00 +0000</pubDate>
              <guid>backwards-1</guid>
            </item>
        </channel></rss>"#;

        let outcomes = extract_episodes(feed.as_bytes(), None)?;
        match &outcomes[0] {
            ItemOutcome::Episode(ep) => {
                assert_eq!(ep.audio(), "999");
                assert_eq!(ep.duration(), "http://example.com/1.mp3");
            }
            other => panic!("expected an episode, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_duplicate_guid_within_a_feed_keeps_the_first() -> anyhow::Result<()> {
        let feed = FEED_THREE_ITEMS.replace("tip-off-ep-2", "tip-off-ep-3");

        let outcomes = extract_episodes(feed.as_bytes(), None)?;
        assert_eq!(
            outcomes[1],
            ItemOutcome::Skipped {
                index: 1,
                reason: SkipReason::DuplicateGuid,
            }
        );
        Ok(())
    }

    #[test]
    fn test_itunes_elements_do_not_shadow_item_fields() -> anyhow::Result<()> {
        let feed = r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
          <channel><title>Prefixed</title>
            <item>
              <itunes:title>WRONG</itunes:title>
              <title>Right</title>
              <enclosure url="http://example.com/1.mp3" length="1"/>
              <link>http://example.com/1</link>
              <pubDate>Tue, 16 Jan 2018 22:00:00 +0000</pubDate>
              <guid>prefixed-1</guid>
            </item>
          </channel></rss>"#;

        let outcomes = extract_episodes(feed.as_bytes(), None)?;
        match &outcomes[0] {
            ItemOutcome::Episode(ep) => assert_eq!(ep.title(), "Right"),
            other => panic!("expected an episode, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_publish_date_layout() -> anyhow::Result<()> {
        let expected = Local
            .with_ymd_and_hms(2018, 1, 16, 22, 0, 0)
            .earliest()
            .expect("valid local time")
            .timestamp();
        assert_eq!(
            parse_publish_date("Tue, 16 Jan 2018 22:00:00 +0000")?,
            expected
        );
        // The weekday token and the trailing offset are both ignored.
        assert_eq!(parse_publish_date("Xxx, 16 Jan 2018 22:00:00")?, expected);
        Ok(())
    }

    #[test]
    fn test_publish_date_rejects_unknown_layouts() {
        let err = parse_publish_date("2018-01-16T22:00:00Z").unwrap_err();
        assert!(matches!(err, DataError::DateFormat { .. }));

        let err = parse_publish_date("Tue, 16 Januar 2018 22:00:00").unwrap_err();
        assert!(matches!(err, DataError::DateFormat { .. }));

        let err = parse_publish_date("Tue, 42 Jan 2018 22:00:00").unwrap_err();
        assert!(matches!(err, DataError::DateFormat { .. }));
    }
}
