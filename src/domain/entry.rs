use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::zone::ZoneTable;

/// Layout of the date cell once the trailing zone abbreviation is removed,
/// e.g. `October 5, 2013 11:42:07PM`.
pub const DATE_FORMAT: &str = "%B %d, %Y %I:%M:%S%p";

/// Separator between artist and title in the song cell.
pub const SONG_SEPARATOR: &str = " - ";

/// One played track.
///
/// Equality covers all three fields and is what change detection keys on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(with = "chrono::serde::ts_seconds")]
    timestamp: DateTime<Utc>,
    artist: Option<String>,
    title: String,
}

#[derive(Debug, Error)]
pub enum EntryParseError {
    #[error("no zone abbreviation in date text {0:?}")]
    MissingZone(String),

    #[error("unrecognized zone abbreviation {0:?}")]
    UnknownZone(String),

    #[error("invalid timestamp {text:?}: {source}")]
    InvalidTimestamp {
        text: String,
        source: chrono::ParseError,
    },

    #[error("local time {0} does not exist in its zone")]
    NonexistentLocalTime(NaiveDateTime),
}

impl Entry {
    /// Builds an entry, truncating the timestamp to whole seconds.
    pub fn new(timestamp: DateTime<Utc>, artist: Option<String>, title: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
            artist,
            title: title.into(),
        }
    }

    /// Parses a table row whose date cell carries the zone as its last token,
    /// e.g. `October 5, 2013 11:42:07PM PDT`.
    pub fn parse_row(
        date_text: &str,
        song_text: &str,
        zones: &ZoneTable,
    ) -> Result<Self, EntryParseError> {
        // Cells can carry non-breaking spaces and line breaks from the markup.
        let date_text = date_text.split_whitespace().collect::<Vec<_>>().join(" ");
        let (naive_text, zone) = date_text
            .rsplit_once(' ')
            .ok_or_else(|| EntryParseError::MissingZone(date_text.clone()))?;

        Self::from_parts(naive_text, zone, song_text, zones)
    }

    /// Parses an entry from an already separated date, zone and song text.
    pub fn from_parts(
        naive_text: &str,
        zone: &str,
        song_text: &str,
        zones: &ZoneTable,
    ) -> Result<Self, EntryParseError> {
        let tz = zones.resolve(zone)?;

        let naive = NaiveDateTime::parse_from_str(naive_text.trim(), DATE_FORMAT).map_err(
            |source| EntryParseError::InvalidTimestamp {
                text: naive_text.to_string(),
                source,
            },
        )?;

        // The abbreviation only picks a side of the repeated autumn hour.
        let local = match naive.and_local_timezone(tz) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earlier, later) => {
                if earlier.format("%Z").to_string().eq_ignore_ascii_case(zone) {
                    earlier
                } else {
                    later
                }
            }
            LocalResult::None => return Err(EntryParseError::NonexistentLocalTime(naive)),
        };
        let timestamp = local.with_timezone(&Utc);

        let (artist, title) = split_song(song_text.trim());
        Ok(Self::new(timestamp, artist, title))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn display_name(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{}{}{}", artist, SONG_SEPARATOR, self.title),
            None => self.title.clone(),
        }
    }
}

/// Splits `Artist - Title` on the first separator only.
pub fn split_song(text: &str) -> (Option<String>, String) {
    match text.split_once(SONG_SEPARATOR) {
        Some((artist, title)) => (Some(artist.to_string()), title.to_string()),
        None => (None, text.to_string()),
    }
}
