use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryBuffer};

/// The published document: `{"songs": [...]}`.
///
/// Timestamps are Unix seconds in UTC; the frontend localizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist<'a> {
    pub songs: Cow<'a, [Entry]>,
}

impl<'a> Playlist<'a> {
    pub fn from_buffer(buffer: &'a EntryBuffer) -> Self {
        Self {
            songs: Cow::Borrowed(buffer.entries()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Playlist<'static> {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
