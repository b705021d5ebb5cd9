use crate::domain::Entry;

/// How many recently played songs are kept per fetch.
pub const ENTRY_BUFFER_SIZE: usize = 50;

/// Entries from a single fetch, most recent first, never longer than the
/// capacity it was built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryBuffer {
    entries: Vec<Entry>,
}

impl EntryBuffer {
    /// Keeps source order and drops everything past `capacity`.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>, capacity: usize) -> Self {
        Self {
            entries: entries.into_iter().take(capacity).collect(),
        }
    }

    /// The change-detection key: the first row of the page.
    pub fn newest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a EntryBuffer {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(secs: i64, title: &str) -> Entry {
        Entry::new(Utc.timestamp_opt(secs, 0).unwrap(), None, title)
    }

    #[test]
    fn test_truncates_to_capacity() {
        let entries = (0..120).map(|i| entry(1000 - i, &format!("song {}", i)));
        let buffer = EntryBuffer::from_entries(entries, ENTRY_BUFFER_SIZE);

        assert_eq!(buffer.len(), ENTRY_BUFFER_SIZE);
        assert_eq!(buffer.newest().unwrap().title(), "song 0");
        assert_eq!(buffer.entries().last().unwrap().title(), "song 49");
    }

    #[test]
    fn test_preserves_source_order() {
        // Order comes from the page even if timestamps disagree.
        let buffer = EntryBuffer::from_entries(vec![entry(1, "a"), entry(3, "b"), entry(2, "c")], 10);
        let titles: Vec<_> = buffer.iter().map(Entry::title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = EntryBuffer::from_entries(Vec::new(), ENTRY_BUFFER_SIZE);
        assert!(buffer.is_empty());
        assert!(buffer.newest().is_none());
    }
}
