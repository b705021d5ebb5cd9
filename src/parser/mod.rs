//! Turns the recently-played page into an [`EntryBuffer`].
//!
//! The page holds one `<table>`; each body row has the date cell first and
//! the song cell second. Rows whose date or zone cannot be parsed are logged
//! and skipped so one bad row does not hide the rest of the playlist.

use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Entry, EntryBuffer, ZoneTable, ENTRY_BUFFER_SIZE};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no <table> found in page")]
    NoTable,

    #[error("row {index} has {cells} data cell(s), expected at least 2")]
    MalformedRow { index: usize, cells: usize },
}

#[derive(Debug, Clone)]
pub struct PageParser {
    zones: ZoneTable,
    capacity: usize,
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new(ZoneTable::default(), ENTRY_BUFFER_SIZE)
    }
}

impl PageParser {
    pub fn new(zones: ZoneTable, capacity: usize) -> Self {
        Self { zones, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn parse(&self, body: &str) -> Result<EntryBuffer, ParseError> {
        let document = Html::parse_document(body);
        let table = first_element(document.root_element(), "table").ok_or(ParseError::NoTable)?;

        let rows = child_elements(table, "tbody").flat_map(|tbody| child_elements(tbody, "tr"));

        let mut entries = Vec::new();
        let mut skipped = 0;

        for (index, row) in rows.enumerate() {
            if entries.len() >= self.capacity {
                break;
            }

            let cells: Vec<String> = child_elements(row, "td").map(cell_text).collect();

            match cells.as_slice() {
                // Header rows use <th> only
                [] => continue,
                [_] => return Err(ParseError::MalformedRow { index, cells: 1 }),
                [date, song, ..] => match Entry::parse_row(date, song, &self.zones) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        skipped += 1;
                        warn!(row = index, date = %date, error = %e, "Skipping unparsable row");
                    }
                },
            }
        }

        debug!(entries = entries.len(), skipped, "Parsed playlist page");
        Ok(EntryBuffer::from_entries(entries, self.capacity))
    }
}

fn first_element<'a>(root: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == name)
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
