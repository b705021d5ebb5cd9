use std::collections::HashMap;

use chrono_tz::Tz;

use crate::domain::entry::EntryParseError;

/// Built-in abbreviations and the IANA zone each one is read in.
const BUILTIN_ZONES: &[(&str, Tz)] = &[
    ("PST", Tz::America__Los_Angeles),
    ("PDT", Tz::America__Los_Angeles),
    ("MST", Tz::America__Denver),
    ("MDT", Tz::America__Denver),
    ("CST", Tz::America__Chicago),
    ("CDT", Tz::America__Chicago),
    ("EST", Tz::America__New_York),
    ("EDT", Tz::America__New_York),
    ("AKST", Tz::America__Anchorage),
    ("AKDT", Tz::America__Anchorage),
    ("HST", Tz::Pacific__Honolulu),
    ("UTC", Tz::UTC),
    ("GMT", Tz::UTC),
];

/// Maps zone abbreviations found in the date cell to IANA zones.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: HashMap<String, Tz>,
}

impl Default for ZoneTable {
    fn default() -> Self {
        let zones = BUILTIN_ZONES
            .iter()
            .map(|(abbr, tz)| (abbr.to_string(), *tz))
            .collect();
        Self { zones }
    }
}

impl ZoneTable {
    pub fn empty() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }

    /// Adds or replaces an abbreviation.
    pub fn insert(&mut self, abbr: &str, tz: Tz) {
        self.zones.insert(abbr.to_ascii_uppercase(), tz);
    }

    /// Looks up an abbreviation. Unknown abbreviations are an error, never UTC.
    pub fn resolve(&self, abbr: &str) -> Result<Tz, EntryParseError> {
        self.zones
            .get(&abbr.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| EntryParseError::UnknownZone(abbr.to_string()))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
