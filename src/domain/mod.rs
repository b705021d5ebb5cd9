pub mod buffer;
pub mod entry;
pub mod playlist;
pub mod zone;

pub use buffer::{EntryBuffer, ENTRY_BUFFER_SIZE};
pub use entry::{split_song, Entry, EntryParseError};
pub use playlist::Playlist;
pub use zone::ZoneTable;
