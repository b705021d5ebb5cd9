//! Change detection and publishing of the playlist document.

mod sink;

pub use sink::{open_sink, FileSink, MemorySink, Sink, StdoutSink};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Entry, EntryBuffer, Playlist};
use crate::scheduler::SchedulerState;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize playlist: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write playlist: {0}")]
    Io(#[from] std::io::Error),
}

/// What a detect-and-publish step saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The buffer was empty; nothing to compare or publish.
    NoChange,
    /// The newest entry matches the last published one.
    Unchanged(Entry),
    /// A new newest entry; the whole buffer was published.
    Changed(Entry),
}

pub struct Publisher {
    sink: Box<dyn Sink + Send>,
}

impl Publisher {
    pub fn new(sink: Box<dyn Sink + Send>) -> Self {
        Self { sink }
    }

    pub fn destination(&self) -> String {
        self.sink.describe()
    }

    /// Serializes the full buffer and writes it, regardless of state.
    pub fn publish(&mut self, buffer: &EntryBuffer) -> Result<(), PublishError> {
        let document = Playlist::from_buffer(buffer).to_json()?;
        self.sink.write_document(&document)?;
        debug!(songs = buffer.len(), bytes = document.len(), "Wrote playlist");
        Ok(())
    }

    /// Publishes only when the newest entry differs from the last one
    /// published. `state` advances only after a successful write.
    pub fn detect_and_publish(
        &mut self,
        buffer: &EntryBuffer,
        state: &mut SchedulerState,
    ) -> Result<PublishOutcome, PublishError> {
        let Some(newest) = buffer.newest() else {
            return Ok(PublishOutcome::NoChange);
        };

        if state.previous_newest() == Some(newest) {
            return Ok(PublishOutcome::Unchanged(newest.clone()));
        }

        self.publish(buffer)?;
        state.record_published(newest.clone());

        info!(
            song = %newest.display_name(),
            songs = buffer.len(),
            destination = %self.sink.describe(),
            "Latest song changed, published playlist"
        );
        Ok(PublishOutcome::Changed(newest.clone()))
    }
}
