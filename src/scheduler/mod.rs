//! Adaptive polling schedule.
//!
//! After every cycle the scheduler picks one [`Action`] and a delay:
//!
//! | cycle result                              | action               | delay            |
//! |-------------------------------------------|----------------------|------------------|
//! | fetch or publish failed                   | `RetryAfterFailure`  | retry backoff    |
//! | page had no songs                         | `RetryEmpty`         | empty retry      |
//! | unchanged, current song within threshold  | `AwaitChange`        | poll interval    |
//! | unchanged, current song past threshold    | `SourceStale`        | stale interval   |
//! | changed, song started inside grace window | `HoldForGraceWindow` | rest of window   |
//! | changed, song started before the window   | `ResumePolling`      | poll interval    |
//!
//! Decisions are pure: the caller passes `now` and performs the sleep.

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::Entry;
use crate::publisher::PublishOutcome;

/// State carried between cycles. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerState {
    previous_newest_entry: Option<Entry>,
}

impl SchedulerState {
    pub fn previous_newest(&self) -> Option<&Entry> {
        self.previous_newest_entry.as_ref()
    }

    /// Called only after the buffer headed by `entry` was written.
    pub fn record_published(&mut self, entry: Entry) {
        self.previous_newest_entry = Some(entry);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RetryAfterFailure,
    RetryEmpty,
    AwaitChange,
    SourceStale,
    HoldForGraceWindow,
    ResumePolling,
}

impl Action {
    pub fn describe(&self) -> &'static str {
        match self {
            Action::RetryAfterFailure => "fetch or publish failed, backing off",
            Action::RetryEmpty => "no songs listed, retrying soon",
            Action::AwaitChange => "latest song unchanged",
            Action::SourceStale => "playlist has not been updated in a while, sleeping longer",
            Action::HoldForGraceWindow => "latest song just started, sleeping until the grace window closes",
            Action::ResumePolling => "latest song started a while ago, polling normally",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub delay: Duration,
}

impl Decision {
    pub fn new(action: Action, delay: Duration) -> Self {
        Self { action, delay }
    }
}

/// Timings that drive the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub retry_backoff: Duration,
    pub poll_interval: Duration,
    pub empty_retry: Duration,
    pub stale_threshold: Duration,
    pub stale_interval: Duration,
    pub grace_window: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_secs(60),
            poll_interval: Duration::from_secs(30),
            empty_retry: Duration::from_secs(30),
            stale_threshold: Duration::from_secs(10 * 60),
            stale_interval: Duration::from_secs(10 * 60),
            grace_window: Duration::from_secs(2 * 60),
        }
    }
}

impl Schedule {
    pub fn after_failure(&self) -> Decision {
        Decision::new(Action::RetryAfterFailure, self.retry_backoff)
    }

    pub fn after_publish(&self, outcome: &PublishOutcome, now: DateTime<Utc>) -> Decision {
        match outcome {
            PublishOutcome::NoChange => Decision::new(Action::RetryEmpty, self.empty_retry),
            PublishOutcome::Unchanged(newest) => {
                if playing_for(newest, now) > self.stale_threshold {
                    Decision::new(Action::SourceStale, self.stale_interval)
                } else {
                    Decision::new(Action::AwaitChange, self.poll_interval)
                }
            }
            PublishOutcome::Changed(newest) => {
                let elapsed = playing_for(newest, now);
                if elapsed < self.grace_window {
                    Decision::new(Action::HoldForGraceWindow, self.grace_window - elapsed)
                } else {
                    Decision::new(Action::ResumePolling, self.poll_interval)
                }
            }
        }
    }
}

/// Time since the entry started; zero if its timestamp is in the future.
fn playing_for(entry: &Entry, now: DateTime<Utc>) -> Duration {
    (now - entry.timestamp()).to_std().unwrap_or(Duration::ZERO)
}
