//! # radiolog
//!
//! Polls a radio station's "recently played" page and republishes it as
//! JSON whenever the current song changes, so a web frontend can show
//! now-playing and recent history without scraping HTML.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → PageParser → Publisher (change detection) → Schedule → sleep → …
//! ```
//!
//! - [`fetcher`]: HTTP transport and the fetch cycle
//! - [`parser`]: HTML table to [`EntryBuffer`](domain::EntryBuffer)
//! - [`publisher`]: change detection and JSON sinks
//! - [`scheduler`]: adaptive decision table for the next poll
//! - [`daemon`]: the poll loop
//!
//! ## Quick Start
//!
//! ```bash
//! # Poll forever, writing to stdout
//! radiolog
//!
//! # Poll forever, replacing a file the frontend serves
//! radiolog /srv/www/latest.json
//!
//! # Fetch once and exit
//! radiolog --once latest.json
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// parser and schedule from a [`Config`](config::Config).
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/radiolog/config.toml`.
pub mod config;

/// Background poll loop with signal-driven shutdown.
pub mod daemon;

/// Core domain models.
///
/// - [`Entry`](domain::Entry): one played track
/// - [`EntryBuffer`](domain::EntryBuffer): bounded, most-recent-first entries
/// - [`Playlist`](domain::Playlist): the published JSON document
/// - [`ZoneTable`](domain::ZoneTable): zone abbreviations to IANA zones
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`FetchCycle`](fetcher::FetchCycle): GET, status check and parse
pub mod fetcher;

/// Recently-played page parsing.
pub mod parser;

/// Change detection and output sinks.
pub mod publisher;

/// Adaptive polling schedule.
pub mod scheduler;
