//! Configuration management for radiolog.
//!
//! Configuration is read from `~/.config/radiolog/config.toml` at startup,
//! or from the path given with `--config`. If the default file doesn't exist,
//! a default configuration with comments is created.

pub mod interval;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use url::Url;

use crate::domain::{ZoneTable, ENTRY_BUFFER_SIZE};
use crate::scheduler::Schedule;

pub use interval::{format_interval, parse_interval};

pub const DEFAULT_URL: &str = "http://nol888.com/~nlum/caa-radio.php";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub schedule: ScheduleConfig,
    /// Extra zone abbreviations mapped to IANA zones, e.g. `IST = "Asia/Kolkata"`.
    pub zones: BTreeMap<String, String>,
}

/// Where the playlist page lives and how to fetch it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How many recently played songs to keep (default: 50)
    pub buffer_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            request_timeout_secs: 10,
            user_agent: concat!("radiolog/", env!("CARGO_PKG_VERSION")).to_string(),
            buffer_size: ENTRY_BUFFER_SIZE,
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Polling timings, written as intervals like `30s` or `10m`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub retry_backoff: String,
    pub poll_interval: String,
    pub empty_retry: String,
    pub stale_threshold: String,
    pub stale_interval: String,
    pub grace_window: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            retry_backoff: "60s".to_string(),
            poll_interval: "30s".to_string(),
            empty_retry: "30s".to_string(),
            stale_threshold: "10m".to_string(),
            stale_interval: "10m".to_string(),
            grace_window: "2m".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn schedule(&self) -> Result<Schedule, ConfigError> {
        let field = |name: &str, value: &str| {
            parse_interval(value)
                .map_err(|e| ConfigError::Invalid(format!("schedule.{}: {}", name, e)))
        };

        // A zero wait on any of these would poll the station in a tight loop.
        let nonzero = |name: &str, value: &str| -> Result<Duration, ConfigError> {
            let interval = field(name, value)?;
            if interval.is_zero() {
                return Err(ConfigError::Invalid(format!(
                    "schedule.{} must be greater than zero",
                    name
                )));
            }
            Ok(interval)
        };

        Ok(Schedule {
            retry_backoff: nonzero("retry_backoff", &self.retry_backoff)?,
            poll_interval: nonzero("poll_interval", &self.poll_interval)?,
            empty_retry: nonzero("empty_retry", &self.empty_retry)?,
            stale_threshold: field("stale_threshold", &self.stale_threshold)?,
            stale_interval: field("stale_interval", &self.stale_interval)?,
            grace_window: field("grace_window", &self.grace_window)?,
        })
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/radiolog/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("radiolog").join("config.toml"))
    }

    /// Checks everything that would otherwise fail later in the poll loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.source.url).map_err(|e| ConfigError::InvalidUrl {
            url: self.source.url.clone(),
            source: e,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "source.url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.source.buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "source.buffer_size must be at least 1".to_string(),
            ));
        }

        self.schedule.schedule()?;
        self.zone_table()?;
        Ok(())
    }

    /// Built-in zones plus the `[zones]` section.
    pub fn zone_table(&self) -> Result<ZoneTable, ConfigError> {
        let mut zones = ZoneTable::default();
        for (abbr, name) in &self.zones {
            let tz = name.parse::<Tz>().map_err(|_| {
                ConfigError::Invalid(format!("zones.{}: unknown IANA zone {:?}", abbr, name))
            })?;
            zones.insert(abbr, tz);
        }
        Ok(zones)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        format!(
            r##"# radiolog configuration
#
# Intervals can be written as "30s", "10m", "1h" or plain seconds.

[source]
# Page listing the recently played songs
url = "{url}"

# Give up on a request after this many seconds
request_timeout_secs = 10

# How many recently played songs to keep in the published JSON
buffer_size = {buffer_size}

[schedule]
# Wait after a failed fetch (network error, bad status, unreadable page)
retry_backoff = "60s"

# Normal re-poll while waiting for the song to change
poll_interval = "30s"

# Re-poll when the page lists no songs
empty_retry = "30s"

# If the current song has been current for longer than this,
# assume the playlist itself stopped updating...
stale_threshold = "10m"

# ...and poll this rarely until it changes again
stale_interval = "10m"

# After a new song starts, do not poll again until it has played this long
grace_window = "2m"

[zones]
# Extra zone abbreviations for the date column, as IANA zone names.
# PST, PDT, MST, MDT, CST, CDT, EST, EDT, AKST, AKDT, HST, UTC and GMT
# are built in.
# IST = "Asia/Kolkata"
"##,
            url = DEFAULT_URL,
            buffer_size = ENTRY_BUFFER_SIZE,
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid source URL {url:?}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
