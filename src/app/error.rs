use thiserror::Error;

use crate::config::ConfigError;
use crate::fetcher::FetchError;
use crate::publisher::PublishError;

#[derive(Error, Debug)]
pub enum RadiologError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RadiologError>;
