use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{FetchCycle, Fetcher, HttpFetcher};
use crate::parser::PageParser;
use crate::scheduler::Schedule;

/// Wires the configured fetcher, parser and schedule together.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub parser: PageParser,
    pub schedule: Schedule,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            config.source.request_timeout(),
            &config.source.user_agent,
        )?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Same as [`AppContext::new`] but with a caller-supplied transport.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        config.validate()?;

        let parser = PageParser::new(config.zone_table()?, config.source.buffer_size);
        let schedule = config.schedule.schedule()?;

        Ok(Self {
            config,
            fetcher,
            parser,
            schedule,
        })
    }

    pub fn fetch_cycle(&self) -> FetchCycle {
        FetchCycle::new(
            self.fetcher.clone(),
            self.parser.clone(),
            self.config.source.url.clone(),
        )
    }
}
