//! Continuous poll loop.
//!
//! Runs fetch → detect/publish → sleep forever, one cycle at a time. The
//! only way out is a shutdown signal, which abandons whatever fetch or sleep
//! is in flight without a final flush.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::Result;
use crate::config::format_interval;
use crate::fetcher::FetchCycle;
use crate::publisher::Publisher;
use crate::scheduler::{Clock, Decision, Schedule, SchedulerState};

pub struct Daemon {
    cycle: FetchCycle,
    publisher: Publisher,
    schedule: Schedule,
    clock: Arc<dyn Clock>,
    state: SchedulerState,
}

impl Daemon {
    pub fn new(
        cycle: FetchCycle,
        publisher: Publisher,
        schedule: Schedule,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cycle,
            publisher,
            schedule,
            clock,
            state: SchedulerState::default(),
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Runs until SIGINT/SIGTERM (Ctrl-C on Windows).
    pub async fn run(&mut self) -> Result<()> {
        info!(
            url = %self.cycle.url(),
            destination = %self.publisher.destination(),
            "radiolog daemon started (PID: {})",
            std::process::id()
        );

        tokio::select! {
            _ = self.poll_forever() => {}
            signal = shutdown_signal() => {
                signal?;
                info!("Shutdown signal received, stopping");
            }
        }

        Ok(())
    }

    async fn poll_forever(&mut self) {
        loop {
            let decision = self.run_cycle().await;
            tokio::time::sleep(decision.delay).await;
        }
    }

    /// Performs one fetch and publish step and returns how long to sleep.
    /// Never sleeps itself.
    pub async fn run_cycle(&mut self) -> Decision {
        let decision = match self.cycle.fetch().await {
            Err(e) => {
                warn!(url = %self.cycle.url(), error = %e, "Fetch failed");
                self.schedule.after_failure()
            }
            Ok(buffer) => {
                let now = self.clock.now();
                match self.publisher.detect_and_publish(&buffer, &mut self.state) {
                    Ok(outcome) => self.schedule.after_publish(&outcome, now),
                    Err(e) => {
                        error!(
                            destination = %self.publisher.destination(),
                            error = %e,
                            "Publish failed, will retry"
                        );
                        self.schedule.after_failure()
                    }
                }
            }
        };

        info!(
            action = ?decision.action,
            delay_secs = decision.delay.as_secs(),
            "{}; sleeping {}",
            decision.action.describe(),
            format_interval(decision.delay)
        );
        decision
    }
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
