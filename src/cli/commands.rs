use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::app::{AppContext, Result};
use crate::daemon::Daemon;
use crate::publisher::{open_sink, Publisher, Sink};
use crate::scheduler::SystemClock;

/// One fetch, one unconditional write. Any fetch failure is returned so the
/// binary exits non-zero.
pub async fn run_once(ctx: &AppContext, destination: Option<&Path>) -> Result<()> {
    write_once(ctx, open_sink(destination)).await
}

pub async fn write_once(ctx: &AppContext, sink: Box<dyn Sink + Send>) -> Result<()> {
    let buffer = ctx.fetch_cycle().fetch().await?;

    let mut publisher = Publisher::new(sink);
    publisher.publish(&buffer)?;

    info!(
        songs = buffer.len(),
        destination = %publisher.destination(),
        "Wrote playlist"
    );
    Ok(())
}

/// Polls until a shutdown signal arrives.
pub async fn run_daemon(ctx: &AppContext, destination: Option<&Path>) -> Result<()> {
    let mut daemon = Daemon::new(
        ctx.fetch_cycle(),
        Publisher::new(open_sink(destination)),
        ctx.schedule,
        Arc::new(SystemClock),
    );
    daemon.run().await
}
