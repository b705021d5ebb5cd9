use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use radiolog::app::AppContext;
use radiolog::cli::{commands, Cli};
use radiolog::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout may be the JSON sink
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config)?;

    if cli.once {
        commands::run_once(&ctx, cli.destination.as_deref()).await?;
    } else {
        commands::run_daemon(&ctx, cli.destination.as_deref()).await?;
    }

    Ok(())
}
