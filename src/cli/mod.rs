pub mod commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "radiolog")]
#[command(about = "Save the latest songs played on the radio to JSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Destination filename or, if left blank, stdout
    pub destination: Option<PathBuf>,

    /// Fetch once, write the playlist and exit instead of polling forever
    #[arg(long)]
    pub once: bool,

    /// Config file to use instead of ~/.config/radiolog/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
