use clap::{Args, Parser, Subcommand};

use crate::constants::{
    METRICS_PORT, PAPRIKA_API_URL, TELEGRAM_API_URL, UPDATES_TIMEOUT_SECS,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Telegram bot relaying coinpaprika market data"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bot and its metrics endpoint
    Run(RunArgs),
    /// Show the application version and git revision
    Version,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Telegram bot API token
    #[arg(short, long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Enable debugging messages
    #[arg(short, long)]
    pub debug: bool,

    /// Metrics port, served under /metrics
    #[arg(short, long, default_value_t = METRICS_PORT)]
    pub metrics: u16,

    /// Long-poll timeout for telegram updates, in seconds
    #[arg(long, default_value_t = UPDATES_TIMEOUT_SECS)]
    pub updates_timeout: u64,

    #[arg(long, hide = true, default_value = TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    #[arg(long, hide = true, default_value = PAPRIKA_API_URL)]
    pub paprika_api_url: String,
}
