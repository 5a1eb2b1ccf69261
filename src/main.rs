use anyhow::Result;
use clap::Parser;
use paprika_bot::bot;
use paprika_bot::cli::{self, Cli};
use paprika_bot::config::BotConfig;
use paprika_bot::{logging, version};

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command() {
        cli::Command::Run(args) => {
            logging::init(args.debug)?;
            bot::run_with_config(BotConfig::try_from(args)?).await
        }
        cli::Command::Version => {
            version::print();
            Ok(())
        }
    }
}
