use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::cli::RunArgs;
use crate::constants::{METRICS_PORT, PAPRIKA_API_URL, TELEGRAM_API_URL, UPDATES_TIMEOUT_SECS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("telegram bot token is required")]
    MissingToken,
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub debug: bool,
    pub updates_timeout: Duration,
    pub metrics_addr: SocketAddr,
    pub telegram_api_url: String,
    pub paprika_api_url: String,
}

impl BotConfig {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            token,
            debug: false,
            updates_timeout: Duration::from_secs(UPDATES_TIMEOUT_SECS),
            metrics_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), METRICS_PORT),
            telegram_api_url: TELEGRAM_API_URL.to_string(),
            paprika_api_url: PAPRIKA_API_URL.to_string(),
        })
    }
}

impl TryFrom<RunArgs> for BotConfig {
    type Error = ConfigError;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let mut config = BotConfig::new(args.token)?;
        config.debug = args.debug;
        config.metrics_addr.set_port(args.metrics);
        if args.updates_timeout > 0 {
            config.updates_timeout = Duration::from_secs(args.updates_timeout);
        }
        config.telegram_api_url = args.telegram_api_url.trim_end_matches('/').to_string();
        config.paprika_api_url = args.paprika_api_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}
