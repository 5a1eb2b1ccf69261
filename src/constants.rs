pub const METRICS_PORT: u16 = 9900;
pub const UPDATES_TIMEOUT_SECS: u64 = 60;
pub const UPDATE_BUFFER: usize = 100;
pub const POLL_RETRY_DELAY_SECS: u64 = 3;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const PAPRIKA_API_URL: &str = "https://api.coinpaprika.com";

pub const COIN_PAGE_URL: &str = "http://coinpaprika.com/coin";
pub const WEBSITE_URL: &str = "https://coinpaprika.com";
pub const SOURCE_URL: &str = "https://github.com/coinpaprika/telegram-bot";

pub const INVALID_COIN_REPLY: &str = "invalid coin name|ticker|symbol";
