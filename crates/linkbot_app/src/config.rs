//! Process configuration read from the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bot_logging::LogDestination;
use log::LevelFilter;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleParser {
    /// First `<title>` match, no HTML parsing.
    Regex,
    Html,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, PartialEq)]
pub struct BotConfig {
    pub token: String,
    pub data_dir: PathBuf,
    pub store: StoreKind,
    pub title_parser: TitleParser,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub fetch_timeout: Duration,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("store", &self.store)
            .field("title_parser", &self.title_parser)
            .field("log_destination", &self.log_destination)
            .field("log_level", &self.log_level)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup. Unset and blank values fall
    /// back to defaults, except for the token.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token = get("BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let data_dir = get("LINKBOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let store = match get("LINKBOT_STORE") {
            None => StoreKind::File,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "file" => StoreKind::File,
                "memory" => StoreKind::Memory,
                _ => return Err(invalid("LINKBOT_STORE", value)),
            },
        };

        let title_parser = match get("LINKBOT_TITLE_PARSER") {
            None => TitleParser::Regex,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "regex" => TitleParser::Regex,
                "html" => TitleParser::Html,
                _ => return Err(invalid("LINKBOT_TITLE_PARSER", value)),
            },
        };

        let log_destination = match get("LINKBOT_LOG") {
            None => LogDestination::Terminal,
            Some(value) => {
                LogDestination::parse(&value).ok_or_else(|| invalid("LINKBOT_LOG", value))?
            }
        };

        let log_level = match get("LINKBOT_LOG_LEVEL") {
            None => LevelFilter::Info,
            Some(value) => {
                LevelFilter::from_str(&value).map_err(|_| invalid("LINKBOT_LOG_LEVEL", value))?
            }
        };

        let fetch_timeout = match get("LINKBOT_FETCH_TIMEOUT_SECS") {
            None => DEFAULT_FETCH_TIMEOUT,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(invalid("LINKBOT_FETCH_TIMEOUT_SECS", value)),
            },
        };

        Ok(Self {
            token,
            data_dir,
            store,
            title_parser,
            log_destination,
            log_level,
            fetch_timeout,
        })
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, value }
}
