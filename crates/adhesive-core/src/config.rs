use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{errors::Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_CONVERTER_TIMEOUT_SECS: u64 = 300;

/// Typed configuration, resolved from `config.toml` plus environment overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub config_path: PathBuf,

    // Telegram
    pub telegram_bot_token: String,

    // Signal sticker account, used by the converter to upload packs.
    pub signal_username: String,
    pub signal_password: String,

    // Conversion service
    pub converter_endpoint: String,
    pub converter_timeout: Duration,
}

/// On-disk layout of `config.toml`. Every field is optional here; required
/// values are checked in [`Config::resolve`] once env overrides are applied.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub telegram: TelegramSection,
    #[serde(default)]
    pub signal: SignalSection,
    #[serde(default)]
    pub converter: ConverterSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramSection {
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignalSection {
    #[serde(default)]
    pub stickers: StickersSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct StickersSection {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConverterSection {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// A missing file is not an error; the environment may supply everything.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"))?;

        let config_path =
            env_path("ADHESIVE_CONFIG").unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let file = FileConfig::read(&config_path)?;

        Self::resolve(config_path, file, env_str)
    }

    /// Merges the file with overrides from `env` (env wins) and validates.
    pub fn resolve(
        config_path: PathBuf,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let telegram_bot_token = required(
            env("TELEGRAM_BOT_TOKEN").or(file.telegram.api_token),
            "telegram.api_token (TELEGRAM_BOT_TOKEN)",
        )?;
        let signal_username = required(
            env("SIGNAL_STICKERS_USERNAME").or(file.signal.stickers.username),
            "signal.stickers.username (SIGNAL_STICKERS_USERNAME)",
        )?;
        let signal_password = required(
            env("SIGNAL_STICKERS_PASSWORD").or(file.signal.stickers.password),
            "signal.stickers.password (SIGNAL_STICKERS_PASSWORD)",
        )?;
        let converter_endpoint = required(
            env("CONVERTER_ENDPOINT").or(file.converter.endpoint),
            "converter.endpoint (CONVERTER_ENDPOINT)",
        )?;

        let timeout_secs = match env("CONVERTER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("CONVERTER_TIMEOUT_SECS is not a number: {raw:?}"))
            })?,
            None => file
                .converter
                .timeout_secs
                .unwrap_or(DEFAULT_CONVERTER_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(Error::Config(
                "converter timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            config_path,
            telegram_bot_token,
            signal_username,
            signal_password,
            converter_endpoint,
            converter_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(v: Option<String>, name: &str) -> Result<String> {
    v.and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{name} is required")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

/// Loads `path` into the environment without overriding variables that are
/// already set. A missing file is fine; a malformed one is a config error.
fn load_dotenv_if_present(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
