use extbot_core::builders::{Activity, Status, DEFAULT_CACHED_MESSAGES};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no token given")]
    MissingToken,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: String,
    pub loglevel: LevelFilter,
    pub prefix: String,
    pub slash: Slash,
    pub cache: Cache,
    pub members: Members,
    pub presence: Presence,
}

impl Config {
    pub fn load<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;
        buf.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;

        if config.token.is_empty() {
            return Err(Error::MissingToken);
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            loglevel: LevelFilter::Info,
            prefix: String::from("!"),
            slash: Slash::default(),
            cache: Cache::default(),
            members: Members::default(),
            presence: Presence::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Slash {
    pub enabled: bool,
    /// Registers all slash commands in this guild instead of globally.
    pub default_guild: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Cache {
    /// Messages cached per channel, `0` disables the message cache.
    pub messages: usize,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            messages: DEFAULT_CACHED_MESSAGES,
        }
    }
}

/// Member chunking. `all` takes precedence over `guilds`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Members {
    pub all: bool,
    pub guilds: Vec<u64>,
    pub presences: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Presence {
    pub status: Status,
    pub activity: Option<Activity>,
}
