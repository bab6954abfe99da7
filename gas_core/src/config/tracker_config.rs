use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::common::tracker_error::TrackerError;
use crate::sample::history_window::DEFAULT_CAPACITY;

pub const ENV_API_KEY: &str = "ETHERSCAN_API_KEY";
pub const ENV_NOTIFIER_FROM: &str = "GAS_NOTIFIER_FROM";
pub const ENV_NOTIFIER_TO: &str = "GAS_NOTIFIER_TO";
pub const ENV_NOTIFIER_PASSWORD: &str = "GAS_NOTIFIER_PASSWORD";
pub const ENV_SMTP_HOST: &str = "GAS_NOTIFIER_SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "GAS_NOTIFIER_SMTP_PORT";
pub const ENV_HISTORY_LEN: &str = "GAS_TRACKER_HISTORY_LEN";
pub const ENV_STORE: &str = "GAS_TRACKER_STORE";

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_STORE_FILE: &str = ".gas_prices.json";

/// Store locations with this prefix name a DynamoDB table
pub const TABLE_PREFIX: &str = "dynamodb:";
pub const DEFAULT_TABLE: &str = "gasPrices";

/// Where the history lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// JSON or CSV file, picked by extension
    File(PathBuf),
    /// Remote table with one item per sample, keyed by timestamp
    Table(String),
}

impl FromStr for StoreLocation {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrackerError::configuration("store location is empty"));
        }
        match s.strip_prefix(TABLE_PREFIX).map(str::trim) {
            Some("") => Ok(Self::Table(DEFAULT_TABLE.to_string())),
            Some(name) => Ok(Self::Table(name.to_string())),
            None => Ok(Self::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Table(name) => write!(f, "{}{}", TABLE_PREFIX, name),
        }
    }
}

/// Credentials and endpoint for the e-mail notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub from_addr: String,
    pub to_addr: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

/// Which external settings a command needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    /// Only touches the local history
    Offline,
    /// Fetches prices but logs notifications instead of mailing them
    DryRun,
    /// Fetches prices and sends e-mail
    Live,
    /// Sends e-mail about a price given on the command line
    ManualPrice,
}

impl ConfigMode {
    fn needs_api_key(&self) -> bool {
        matches!(self, Self::DryRun | Self::Live)
    }

    fn needs_email(&self) -> bool {
        matches!(self, Self::Live | Self::ManualPrice)
    }
}

/// Tracker settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// `None` unless the command fetches from the oracle
    pub api_key: Option<String>,
    /// `None` when running without a mail transport
    pub email: Option<EmailConfig>,
    pub history_len: usize,
    pub store: StoreLocation,
}

impl TrackerConfig {
    /// Read settings from the process environment.
    pub fn from_env(mode: ConfigMode) -> Result<Self, TrackerError> {
        Self::new(|key| std::env::var(key).ok(), mode)
    }

    pub fn from_map(conf: &HashMap<String, String>, mode: ConfigMode) -> Result<Self, TrackerError> {
        Self::new(|key| conf.get(key).cloned(), mode)
    }

    /// Build from an arbitrary key lookup. Required keys that are missing or
    /// empty, and values that do not parse, are configuration errors.
    pub fn new<F>(lookup: F, mode: ConfigMode) -> Result<Self, TrackerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let conf = ConfigLookup { lookup };

        let api_key = if mode.needs_api_key() {
            Some(conf.required(ENV_API_KEY)?)
        } else {
            conf.optional(ENV_API_KEY)
        };

        let email = if mode.needs_email() {
            Some(EmailConfig {
                from_addr: conf.required(ENV_NOTIFIER_FROM)?,
                to_addr: conf.required(ENV_NOTIFIER_TO)?,
                password: conf.required(ENV_NOTIFIER_PASSWORD)?,
                smtp_host: conf
                    .optional(ENV_SMTP_HOST)
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port: conf.parsed(ENV_SMTP_PORT)?.unwrap_or(DEFAULT_SMTP_PORT),
            })
        } else {
            None
        };

        let history_len = conf.parsed(ENV_HISTORY_LEN)?.unwrap_or(DEFAULT_CAPACITY);
        if history_len == 0 {
            return Err(TrackerError::configuration(format!(
                "{} must be at least 1",
                ENV_HISTORY_LEN
            )));
        }

        let store = match conf.optional(ENV_STORE) {
            Some(raw) => raw.parse()?,
            None => StoreLocation::File(default_store_path(&conf)?),
        };

        Ok(Self {
            api_key,
            email,
            history_len,
            store,
        })
    }
}

fn default_store_path<F>(conf: &ConfigLookup<F>) -> Result<PathBuf, TrackerError>
where
    F: Fn(&str) -> Option<String>,
{
    let home = conf
        .optional("HOME")
        .or_else(|| conf.optional("USERPROFILE"))
        .ok_or_else(|| {
            TrackerError::configuration(format!(
                "cannot find the home directory, set {} explicitly",
                ENV_STORE
            ))
        })?;
    Ok(PathBuf::from(home).join(DEFAULT_STORE_FILE))
}

struct ConfigLookup<F> {
    lookup: F,
}

impl<F> ConfigLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, TrackerError> {
        self.optional(key)
            .ok_or_else(|| TrackerError::configuration(format!("{} is not set", key)))
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, TrackerError>
    where
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                TrackerError::configuration(format!("invalid {}={}: {}", key, raw, e))
            }),
            None => Ok(None),
        }
    }
}
