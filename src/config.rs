use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::Period;

pub const CONFIG_FILE: &str = "secureqr.json";

pub const ENV_SECRET: &str = "SECUREQR_SECRET";
pub const ENV_PERIOD: &str = "SECUREQR_PERIOD";
pub const ENV_SESSION_ID: &str = "SECUREQR_SESSION_ID";

/// Generator settings for one attendance session.
///
/// `secret` is the Base32 session secret and has no default.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub secret: String,
    #[serde(default = "default_period")]
    pub period: i64,
    #[serde(default)]
    pub session_id: i64,
}

fn default_period() -> i64 {
    Period::DEFAULT.seconds() as i64
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("secret", &"[REDACTED]")
            .field("period", &self.period)
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            period: default_period(),
            session_id: 0,
        }
    }

    /// Read `secureqr.json` from the working directory, falling back to the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(config) = Self::load_from(CONFIG_FILE) {
            return Ok(config);
        }
        Self::from_env()
    }

    /// `None` when the file is missing or not a valid config.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded generator config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable config file"
                );
                None
            }
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup(ENV_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        let period = match lookup(ENV_PERIOD) {
            Some(value) => parse_number(ENV_PERIOD, &value)?,
            None => default_period(),
        };
        let session_id = match lookup(ENV_SESSION_ID) {
            Some(value) => parse_number(ENV_SESSION_ID, &value)?,
            None => 0,
        };

        Ok(Self {
            secret,
            period,
            session_id,
        })
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
