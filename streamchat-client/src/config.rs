//! Client configuration: delivery mode and environment resolution.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the bearer credential. Required.
pub const ENV_TOKEN: &str = "STREAMCHAT_TOKEN";
/// Environment variable overriding the endpoint base URL.
pub const ENV_BASE_URL: &str = "STREAMCHAT_BASE_URL";
/// Environment variable selecting the [`DeliveryMode`].
pub const ENV_DELIVERY: &str = "STREAMCHAT_DELIVERY";
/// Environment variable setting the request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "STREAMCHAT_TIMEOUT_SECS";

/// How decoded records are handed to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    /// One fragment per record, as soon as its line has arrived.
    #[default]
    PerRecord,
    /// Read the whole body, then deliver every record concatenated as a
    /// single fragment. The fragment is delivered even when it is empty.
    Buffered,
}

impl DeliveryMode {
    /// The name used in configuration (`per-record` or `buffered`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerRecord => "per-record",
            Self::Buffered => "buffered",
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-record" | "per_record" | "incremental" => Ok(Self::PerRecord),
            "buffered" => Ok(Self::Buffered),
            other => Err(format!(
                "unknown delivery mode `{other}`, expected `per-record` or `buffered`"
            )),
        }
    }
}

/// Errors from resolving client configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} is not set")]
    Missing(String),

    /// A variable is set but its value is unusable.
    #[error("invalid {var}: {reason}")]
    Invalid {
        /// The variable name.
        var: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Settings read from the environment, before the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnvSettings {
    pub(crate) token: String,
    pub(crate) base_url: Option<String>,
    pub(crate) delivery: DeliveryMode,
    pub(crate) timeout: Option<Duration>,
}

impl EnvSettings {
    /// Resolve settings through `lookup`, which returns a variable's value.
    ///
    /// Empty values count as unset.
    pub(crate) fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let token = get(ENV_TOKEN).ok_or_else(|| ConfigError::Missing(ENV_TOKEN.into()))?;

        let delivery = match get(ENV_DELIVERY) {
            Some(raw) => raw.parse::<DeliveryMode>().map_err(|reason| ConfigError::Invalid {
                var: ENV_DELIVERY.into(),
                reason,
            })?,
            None => DeliveryMode::default(),
        };

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            token,
            base_url: get(ENV_BASE_URL).map(|url| url.trim_end_matches('/').to_string()),
            delivery,
            timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: ENV_TIMEOUT_SECS.into(),
        reason,
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|e| invalid(format!("`{raw}` is not a whole number of seconds: {e}")))?;
    if secs == 0 {
        return Err(invalid("must be greater than 0".into()));
    }
    Ok(Duration::from_secs(secs))
}
