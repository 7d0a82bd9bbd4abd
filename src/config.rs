//! Runtime configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::orchestrator::OrchestratorOptions;
use crate::osrm::OsrmConfig;
use crate::presentation::MapConfig;

pub const ENV_OSRM_URL: &str = "WAYPOINT_ROUTER_OSRM_URL";
pub const ENV_PROFILE: &str = "WAYPOINT_ROUTER_PROFILE";
pub const ENV_TIMEOUT_SECS: &str = "WAYPOINT_ROUTER_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "WAYPOINT_ROUTER_MAX_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub osrm: OsrmConfig,
    pub orchestrator: OrchestratorOptions,
    pub map: MapConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset or blank
    /// keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_OSRM_URL) {
            config.osrm.base_url = url.trim().to_string();
        }
        if let Some(profile) = get(ENV_PROFILE) {
            config.osrm.profile = profile.trim().to_string();
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_positive(ENV_TIMEOUT_SECS, &raw)?;
            config.set_timeout_secs(secs);
        }
        if let Some(raw) = get(ENV_MAX_ATTEMPTS) {
            config.orchestrator.max_attempts = parse_positive(ENV_MAX_ATTEMPTS, &raw)?;
        }

        Ok(config)
    }

    /// Applies one timeout to both the HTTP client and the orchestrator.
    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.osrm.timeout_secs = secs;
        self.orchestrator.timeout = Duration::from_secs(secs);
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let invalid = |reason: String| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason,
    };
    let value: T = raw.trim().parse().map_err(|err: T::Err| invalid(err.to_string()))?;
    if value <= T::default() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(value)
}
