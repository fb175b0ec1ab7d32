//! Service configuration.
//!
//! Read from the environment (after loading `.env`):
//! - `TRAINER_DAILY_GOAL`: answers per day that complete the daily goal (default 20)
//! - `TRAINER_DAILY_RESET_HOUR`: local hour (0-23) when a new study day begins (default 0)
//! - `TRAINER_UTC_OFFSET_MINUTES`: offset of the users' local time from UTC (default 0)

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DAILY_GOAL_VAR: &str = "TRAINER_DAILY_GOAL";
pub const DAILY_RESET_HOUR_VAR: &str = "TRAINER_DAILY_RESET_HOUR";
pub const UTC_OFFSET_VAR: &str = "TRAINER_UTC_OFFSET_MINUTES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub daily_goal: u32,
    pub daily_reset_hour: u32,
    pub utc_offset_minutes: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            daily_goal: 20,
            daily_reset_hour: 0,
            utc_offset_minutes: 0,
        }
    }
}

impl ServiceConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let daily_goal = parse_var(&lookup, DAILY_GOAL_VAR)?.unwrap_or(defaults.daily_goal);
        let daily_reset_hour = parse_var::<u32, _>(&lookup, DAILY_RESET_HOUR_VAR)?
            .unwrap_or(defaults.daily_reset_hour)
            .min(23);
        let utc_offset_minutes =
            parse_var(&lookup, UTC_OFFSET_VAR)?.unwrap_or(defaults.utc_offset_minutes);

        let config = Self {
            daily_goal,
            daily_reset_hour,
            utc_offset_minutes,
        };
        if config.offset().is_none() {
            return Err(ConfigError::Invalid {
                key: UTC_OFFSET_VAR,
                value: utc_offset_minutes.to_string(),
            });
        }
        Ok(config)
    }

    fn offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    /// Users' local offset from UTC; UTC itself if the configured value is out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        self.offset().unwrap_or_else(|| Utc.fix())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
