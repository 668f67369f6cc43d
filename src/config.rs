//! Optimizer and routing-backend configuration.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::TimeWindow;

/// Urban driving speed used to turn distance into travel time.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 35.0;

pub const DEFAULT_MAX_LOCAL_SEARCH_PASSES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Average travel speed in km/h.
    pub avg_speed_kmh: f64,
    /// Upper bound on local search passes.
    pub max_local_search_passes: usize,
    /// Working day for technicians without their own hours.
    pub working_hours_window: TimeWindow,
    /// Count the drive home against the working day.
    pub return_to_base: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            avg_speed_kmh: DEFAULT_AVG_SPEED_KMH,
            max_local_search_passes: DEFAULT_MAX_LOCAL_SEARCH_PASSES,
            working_hours_window: TimeWindow::from_hours(8.0, 17.0),
            return_to_base: false,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.avg_speed_kmh.is_finite() || self.avg_speed_kmh <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.avg_speed_kmh));
        }
        if self.max_local_search_passes == 0 {
            return Err(ConfigError::InvalidPasses);
        }
        if !self.working_hours_window.is_valid() {
            return Err(ConfigError::InvalidWorkingHours {
                start: self.working_hours_window.start,
                end: self.working_hours_window.end,
            });
        }
        Ok(())
    }

    /// Load overrides from the environment (and a `.env` file if present).
    ///
    /// Recognised variables: `FIELDOPS_AVG_SPEED_KMH`,
    /// `FIELDOPS_MAX_LOCAL_SEARCH_PASSES`, `FIELDOPS_WORKDAY_START`,
    /// `FIELDOPS_WORKDAY_END` (`HH:MM`) and `FIELDOPS_RETURN_TO_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("FIELDOPS_AVG_SPEED_KMH") {
            config.avg_speed_kmh = parse_var("FIELDOPS_AVG_SPEED_KMH", &value)?;
        }
        if let Some(value) = lookup("FIELDOPS_MAX_LOCAL_SEARCH_PASSES") {
            config.max_local_search_passes = parse_var("FIELDOPS_MAX_LOCAL_SEARCH_PASSES", &value)?;
        }
        if let Some(value) = lookup("FIELDOPS_WORKDAY_START") {
            config.working_hours_window.start = parse_clock("FIELDOPS_WORKDAY_START", &value)?;
        }
        if let Some(value) = lookup("FIELDOPS_WORKDAY_END") {
            config.working_hours_window.end = parse_clock("FIELDOPS_WORKDAY_END", &value)?;
        }
        if let Some(value) = lookup("FIELDOPS_RETURN_TO_BASE") {
            config.return_to_base = parse_var("FIELDOPS_RETURN_TO_BASE", &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}

/// `HH:MM` to minutes after midnight.
fn parse_clock(var: &'static str, value: &str) -> Result<f64, ConfigError> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })?;
    Ok(f64::from(time.num_seconds_from_midnight()) / 60.0)
}

/// OSRM table service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}
