//! Snapshot records consumed by the planner.
//!
//! Technicians and jobs are read once per run from the external store and are
//! never mutated by the optimizer itself.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Minutes in a planning day.
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Duration assumed for jobs that carry no estimate.
pub const DEFAULT_JOB_DURATION_HOURS: f64 = 2.0;

/// Hourly rate assumed for technicians that carry none.
pub const DEFAULT_HOURLY_RATE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicianId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Job priority. Variant order is the scheduling order, lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    #[serde(alias = "pending")]
    Unassigned,
    Scheduled,
    InProgress,
    #[serde(alias = "completed")]
    Done,
    Cancelled,
}

/// Interval in minutes after midnight.
///
/// For a job this is the interval in which service must *start*; for a
/// technician it bounds the whole working day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn from_hours(start_h: f64, end_h: f64) -> Self {
        Self::new(start_h * 60.0, end_h * 60.0)
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.start >= 0.0
            && self.start <= self.end
            && self.end <= MINUTES_PER_DAY
    }

    pub fn contains(&self, minute: f64) -> bool {
        minute >= self.start && minute <= self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub home_base: Option<Coordinate>,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    /// Falls back to the configured working day when absent.
    #[serde(default)]
    pub working_hours: Option<TimeWindow>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Technician {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: TechnicianId(id),
            name: name.into(),
            home_base: None,
            hourly_rate: DEFAULT_HOURLY_RATE,
            working_hours: None,
            active: true,
            skills: Vec::new(),
        }
    }

    /// Capability-set membership: every required skill must be held.
    pub fn can_perform(&self, job: &Job) -> bool {
        job.required_skills
            .iter()
            .all(|skill| self.skills.iter().any(|held| held == skill))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub estimated_duration_hours: Option<f64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_technician: Option<TechnicianId>,
    #[serde(default)]
    pub scheduled_start: Option<NaiveDateTime>,
}

impl Job {
    pub fn new(id: u64) -> Self {
        Self {
            id: JobId(id),
            description: String::new(),
            location: None,
            estimated_duration_hours: None,
            priority: Priority::default(),
            time_window: None,
            status: JobStatus::Unassigned,
            required_skills: Vec::new(),
            scheduled_date: None,
            assigned_technician: None,
            scheduled_start: None,
        }
    }

    pub fn duration_hours(&self) -> f64 {
        self.estimated_duration_hours
            .unwrap_or(DEFAULT_JOB_DURATION_HOURS)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_hours() * 60.0
    }
}

fn default_hourly_rate() -> f64 {
    DEFAULT_HOURLY_RATE
}

fn default_active() -> bool {
    true
}
