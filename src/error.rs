//! Error types for planning runs.
//!
//! Only [`ScheduleError`] aborts a run. Per-job problems are collected as
//! [`UnassignedReason`] values in the result instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an optimization run or a commit.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Nothing left to plan after eligibility filtering.
    #[error("no feasible input: {technicians} eligible technicians, {jobs} eligible jobs")]
    NoFeasibleInput { technicians: usize, jobs: usize },

    #[error("invalid optimizer configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("failed to build distance matrix")]
    Matrix(#[from] MatrixError),

    /// The external store failed while reading the snapshot or committing.
    #[error("store operation `{operation}` failed")]
    Store {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ScheduleError {
    pub(crate) fn store<E>(operation: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store {
            operation,
            source: Box::new(source),
        }
    }
}

/// Errors raised by distance matrix providers.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("matrix request failed")]
    Http(#[from] reqwest::Error),

    #[error("matrix response is missing the `{0}` annotation")]
    MissingAnnotation(&'static str),

    #[error("matrix has {actual} rows/columns, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("average speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("local search needs at least one pass")]
    InvalidPasses,

    #[error("working hours {start}..{end} are not a valid window")]
    InvalidWorkingHours { start: f64, end: f64 },

    #[error("environment variable {var} has invalid value {value:?}")]
    Env { var: &'static str, value: String },
}

/// Why a job ended up outside every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Every capable technician's working day is already full.
    NoCapacity,
    /// The job's window cannot be met by any capable technician.
    NoTimeWindowFit,
    /// Nobody eligible holds the required skills.
    CapabilityMismatch,
    MissingLocation,
    IneligibleStatus,
    InvalidDuration,
    InvalidTimeWindow,
    DuplicateId,
}

/// Why a technician was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Inactive,
    MissingHomeBase,
    InvalidWorkingHours,
    DuplicateId,
}
