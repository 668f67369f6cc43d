//! fieldops-planner
//!
//! Assigns field-service jobs to technicians and orders each technician's
//! day: cheapest insertion followed by 2-opt / relocate local search, under
//! working-hours, time-window and skill constraints.

pub mod config;
pub mod error;
pub mod feasibility;
pub mod haversine;
pub mod matrix;
pub mod model;
pub mod osrm;
pub mod problem;
pub mod report;
pub mod scheduler;
pub mod solver;
pub mod store;
pub mod traits;

pub use config::{OptimizerConfig, OsrmConfig};
pub use error::{ScheduleError, UnassignedReason};
pub use report::OptimizationResult;
pub use scheduler::{optimize_snapshot, Scheduler};
