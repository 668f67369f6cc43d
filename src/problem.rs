//! Turns a store snapshot into an indexed assignment problem.
//!
//! Location order is fixed for the run: technician home bases first
//! (`0..T`), then job sites (`T..T+J`).

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::OptimizerConfig;
use crate::error::{ExclusionReason, ScheduleError, UnassignedReason};
use crate::matrix::DistanceMatrix;
use crate::model::{Coordinate, Job, JobId, JobStatus, Technician, TechnicianId, TimeWindow};
use crate::traits::DistanceMatrixProvider;

/// Per-job service terms used by the feasibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobSlot {
    pub duration_min: f64,
    pub window: Option<TimeWindow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedJob {
    pub job_id: JobId,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedTechnician {
    pub technician_id: TechnicianId,
    pub reason: ExclusionReason,
}

/// One run's immutable problem snapshot.
#[derive(Debug, Clone)]
pub struct Problem {
    pub date: NaiveDate,
    pub technicians: Vec<Technician>,
    pub jobs: Vec<Job>,
    /// Working day per technician, aligned with `technicians`.
    pub shifts: Vec<TimeWindow>,
    /// Service terms per job, aligned with `jobs`.
    pub slots: Vec<JobSlot>,
    pub matrix: DistanceMatrix,
    pub excluded_jobs: Vec<ExcludedJob>,
    pub excluded_technicians: Vec<ExcludedTechnician>,
}

impl Problem {
    pub fn technician_location(&self, tech: usize) -> usize {
        tech
    }

    pub fn job_location(&self, job: usize) -> usize {
        self.technicians.len() + job
    }
}

pub struct ProblemBuilder<'a> {
    date: NaiveDate,
    config: &'a OptimizerConfig,
}

impl<'a> ProblemBuilder<'a> {
    pub fn new(date: NaiveDate, config: &'a OptimizerConfig) -> Self {
        Self { date, config }
    }

    pub fn build<M>(
        &self,
        technicians: Vec<Technician>,
        jobs: Vec<Job>,
        matrix_provider: &M,
    ) -> Result<Problem, ScheduleError>
    where
        M: DistanceMatrixProvider + ?Sized,
    {
        let (technicians, shifts, excluded_technicians) = self.eligible_technicians(technicians);
        let (jobs, slots, excluded_jobs) = eligible_jobs(jobs);

        if technicians.is_empty() || jobs.is_empty() {
            return Err(ScheduleError::NoFeasibleInput {
                technicians: technicians.len(),
                jobs: jobs.len(),
            });
        }

        let locations: Vec<Coordinate> = technicians
            .iter()
            .filter_map(|tech| tech.home_base)
            .chain(jobs.iter().filter_map(|job| job.location))
            .collect();
        let matrix = matrix_provider.matrix_for(&locations)?;

        debug!(
            date = %self.date,
            technicians = technicians.len(),
            jobs = jobs.len(),
            excluded_technicians = excluded_technicians.len(),
            excluded_jobs = excluded_jobs.len(),
            "problem built"
        );

        Ok(Problem {
            date: self.date,
            technicians,
            jobs,
            shifts,
            slots,
            matrix,
            excluded_jobs,
            excluded_technicians,
        })
    }

    fn eligible_technicians(
        &self,
        technicians: Vec<Technician>,
    ) -> (Vec<Technician>, Vec<TimeWindow>, Vec<ExcludedTechnician>) {
        let mut eligible = Vec::with_capacity(technicians.len());
        let mut shifts = Vec::with_capacity(technicians.len());
        let mut excluded = Vec::new();
        let mut seen = HashSet::new();

        for tech in technicians {
            let shift = tech
                .working_hours
                .unwrap_or(self.config.working_hours_window);

            let reason = if !seen.insert(tech.id) {
                Some(ExclusionReason::DuplicateId)
            } else if !tech.active {
                Some(ExclusionReason::Inactive)
            } else if !tech.home_base.is_some_and(|c| c.is_valid()) {
                Some(ExclusionReason::MissingHomeBase)
            } else if !shift.is_valid() {
                Some(ExclusionReason::InvalidWorkingHours)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    warn!(technician = %tech.id, ?reason, "technician excluded");
                    excluded.push(ExcludedTechnician {
                        technician_id: tech.id,
                        reason,
                    });
                }
                None => {
                    shifts.push(shift);
                    eligible.push(tech);
                }
            }
        }

        (eligible, shifts, excluded)
    }
}

fn eligible_jobs(jobs: Vec<Job>) -> (Vec<Job>, Vec<JobSlot>, Vec<ExcludedJob>) {
    let mut eligible = Vec::with_capacity(jobs.len());
    let mut slots = Vec::with_capacity(jobs.len());
    let mut excluded = Vec::new();
    let mut seen = HashSet::new();

    for job in jobs {
        let duration_min = job.duration_minutes();

        let reason = if !seen.insert(job.id) {
            Some(UnassignedReason::DuplicateId)
        } else if job.status != JobStatus::Unassigned {
            Some(UnassignedReason::IneligibleStatus)
        } else if !job.location.is_some_and(|c| c.is_valid()) {
            Some(UnassignedReason::MissingLocation)
        } else if !duration_min.is_finite() || duration_min <= 0.0 {
            Some(UnassignedReason::InvalidDuration)
        } else if job.time_window.is_some_and(|w| !w.is_valid()) {
            Some(UnassignedReason::InvalidTimeWindow)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                warn!(job = %job.id, ?reason, "job excluded");
                excluded.push(ExcludedJob {
                    job_id: job.id,
                    reason,
                });
            }
            None => {
                slots.push(JobSlot {
                    duration_min,
                    window: job.time_window,
                });
                eligible.push(job);
            }
        }
    }

    (eligible, slots, excluded)
}
