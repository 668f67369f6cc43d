//! In-memory job store.
//!
//! Holds a snapshot of technicians and work orders and applies committed
//! assignments all-or-nothing. Backs the CLI and the integration tests.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Job, JobId, JobStatus, Technician, TechnicianId};
use crate::report::Assignment;
use crate::traits::JobStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown job {0}")]
    UnknownJob(JobId),

    #[error("unknown technician {0}")]
    UnknownTechnician(TechnicianId),

    #[error("job {0} is no longer unassigned")]
    NotUnassigned(JobId),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    pub technicians: Vec<Technician>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl InMemoryStore {
    pub fn new(technicians: Vec<Technician>, jobs: Vec<Job>) -> Self {
        Self { technicians, jobs }
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    fn check(&self, assignment: &Assignment) -> Result<usize, StoreError> {
        if !self.technicians.iter().any(|t| t.id == assignment.technician_id) {
            return Err(StoreError::UnknownTechnician(assignment.technician_id));
        }
        let index = self
            .jobs
            .iter()
            .position(|job| job.id == assignment.job_id)
            .ok_or(StoreError::UnknownJob(assignment.job_id))?;
        if self.jobs[index].status != JobStatus::Unassigned {
            return Err(StoreError::NotUnassigned(assignment.job_id));
        }
        Ok(index)
    }

    fn apply_at(&mut self, index: usize, assignment: &Assignment) {
        let job = &mut self.jobs[index];
        job.status = JobStatus::Scheduled;
        job.assigned_technician = Some(assignment.technician_id);
        job.scheduled_date = Some(assignment.scheduled_time.date());
        job.scheduled_start = Some(assignment.scheduled_time);
    }
}

impl JobStore for InMemoryStore {
    type Error = StoreError;

    fn list_eligible_technicians(&self, _as_of: NaiveDate) -> Result<Vec<Technician>, Self::Error> {
        Ok(self.technicians.iter().filter(|t| t.active).cloned().collect())
    }

    fn list_unassigned_jobs(&self, for_date: NaiveDate) -> Result<Vec<Job>, Self::Error> {
        Ok(self
            .jobs
            .iter()
            .filter(|job| job.status == JobStatus::Unassigned)
            .filter(|job| job.scheduled_date.is_none_or(|date| date == for_date))
            .cloned()
            .collect())
    }

    fn apply_assignment(&mut self, assignment: &Assignment) -> Result<(), Self::Error> {
        let index = self.check(assignment)?;
        self.apply_at(index, assignment);
        Ok(())
    }

    /// Validates the whole batch before touching anything.
    fn commit_assignments(&mut self, assignments: &[Assignment]) -> Result<(), Self::Error> {
        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if !seen.insert(assignment.job_id) {
                return Err(StoreError::NotUnassigned(assignment.job_id));
            }
            indices.push(self.check(assignment)?);
        }
        for (index, assignment) in indices.into_iter().zip(assignments) {
            self.apply_at(index, assignment);
        }
        Ok(())
    }
}
