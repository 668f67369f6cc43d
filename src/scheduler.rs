//! Entry points: run the planner against a snapshot or a store.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use crate::config::OptimizerConfig;
use crate::error::ScheduleError;
use crate::model::{Job, Technician};
use crate::problem::ProblemBuilder;
use crate::report::{OptimizationResult, ResultReporter};
use crate::solver::AssignmentOptimizer;
use crate::traits::{DistanceMatrixProvider, JobStore};

/// Plan one day from an in-memory snapshot.
///
/// Pure apart from the matrix provider call; nothing is written anywhere.
pub fn optimize_snapshot<M>(
    date: NaiveDate,
    technicians: Vec<Technician>,
    jobs: Vec<Job>,
    config: &OptimizerConfig,
    matrix_provider: &M,
) -> Result<OptimizationResult, ScheduleError>
where
    M: DistanceMatrixProvider + ?Sized,
{
    config.validate()?;
    let problem = ProblemBuilder::new(date, config).build(technicians, jobs, matrix_provider)?;
    let solution = AssignmentOptimizer::new(&problem, config).run();
    Ok(ResultReporter::report(&problem, &solution))
}

/// Reads snapshots from a [`JobStore`] and writes committed results back.
pub struct Scheduler<S, M> {
    store: S,
    matrix_provider: M,
}

impl<S, M> Scheduler<S, M>
where
    S: JobStore,
    M: DistanceMatrixProvider,
{
    pub fn new(store: S, matrix_provider: M) -> Self {
        Self {
            store,
            matrix_provider,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Plan `date`. The store is only read.
    pub fn optimize(&self, date: NaiveDate, config: &OptimizerConfig) -> Result<OptimizationResult, ScheduleError> {
        let technicians = self
            .store
            .list_eligible_technicians(date)
            .map_err(|err| ScheduleError::store("list_eligible_technicians", err))?;
        let jobs = self
            .store
            .list_unassigned_jobs(date)
            .map_err(|err| ScheduleError::store("list_unassigned_jobs", err))?;

        info!(%date, technicians = technicians.len(), jobs = jobs.len(), "snapshot loaded");
        optimize_snapshot(date, technicians, jobs, config, &self.matrix_provider)
    }

    /// Write every assignment of `result` in one batch. Returns how many
    /// were applied.
    pub fn commit(&mut self, result: &OptimizationResult) -> Result<usize, ScheduleError> {
        let assignments = result.assignments();
        self.store
            .commit_assignments(&assignments)
            .map_err(|err| ScheduleError::store("commit_assignments", err))?;
        info!(date = %result.date, applied = assignments.len(), "assignments committed");
        Ok(assignments.len())
    }
}

impl<S, M> Scheduler<S, M>
where
    S: JobStore + Sync,
    M: DistanceMatrixProvider,
{
    /// Plan several days in parallel. Each run has its own snapshot.
    pub fn optimize_dates(
        &self,
        dates: &[NaiveDate],
        config: &OptimizerConfig,
    ) -> Vec<(NaiveDate, Result<OptimizationResult, ScheduleError>)> {
        dates
            .par_iter()
            .map(|&date| (date, self.optimize(date, config)))
            .collect()
    }
}
