//! Serializable run results.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ExclusionReason, UnassignedReason};
use crate::model::{JobId, TechnicianId};
use crate::problem::Problem;
use crate::solver::Solution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedJob {
    pub job_id: JobId,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTechnicianReport {
    pub technician_id: TechnicianId,
    pub reason: ExclusionReason,
}

/// Planned timing of one job. Times are minutes after midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledVisit {
    pub job_id: JobId,
    pub sequence_position: usize,
    pub arrival_min: f64,
    pub start_min: f64,
    pub end_min: f64,
    pub travel_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub date: NaiveDate,
    pub assigned_count: usize,
    pub unassigned: Vec<UnassignedJob>,
    #[serde(default)]
    pub excluded_technicians: Vec<ExcludedTechnicianReport>,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    #[serde(default)]
    pub total_labor_cost: f64,
    pub routes: BTreeMap<TechnicianId, Vec<JobId>>,
    #[serde(default)]
    pub schedules: BTreeMap<TechnicianId, Vec<ScheduledVisit>>,
}

/// A single job placement, as written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub job_id: JobId,
    pub technician_id: TechnicianId,
    pub sequence_position: usize,
    pub scheduled_time: NaiveDateTime,
}

impl OptimizationResult {
    /// Placements in technician order, then visiting order.
    pub fn assignments(&self) -> Vec<Assignment> {
        let midnight = self.date.and_time(chrono::NaiveTime::MIN);
        self.schedules
            .iter()
            .flat_map(|(technician_id, visits)| {
                visits.iter().map(move |visit| Assignment {
                    job_id: visit.job_id,
                    technician_id: *technician_id,
                    sequence_position: visit.sequence_position,
                    scheduled_time: midnight + Duration::seconds((visit.start_min * 60.0).round() as i64),
                })
            })
            .collect()
    }

    pub fn route_for(&self, technician_id: TechnicianId) -> &[JobId] {
        self.routes
            .get(&technician_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn unassigned_reason(&self, job_id: JobId) -> Option<UnassignedReason> {
        self.unassigned
            .iter()
            .find(|u| u.job_id == job_id)
            .map(|u| u.reason)
    }
}

pub struct ResultReporter;

impl ResultReporter {
    pub fn report(problem: &Problem, solution: &Solution) -> OptimizationResult {
        let mut routes = BTreeMap::new();
        let mut schedules = BTreeMap::new();
        let mut labor_cost = 0.0;

        for route in &solution.routes {
            let technician = &problem.technicians[route.technician];
            let job_ids: Vec<JobId> = route.jobs.iter().map(|&job| problem.jobs[job].id).collect();

            let visits = route
                .jobs
                .iter()
                .zip(&route.schedule.stops)
                .enumerate()
                .map(|(sequence_position, (&job, stop))| ScheduledVisit {
                    job_id: problem.jobs[job].id,
                    sequence_position,
                    arrival_min: round2(stop.arrival),
                    start_min: round2(stop.start),
                    end_min: round2(stop.end),
                    travel_km: round2(stop.leg_km),
                })
                .collect();

            labor_cost += route
                .jobs
                .iter()
                .map(|&job| problem.jobs[job].duration_hours() * technician.hourly_rate)
                .sum::<f64>();

            routes.insert(technician.id, job_ids);
            schedules.insert(technician.id, visits);
        }

        let mut unassigned: Vec<UnassignedJob> = solution
            .unassigned
            .iter()
            .map(|&(job, reason)| UnassignedJob {
                job_id: problem.jobs[job].id,
                reason,
            })
            .chain(problem.excluded_jobs.iter().map(|excluded| UnassignedJob {
                job_id: excluded.job_id,
                reason: excluded.reason,
            }))
            .collect();
        unassigned.sort_by_key(|u| u.job_id);

        OptimizationResult {
            date: problem.date,
            assigned_count: solution.assigned_count(),
            unassigned,
            excluded_technicians: problem
                .excluded_technicians
                .iter()
                .map(|excluded| ExcludedTechnicianReport {
                    technician_id: excluded.technician_id,
                    reason: excluded.reason,
                })
                .collect(),
            total_distance_km: round2(solution.total_travel_km()),
            total_time_min: round2(solution.total_travel_min()),
            total_labor_cost: round2(labor_cost),
            routes,
            schedules,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
