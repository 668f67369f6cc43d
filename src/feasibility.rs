//! Route simulation and insertion costing.
//!
//! A route is a technician index plus an ordered list of job indices into
//! [`Problem::jobs`]. Simulation starts the clock at the technician's shift
//! start at the home base.

use crate::config::OptimizerConfig;
use crate::problem::Problem;

/// Slack for float comparisons against window bounds.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasibility {
    /// The technician lacks a skill one of the jobs requires.
    CapabilityMismatch { job: usize },
    /// Arrival falls after the job's window end.
    TimeWindowMissed { job: usize },
    /// The route runs past the end of the working day.
    WorkingHoursExceeded,
}

/// Timing of one stop, in minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopTiming {
    pub arrival: f64,
    pub start: f64,
    pub end: f64,
    /// Length of the leg that reached this stop.
    pub leg_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSchedule {
    pub stops: Vec<StopTiming>,
    pub travel_km: f64,
    pub travel_min: f64,
    pub wait_min: f64,
    /// Clock when the technician is done (back home if returning to base).
    pub finish: f64,
}

/// Cheapest place to put a job into a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub position: usize,
    /// Marginal travel minutes.
    pub cost: f64,
    /// The route simulated with the job in place.
    pub schedule: RouteSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Windows {
    Enforce,
    Relax,
}

#[derive(Debug, Clone, Copy)]
pub struct FeasibilityChecker<'a> {
    problem: &'a Problem,
    return_to_base: bool,
}

impl<'a> FeasibilityChecker<'a> {
    pub fn new(problem: &'a Problem, config: &OptimizerConfig) -> Self {
        Self {
            problem,
            return_to_base: config.return_to_base,
        }
    }

    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Simulate `seq` for technician `tech`.
    pub fn schedule(&self, tech: usize, seq: &[usize]) -> Result<RouteSchedule, Infeasibility> {
        self.simulate(tech, seq, Windows::Enforce)
    }

    pub fn is_feasible(&self, tech: usize, seq: &[usize]) -> bool {
        self.schedule(tech, seq).is_ok()
    }

    /// Cheapest feasible position for `job` in `seq`, or `None` when the job
    /// fits nowhere (or `seq` itself is infeasible).
    pub fn insertion_cost(&self, tech: usize, seq: &[usize], job: usize) -> Option<Insertion> {
        self.cheapest_insertion(tech, seq, job, Windows::Enforce)
    }

    /// Like [`Self::insertion_cost`] but ignoring job time windows. Used to
    /// tell a window conflict apart from a full day.
    pub fn insertion_cost_relaxed(&self, tech: usize, seq: &[usize], job: usize) -> Option<Insertion> {
        self.cheapest_insertion(tech, seq, job, Windows::Relax)
    }

    fn cheapest_insertion(
        &self,
        tech: usize,
        seq: &[usize],
        job: usize,
        windows: Windows,
    ) -> Option<Insertion> {
        if !self.problem.technicians[tech].can_perform(&self.problem.jobs[job]) {
            return None;
        }
        let base = self.simulate(tech, seq, windows).ok()?.travel_min;

        let mut best: Option<Insertion> = None;
        let mut candidate = Vec::with_capacity(seq.len() + 1);
        for position in 0..=seq.len() {
            candidate.clear();
            candidate.extend_from_slice(&seq[..position]);
            candidate.push(job);
            candidate.extend_from_slice(&seq[position..]);

            if let Ok(schedule) = self.simulate(tech, &candidate, windows) {
                let cost = schedule.travel_min - base;
                if best.as_ref().is_none_or(|b| cost < b.cost) {
                    best = Some(Insertion {
                        position,
                        cost,
                        schedule,
                    });
                }
            }
        }
        best
    }

    fn simulate(&self, tech: usize, seq: &[usize], windows: Windows) -> Result<RouteSchedule, Infeasibility> {
        let problem = self.problem;
        let technician = &problem.technicians[tech];
        let shift = problem.shifts[tech];
        let home = problem.technician_location(tech);

        let mut schedule = RouteSchedule {
            stops: Vec::with_capacity(seq.len()),
            ..RouteSchedule::default()
        };
        let mut clock = shift.start;
        let mut prev = home;

        for &job in seq {
            if !technician.can_perform(&problem.jobs[job]) {
                return Err(Infeasibility::CapabilityMismatch { job });
            }

            let here = problem.job_location(job);
            let leg_min = problem.matrix.time_min(prev, here);
            let leg_km = problem.matrix.distance_km(prev, here);
            clock += leg_min;
            schedule.travel_min += leg_min;
            schedule.travel_km += leg_km;

            let arrival = clock;
            let slot = problem.slots[job];
            let mut start = arrival;
            if let (Windows::Enforce, Some(window)) = (windows, slot.window) {
                if arrival > window.end + TIME_EPSILON {
                    return Err(Infeasibility::TimeWindowMissed { job });
                }
                if arrival < window.start {
                    schedule.wait_min += window.start - arrival;
                    start = window.start;
                }
            }

            let end = start + slot.duration_min;
            if end > shift.end + TIME_EPSILON {
                return Err(Infeasibility::WorkingHoursExceeded);
            }

            schedule.stops.push(StopTiming {
                arrival,
                start,
                end,
                leg_km,
            });
            clock = end;
            prev = here;
        }

        if self.return_to_base && !seq.is_empty() {
            let leg_min = problem.matrix.time_min(prev, home);
            clock += leg_min;
            schedule.travel_min += leg_min;
            schedule.travel_km += problem.matrix.distance_km(prev, home);
            if clock > shift.end + TIME_EPSILON {
                return Err(Infeasibility::WorkingHoursExceeded);
            }
        }

        schedule.finish = clock;
        Ok(schedule)
    }
}
