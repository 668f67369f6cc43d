//! Assignment optimizer: cheapest insertion, then 2-opt / relocate local search.

use std::cmp::{Ordering, Reverse};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::OptimizerConfig;
use crate::error::UnassignedReason;
use crate::feasibility::{FeasibilityChecker, Insertion, RouteSchedule};
use crate::problem::Problem;

/// Minimum travel-time gain (minutes) for a local search move to count.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// One technician's ordered stops. Indices refer to [`Problem::jobs`].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub technician: usize,
    pub jobs: Vec<usize>,
    pub schedule: RouteSchedule,
}

impl Route {
    fn empty(technician: usize) -> Self {
        Self {
            technician,
            jobs: Vec::new(),
            schedule: RouteSchedule::default(),
        }
    }

    /// Put `job` where `insertion` says and take over its schedule.
    fn apply(&mut self, insertion: Insertion, job: usize) {
        self.jobs.insert(insertion.position, job);
        self.schedule = insertion.schedule;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// One route per eligible technician, possibly empty.
    pub routes: Vec<Route>,
    pub unassigned: Vec<(usize, UnassignedReason)>,
}

impl Solution {
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.jobs.len()).sum()
    }

    pub fn total_travel_min(&self) -> f64 {
        self.routes.iter().map(|route| route.schedule.travel_min).sum()
    }

    pub fn total_travel_km(&self) -> f64 {
        self.routes.iter().map(|route| route.schedule.travel_km).sum()
    }

    pub fn objective(&self) -> Objective {
        Objective {
            unassigned: self.unassigned.len(),
            travel_min: self.total_travel_min(),
        }
    }
}

/// Unassigned count first, then travel time. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    pub unassigned: usize,
    pub travel_min: f64,
}

impl PartialOrd for Objective {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.unassigned.cmp(&other.unassigned) {
            Ordering::Equal => self.travel_min.partial_cmp(&other.travel_min),
            ordering => Some(ordering),
        }
    }
}

pub struct AssignmentOptimizer<'a> {
    checker: FeasibilityChecker<'a>,
    max_passes: usize,
}

impl<'a> AssignmentOptimizer<'a> {
    pub fn new(problem: &'a Problem, config: &OptimizerConfig) -> Self {
        Self {
            checker: FeasibilityChecker::new(problem, config),
            max_passes: config.max_local_search_passes,
        }
    }

    pub fn run(&self) -> Solution {
        let problem = self.checker.problem();
        let mut solution = self.solve(None);
        let mut held_out_winner = None;

        // Greedy construction depends on which technicians are present, so a
        // day with leftovers is also planned with each technician held out.
        if !solution.unassigned.is_empty() && problem.technicians.len() > 1 {
            let alternatives: Vec<Solution> = (0..problem.technicians.len())
                .into_par_iter()
                .map(|held_out| self.solve(Some(held_out)))
                .collect();
            for (held_out, candidate) in alternatives.into_iter().enumerate() {
                if candidate.objective() < solution.objective() {
                    solution = candidate;
                    held_out_winner = Some(held_out);
                }
            }
        }

        if let Some(held_out) = held_out_winner {
            debug!(technician = held_out, "plan without one technician kept");
            // Reasons were given without the held-out technician.
            let routes = &solution.routes;
            solution.unassigned = solution
                .unassigned
                .iter()
                .map(|&(job, _)| (job, self.classify_failure(routes, job)))
                .collect();
        }

        let objective = solution.objective();
        info!(
            date = %problem.date,
            assigned = solution.assigned_count(),
            unassigned = objective.unassigned,
            travel_min = objective.travel_min,
            "optimization finished"
        );
        solution
    }

    /// Construction, local search and reinsertion over every technician but
    /// `held_out`, whose route stays empty.
    fn solve(&self, held_out: Option<usize>) -> Solution {
        let problem = self.checker.problem();
        let mut routes: Vec<Route> = (0..problem.technicians.len())
            .filter(|&technician| Some(technician) != held_out)
            .map(Route::empty)
            .collect();
        let mut unassigned = Vec::new();

        for job in self.construction_order() {
            if let Err(reason) = self.insert_cheapest(&mut routes, job) {
                debug!(job = %problem.jobs[job].id, ?reason, "job left unassigned");
                unassigned.push((job, reason));
            }
        }
        debug!(
            ?held_out,
            assigned = problem.jobs.len() - unassigned.len(),
            unassigned = unassigned.len(),
            "construction finished"
        );

        let mut passes = self.local_search(&mut routes);

        // Local search may have freed room. One more assigned job always beats
        // any amount of saved driving.
        if self.reinsert_unassigned(&mut routes, &mut unassigned) > 0 {
            passes += self.local_search(&mut routes);
        }
        debug!(?held_out, passes, "local search finished");

        if let Some(technician) = held_out {
            routes.insert(technician, Route::empty(technician));
        }
        Solution { routes, unassigned }
    }

    /// Urgent first, then earliest window start (unwindowed last), then id.
    fn construction_order(&self) -> Vec<usize> {
        let problem = self.checker.problem();
        let mut order: Vec<usize> = (0..problem.jobs.len()).collect();
        order.sort_by(|&a, &b| {
            let window_start = |job: usize| problem.slots[job].window.map_or(f64::INFINITY, |w| w.start);
            Reverse(problem.jobs[a].priority)
                .cmp(&Reverse(problem.jobs[b].priority))
                .then_with(|| window_start(a).total_cmp(&window_start(b)))
                .then_with(|| problem.jobs[a].id.cmp(&problem.jobs[b].id))
        });
        order
    }

    /// Put `job` at its cheapest feasible position over all routes.
    ///
    /// Candidates are scored in parallel against the current routes; the
    /// commit happens here, before the next job is looked at.
    fn insert_cheapest(&self, routes: &mut [Route], job: usize) -> Result<(), UnassignedReason> {
        let candidates: Vec<Option<Insertion>> = routes
            .par_iter()
            .map(|route| self.checker.insertion_cost(route.technician, &route.jobs, job))
            .collect();

        let mut best: Option<(usize, Insertion)> = None;
        for (route_index, candidate) in candidates.into_iter().enumerate() {
            if let Some(insertion) = candidate {
                if best.as_ref().is_none_or(|(_, current)| insertion.cost < current.cost) {
                    best = Some((route_index, insertion));
                }
            }
        }

        let Some((route_index, insertion)) = best else {
            return Err(self.classify_failure(routes, job));
        };

        routes[route_index].apply(insertion, job);
        Ok(())
    }

    fn classify_failure(&self, routes: &[Route], job: usize) -> UnassignedReason {
        let problem = self.checker.problem();
        let capable: Vec<&Route> = routes
            .iter()
            .filter(|route| problem.technicians[route.technician].can_perform(&problem.jobs[job]))
            .collect();

        if capable.is_empty() {
            return UnassignedReason::CapabilityMismatch;
        }
        if problem.slots[job].window.is_none() {
            return UnassignedReason::NoCapacity;
        }

        let window_is_the_problem = capable.iter().any(|route| {
            let fits_relaxed = self
                .checker
                .insertion_cost_relaxed(route.technician, &route.jobs, job)
                .is_some();
            let never_fits_alone = self.checker.insertion_cost(route.technician, &[], job).is_none()
                && self.checker.insertion_cost_relaxed(route.technician, &[], job).is_some();
            fits_relaxed || never_fits_alone
        });

        if window_is_the_problem {
            UnassignedReason::NoTimeWindowFit
        } else {
            UnassignedReason::NoCapacity
        }
    }

    fn reinsert_unassigned(
        &self,
        routes: &mut [Route],
        unassigned: &mut Vec<(usize, UnassignedReason)>,
    ) -> usize {
        let mut reinserted = 0;
        let mut remaining = Vec::with_capacity(unassigned.len());

        for (job, reason) in unassigned.drain(..) {
            if reason == UnassignedReason::CapabilityMismatch {
                remaining.push((job, reason));
                continue;
            }
            match self.insert_cheapest(routes, job) {
                Ok(()) => reinserted += 1,
                Err(_) if self.make_room(routes, job) => reinserted += 1,
                Err(reason) => remaining.push((job, reason)),
            }
        }

        if reinserted > 0 {
            debug!(reinserted, "reinserted jobs after local search");
        }
        *unassigned = remaining;
        reinserted
    }

    /// Place `job` by moving one job out of a capable route into another
    /// route, so that `job` fits where the moved one was. Travel may grow.
    /// Applies the first such pair found.
    fn make_room(&self, routes: &mut [Route], job: usize) -> bool {
        let problem = self.checker.problem();

        for target in 0..routes.len() {
            let technician = routes[target].technician;
            if !problem.technicians[technician].can_perform(&problem.jobs[job]) {
                continue;
            }

            for index in 0..routes[target].jobs.len() {
                let moved = routes[target].jobs[index];
                let mut reduced = routes[target].jobs.clone();
                reduced.remove(index);
                let Some(placed) = self.checker.insertion_cost(technician, &reduced, job) else {
                    continue;
                };

                for other in 0..routes.len() {
                    if other == target {
                        continue;
                    }
                    let Some(shifted) =
                        self.checker
                            .insertion_cost(routes[other].technician, &routes[other].jobs, moved)
                    else {
                        continue;
                    };

                    debug!(job, moved, from = target, to = other, "made room for job");
                    routes[other].apply(shifted, moved);
                    routes[target].jobs = reduced;
                    routes[target].apply(placed, job);
                    return true;
                }
            }
        }

        false
    }

    /// Run passes until one makes no improvement or the pass limit is hit.
    /// Returns the number of passes run.
    fn local_search(&self, routes: &mut [Route]) -> usize {
        for pass in 0..self.max_passes {
            let mut improved = false;

            for route in routes.iter_mut() {
                if self.two_opt_improve(route) {
                    improved = true;
                }
            }

            if self.relocate_improve(routes) {
                improved = true;
            }

            if !improved {
                return pass + 1;
            }
        }
        self.max_passes
    }

    /// 2-opt: reverse a segment within a route. Applies the first
    /// improving reversal found.
    fn two_opt_improve(&self, route: &mut Route) -> bool {
        let n = route.jobs.len();
        if n < 2 {
            return false;
        }

        let current_cost = route.schedule.travel_min;
        for i in 0..n - 1 {
            for j in i + 1..n {
                let mut candidate = route.jobs.clone();
                candidate[i..=j].reverse();

                if let Ok(schedule) = self.checker.schedule(route.technician, &candidate) {
                    if schedule.travel_min < current_cost - IMPROVEMENT_EPSILON {
                        debug!(technician = route.technician, i, j, "2-opt move");
                        route.jobs = candidate;
                        route.schedule = schedule;
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Relocate: move one job to its cheapest position in the same or another
    /// route. Applies the first move that lowers total travel time.
    fn relocate_improve(&self, routes: &mut [Route]) -> bool {
        for from in 0..routes.len() {
            for index in 0..routes[from].jobs.len() {
                let job = routes[from].jobs[index];
                let mut reduced = routes[from].jobs.clone();
                reduced.remove(index);
                let Ok(reduced_schedule) = self.checker.schedule(routes[from].technician, &reduced) else {
                    continue;
                };

                for to in 0..routes.len() {
                    let same_route = to == from;
                    let target_jobs = if same_route { &reduced } else { &routes[to].jobs };
                    let Some(insertion) = self
                        .checker
                        .insertion_cost(routes[to].technician, target_jobs, job)
                    else {
                        continue;
                    };

                    let (before, after) = if same_route {
                        (
                            routes[from].schedule.travel_min,
                            reduced_schedule.travel_min + insertion.cost,
                        )
                    } else {
                        (
                            routes[from].schedule.travel_min + routes[to].schedule.travel_min,
                            reduced_schedule.travel_min + routes[to].schedule.travel_min + insertion.cost,
                        )
                    };
                    if after >= before - IMPROVEMENT_EPSILON {
                        continue;
                    }

                    debug!(from, to, job, gain = before - after, "relocate move");
                    if same_route {
                        routes[to].jobs = reduced;
                    } else {
                        routes[from].jobs = reduced;
                        routes[from].schedule = reduced_schedule;
                    }
                    routes[to].apply(insertion, job);
                    return true;
                }
            }
        }

        false
    }
}
