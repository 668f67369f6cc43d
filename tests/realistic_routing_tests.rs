//! Realistic routing tests using real Toronto locations.
//!
//! These tests run the full pipeline on real-world coordinates with
//! straight-line travel at urban speed.

mod fixtures;

use chrono::NaiveDate;

use fieldops_planner::haversine::{haversine_km, HaversineMatrix};
use fieldops_planner::model::{Job, Technician, TechnicianId};
use fieldops_planner::{optimize_snapshot, OptimizationResult, OptimizerConfig};

use fixtures::{Location, TestJob, TestTechnician};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn job_at(id: u64, location: &Location) -> TestJob {
    TestJob::new(id).at(location.lat, location.lng)
}

fn tech_at(id: u64, location: &Location) -> TestTechnician {
    TestTechnician::new(id).at(location.lat, location.lng)
}

fn hours(h: f64) -> f64 {
    h * 60.0
}

fn run(technicians: Vec<Technician>, jobs: Vec<Job>, config: &OptimizerConfig) -> OptimizationResult {
    optimize_snapshot(
        date(),
        technicians,
        jobs,
        config,
        &HaversineMatrix::new(config.avg_speed_kmh),
    )
    .expect("planning failed")
}

// ============================================================================
// Tests
// ============================================================================

/// One technician downtown, one job a block away and one uptown: the
/// nearby job comes first.
#[test]
fn test_single_technician_visits_nearby_job_first() {
    let technicians = vec![TestTechnician::new(1).at(43.65, -79.38).hours(8.0, 16.0).build()];
    let jobs = vec![
        TestJob::new(1).at(43.70, -79.40).hours(2.0).build(),
        TestJob::new(2).at(43.66, -79.39).hours(2.0).build(),
    ];

    let result = run(technicians, jobs, &OptimizerConfig::default());

    assert_eq!(result.assigned_count, 2);
    assert!(result.unassigned.is_empty());
    let route: Vec<u64> = result.route_for(TechnicianId(1)).iter().map(|id| id.0).collect();
    assert_eq!(route, vec![2, 1]);
}

/// A handful of spread-out jobs and two technicians.
#[test]
fn test_small_route() {
    let locations = fixtures::geographically_diverse_locations();
    let jobs: Vec<Job> = locations
        .iter()
        .take(6)
        .enumerate()
        .map(|(i, loc)| job_at(i as u64 + 1, loc).hours(0.5).build())
        .collect();

    let technicians = vec![
        tech_at(1, &fixtures::DEPOTS[0]).build(),
        tech_at(2, &fixtures::DEPOTS[2]).build(),
    ];

    let result = run(technicians, jobs, &OptimizerConfig::default());

    assert!(
        result.unassigned.is_empty(),
        "All jobs should be assigned, but {} were unassigned",
        result.unassigned.len()
    );

    for (technician_id, visits) in &result.schedules {
        if visits.is_empty() {
            continue;
        }
        let travel_km: f64 = visits.iter().map(|v| v.travel_km).sum();
        println!("{}: {} jobs, {:.1} km", technician_id, visits.len(), travel_km);
        assert!(travel_km > 0.0, "travel should be positive");
        // Toronto is ~45 km across.
        assert!(travel_km < 150.0, "travel seems too high: {} km", travel_km);
    }
}

/// Twenty jobs across three technicians, a realistic day.
#[test]
fn test_medium_day() {
    let jobs: Vec<Job> = fixtures::all_locations()
        .iter()
        .take(20)
        .enumerate()
        .map(|(i, loc)| job_at(i as u64 + 1, loc).hours(0.5).build())
        .collect();

    let technicians = vec![
        tech_at(1, &fixtures::DEPOTS[0]).build(),
        tech_at(2, &fixtures::DEPOTS[1]).build(),
        tech_at(3, &fixtures::DEPOTS[2]).build(),
    ];

    let result = run(technicians, jobs, &OptimizerConfig::default());

    assert_eq!(result.assigned_count, 20, "unassigned: {:?}", result.unassigned);
    assert!(result.total_distance_km > 0.0);
    // Three open routes within one city stay well below a full day of driving.
    assert!(result.total_time_min < hours(6.0), "travel {} min", result.total_time_min);
    assert_eq!(result.total_labor_cost, 20.0 * 0.5 * 75.0);

    for route in result.routes.values() {
        println!("{} jobs", route.len());
    }
}

/// Local search never makes the result worse than construction alone.
#[test]
fn test_local_search_improves_on_construction() {
    let jobs: Vec<Job> = fixtures::all_locations()
        .iter()
        .enumerate()
        .map(|(i, loc)| job_at(i as u64 + 1, loc).hours(0.25).build())
        .collect();
    let technicians = vec![
        tech_at(1, &fixtures::DEPOTS[0]).build(),
        tech_at(2, &fixtures::DEPOTS[3]).build(),
    ];

    let one_pass = run(
        technicians.clone(),
        jobs.clone(),
        &OptimizerConfig {
            max_local_search_passes: 1,
            ..OptimizerConfig::default()
        },
    );
    let full = run(technicians, jobs, &OptimizerConfig::default());

    assert_eq!(one_pass.assigned_count, full.assigned_count);
    assert!(full.total_time_min <= one_pass.total_time_min + 0.01);
}

/// Committed windows are honoured on real distances.
#[test]
fn test_time_windows() {
    let locations = fixtures::DOWNTOWN_LOCATIONS;
    let jobs = vec![
        job_at(1, &locations[0]).window(8.0, 10.0).build(),
        job_at(2, &locations[1]).window(11.0, 13.0).build(),
        job_at(3, &locations[2]).window(14.0, 16.0).build(),
        job_at(4, &locations[3]).build(),
    ];

    let technicians = vec![tech_at(1, &fixtures::DEPOTS[0]).build()];
    let result = run(technicians, jobs.clone(), &OptimizerConfig::default());

    assert!(result.unassigned.is_empty(), "All jobs should be assigned");

    let visits = &result.schedules[&TechnicianId(1)];
    for visit in visits {
        let job = jobs.iter().find(|j| j.id == visit.job_id).unwrap();
        if let Some(window) = job.time_window {
            assert!(
                visit.start_min >= window.start - 0.01 && visit.start_min <= window.end + 0.01,
                "{} starts at {} outside [{}, {}]",
                visit.job_id,
                visit.start_min,
                window.start,
                window.end
            );
        }
    }
    assert!(visits.windows(2).all(|w| w[0].end_min <= w[1].arrival_min + 0.01));
}

/// Slower driving only ever lengthens travel time, never distance.
#[test]
fn test_speed_scales_travel_time() {
    let jobs: Vec<Job> = fixtures::DOWNTOWN_LOCATIONS
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, loc)| job_at(i as u64 + 1, loc).hours(0.5).build())
        .collect();
    let technicians = vec![tech_at(1, &fixtures::DEPOTS[0]).build()];

    let fast = run(technicians.clone(), jobs.clone(), &OptimizerConfig::default());
    let slow = run(
        technicians,
        jobs,
        &OptimizerConfig {
            avg_speed_kmh: 17.5,
            ..OptimizerConfig::default()
        },
    );

    assert_eq!(fast.routes, slow.routes);
    assert!((slow.total_time_min - 2.0 * fast.total_time_min).abs() < 0.05);
}

#[test]
fn test_landmark_distances_are_plausible() {
    let cn_tower = fixtures::DOWNTOWN_LOCATIONS[0].coords();
    let zoo = fixtures::EAST_LOCATIONS[1].coords();
    let km = haversine_km(cn_tower, zoo);
    assert!(km > 22.0 && km < 30.0, "CN Tower to zoo: {} km", km);
}
