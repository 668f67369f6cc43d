//! Test fixtures for fieldops-planner.
//!
//! Provides realistic test data including:
//! - Real Toronto / GTA locations (from OpenStreetMap)
//! - Builders for jobs and technicians

#![allow(dead_code)]

pub mod toronto_locations;

use fieldops_planner::model::{Coordinate, Job, JobStatus, Priority, Technician, TimeWindow};

pub use toronto_locations::*;

/// Builder for test jobs with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestJob {
    job: Job,
}

impl TestJob {
    pub fn new(id: u64) -> Self {
        let mut job = Job::new(id);
        job.location = Some(Coordinate::new(0.0, 0.0));
        job.estimated_duration_hours = Some(0.5);
        Self { job }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.job.location = Some(Coordinate::new(lat, lng));
        self
    }

    pub fn without_location(mut self) -> Self {
        self.job.location = None;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.job.estimated_duration_hours = Some(hours);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.job.priority = priority;
        self
    }

    /// Window for the service start, in hours after midnight.
    pub fn window(mut self, start_h: f64, end_h: f64) -> Self {
        self.job.time_window = Some(TimeWindow::from_hours(start_h, end_h));
        self
    }

    pub fn requires(mut self, skill: &str) -> Self {
        self.job.required_skills.push(skill.to_string());
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.job.status = status;
        self
    }

    pub fn on(mut self, date: chrono::NaiveDate) -> Self {
        self.job.scheduled_date = Some(date);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

/// Builder for test technicians with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestTechnician {
    tech: Technician,
}

impl TestTechnician {
    pub fn new(id: u64) -> Self {
        let mut tech = Technician::new(id, format!("tech-{}", id));
        tech.home_base = Some(Coordinate::new(0.0, 0.0));
        Self { tech }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.tech.home_base = Some(Coordinate::new(lat, lng));
        self
    }

    pub fn without_home_base(mut self) -> Self {
        self.tech.home_base = None;
        self
    }

    pub fn hours(mut self, start_h: f64, end_h: f64) -> Self {
        self.tech.working_hours = Some(TimeWindow::from_hours(start_h, end_h));
        self
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.tech.skills.push(skill.to_string());
        self
    }

    pub fn rate(mut self, hourly_rate: f64) -> Self {
        self.tech.hourly_rate = hourly_rate;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.tech.active = false;
        self
    }

    pub fn build(self) -> Technician {
        self.tech
    }
}
