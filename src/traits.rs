//! Seams between the planner core and its collaborators.
//!
//! The store and the matrix backend are the only things the core talks to.
//! Both are plain synchronous calls; retries and timeouts belong to the
//! implementation.

use chrono::NaiveDate;

use crate::error::MatrixError;
use crate::matrix::DistanceMatrix;
use crate::model::{Coordinate, Job, Technician};
use crate::report::Assignment;

/// Provides a distance/time matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider: Send + Sync {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for Box<T> {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        (**self).matrix_for(locations)
    }
}

/// The system of record for technicians and work orders.
pub trait JobStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Technicians that may work on `as_of`.
    fn list_eligible_technicians(&self, as_of: NaiveDate) -> Result<Vec<Technician>, Self::Error>;

    /// Jobs waiting for assignment on `for_date`.
    fn list_unassigned_jobs(&self, for_date: NaiveDate) -> Result<Vec<Job>, Self::Error>;

    fn apply_assignment(&mut self, assignment: &Assignment) -> Result<(), Self::Error>;

    /// Apply a whole run's assignments.
    ///
    /// Stores with transactions should override this so that either every
    /// assignment lands or none does.
    fn commit_assignments(&mut self, assignments: &[Assignment]) -> Result<(), Self::Error> {
        for assignment in assignments {
            self.apply_assignment(assignment)?;
        }
        Ok(())
    }
}
