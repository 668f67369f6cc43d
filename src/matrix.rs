//! Pairwise distance and travel-time matrix for one planning run.

use crate::error::MatrixError;

/// Square distance (km) and travel-time (minutes) tables indexed by
/// location. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    distances_km: Vec<Vec<f64>>,
    times_min: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Both tables must be square and of the same size.
    pub fn new(distances_km: Vec<Vec<f64>>, times_min: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n = distances_km.len();
        check_square(&distances_km, n)?;
        check_square(&times_min, n)?;
        Ok(Self {
            distances_km,
            times_min,
        })
    }

    pub fn len(&self) -> usize {
        self.distances_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances_km.is_empty()
    }

    pub fn distance_km(&self, from: usize, to: usize) -> f64 {
        self.distances_km[from][to]
    }

    pub fn time_min(&self, from: usize, to: usize) -> f64 {
        self.times_min[from][to]
    }
}

fn check_square(table: &[Vec<f64>], n: usize) -> Result<(), MatrixError> {
    if table.len() != n {
        return Err(MatrixError::DimensionMismatch {
            expected: n,
            actual: table.len(),
        });
    }
    match table.iter().find(|row| row.len() != n) {
        Some(row) => Err(MatrixError::DimensionMismatch {
            expected: n,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}
