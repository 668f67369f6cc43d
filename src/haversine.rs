//! Great-circle distance and the haversine matrix provider.
//!
//! Straight-line distance with an assumed average speed. Less accurate than a
//! road network but always available.

use crate::config::DEFAULT_AVG_SPEED_KMH;
use crate::error::MatrixError;
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Minutes needed to drive `km` at `speed_kmh`.
pub fn travel_time_min(km: f64, speed_kmh: f64) -> f64 {
    km / speed_kmh * 60.0
}

/// Haversine-based distance matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_AVG_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        let n = locations.len();
        let mut distances = vec![vec![0.0; n]; n];
        let mut times = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let km = haversine_km(locations[i], locations[j]);
                let minutes = travel_time_min(km, self.speed_kmh);
                distances[i][j] = km;
                distances[j][i] = km;
                times[i][j] = minutes;
                times[j][i] = minutes;
            }
        }

        DistanceMatrix::new(distances, times)
    }
}
