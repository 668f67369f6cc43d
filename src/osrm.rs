//! OSRM HTTP adapter for distance matrices.

use serde::Deserialize;

use crate::config::OsrmConfig;
use crate::error::MatrixError;
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Distance matrices from an OSRM `table` service.
///
/// Travel minutes are OSRM's own road durations, so
/// `OptimizerConfig::avg_speed_kmh` has no effect when this provider is used.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, MatrixError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, locations: &[Coordinate]) -> String {
        // OSRM wants lng,lat
        let coords = locations
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        if locations.is_empty() {
            return DistanceMatrix::new(Vec::new(), Vec::new());
        }

        let url = self.table_url(locations);
        tracing::debug!(locations = locations.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<OsrmTableResponse>()?;

        body.into_matrix(locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    /// Seconds to minutes and meters to km. Unroutable pairs (null) become
    /// infinite so any route using them is infeasible.
    fn into_matrix(self, expected: usize) -> Result<DistanceMatrix, MatrixError> {
        let durations = self.durations.ok_or(MatrixError::MissingAnnotation("durations"))?;
        let distances = self.distances.ok_or(MatrixError::MissingAnnotation("distances"))?;
        if durations.len() != expected {
            return Err(MatrixError::DimensionMismatch {
                expected,
                actual: durations.len(),
            });
        }

        let convert = |table: Vec<Vec<Option<f64>>>, divisor: f64| -> Vec<Vec<f64>> {
            table
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|value| value.map_or(f64::INFINITY, |v| v / divisor))
                        .collect()
                })
                .collect()
        };

        DistanceMatrix::new(convert(distances, 1000.0), convert(durations, 60.0))
    }
}
