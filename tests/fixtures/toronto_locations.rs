//! Real Toronto / GTA locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use fieldops_planner::model::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

// ============================================================================
// Depots / home bases
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Union Station", 43.6453, -79.3806),
    Location::new("North York Centre", 43.7684, -79.4129),
    Location::new("Scarborough Town Centre", 43.7757, -79.2577),
    Location::new("Etobicoke Civic Centre", 43.6435, -79.5653),
];

// ============================================================================
// Downtown
// ============================================================================

pub const DOWNTOWN_LOCATIONS: &[Location] = &[
    Location::new("CN Tower", 43.6426, -79.3871),
    Location::new("St. Lawrence Market", 43.6487, -79.3716),
    Location::new("Eaton Centre", 43.6544, -79.3807),
    Location::new("Nathan Phillips Square", 43.6525, -79.3839),
    Location::new("Royal Ontario Museum", 43.6677, -79.3948),
    Location::new("Kensington Market", 43.6547, -79.4005),
    Location::new("Distillery District", 43.6503, -79.3596),
    Location::new("Art Gallery of Ontario", 43.6536, -79.3925),
    Location::new("Casa Loma", 43.6780, -79.4094),
    Location::new("Yonge-Dundas Square", 43.6561, -79.3802),
];

// ============================================================================
// Midtown / North York
// ============================================================================

pub const NORTH_LOCATIONS: &[Location] = &[
    Location::new("Yonge and Eglinton", 43.7067, -79.3985),
    Location::new("Sunnybrook Hospital", 43.7220, -79.3760),
    Location::new("Yorkdale Mall", 43.7255, -79.4522),
    Location::new("Fairview Mall", 43.7778, -79.3445),
    Location::new("Bayview Village", 43.7691, -79.3858),
    Location::new("Downsview Park", 43.7400, -79.4780),
];

// ============================================================================
// East / Scarborough
// ============================================================================

pub const EAST_LOCATIONS: &[Location] = &[
    Location::new("Scarborough Bluffs", 43.7057, -79.2320),
    Location::new("Toronto Zoo", 43.8177, -79.1859),
    Location::new("Danforth and Pape", 43.6794, -79.3448),
    Location::new("Woodbine Beach", 43.6634, -79.3063),
    Location::new("Kennedy Station", 43.7325, -79.2636),
];

// ============================================================================
// West / Etobicoke
// ============================================================================

pub const WEST_LOCATIONS: &[Location] = &[
    Location::new("High Park", 43.6465, -79.4637),
    Location::new("Sherway Gardens", 43.6117, -79.5573),
    Location::new("Humber Bay Park", 43.6225, -79.4770),
    Location::new("Bloor West Village", 43.6500, -79.4800),
    Location::new("Kipling Station", 43.6373, -79.5358),
];

/// Returns all job locations as a single list.
pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(32);
    all.extend_from_slice(DOWNTOWN_LOCATIONS);
    all.extend_from_slice(NORTH_LOCATIONS);
    all.extend_from_slice(EAST_LOCATIONS);
    all.extend_from_slice(WEST_LOCATIONS);
    all
}

/// Returns locations spread across the city (good for multi-route tests).
pub fn geographically_diverse_locations() -> Vec<Location> {
    vec![
        DOWNTOWN_LOCATIONS[1].clone(),
        DOWNTOWN_LOCATIONS[4].clone(),
        NORTH_LOCATIONS[2].clone(),
        NORTH_LOCATIONS[3].clone(),
        EAST_LOCATIONS[0].clone(),
        EAST_LOCATIONS[3].clone(),
        WEST_LOCATIONS[0].clone(),
        WEST_LOCATIONS[1].clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_toronto_area() {
        for loc in all_locations().iter().chain(DEPOTS) {
            assert!(loc.lat > 43.55 && loc.lat < 43.90, "{} lat out of range: {}", loc.name, loc.lat);
            assert!(loc.lng > -79.65 && loc.lng < -79.10, "{} lng out of range: {}", loc.name, loc.lng);
        }
    }
}
