//! Coordinate-only heuristic estimators
//!
//! - Development level: proximity to major cities
//! - Political stability: proximity to stable regions
//! - Climate band: latitude only
//!
//! Proximity estimators blend the nearest anchor's score with a default:
//!
//! ```text
//! w     = max(0, 1 − d / decay)
//! score = anchor·w + default·(1 − w)
//! ```
//!
//! | Estimator   | Default | Decay     | Anchor range |
//! |-------------|---------|-----------|--------------|
//! | Development | 60      | 5,000 km  | 60 - 95      |
//! | Stability   | 65      | 8,000 km  | 85 - 95      |

use crate::geo::{haversine_m, Coordinate};
use serde::{Deserialize, Serialize};

pub const DEVELOPMENT_DEFAULT: f64 = 60.0;
pub const DEVELOPMENT_DECAY_M: f64 = 5_000_000.0;
pub const STABILITY_DEFAULT: f64 = 65.0;
pub const STABILITY_DECAY_M: f64 = 8_000_000.0;

/// A reference point with a baseline score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub score: f64,
}

/// Result of a proximity estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityEstimate {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

/// Ordered anchor list with its blend parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorTable {
    pub anchors: Vec<Anchor>,
    pub default_score: f64,
    pub decay_m: f64,
}

impl AnchorTable {
    pub fn new(default_score: f64, decay_m: f64) -> Self {
        Self {
            anchors: Vec::new(),
            default_score,
            decay_m,
        }
    }

    pub fn add(mut self, name: &str, latitude: f64, longitude: f64, score: f64) -> Self {
        self.anchors.push(Anchor {
            name: name.to_string(),
            latitude,
            longitude,
            score,
        });
        self
    }

    /// Major cities, baseline 60-95
    pub fn development_defaults() -> Self {
        Self::new(DEVELOPMENT_DEFAULT, DEVELOPMENT_DECAY_M)
            .add("New York", 40.7128, -74.0060, 95.0)
            .add("London", 51.5074, -0.1278, 95.0)
            .add("Tokyo", 35.6762, 139.6503, 95.0)
            .add("San Francisco", 37.7749, -122.4194, 92.0)
            .add("Singapore", 1.3521, 103.8198, 92.0)
            .add("Paris", 48.8566, 2.3522, 90.0)
            .add("Los Angeles", 34.0522, -118.2437, 90.0)
            .add("Houston", 29.7604, -95.3698, 90.0)
            .add("Seoul", 37.5665, 126.9780, 90.0)
            .add("Berlin", 52.5200, 13.4050, 88.0)
            .add("Toronto", 43.6532, -79.3832, 88.0)
            .add("Sydney", -33.8688, 151.2093, 88.0)
            .add("Shanghai", 31.2304, 121.4737, 85.0)
            .add("Beijing", 39.9042, 116.4074, 85.0)
            .add("Dubai", 25.2048, 55.2708, 85.0)
            .add("Moscow", 55.7558, 37.6173, 78.0)
            .add("Bangalore", 12.9716, 77.5946, 72.0)
            .add("São Paulo", -23.5505, -46.6333, 72.0)
            .add("Mumbai", 19.0760, 72.8777, 70.0)
            .add("Mexico City", 19.4326, -99.1332, 70.0)
            .add("Buenos Aires", -34.6037, -58.3816, 70.0)
            .add("Cape Town", -33.9249, 18.4241, 65.0)
            .add("Cairo", 30.0444, 31.2357, 62.0)
            .add("Lagos", 6.5244, 3.3792, 60.0)
    }

    /// Stable regions, baseline 85-95
    pub fn stability_defaults() -> Self {
        Self::new(STABILITY_DEFAULT, STABILITY_DECAY_M)
            .add("Switzerland", 46.9480, 7.4474, 95.0)
            .add("Norway", 59.9139, 10.7522, 95.0)
            .add("Iceland", 64.1466, -21.9426, 93.0)
            .add("New Zealand", -41.2865, 174.7762, 93.0)
            .add("Denmark", 55.6761, 12.5683, 93.0)
            .add("Finland", 60.1699, 24.9384, 93.0)
            .add("Canada", 45.4215, -75.6972, 92.0)
            .add("Sweden", 59.3293, 18.0686, 92.0)
            .add("Netherlands", 52.3676, 4.9041, 90.0)
            .add("Austria", 48.2082, 16.3738, 90.0)
            .add("Australia", -35.2809, 149.1300, 90.0)
            .add("Japan", 35.6762, 139.6503, 90.0)
            .add("Singapore", 1.3521, 103.8198, 90.0)
            .add("Ireland", 53.3498, -6.2603, 89.0)
            .add("Germany", 52.5200, 13.4050, 88.0)
            .add("United Kingdom", 51.5074, -0.1278, 86.0)
            .add("United States", 38.9072, -77.0369, 85.0)
            .add("Uruguay", -34.9011, -56.1645, 85.0)
    }

    /// Nearest-anchor blend. Ties keep the earliest anchor in the table.
    pub fn estimate(&self, coordinate: &Coordinate) -> ProximityEstimate {
        let mut nearest: Option<(&Anchor, f64)> = None;
        for anchor in &self.anchors {
            let d = haversine_m(
                coordinate.latitude,
                coordinate.longitude,
                anchor.latitude,
                anchor.longitude,
            );
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((anchor, d));
            }
        }

        match nearest {
            Some((anchor, d)) => {
                let weight = (1.0 - d / self.decay_m).max(0.0);
                ProximityEstimate {
                    score: anchor.score * weight + self.default_score * (1.0 - weight),
                    nearest_anchor: Some(anchor.name.clone()),
                    distance_m: Some(d),
                }
            }
            None => ProximityEstimate {
                score: self.default_score,
                nearest_anchor: None,
                distance_m: None,
            },
        }
    }
}

/// Latitude climate bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateBand {
    Tropical,
    Temperate,
    MidLatitude,
    Polar,
}

impl ClimateBand {
    pub fn from_latitude(latitude: f64) -> Self {
        let lat = latitude.abs();
        if lat < 23.5 {
            ClimateBand::Tropical
        } else if lat < 40.0 {
            ClimateBand::Temperate
        } else if lat < 60.0 {
            ClimateBand::MidLatitude
        } else {
            ClimateBand::Polar
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            ClimateBand::Tropical => 70.0,
            ClimateBand::Temperate => 85.0,
            ClimateBand::MidLatitude => 65.0,
            ClimateBand::Polar => 45.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClimateBand::Tropical => {
                "Tropical climate: warm year-round, with high humidity and frequent convective storms."
            }
            ClimateBand::Temperate => {
                "Temperate climate: generally favorable launch weather with moderate seasonal variation."
            }
            ClimateBand::MidLatitude => {
                "Mid-latitude climate: variable weather, pronounced seasons and frequent frontal systems."
            }
            ClimateBand::Polar => {
                "Polar/high-latitude climate: cold temperatures, strong winds and short launch windows."
            }
        }
    }
}

/// Both anchor tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heuristics {
    pub development: AnchorTable,
    pub stability: AnchorTable,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            development: AnchorTable::development_defaults(),
            stability: AnchorTable::stability_defaults(),
        }
    }
}

/// Everything the scorers need that derives from the coordinate alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    pub development: ProximityEstimate,
    pub climate: ClimateBand,
    pub stability: ProximityEstimate,
}

impl Heuristics {
    pub fn profile(&self, coordinate: &Coordinate) -> LocationProfile {
        LocationProfile {
            development: self.development.estimate(coordinate),
            climate: ClimateBand::from_latitude(coordinate.latitude),
            stability: self.stability.estimate(coordinate),
        }
    }
}
