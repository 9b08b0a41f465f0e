//! Coordinates and great-circle distance

use crate::{FeasibilityError, Result, EARTH_RADIUS_M};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Optional place metadata supplied by a reverse-geocoding collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl PlaceInfo {
    /// Most specific human-readable label available
    pub fn label(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.region.as_deref())
            .or(self.display_name.as_deref())
            .or(self.country.as_deref())
    }
}

/// A candidate launch coordinate (degrees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub place: PlaceInfo,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self {
            latitude,
            longitude,
            place: PlaceInfo::default(),
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn with_place(mut self, place: PlaceInfo) -> Self {
        self.place = place;
        self
    }

    /// Range check: latitude in [-90, 90], longitude in [-180, 180]
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FeasibilityError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FeasibilityError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Label for prose: place name if known, otherwise the raw coordinate
    pub fn describe(&self) -> String {
        match (self.place.label(), self.place.country.as_deref()) {
            (Some(label), Some(country)) if label != country => format!("{}, {}", label, country),
            (Some(label), _) => label.to_string(),
            (None, _) => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

/// Haversine distance between two points in meters
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let dlat = (lat2 - lat1) * PI / 180.0;
    let dlon = (lon2 - lon1) * PI / 180.0;

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine() {
        // NYC to London: ~5,570 km
        let dist = haversine_m(40.7128, -74.0060, 51.5074, -0.1278);
        assert!((dist - 5_570_000.0).abs() < 50_000.0);

        // Same point
        let dist = haversine_m(12.5, -45.25, 12.5, -45.25);
        assert!(dist.abs() < 1e-6);
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_m(-33.8688, 151.2093, 35.6762, 139.6503);
        let ba = haversine_m(35.6762, 139.6503, -33.8688, 151.2093);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_range_checks() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_describe() {
        let bare = Coordinate::new(10.0, 20.0).unwrap();
        assert_eq!(bare.describe(), "10.0000, 20.0000");

        let named = bare.with_place(PlaceInfo {
            city: Some("Kourou".into()),
            country: Some("French Guiana".into()),
            ..Default::default()
        });
        assert_eq!(named.describe(), "Kourou, French Guiana");
    }
}
