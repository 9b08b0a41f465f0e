//! Zone safety validation
//!
//! Checks a coordinate against nearby restricted-use facilities using
//! two-tier distance thresholds.
//!
//! | Hazard          | Critical (prohibited) | Caution   |
//! |-----------------|-----------------------|-----------|
//! | Airport         | < 8 km                | < 15 km   |
//! | Military        | < 5 km                | < 10 km   |
//! | School/college  | < 500 m               | < 2 km    |
//! | Hospital        | -                     | < 1.5 km  |
//!
//! Dense urban areas warn when a place has > 100k inhabitants within 10 km,
//! > 50k within 5 km, or is a suburb within 2 km.
//!
//! Warnings are emitted in a fixed order: airports, military, schools,
//! hospitals, high latitude, urban density.

use crate::geo::Coordinate;
use crate::poi::{Facility, FacilityKind, PlaceKind, PoiProvider};
use crate::SEARCH_RADIUS_M;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Message of the warning emitted when facility data could not be fetched
pub const VERIFICATION_FAILED_MESSAGE: &str =
    "Zone verification could not be completed: nearby facility data is unavailable. \
     Confirm airspace and land-use restrictions with local authorities before launching.";

/// Substring marking a warning as a critical violation regardless of distance
pub const CRITICAL_MARKER: &str = "CRITICAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    Airport,
    School,
    Military,
    UrbanDense,
    /// Kept for schema compatibility; no rule currently produces it
    Restricted,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Safe,
    Caution,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    pub message: String,
    /// Distance to the hazard in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Warning {
    pub fn new(warning_type: WarningType, message: impl Into<String>, distance: Option<f64>) -> Self {
        Self {
            warning_type,
            message: message.into(),
            distance,
        }
    }

    pub fn verification_failed() -> Self {
        Self::new(WarningType::Other, VERIFICATION_FAILED_MESSAGE, None)
    }

    pub fn is_verification_failure(&self) -> bool {
        self.warning_type == WarningType::Other && self.message == VERIFICATION_FAILED_MESSAGE
    }

    /// Critical-tier violation: inside the prohibited radius of an airport,
    /// military site or school, or carrying the explicit marker.
    pub fn is_critical(&self, thresholds: &ZoneThresholds) -> bool {
        if self.message.contains(CRITICAL_MARKER) {
            return true;
        }
        let Some(distance) = self.distance else {
            return false;
        };
        match self.warning_type {
            WarningType::Airport => distance < thresholds.airport_critical_m,
            WarningType::Military => distance < thresholds.military_critical_m,
            WarningType::School => distance < thresholds.school_critical_m,
            _ => false,
        }
    }
}

/// Distance thresholds (meters) and the high-latitude cutoff (degrees)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneThresholds {
    pub airport_critical_m: f64,
    pub airport_caution_m: f64,
    pub military_critical_m: f64,
    pub military_caution_m: f64,
    pub school_critical_m: f64,
    pub school_caution_m: f64,
    pub hospital_caution_m: f64,
    /// (population floor, radius) pairs for dense urban warnings
    pub urban_tiers: Vec<(u64, f64)>,
    pub suburb_radius_m: f64,
    pub high_latitude_deg: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            airport_critical_m: 8_000.0,
            airport_caution_m: 15_000.0,
            military_critical_m: 5_000.0,
            military_caution_m: 10_000.0,
            school_critical_m: 500.0,
            school_caution_m: 2_000.0,
            hospital_caution_m: 1_500.0,
            urban_tiers: vec![(100_000, 10_000.0), (50_000, 5_000.0)],
            suburb_radius_m: 2_000.0,
            high_latitude_deg: 60.0,
        }
    }
}

/// Outcome of zone validation. Severity and validity are derived from the
/// warning list at construction and never set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawZoneValidation")]
pub struct ZoneValidation {
    warnings: Vec<Warning>,
    is_valid: bool,
    severity: Severity,
}

impl ZoneValidation {
    pub fn from_warnings(warnings: Vec<Warning>, thresholds: &ZoneThresholds) -> Self {
        let any_critical = warnings.iter().any(|w| w.is_critical(thresholds));
        let unavailable = warnings.iter().any(Warning::is_verification_failure);
        let restricted_proximity = warnings.iter().any(|w| {
            matches!(
                w.warning_type,
                WarningType::Airport | WarningType::Military | WarningType::School
            )
        });

        let severity = if any_critical {
            Severity::Danger
        } else if !warnings.is_empty() {
            Severity::Caution
        } else {
            Severity::Safe
        };

        Self {
            is_valid: !any_critical && !unavailable && !restricted_proximity,
            severity,
            warnings,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.message.clone()).collect()
    }
}

/// Wire form; only the warnings are trusted, the rest is re-derived
#[derive(Deserialize)]
struct RawZoneValidation {
    #[serde(default)]
    warnings: Vec<Warning>,
}

impl From<RawZoneValidation> for ZoneValidation {
    fn from(raw: RawZoneValidation) -> Self {
        Self::from_warnings(raw.warnings, &ZoneThresholds::default())
    }
}

/// Zone validator over a pluggable POI provider
pub struct ZoneValidator {
    provider: Arc<dyn PoiProvider>,
    thresholds: ZoneThresholds,
    radius_m: f64,
    timeout: Duration,
}

impl ZoneValidator {
    pub fn new(provider: Arc<dyn PoiProvider>) -> Self {
        Self {
            provider,
            thresholds: ZoneThresholds::default(),
            radius_m: SEARCH_RADIUS_M,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ZoneThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn thresholds(&self) -> &ZoneThresholds {
        &self.thresholds
    }

    /// Query the provider and evaluate. Provider failure or timeout is
    /// reported as a verification warning, never as an error.
    pub async fn validate(&self, coordinate: &Coordinate) -> ZoneValidation {
        let lookup = tokio::time::timeout(
            self.timeout,
            self.provider.nearby(coordinate, self.radius_m),
        )
        .await;

        let facilities = match lookup {
            Ok(Ok(facilities)) => Some(facilities),
            Ok(Err(e)) => {
                warn!("POI provider '{}' failed: {}", self.provider.name(), e);
                None
            }
            Err(_) => {
                warn!(
                    "POI provider '{}' timed out after {:?}",
                    self.provider.name(),
                    self.timeout
                );
                None
            }
        };

        let validation = evaluate(coordinate, facilities.as_deref(), &self.thresholds);
        info!(
            "Zone validation at {:.4},{:.4}: {:?}, {} warnings, valid={}",
            coordinate.latitude,
            coordinate.longitude,
            validation.severity(),
            validation.warnings().len(),
            validation.is_valid()
        );
        validation
    }
}

/// Pure evaluation of a facility set. `None` means the lookup failed.
pub fn evaluate(
    coordinate: &Coordinate,
    facilities: Option<&[Facility]>,
    thresholds: &ZoneThresholds,
) -> ZoneValidation {
    let mut warnings = Vec::new();

    let mut airports = Vec::new();
    let mut military = Vec::new();
    let mut schools = Vec::new();
    let mut hospitals = Vec::new();
    let mut places = Vec::new();

    match facilities {
        None => warnings.push(Warning::verification_failed()),
        Some(facilities) => {
            let mut seen: HashSet<(&str, u64)> = HashSet::new();
            for facility in facilities {
                if !seen.insert(facility.identity()) {
                    continue;
                }
                let Some(kind) = facility.kind() else {
                    continue;
                };
                let distance = facility.distance_to(coordinate);
                debug!(
                    "{}/{} {:?} at {:.0} m",
                    facility.element_type, facility.id, kind, distance
                );
                match kind {
                    FacilityKind::Airport => airports.push((facility, distance)),
                    FacilityKind::Military => military.push((facility, distance)),
                    FacilityKind::School => schools.push((facility, distance)),
                    FacilityKind::Hospital => hospitals.push((facility, distance)),
                    FacilityKind::Place(place) => places.push((facility, place, distance)),
                }
            }
        }
    }

    for (facility, d) in airports {
        let name = facility.name().unwrap_or("An airport");
        if d < thresholds.airport_critical_m {
            warnings.push(Warning::new(
                WarningType::Airport,
                format!(
                    "CRITICAL: {} is {} away. Rocket launches are prohibited within {} of airports.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.airport_critical_m)
                ),
                Some(d),
            ));
        } else if d < thresholds.airport_caution_m {
            warnings.push(Warning::new(
                WarningType::Airport,
                format!(
                    "{} is {} away. Launches within {} of an airport require coordination with aviation authorities.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.airport_caution_m)
                ),
                Some(d),
            ));
        }
    }

    for (facility, d) in military {
        let name = facility.name().unwrap_or("A military installation");
        if d < thresholds.military_critical_m {
            warnings.push(Warning::new(
                WarningType::Military,
                format!(
                    "CRITICAL: {} is {} away. Launches are prohibited within {} of military facilities.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.military_critical_m)
                ),
                Some(d),
            ));
        } else if d < thresholds.military_caution_m {
            warnings.push(Warning::new(
                WarningType::Military,
                format!(
                    "{} is {} away. Launches within {} of a military facility need clearance.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.military_caution_m)
                ),
                Some(d),
            ));
        }
    }

    for (facility, d) in schools {
        let name = facility.name().unwrap_or("A school");
        if d < thresholds.school_critical_m {
            warnings.push(Warning::new(
                WarningType::School,
                format!(
                    "CRITICAL: {} is only {} away. Launches are prohibited within {} of schools.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.school_critical_m)
                ),
                Some(d),
            ));
        } else if d < thresholds.school_caution_m {
            warnings.push(Warning::new(
                WarningType::School,
                format!(
                    "{} is {} away. Keep launches at least {} from schools.",
                    name,
                    format_distance(d),
                    format_distance(thresholds.school_caution_m)
                ),
                Some(d),
            ));
        }
    }

    for (facility, d) in hospitals {
        if d < thresholds.hospital_caution_m {
            warnings.push(Warning::new(
                WarningType::Other,
                format!(
                    "{} is {} away. Avoid launching within {} of a hospital because of air ambulance traffic.",
                    facility.name().unwrap_or("A hospital"),
                    format_distance(d),
                    format_distance(thresholds.hospital_caution_m)
                ),
                Some(d),
            ));
        }
    }

    if coordinate.latitude.abs() > thresholds.high_latitude_deg {
        warnings.push(Warning::new(
            WarningType::Other,
            format!(
                "High latitude ({:.1}°): extreme weather and sparse infrastructure may complicate launch operations.",
                coordinate.latitude
            ),
            None,
        ));
    }

    for (facility, place, d) in places {
        let population = facility.population().unwrap_or(0);
        let dense = thresholds
            .urban_tiers
            .iter()
            .any(|&(floor, radius)| population > floor && d < radius);
        let close_suburb = place == PlaceKind::Suburb && d < thresholds.suburb_radius_m;

        if dense || close_suburb {
            let name = facility.name().unwrap_or("A populated area");
            let detail = if population > 0 {
                format!("population {}", population)
            } else {
                format!("{:?}", place).to_lowercase()
            };
            warnings.push(Warning::new(
                WarningType::UrbanDense,
                format!(
                    "Dense urban area nearby: {} ({}) is {} away.",
                    name,
                    detail,
                    format_distance(d)
                ),
                Some(d),
            ));
        }
    }

    ZoneValidation::from_warnings(warnings, thresholds)
}

/// "850 m" below one kilometer, "3.2 km" above
fn format_distance(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}
