//! Points-of-interest providers
//!
//! Two interchangeable sources of nearby facilities:
//! - [`OverpassProvider`]: live OpenStreetMap data via the Overpass API
//! - [`StaticHazardProvider`]: a fixed table of well-known hazards
//!
//! Both return raw [`Facility`] records; hazard classification happens in
//! the zone validator from the facility tags.
//!
//! # Usage
//!
//! ```rust,ignore
//! let provider = OverpassProvider::new(OverpassConfig::from_env())?;
//! let facilities = provider.nearby(&coordinate, 20_000.0).await?;
//! ```

use crate::config::{env_string, env_u64};
use crate::geo::{haversine_m, Coordinate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// POI provider errors
#[derive(Error, Debug, Clone)]
pub enum PoiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Source of facilities around a coordinate
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// All hazard-relevant facilities within `radius_m` of `center`
    async fn nearby(&self, center: &Coordinate, radius_m: f64) -> Result<Vec<Facility>, PoiError>;
}

/// Populated place granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    City,
    Town,
    Suburb,
}

/// Hazard classification of a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Airport,
    School,
    Military,
    Hospital,
    Place(PlaceKind),
}

/// A facility returned by a provider. Lives for one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Provider element type (`node`, `way`, `relation`, `static`)
    pub element_type: String,
    /// Provider element id, unique within `element_type`
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Facility {
    /// Composite identity used for deduplication
    pub fn identity(&self) -> (&str, u64) {
        (self.element_type.as_str(), self.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    /// Parsed `population` tag, if present and numeric
    pub fn population(&self) -> Option<u64> {
        self.tags.get("population").and_then(|p| parse_population(p))
    }

    /// Classify by tag. First match wins in the order
    /// airport, military, school, hospital, populated place.
    pub fn kind(&self) -> Option<FacilityKind> {
        let tag = |k: &str| self.tags.get(k).map(String::as_str);

        if matches!(tag("aeroway"), Some("aerodrome") | Some("airport")) {
            return Some(FacilityKind::Airport);
        }
        if tag("landuse") == Some("military") || tag("military").is_some() {
            return Some(FacilityKind::Military);
        }
        if matches!(tag("amenity"), Some("school") | Some("college") | Some("university")) {
            return Some(FacilityKind::School);
        }
        if tag("amenity") == Some("hospital") {
            return Some(FacilityKind::Hospital);
        }
        match tag("place") {
            Some("city") => Some(FacilityKind::Place(PlaceKind::City)),
            Some("town") => Some(FacilityKind::Place(PlaceKind::Town)),
            Some("suburb") => Some(FacilityKind::Place(PlaceKind::Suburb)),
            _ => None,
        }
    }

    pub fn distance_to(&self, coordinate: &Coordinate) -> f64 {
        haversine_m(
            self.latitude,
            self.longitude,
            coordinate.latitude,
            coordinate.longitude,
        )
    }
}

/// Parse OSM-style population values ("8,336,817", "12 000", "5000;5100")
pub fn parse_population(raw: &str) -> Option<u64> {
    let first = raw.split(';').next()?;
    let digits: String = first
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, ',' | ' ' | '.' | '_'))
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// ---- Overpass (live) ----

/// Overpass API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_sec: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_sec: 25,
        }
    }
}

impl OverpassConfig {
    /// Defaults overridden by `OVERPASS_URL` / `POI_TIMEOUT_SEC`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env_string("OVERPASS_URL").unwrap_or(defaults.endpoint),
            timeout_sec: env_u64("POI_TIMEOUT_SEC", defaults.timeout_sec),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

/// Live OpenStreetMap provider
pub struct OverpassProvider {
    config: OverpassConfig,
    client: reqwest::Client,
}

impl OverpassProvider {
    pub fn new(config: OverpassConfig) -> Result<Self, PoiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .user_agent(concat!("launch-feasibility/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PoiError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Overpass QL for every hazard category around a point
    pub fn build_query(center: &Coordinate, radius_m: f64) -> String {
        let around = format!(
            "(around:{:.0},{:.6},{:.6})",
            radius_m, center.latitude, center.longitude
        );
        format!(
            "[out:json][timeout:25];\n(\n  \
             nwr[\"aeroway\"=\"aerodrome\"]{a};\n  \
             nwr[\"amenity\"~\"^(school|college|university)$\"]{a};\n  \
             nwr[\"landuse\"=\"military\"]{a};\n  \
             nwr[\"military\"]{a};\n  \
             nwr[\"amenity\"=\"hospital\"]{a};\n  \
             node[\"place\"~\"^(city|town|suburb)$\"]{a};\n\
             );\nout center;",
            a = around
        )
    }

    /// Parse an Overpass JSON body into facilities.
    /// Elements with neither a position nor a center are dropped.
    pub fn parse_response(body: &str) -> Result<Vec<Facility>, PoiError> {
        let response: OverpassResponse =
            serde_json::from_str(body).map_err(|e| PoiError::ParseError(e.to_string()))?;

        let facilities = response
            .elements
            .into_iter()
            .filter_map(|el| {
                let (latitude, longitude) = match (el.lat, el.lon, el.center) {
                    (Some(lat), Some(lon), _) => (lat, lon),
                    (_, _, Some(center)) => (center.lat, center.lon),
                    _ => return None,
                };
                Some(Facility {
                    element_type: el.element_type,
                    id: el.id,
                    latitude,
                    longitude,
                    tags: el.tags,
                })
            })
            .collect();

        Ok(facilities)
    }
}

#[async_trait]
impl PoiProvider for OverpassProvider {
    fn name(&self) -> &str {
        "overpass"
    }

    async fn nearby(&self, center: &Coordinate, radius_m: f64) -> Result<Vec<Facility>, PoiError> {
        let query = Self::build_query(center, radius_m);

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PoiError::Timeout(self.config.timeout_sec)
                } else {
                    PoiError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(PoiError::ApiError(format!(
                "Overpass returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PoiError::RequestFailed(e.to_string()))?;

        let facilities = Self::parse_response(&body)?;
        debug!(
            "Overpass returned {} facilities around {:.4},{:.4}",
            facilities.len(),
            center.latitude,
            center.longitude
        );
        Ok(facilities)
    }
}

// ---- Static table ----

/// One row of the static hazard table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticHazard {
    pub name: String,
    pub kind: FacilityKind,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

impl StaticHazard {
    pub fn new(name: &str, kind: FacilityKind, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            latitude,
            longitude,
            population: None,
        }
    }

    fn city(name: &str, latitude: f64, longitude: f64, population: u64) -> Self {
        Self {
            population: Some(population),
            ..Self::new(name, FacilityKind::Place(PlaceKind::City), latitude, longitude)
        }
    }

    /// Tags equivalent to what a live provider would report
    fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert("name".to_string(), self.name.clone());
        let (key, value) = match self.kind {
            FacilityKind::Airport => ("aeroway", "aerodrome"),
            FacilityKind::School => ("amenity", "school"),
            FacilityKind::Military => ("landuse", "military"),
            FacilityKind::Hospital => ("amenity", "hospital"),
            FacilityKind::Place(PlaceKind::City) => ("place", "city"),
            FacilityKind::Place(PlaceKind::Town) => ("place", "town"),
            FacilityKind::Place(PlaceKind::Suburb) => ("place", "suburb"),
        };
        tags.insert(key.to_string(), value.to_string());
        if let Some(population) = self.population {
            tags.insert("population".to_string(), population.to_string());
        }
        tags
    }
}

/// Offline provider over a fixed hazard table
#[derive(Debug, Clone)]
pub struct StaticHazardProvider {
    hazards: Vec<StaticHazard>,
}

impl StaticHazardProvider {
    pub fn new(hazards: Vec<StaticHazard>) -> Self {
        Self { hazards }
    }

    /// Built-in table of major airports, military installations and cities
    pub fn with_defaults() -> Self {
        use FacilityKind::{Airport, Military};

        Self::new(vec![
            // Airports
            StaticHazard::new("John F. Kennedy International Airport", Airport, 40.6413, -73.7781),
            StaticHazard::new("LaGuardia Airport", Airport, 40.7769, -73.8740),
            StaticHazard::new("Newark Liberty International Airport", Airport, 40.6895, -74.1745),
            StaticHazard::new("Los Angeles International Airport", Airport, 33.9416, -118.4085),
            StaticHazard::new("O'Hare International Airport", Airport, 41.9742, -87.9073),
            StaticHazard::new("Hartsfield-Jackson Atlanta International Airport", Airport, 33.6407, -84.4277),
            StaticHazard::new("London Heathrow Airport", Airport, 51.4700, -0.4543),
            StaticHazard::new("Paris Charles de Gaulle Airport", Airport, 49.0097, 2.5479),
            StaticHazard::new("Frankfurt Airport", Airport, 50.0379, 8.5622),
            StaticHazard::new("Tokyo Haneda Airport", Airport, 35.5494, 139.7798),
            StaticHazard::new("Dubai International Airport", Airport, 25.2532, 55.3657),
            StaticHazard::new("Sydney Kingsford Smith Airport", Airport, -33.9399, 151.1753),
            // Military installations
            StaticHazard::new("The Pentagon", Military, 38.8719, -77.0563),
            StaticHazard::new("Fort Liberty", Military, 35.1390, -79.0060),
            StaticHazard::new("Marine Corps Base Camp Pendleton", Military, 33.3400, -117.3000),
            StaticHazard::new("Nellis Air Force Base", Military, 36.2360, -115.0340),
            StaticHazard::new("Edwards Air Force Base", Military, 34.9054, -117.8839),
            StaticHazard::new("RAF Lakenheath", Military, 52.4093, 0.5610),
            StaticHazard::new("Ramstein Air Base", Military, 49.4369, 7.6003),
            // Dense urban centres
            StaticHazard::city("New York", 40.7128, -74.0060, 8_336_817),
            StaticHazard::city("Los Angeles", 34.0522, -118.2437, 3_898_747),
            StaticHazard::city("Chicago", 41.8781, -87.6298, 2_746_388),
            StaticHazard::city("London", 51.5074, -0.1278, 8_982_000),
            StaticHazard::city("Paris", 48.8566, 2.3522, 2_161_000),
            StaticHazard::city("Tokyo", 35.6762, 139.6503, 13_960_000),
            StaticHazard::city("Sydney", -33.8688, 151.2093, 5_312_000),
        ])
    }

    pub fn hazards(&self) -> &[StaticHazard] {
        &self.hazards
    }
}

impl Default for StaticHazardProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl PoiProvider for StaticHazardProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn nearby(&self, center: &Coordinate, radius_m: f64) -> Result<Vec<Facility>, PoiError> {
        let facilities = self
            .hazards
            .iter()
            .enumerate()
            .filter(|(_, h)| haversine_m(center.latitude, center.longitude, h.latitude, h.longitude) <= radius_m)
            .map(|(i, h)| Facility {
                element_type: "static".to_string(),
                id: i as u64,
                latitude: h.latitude,
                longitude: h.longitude,
                tags: h.tags(),
            })
            .collect();
        Ok(facilities)
    }
}
