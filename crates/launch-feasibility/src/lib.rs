//! Launch Site Feasibility Engine
//!
//! Assesses whether launching a rocket (hobby or industrial) from an
//! arbitrary coordinate is feasible. Produces six category scores, an
//! overall score and a narrative recommendation.
//!
//! # Pipeline
//!
//! ```text
//! Coordinate + RocketConfiguration
//!     → Zone Validator (POI provider)
//!     → Heuristic Estimators (development, climate, stability)
//!     → Category Scorers (6)            ┐
//!     → Narrative Enrichment (optional) ┘ run concurrently
//!     → Aggregator → AnalysisResult
//! ```
//!
//! | Category      | Sub-scores                                   |
//! |---------------|----------------------------------------------|
//! | Resources     | materials, expertise, facilities             |
//! | Legal         | permits, regulations, restrictions           |
//! | Geographical  | terrain, weather, accessibility              |
//! | Geopolitical  | stability, cooperation, risks                |
//! | Timing        | seasonality, current conditions (+ window)   |
//! | Practicality  | cost, timeline, success probability          |
//!
//! The heuristics are a rule-based approximation, not a physical model.

use thiserror::Error;

pub mod config;
pub mod engine;
pub mod geo;
pub mod heuristics;
pub mod narrative;
pub mod poi;
pub mod rocket;
pub mod scoring;
pub mod store;
pub mod zone;

pub use config::EngineConfig;
pub use engine::{AnalysisRequest, AnalysisResult, FeasibilityEngine};
pub use geo::{haversine_m, Coordinate, PlaceInfo};
pub use rocket::{ProjectType, RocketCategory, RocketConfiguration, SafetyLevel};
pub use scoring::{FeasibilityScore, FeasibilityStatus};
pub use zone::{Severity, Warning, WarningType, ZoneValidation, ZoneValidator};

/// Earth radius used by every distance computation (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Radius of the facility search around a candidate site (meters)
pub const SEARCH_RADIUS_M: f64 = 20_000.0;

#[derive(Error, Debug)]
pub enum FeasibilityError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid rocket configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Analysis not found: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeasibilityError>;
