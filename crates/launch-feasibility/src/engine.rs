//! Feasibility engine (aggregator)
//!
//! Runs one analysis end to end:
//!
//! 1. Zone validation against the POI provider
//! 2. Heuristic profile + six category scorers (pure)
//! 3. Narrative enrichment, concurrently with step 2
//! 4. Overall score and the assembled [`AnalysisResult`]
//!
//! External failures never fail an analysis. A broken POI lookup becomes a
//! zone warning and a broken narrative call selects the fallback text.

use crate::config::EngineConfig;
use crate::geo::Coordinate;
use crate::heuristics::Heuristics;
use crate::narrative::{
    fallback_narrative, HttpNarrativeProvider, NarrativeEnricher, NarrativeProvider,
    NarrativeRequest, NarrativeSource,
};
use crate::poi::{OverpassConfig, OverpassProvider, PoiProvider, StaticHazardProvider};
use crate::rocket::RocketConfiguration;
use crate::scoring::{self, CategoryAnalyses, ScoringInput};
use crate::zone::{ZoneValidation, ZoneValidator};
use crate::{FeasibilityError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub coordinate: Coordinate,
    pub rocket: RocketConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AnalysisRequest {
    pub fn new(coordinate: Coordinate, rocket: RocketConfiguration) -> Self {
        Self {
            coordinate,
            rocket,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// A completed analysis. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub coordinate: Coordinate,
    pub rocket: RocketConfiguration,
    pub zone_validation: ZoneValidation,
    #[serde(flatten)]
    pub categories: CategoryAnalyses,
    pub overall_score: u8,
    pub recommendation: String,
    pub narrative_source: NarrativeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Output of the deterministic path
#[derive(Debug, Clone, PartialEq)]
pub struct LocationScore {
    pub categories: CategoryAnalyses,
    pub overall_score: u8,
    pub recommendation: String,
}

/// Score a validated location without any I/O. `month0` is 0-indexed.
pub fn score_location(
    coordinate: &Coordinate,
    rocket: &RocketConfiguration,
    zone: &ZoneValidation,
    heuristics: &Heuristics,
    month0: u32,
) -> LocationScore {
    let profile = heuristics.profile(coordinate);
    let input = ScoringInput {
        zone,
        profile: &profile,
        rocket,
        latitude: coordinate.latitude,
        favorable_season: scoring::is_favorable_season(month0, coordinate.latitude),
    };

    let categories = scoring::score_categories(&input);
    let overall_score = categories.overall_score();
    let recommendation = scoring::recommendation(overall_score, zone, &categories);

    LocationScore {
        categories,
        overall_score,
        recommendation,
    }
}

pub struct FeasibilityEngine {
    validator: ZoneValidator,
    heuristics: Heuristics,
    enricher: NarrativeEnricher,
}

impl FeasibilityEngine {
    /// Engine without narrative enrichment
    pub fn new(provider: Arc<dyn PoiProvider>, config: &EngineConfig) -> Self {
        let validator = ZoneValidator::new(provider)
            .with_radius(config.search_radius_m)
            .with_timeout(config.poi_timeout());
        Self {
            validator,
            heuristics: Heuristics::default(),
            enricher: NarrativeEnricher::disabled(),
        }
    }

    pub fn with_narrative(mut self, provider: Arc<dyn NarrativeProvider>, timeout: Duration) -> Self {
        self.enricher = NarrativeEnricher::new(Some(provider), timeout);
        self
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Engine wired from environment variables. `offline` swaps the
    /// Overpass lookup for the built-in hazard table.
    pub fn from_env(offline: bool) -> Result<Self> {
        let config = EngineConfig::from_env();

        let provider: Arc<dyn PoiProvider> = if offline {
            Arc::new(StaticHazardProvider::with_defaults())
        } else {
            let overpass = OverpassProvider::new(OverpassConfig::from_env())
                .map_err(|e| FeasibilityError::Provider(e.to_string()))?;
            Arc::new(overpass)
        };

        let mut engine = Self::new(provider, &config);
        match HttpNarrativeProvider::from_env() {
            Some(narrative) => {
                info!("Narrative enrichment enabled");
                engine = engine.with_narrative(Arc::new(narrative), config.narrative_timeout());
            }
            None => info!("Narrative enrichment disabled, using fallback text"),
        }
        Ok(engine)
    }

    pub fn validator(&self) -> &ZoneValidator {
        &self.validator
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        self.analyze_at(request, Utc::now()).await
    }

    /// Analyze as if run at `now`; the month drives the timing category
    pub async fn analyze_at(
        &self,
        request: AnalysisRequest,
        now: DateTime<Utc>,
    ) -> Result<AnalysisResult> {
        let AnalysisRequest {
            coordinate,
            rocket,
            session_id,
        } = request;
        coordinate.validate()?;

        info!("Analyzing {} at {}", rocket, coordinate.describe());

        let zone = self.validator.validate(&coordinate).await;

        let narrative_request = NarrativeRequest {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            place: coordinate.place.clone(),
            rocket_label: rocket.to_string(),
            category: rocket.category(),
            warnings: zone.warning_messages(),
        };

        let (narrative, scored) = tokio::join!(self.enricher.narrate(&narrative_request), async {
            score_location(&coordinate, &rocket, &zone, &self.heuristics, now.month0())
        });

        let LocationScore {
            mut categories,
            overall_score,
            recommendation,
        } = scored;

        let (narrative, narrative_source) = match narrative {
            Some(narrative) => (narrative, NarrativeSource::External),
            None => (
                fallback_narrative(&narrative_request, recommendation),
                NarrativeSource::Fallback,
            ),
        };
        narrative.apply(&mut categories);

        let result = AnalysisResult {
            id: Uuid::new_v4().to_string(),
            coordinate,
            rocket,
            zone_validation: zone,
            categories,
            overall_score,
            recommendation: narrative.recommendation,
            narrative_source,
            session_id,
            created_at: now,
        };

        info!(
            "Analysis {} complete: overall={} severity={:?} narrative={:?}",
            result.id,
            result.overall_score,
            result.zone_validation.severity(),
            result.narrative_source
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::PlaceInfo;
    use crate::narrative::{Narrative, NarrativeError};
    use crate::poi::{Facility, PoiError};
    use crate::rocket::{ProjectType, SafetyLevel};
    use crate::zone::{Severity, VERIFICATION_FAILED_MESSAGE};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct EmptyArea;

    #[async_trait]
    impl PoiProvider for EmptyArea {
        fn name(&self) -> &str {
            "empty"
        }
        async fn nearby(&self, _: &Coordinate, _: f64) -> std::result::Result<Vec<Facility>, PoiError> {
            Ok(Vec::new())
        }
    }

    struct Offline;

    #[async_trait]
    impl PoiProvider for Offline {
        fn name(&self) -> &str {
            "offline"
        }
        async fn nearby(&self, _: &Coordinate, _: f64) -> std::result::Result<Vec<Facility>, PoiError> {
            Err(PoiError::RequestFailed("connection refused".into()))
        }
    }

    struct Writer;

    #[async_trait]
    impl NarrativeProvider for Writer {
        fn name(&self) -> &str {
            "writer"
        }
        async fn generate(&self, req: &NarrativeRequest) -> std::result::Result<Narrative, NarrativeError> {
            Ok(Narrative {
                resources_insight: format!("Resources near {}", req.latitude),
                legal_insight: "Legal".into(),
                geographical_insight: "Geo".into(),
                geopolitical_insight: "Politics".into(),
                recommendation: "Launch away.".into(),
            })
        }
    }

    struct Broken;

    #[async_trait]
    impl NarrativeProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        async fn generate(&self, _: &NarrativeRequest) -> std::result::Result<Narrative, NarrativeError> {
            Err(NarrativeError::ApiError("503".into()))
        }
    }

    fn july() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn team_rocket() -> RocketConfiguration {
        RocketConfiguration::Model {
            project_type: Some(ProjectType::Team),
            safety_level: Some(SafetyLevel::Intermediate),
        }
    }

    fn request() -> AnalysisRequest {
        let place = PlaceInfo {
            city: Some("Tromsø".into()),
            country: Some("Norway".into()),
            ..Default::default()
        };
        AnalysisRequest::new(Coordinate::new(45.0, 10.0).unwrap().with_place(place), team_rocket())
    }

    fn engine(provider: Arc<dyn PoiProvider>) -> FeasibilityEngine {
        FeasibilityEngine::new(provider, &EngineConfig::default())
    }

    fn assert_aggregates(result: &AnalysisResult) {
        for category in result.categories.all() {
            let parts = category.sub_scores();
            let mean = parts.iter().map(|p| p.score() as f64).sum::<f64>() / parts.len() as f64;
            assert_eq!(category.overall().score(), mean.round() as u8);
        }
        assert_eq!(result.overall_score, result.categories.overall_score());
    }

    #[tokio::test]
    async fn test_analyze_with_fallback_narrative() {
        let result = engine(Arc::new(EmptyArea))
            .analyze_at(request().with_session("s-1"), july())
            .await
            .unwrap();

        assert_eq!(result.narrative_source, NarrativeSource::Fallback);
        assert_eq!(result.session_id.as_deref(), Some("s-1"));
        assert_eq!(result.created_at, july());
        assert!(result.zone_validation.is_valid());
        assert!(!result.recommendation.is_empty());
        assert!(result.categories.resources.materials.details.contains("Tromsø"));
        assert!(!result.categories.timing.overall.details.is_empty());
        assert_aggregates(&result);
    }

    #[tokio::test]
    async fn test_analyze_with_external_narrative() {
        let result = engine(Arc::new(EmptyArea))
            .with_narrative(Arc::new(Writer), Duration::from_secs(1))
            .analyze_at(request(), july())
            .await
            .unwrap();

        assert_eq!(result.narrative_source, NarrativeSource::External);
        assert_eq!(result.recommendation, "Launch away.");
        assert_eq!(result.categories.legal.permits.details, "Legal");
        assert_eq!(result.categories.legal.overall.details, "Legal");
        assert_eq!(result.categories.geopolitical.risks.details, "Politics");
    }

    #[tokio::test]
    async fn test_narrative_failure_never_surfaces() {
        let result = engine(Arc::new(EmptyArea))
            .with_narrative(Arc::new(Broken), Duration::from_secs(1))
            .analyze_at(request(), july())
            .await
            .unwrap();

        assert_eq!(result.narrative_source, NarrativeSource::Fallback);
        assert!(!result.recommendation.is_empty());
        for category in result.categories.all() {
            assert!(category.sub_scores().iter().all(|s| !s.details.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_poi_failure_becomes_warning() {
        let result = engine(Arc::new(Offline)).analyze_at(request(), july()).await.unwrap();

        let warnings = result.zone_validation.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, VERIFICATION_FAILED_MESSAGE);
        assert_eq!(result.zone_validation.severity(), Severity::Caution);
        assert_aggregates(&result);
    }

    #[tokio::test]
    async fn test_invalid_coordinate_rejected() {
        let mut req = request();
        req.coordinate.latitude = 91.0;
        let err = engine(Arc::new(EmptyArea)).analyze(req).await.unwrap_err();
        assert!(matches!(err, FeasibilityError::InvalidCoordinate(_)));
    }

    #[tokio::test]
    async fn test_jfk_lies_in_danger_zone() {
        let req = AnalysisRequest::new(Coordinate::new(40.6413, -73.7781).unwrap(), team_rocket());
        let result = engine(Arc::new(StaticHazardProvider::with_defaults()))
            .analyze_at(req, july())
            .await
            .unwrap();

        assert_eq!(result.zone_validation.severity(), Severity::Danger);
        assert!(!result.zone_validation.is_valid());
        assert_eq!(result.categories.legal.restrictions.score(), 20);
        assert!(result.recommendation.contains("zone safety warnings"));
    }

    #[test]
    fn test_score_location_is_deterministic() {
        let coordinate = Coordinate::new(-33.0, 151.0).unwrap();
        let zone = crate::zone::evaluate(&coordinate, Some(&[][..]), &Default::default());
        let heuristics = Heuristics::default();

        let a = score_location(&coordinate, &team_rocket(), &zone, &heuristics, 0);
        let b = score_location(&coordinate, &team_rocket(), &zone, &heuristics, 0);
        assert_eq!(a, b);

        // January is summer south of the equator
        let winter = score_location(&coordinate, &team_rocket(), &zone, &heuristics, 6);
        assert!(a.categories.timing.seasonality.score() > winter.categories.timing.seasonality.score());
        assert_eq!(a.categories.timing.optimal_window, winter.categories.timing.optimal_window);
    }

    #[tokio::test]
    async fn test_result_json_shape() {
        let result = engine(Arc::new(EmptyArea)).analyze_at(request(), july()).await.unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["zoneValidation"]["isValid"].as_bool().unwrap());
        assert!(json["timing"]["optimalWindow"].is_string());
        assert!(json["practicality"]["successProbability"]["score"].is_u64());
        assert_eq!(json["rocket"]["category"], "model");
        assert_eq!(json["narrativeSource"], "fallback");

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
