//! Category scoring and aggregation
//!
//! Six independent scorers turn the zone validation, the location profile
//! and the rocket configuration into 0-100 sub-scores. Each category's
//! `overall` is the rounded mean of its named sub-scores; the analysis
//! overall is the rounded mean of the six category overalls.
//!
//! Status tiers: ≥ 70 feasible, ≥ 40 caution, otherwise not recommended.

use crate::heuristics::LocationProfile;
use crate::rocket::{RocketConfiguration, SafetyLevel};
use crate::zone::{Severity, ZoneValidation};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FEASIBLE_THRESHOLD: u8 = 70;
pub const CAUTION_THRESHOLD: u8 = 40;

/// Northern-hemisphere favorable months (0-indexed: June through September)
const NORTHERN_SEASON_MONTHS: std::ops::RangeInclusive<u32> = 5..=8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    Feasible,
    Caution,
    NotRecommended,
}

impl FeasibilityStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= FEASIBLE_THRESHOLD {
            FeasibilityStatus::Feasible
        } else if score >= CAUTION_THRESHOLD {
            FeasibilityStatus::Caution
        } else {
            FeasibilityStatus::NotRecommended
        }
    }
}

/// A 0-100 score whose status always follows from the number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScore")]
pub struct FeasibilityScore {
    score: u8,
    status: FeasibilityStatus,
    pub details: String,
}

impl FeasibilityScore {
    /// Clamp to [0, 100], round, derive status
    pub fn new(raw: f64, details: impl Into<String>) -> Self {
        let score = if raw.is_finite() {
            raw.clamp(0.0, 100.0).round() as u8
        } else {
            0
        };
        Self {
            score,
            status: FeasibilityStatus::from_score(score),
            details: details.into(),
        }
    }

    /// Rounded arithmetic mean of `parts`
    pub fn mean_of(parts: &[&FeasibilityScore], details: impl Into<String>) -> Self {
        let sum: f64 = parts.iter().map(|p| p.score as f64).sum();
        let mean = if parts.is_empty() { 0.0 } else { sum / parts.len() as f64 };
        Self::new(mean, details)
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn status(&self) -> FeasibilityStatus {
        self.status
    }
}

/// Wire form; `status` is recomputed from `score` on the way in
#[derive(Deserialize)]
struct RawScore {
    score: u8,
    #[serde(default)]
    details: String,
}

impl TryFrom<RawScore> for FeasibilityScore {
    type Error = String;

    fn try_from(raw: RawScore) -> std::result::Result<Self, Self::Error> {
        if raw.score > 100 {
            return Err(format!("score {} outside [0, 100]", raw.score));
        }
        Ok(Self::new(raw.score as f64, raw.details))
    }
}

/// Common view over the six category records
pub trait CategoryAnalysis {
    /// Named sub-scores contributing to `overall`
    fn sub_scores(&self) -> Vec<&FeasibilityScore>;
    fn overall(&self) -> &FeasibilityScore;
    /// Replace every explanation in the category with one text
    fn set_details(&mut self, details: &str);
}

macro_rules! category {
    ($name:ident { $($field:ident),+ }) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(pub $field: FeasibilityScore,)+
            pub overall: FeasibilityScore,
        }

        impl CategoryAnalysis for $name {
            fn sub_scores(&self) -> Vec<&FeasibilityScore> {
                vec![$(&self.$field),+]
            }

            fn overall(&self) -> &FeasibilityScore {
                &self.overall
            }

            fn set_details(&mut self, details: &str) {
                $(self.$field.details = details.to_string();)+
                self.overall.details = details.to_string();
            }
        }
    };
}

category!(ResourcesAnalysis { materials, expertise, facilities });
category!(LegalAnalysis { permits, regulations, restrictions });
category!(GeographicalAnalysis { terrain, weather, accessibility });
category!(GeopoliticalAnalysis { stability, cooperation, risks });
category!(PracticalityAnalysis { cost, timeline, success_probability });

/// Timing carries a descriptive window that is not averaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingAnalysis {
    pub seasonality: FeasibilityScore,
    pub current_conditions: FeasibilityScore,
    pub optimal_window: String,
    pub overall: FeasibilityScore,
}

impl CategoryAnalysis for TimingAnalysis {
    fn sub_scores(&self) -> Vec<&FeasibilityScore> {
        vec![&self.seasonality, &self.current_conditions]
    }

    fn overall(&self) -> &FeasibilityScore {
        &self.overall
    }

    fn set_details(&mut self, details: &str) {
        self.seasonality.details = details.to_string();
        self.current_conditions.details = details.to_string();
        self.overall.details = details.to_string();
    }
}

/// All six categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalyses {
    pub resources: ResourcesAnalysis,
    pub legal: LegalAnalysis,
    pub geographical: GeographicalAnalysis,
    pub geopolitical: GeopoliticalAnalysis,
    pub timing: TimingAnalysis,
    pub practicality: PracticalityAnalysis,
}

impl CategoryAnalyses {
    pub fn all(&self) -> [&dyn CategoryAnalysis; 6] {
        [
            &self.resources,
            &self.legal,
            &self.geographical,
            &self.geopolitical,
            &self.timing,
            &self.practicality,
        ]
    }

    /// Rounded mean of the six category overalls
    pub fn overall_score(&self) -> u8 {
        let overalls = [
            &self.resources.overall,
            &self.legal.overall,
            &self.geographical.overall,
            &self.geopolitical.overall,
            &self.timing.overall,
            &self.practicality.overall,
        ];
        FeasibilityScore::mean_of(&overalls, "").score()
    }
}

/// Inputs shared by every scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub zone: &'a ZoneValidation,
    pub profile: &'a LocationProfile,
    pub rocket: &'a RocketConfiguration,
    pub latitude: f64,
    pub favorable_season: bool,
}

/// Favorable launch season: northern summer, flipped south of the equator
pub fn is_favorable_season(month0: u32, latitude: f64) -> bool {
    let northern_summer = NORTHERN_SEASON_MONTHS.contains(&month0);
    if latitude < 0.0 {
        !northern_summer
    } else {
        northern_summer
    }
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

pub fn score_resources(input: &ScoringInput) -> ResourcesAnalysis {
    let dev = input.profile.development.score;
    let model = flag(input.rocket.is_model());
    let advanced = flag(input.rocket.safety_level() == Some(SafetyLevel::Advanced));

    let materials = FeasibilityScore::new(
        (60.0 + 0.3 * dev + 20.0 * model).min(95.0),
        format!(
            "Material availability estimated from a regional development level of {:.0}/100.",
            dev
        ),
    );
    let expertise = FeasibilityScore::new(
        (50.0 + 0.4 * dev + 15.0 * advanced).min(95.0),
        "Local technical expertise and community support, weighted by team experience.",
    );
    let facilities = FeasibilityScore::new(
        (40.0 + 0.5 * dev + 25.0 * model).min(95.0),
        "Access to workshops, testing ranges and launch support infrastructure.",
    );
    let overall = FeasibilityScore::mean_of(
        &[&materials, &expertise, &facilities],
        "Overall resource availability for the project.",
    );

    ResourcesAnalysis {
        materials,
        expertise,
        facilities,
        overall,
    }
}

pub fn score_legal(input: &ScoringInput) -> LegalAnalysis {
    let model = input.rocket.is_model();
    let warnings = input.zone.warnings().len() as f64;
    let stability = input.profile.stability.score;

    let permits = FeasibilityScore::new(
        (70.0 - 15.0 * warnings + if model { 10.0 } else { -20.0 }).max(30.0),
        if model {
            "Model rocket launches usually need only local notification or a simple permit."
        } else {
            "Industrial launches require national licensing and range safety approval."
        },
    );
    let regulations = FeasibilityScore::new(
        (65.0 + 0.2 * stability - if model { 0.0 } else { 15.0 }).max(25.0),
        "Regulatory clarity estimated from regional governance stability.",
    );
    let restrictions = FeasibilityScore::new(
        match input.zone.severity() {
            Severity::Safe => 85.0,
            Severity::Caution => 55.0,
            Severity::Danger => 20.0,
        },
        match input.zone.severity() {
            Severity::Safe => "No restricted facilities detected near the site.",
            Severity::Caution => "Nearby facilities impose launch restrictions that need review.",
            Severity::Danger => "The site lies inside a prohibited zone around a sensitive facility.",
        },
    );
    let overall = FeasibilityScore::mean_of(
        &[&permits, &regulations, &restrictions],
        "Overall legal and regulatory outlook.",
    );

    LegalAnalysis {
        permits,
        regulations,
        restrictions,
        overall,
    }
}

pub fn score_geographical(input: &ScoringInput) -> GeographicalAnalysis {
    let dev = input.profile.development.score;
    let low_latitude = input.latitude.abs() < 30.0;

    let terrain = FeasibilityScore::new(
        (70.0_f64 + if low_latitude { 10.0 } else { -5.0 }).min(90.0),
        if low_latitude {
            "Low latitude gives an orbital velocity bonus and generally milder terrain."
        } else {
            "Higher latitude terrain; expect more variable ground conditions."
        },
    );
    let weather = FeasibilityScore::new(input.profile.climate.score(), input.profile.climate.description());
    let accessibility = FeasibilityScore::new(
        (55.0 + 0.35 * dev).min(95.0),
        "Road and logistics access estimated from regional development.",
    );
    let overall = FeasibilityScore::mean_of(
        &[&terrain, &weather, &accessibility],
        "Overall geographical suitability.",
    );

    GeographicalAnalysis {
        terrain,
        weather,
        accessibility,
        overall,
    }
}

pub fn score_geopolitical(input: &ScoringInput) -> GeopoliticalAnalysis {
    let s = input.profile.stability.score;

    let stability = FeasibilityScore::new(s, "Political stability proxy for the region.");
    let cooperation = FeasibilityScore::new(
        (50.0 + 0.4 * s).min(90.0),
        "Likelihood of cooperation from local and national authorities.",
    );
    let risks = FeasibilityScore::new(
        (85.0 - 0.3 * (100.0 - s)).min(95.0),
        "Exposure to geopolitical disruption (higher is safer).",
    );
    let overall = FeasibilityScore::mean_of(
        &[&stability, &cooperation, &risks],
        "Overall geopolitical climate.",
    );

    GeopoliticalAnalysis {
        stability,
        cooperation,
        risks,
        overall,
    }
}

pub fn score_timing(input: &ScoringInput) -> TimingAnalysis {
    let seasonality = if input.favorable_season {
        FeasibilityScore::new(80.0, "Currently within the favorable launch season for this hemisphere.")
    } else {
        FeasibilityScore::new(60.0, "Currently outside the favorable launch season for this hemisphere.")
    };
    let current_conditions = FeasibilityScore::new(
        75.0,
        "Check real-time weather and airspace notices on launch day.",
    );
    let optimal_window = if input.latitude >= 0.0 {
        "June–September"
    } else {
        "December–March"
    };
    let overall = FeasibilityScore::mean_of(
        &[&seasonality, &current_conditions],
        format!("Best launch window: {}.", optimal_window),
    );

    TimingAnalysis {
        seasonality,
        current_conditions,
        optimal_window: optimal_window.to_string(),
        overall,
    }
}

pub fn score_practicality(input: &ScoringInput) -> PracticalityAnalysis {
    let model = input.rocket.is_model();
    let dev = input.profile.development.score;
    let stability = input.profile.stability.score;

    let cost = if model {
        FeasibilityScore::new(85.0, "Model rocketry is affordable; kits and motors are widely available.")
    } else {
        FeasibilityScore::new(
            (40.0 + 0.3 * dev).max(30.0),
            "Industrial launch costs depend heavily on local infrastructure.",
        )
    };
    let timeline = if model {
        FeasibilityScore::new(90.0, "A model launch can be organised within weeks.")
    } else {
        FeasibilityScore::new(
            50.0 + 0.3 * stability,
            "Industrial programmes take months to years of licensing and preparation.",
        )
    };

    let safety_bonus: f64 = match input.rocket.safety_level() {
        Some(SafetyLevel::Advanced) => 15.0,
        Some(SafetyLevel::Intermediate) => 5.0,
        Some(SafetyLevel::Beginner) | None => -5.0,
    };
    let zone_bonus: f64 = if input.zone.severity() == Severity::Safe { 10.0 } else { -10.0 };
    let category_bonus: f64 = if model { 10.0 } else { -15.0 };
    let success_probability = FeasibilityScore::new(
        (60.0 + safety_bonus + zone_bonus + category_bonus).max(35.0),
        "Estimated from team experience, zone safety and project category.",
    );

    let overall = FeasibilityScore::mean_of(
        &[&cost, &timeline, &success_probability],
        "Overall practicality of the launch.",
    );

    PracticalityAnalysis {
        cost,
        timeline,
        success_probability,
        overall,
    }
}

/// Run all six scorers
pub fn score_categories(input: &ScoringInput) -> CategoryAnalyses {
    let analyses = CategoryAnalyses {
        resources: score_resources(input),
        legal: score_legal(input),
        geographical: score_geographical(input),
        geopolitical: score_geopolitical(input),
        timing: score_timing(input),
        practicality: score_practicality(input),
    };

    debug!(
        "Category overalls: res={} legal={} geo={} pol={} timing={} prac={}",
        analyses.resources.overall.score(),
        analyses.legal.overall.score(),
        analyses.geographical.overall.score(),
        analyses.geopolitical.overall.score(),
        analyses.timing.overall.score(),
        analyses.practicality.overall.score()
    );

    analyses
}

/// Tiered recommendation naming the limiting factors
pub fn recommendation(overall: u8, zone: &ZoneValidation, categories: &CategoryAnalyses) -> String {
    let mut factors = Vec::new();
    if !zone.warnings().is_empty() {
        factors.push("zone safety warnings");
    }
    if categories.legal.overall.score() < 50 {
        factors.push("complex legal requirements");
    }
    if categories.resources.overall.score() < 50 {
        factors.push("limited local resources");
    }
    if categories.geographical.overall.score() < 50 {
        factors.push("challenging geography");
    }

    if overall >= FEASIBLE_THRESHOLD {
        let mut text = String::from(
            "This location shows strong feasibility for your launch. \
             Proceed with standard safety protocols and secure the required permits.",
        );
        if !factors.is_empty() {
            text.push_str(&format!(" Keep an eye on: {}.", factors.join(", ")));
        }
        text
    } else if overall >= CAUTION_THRESHOLD {
        if factors.is_empty() {
            "This location is feasible with caution. Review each category before committing to a launch date."
                .to_string()
        } else {
            format!(
                "This location is feasible with caution. Address the following before launching: {}.",
                factors.join(", ")
            )
        }
    } else if factors.is_empty() {
        "This location is not recommended for launch. Consider an alternative site.".to_string()
    } else {
        format!(
            "This location is not recommended for launch. Limiting factors: {}. Consider an alternative site.",
            factors.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::{ClimateBand, ProximityEstimate};
    use crate::rocket::ProjectType;
    use crate::zone::{Warning, WarningType, ZoneThresholds};

    fn profile(dev: f64, stability: f64, climate: ClimateBand) -> LocationProfile {
        LocationProfile {
            development: ProximityEstimate {
                score: dev,
                nearest_anchor: None,
                distance_m: None,
            },
            climate,
            stability: ProximityEstimate {
                score: stability,
                nearest_anchor: None,
                distance_m: None,
            },
        }
    }

    fn safe_zone() -> ZoneValidation {
        ZoneValidation::from_warnings(Vec::new(), &ZoneThresholds::default())
    }

    fn danger_zone() -> ZoneValidation {
        ZoneValidation::from_warnings(
            vec![Warning::new(WarningType::Airport, "CRITICAL: airport", Some(1_000.0))],
            &ZoneThresholds::default(),
        )
    }

    fn advanced_model() -> RocketConfiguration {
        RocketConfiguration::Model {
            project_type: Some(ProjectType::Team),
            safety_level: Some(SafetyLevel::Advanced),
        }
    }

    #[test]
    fn test_status_tiers() {
        assert_eq!(FeasibilityScore::new(70.0, "").status(), FeasibilityStatus::Feasible);
        assert_eq!(FeasibilityScore::new(69.4, "").status(), FeasibilityStatus::Caution);
        assert_eq!(FeasibilityScore::new(69.5, "").status(), FeasibilityStatus::Feasible);
        assert_eq!(FeasibilityScore::new(40.0, "").status(), FeasibilityStatus::Caution);
        assert_eq!(FeasibilityScore::new(39.0, "").status(), FeasibilityStatus::NotRecommended);
        assert_eq!(FeasibilityScore::new(140.0, "").score(), 100);
        assert_eq!(FeasibilityScore::new(-3.0, "").score(), 0);
        assert_eq!(FeasibilityScore::new(f64::NAN, "").score(), 0);
    }

    #[test]
    fn test_resources_formulas() {
        let zone = safe_zone();
        let p = profile(80.0, 90.0, ClimateBand::Temperate);
        let rocket = advanced_model();
        let r = score_resources(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: 35.0,
            favorable_season: true,
        });
        assert_eq!(r.materials.score(), 95); // min(95, 60 + 24 + 20)
        assert_eq!(r.expertise.score(), 95); // min(95, 50 + 32 + 15)
        assert_eq!(r.facilities.score(), 95); // min(95, 40 + 40 + 25)
        assert_eq!(r.overall.score(), 95);

        let industrial = RocketConfiguration::Industrial;
        let r = score_resources(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &industrial,
            latitude: 35.0,
            favorable_season: true,
        });
        assert_eq!(r.materials.score(), 84);
        assert_eq!(r.expertise.score(), 82);
        assert_eq!(r.facilities.score(), 80);
        assert_eq!(r.overall.score(), 82);
    }

    #[test]
    fn test_legal_formulas() {
        let zone = danger_zone();
        let p = profile(60.0, 65.0, ClimateBand::Tropical);
        let rocket = RocketConfiguration::Industrial;
        let l = score_legal(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: 5.0,
            favorable_season: false,
        });
        assert_eq!(l.permits.score(), 35); // 70 - 15 - 20
        assert_eq!(l.regulations.score(), 63); // 65 + 13 - 15
        assert_eq!(l.restrictions.score(), 20);
        assert_eq!(l.overall.score(), 39);
        assert_eq!(l.overall.status(), FeasibilityStatus::NotRecommended);
    }

    #[test]
    fn test_permits_floor() {
        let warnings = (0..6)
            .map(|i| Warning::new(WarningType::Other, format!("w{}", i), None))
            .collect();
        let zone = ZoneValidation::from_warnings(warnings, &ZoneThresholds::default());
        let p = profile(60.0, 65.0, ClimateBand::Tropical);
        let rocket = advanced_model();
        let l = score_legal(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: 5.0,
            favorable_season: false,
        });
        assert_eq!(l.permits.score(), 30);
        assert_eq!(l.restrictions.score(), 55);
    }

    #[test]
    fn test_geography_and_geopolitics() {
        let zone = safe_zone();
        let p = profile(60.0, 90.0, ClimateBand::MidLatitude);
        let rocket = advanced_model();
        let input = ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: -45.0,
            favorable_season: true,
        };

        let g = score_geographical(&input);
        assert_eq!(g.terrain.score(), 65);
        assert_eq!(g.weather.score(), 65);
        assert_eq!(g.accessibility.score(), 76); // 55 + 21
        assert_eq!(g.overall.score(), 69);

        let gp = score_geopolitical(&input);
        assert_eq!(gp.stability.score(), 90);
        assert_eq!(gp.cooperation.score(), 86);
        assert_eq!(gp.risks.score(), 82);
        assert_eq!(gp.overall.score(), 86);
    }

    #[test]
    fn test_timing() {
        assert!(is_favorable_season(6, 40.0));
        assert!(!is_favorable_season(6, -40.0));
        assert!(is_favorable_season(0, -33.0));
        assert!(!is_favorable_season(4, 10.0));
        assert!(is_favorable_season(8, 0.0));

        let zone = safe_zone();
        let p = profile(60.0, 65.0, ClimateBand::Temperate);
        let rocket = RocketConfiguration::Industrial;
        let t = score_timing(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: -20.0,
            favorable_season: false,
        });
        assert_eq!(t.seasonality.score(), 60);
        assert_eq!(t.current_conditions.score(), 75);
        assert_eq!(t.optimal_window, "December–March");
        assert_eq!(t.overall.score(), 68); // round(67.5)
        assert_eq!(t.sub_scores().len(), 2);
    }

    #[test]
    fn test_practicality() {
        let zone = safe_zone();
        let p = profile(60.0, 70.0, ClimateBand::Temperate);
        let model = advanced_model();
        let pr = score_practicality(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &model,
            latitude: 35.0,
            favorable_season: true,
        });
        assert_eq!(pr.cost.score(), 85);
        assert_eq!(pr.timeline.score(), 90);
        assert_eq!(pr.success_probability.score(), 95); // 60 + 15 + 10 + 10
        assert_eq!(pr.overall.score(), 90);

        let zone = danger_zone();
        let industrial = RocketConfiguration::Industrial;
        let pr = score_practicality(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &industrial,
            latitude: 35.0,
            favorable_season: true,
        });
        assert_eq!(pr.cost.score(), 58);
        assert_eq!(pr.timeline.score(), 71);
        assert_eq!(pr.success_probability.score(), 35); // max(35, 30)
    }

    #[test]
    fn test_recommendation_tiers() {
        let zone = safe_zone();
        let p = profile(90.0, 90.0, ClimateBand::Temperate);
        let rocket = advanced_model();
        let categories = score_categories(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: 35.0,
            favorable_season: true,
        });

        assert!(recommendation(70, &zone, &categories).starts_with("This location shows strong feasibility"));
        assert!(recommendation(69, &zone, &categories).contains("feasible with caution"));
        assert!(recommendation(40, &zone, &categories).contains("feasible with caution"));
        assert!(recommendation(39, &zone, &categories).contains("not recommended"));

        let danger = danger_zone();
        assert!(recommendation(39, &danger, &categories).contains("zone safety warnings"));
    }

    #[test]
    fn test_set_details_covers_category() {
        let zone = safe_zone();
        let p = profile(70.0, 80.0, ClimateBand::Temperate);
        let rocket = advanced_model();
        let mut legal = score_legal(&ScoringInput {
            zone: &zone,
            profile: &p,
            rocket: &rocket,
            latitude: 35.0,
            favorable_season: true,
        });
        legal.set_details("Local insight");
        assert!(legal.sub_scores().iter().all(|s| s.details == "Local insight"));
        assert_eq!(legal.overall.details, "Local insight");
    }

    #[test]
    fn test_deserialized_status_follows_score() {
        let s: FeasibilityScore =
            serde_json::from_str(r#"{"score": 35, "status": "feasible", "details": "d"}"#).unwrap();
        assert_eq!(s.score(), 35);
        assert_eq!(s.status(), FeasibilityStatus::NotRecommended);

        assert!(serde_json::from_str::<FeasibilityScore>(r#"{"score": 180, "details": ""}"#).is_err());
    }
}
