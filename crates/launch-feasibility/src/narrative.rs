//! Narrative enrichment
//!
//! Replaces the generic explanation text of the resources, legal,
//! geographical and geopolitical categories, and the final recommendation,
//! with location-specific prose from an external text-generation service.
//!
//! When no provider is configured, or the provider fails, times out or
//! returns an incomplete object, [`fallback_narrative`] builds the same five
//! fields from local data only. Callers never see the failure.

use crate::config::{env_string, env_u64};
use crate::geo::PlaceInfo;
use crate::rocket::RocketCategory;
use crate::scoring::{CategoryAnalyses, CategoryAnalysis};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone)]
pub enum NarrativeError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Incomplete narrative: missing {0}")]
    Incomplete(&'static str),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// What the narrative provider is told about the analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub place: PlaceInfo,
    pub rocket_label: String,
    pub category: RocketCategory,
    pub warnings: Vec<String>,
}

impl NarrativeRequest {
    fn location_label(&self) -> String {
        match self.place.label() {
            Some(label) => label.to_string(),
            None => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

/// The five free-text fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub resources_insight: String,
    pub legal_insight: String,
    pub geographical_insight: String,
    pub geopolitical_insight: String,
    pub recommendation: String,
}

impl Narrative {
    /// Every field must carry text
    pub fn check_complete(&self) -> Result<(), NarrativeError> {
        let fields = [
            ("resourcesInsight", &self.resources_insight),
            ("legalInsight", &self.legal_insight),
            ("geographicalInsight", &self.geographical_insight),
            ("geopoliticalInsight", &self.geopolitical_insight),
            ("recommendation", &self.recommendation),
        ];
        match fields.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((name, _)) => Err(NarrativeError::Incomplete(*name)),
            None => Ok(()),
        }
    }

    /// Overwrite category explanations; each category shares one insight
    pub fn apply(&self, categories: &mut CategoryAnalyses) {
        categories.resources.set_details(&self.resources_insight);
        categories.legal.set_details(&self.legal_insight);
        categories.geographical.set_details(&self.geographical_insight);
        categories.geopolitical.set_details(&self.geopolitical_insight);
    }
}

/// Where the narrative text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    External,
    Fallback,
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &NarrativeRequest) -> Result<Narrative, NarrativeError>;
}

/// Deterministic, location-aware narrative from local data only
pub fn fallback_narrative(request: &NarrativeRequest, recommendation: String) -> Narrative {
    let place = request.location_label();
    let country = request.place.country.as_deref();
    let in_country = country.map(|c| format!(" in {}", c)).unwrap_or_default();
    let authority = country
        .map(|c| format!("the {} aviation authority", c))
        .unwrap_or_else(|| "the national aviation authority".to_string());

    let legal_insight = match request.warnings.len() {
        0 => format!(
            "No restricted facilities were flagged near {}. Confirm the rules for a {} with {} before launching.",
            place, request.rocket_label, authority
        ),
        1 => format!(
            "One zone warning applies near {}. Resolve it with {} and local officials before launching a {}.",
            place, authority, request.rocket_label
        ),
        n => format!(
            "{} zone warnings apply near {}. Resolve them with {} and local officials before launching a {}.",
            n, place, authority, request.rocket_label
        ),
    };

    let sourcing = match request.category {
        RocketCategory::Model => {
            "Order certified motors, recovery gear and launch equipment well ahead of launch day."
        }
        RocketCategory::Industrial => {
            "Plan propellant logistics, heavy transport and range infrastructure well ahead of the campaign."
        }
    };

    Narrative {
        resources_insight: format!(
            "Resource availability around {} depends on regional suppliers{}. {}",
            place, in_country, sourcing
        ),
        legal_insight,
        geographical_insight: format!(
            "Survey the terrain around {} for a clear recovery area and check seasonal weather before scheduling.",
            place
        ),
        geopolitical_insight: format!(
            "Regional conditions{} appear workable. Monitor local regulations and community sentiment for changes.",
            in_country
        ),
        recommendation,
    }
}

/// Wraps an optional provider with a timeout; `None` means use the fallback
pub struct NarrativeEnricher {
    provider: Option<Arc<dyn NarrativeProvider>>,
    timeout: Duration,
}

impl NarrativeEnricher {
    pub fn new(provider: Option<Arc<dyn NarrativeProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(0))
    }

    pub async fn narrate(&self, request: &NarrativeRequest) -> Option<Narrative> {
        let provider = self.provider.as_ref()?;

        let outcome = match tokio::time::timeout(self.timeout, provider.generate(request)).await {
            Ok(result) => result.and_then(|n| n.check_complete().map(|_| n)),
            Err(_) => Err(NarrativeError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(narrative) => {
                debug!("Narrative generated by '{}'", provider.name());
                Some(narrative)
            }
            Err(e) => {
                warn!(
                    "Narrative provider '{}' failed, using fallback: {}",
                    provider.name(),
                    e
                );
                None
            }
        }
    }
}

// ---- OpenAI-compatible chat completions ----

/// Narrative API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeApiConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_sec: u64,
    pub temperature: f64,
}

impl Default for NarrativeApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_sec: 20,
            temperature: 0.7,
        }
    }
}

impl NarrativeApiConfig {
    /// Defaults overridden by `NARRATIVE_API_URL`, `NARRATIVE_API_KEY`,
    /// `NARRATIVE_MODEL`, `NARRATIVE_TIMEOUT_SEC`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env_string("NARRATIVE_API_URL").unwrap_or(defaults.endpoint),
            api_key: env_string("NARRATIVE_API_KEY"),
            model: env_string("NARRATIVE_MODEL").unwrap_or(defaults.model),
            timeout_sec: env_u64("NARRATIVE_TIMEOUT_SEC", defaults.timeout_sec),
            temperature: defaults.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct HttpNarrativeProvider {
    config: NarrativeApiConfig,
    client: reqwest::Client,
}

impl HttpNarrativeProvider {
    pub fn new(config: NarrativeApiConfig) -> Result<Self, NarrativeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(|e| NarrativeError::RequestFailed(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Provider from the environment, or `None` when no API key is set
    pub fn from_env() -> Option<Self> {
        let config = NarrativeApiConfig::from_env();
        config.api_key.as_ref()?;
        match Self::new(config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                warn!("Narrative provider disabled: {}", e);
                None
            }
        }
    }

    pub fn build_prompt(request: &NarrativeRequest) -> String {
        let mut location = request.location_label();
        if let Some(country) = &request.place.country {
            if !location.contains(country.as_str()) {
                location = format!("{}, {}", location, country);
            }
        }
        let warnings = if request.warnings.is_empty() {
            "none".to_string()
        } else {
            request
                .warnings
                .iter()
                .map(|w| format!("- {}", w))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "Assess launching a {rocket} from {location} (lat {lat:.4}, lon {lon:.4}).\n\
             Zone warnings:\n{warnings}\n\n\
             Respond with a JSON object with exactly these string fields: \
             resourcesInsight, legalInsight, geographicalInsight, geopoliticalInsight, recommendation. \
             Each field is two or three sentences specific to this location.",
            rocket = request.rocket_label,
            location = location,
            lat = request.latitude,
            lon = request.longitude,
            warnings = warnings,
        )
    }

    /// Extract the narrative from a chat-completions body
    pub fn parse_completion(body: &str) -> Result<Narrative, NarrativeError> {
        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| NarrativeError::ParseError(e.to_string()))?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| NarrativeError::ParseError("no completion content".to_string()))?;

        let narrative: Narrative = serde_json::from_str(extract_json_object(&content))
            .map_err(|e| NarrativeError::ParseError(e.to_string()))?;
        narrative.check_complete()?;
        Ok(narrative)
    }
}

/// Slice from the first `{` to the last `}`, dropping Markdown fences
fn extract_json_object(content: &str) -> &str {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if end > start => &content[start..=end],
        _ => content,
    }
}

#[async_trait]
impl NarrativeProvider for HttpNarrativeProvider {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn generate(&self, request: &NarrativeRequest) -> Result<Narrative, NarrativeError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": "You are a rocketry launch-site consultant. Answer only with JSON."
                },
                { "role": "user", "content": Self::build_prompt(request) }
            ]
        });

        let mut call = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            call = call.bearer_auth(key);
        }

        let response = call
            .send()
            .await
            .map_err(|e| NarrativeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NarrativeError::ApiError(format!(
                "narrative service returned status: {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| NarrativeError::RequestFailed(e.to_string()))?;

        Self::parse_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(warnings: Vec<&str>) -> NarrativeRequest {
        NarrativeRequest {
            latitude: 5.16,
            longitude: -52.65,
            place: PlaceInfo {
                city: Some("Kourou".into()),
                country: Some("French Guiana".into()),
                ..Default::default()
            },
            rocket_label: "team model rocket".into(),
            category: RocketCategory::Model,
            warnings: warnings.into_iter().map(String::from).collect(),
        }
    }

    struct Canned(Result<Narrative, NarrativeError>);

    #[async_trait]
    impl NarrativeProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }
        async fn generate(&self, _: &NarrativeRequest) -> Result<Narrative, NarrativeError> {
            self.0.clone()
        }
    }

    struct Stalled;

    #[async_trait]
    impl NarrativeProvider for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }
        async fn generate(&self, _: &NarrativeRequest) -> Result<Narrative, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(NarrativeError::ApiError("unreachable".into()))
        }
    }

    fn sample() -> Narrative {
        Narrative {
            resources_insight: "r".into(),
            legal_insight: "l".into(),
            geographical_insight: "g".into(),
            geopolitical_insight: "p".into(),
            recommendation: "go".into(),
        }
    }

    #[test]
    fn test_fallback_is_location_aware_and_complete() {
        let n = fallback_narrative(&request(vec![]), "Proceed.".into());
        assert!(n.check_complete().is_ok());
        assert!(n.resources_insight.contains("Kourou"));
        assert!(n.resources_insight.contains("French Guiana"));
        assert!(n.legal_insight.contains("No restricted facilities"));
        assert_eq!(n.recommendation, "Proceed.");

        let n = fallback_narrative(&request(vec!["a", "b"]), "Wait.".into());
        assert!(n.legal_insight.starts_with("2 zone warnings"));
    }

    #[test]
    fn test_fallback_sourcing_follows_category() {
        let model = fallback_narrative(&request(vec![]), "r".into());
        assert!(model.resources_insight.contains("certified motors"));

        let mut req = request(vec![]);
        req.rocket_label = "industrial rocket".into();
        req.category = RocketCategory::Industrial;
        let industrial = fallback_narrative(&req, "r".into());
        assert!(industrial.resources_insight.contains("propellant logistics"));
        assert!(!industrial.resources_insight.contains("motors"));
    }

    #[test]
    fn test_fallback_without_place() {
        let mut req = request(vec!["a"]);
        req.place = PlaceInfo::default();
        let n = fallback_narrative(&req, "r".into());
        assert!(n.check_complete().is_ok());
        assert!(n.geographical_insight.contains("5.1600, -52.6500"));
        assert!(n.legal_insight.contains("national aviation authority"));
    }

    #[test]
    fn test_parse_completion_with_fences() {
        let content = "```json\n{\"resourcesInsight\":\"r\",\"legalInsight\":\"l\",\"geographicalInsight\":\"g\",\"geopoliticalInsight\":\"p\",\"recommendation\":\"go\"}\n```";
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string();
        assert_eq!(HttpNarrativeProvider::parse_completion(&body).unwrap(), sample());
    }

    #[test]
    fn test_parse_completion_rejects_missing_fields() {
        let content = "{\"resourcesInsight\":\"r\",\"legalInsight\":\"\",\"geographicalInsight\":\"g\",\"geopoliticalInsight\":\"p\",\"recommendation\":\"go\"}";
        let body = serde_json::json!({ "choices": [{ "message": { "content": content } }] }).to_string();
        assert!(matches!(
            HttpNarrativeProvider::parse_completion(&body),
            Err(NarrativeError::Incomplete("legalInsight"))
        ));

        let body = serde_json::json!({ "choices": [] }).to_string();
        assert!(HttpNarrativeProvider::parse_completion(&body).is_err());
        assert!(HttpNarrativeProvider::parse_completion("not json").is_err());
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = HttpNarrativeProvider::build_prompt(&request(vec!["CRITICAL: airport"]));
        assert!(prompt.contains("Kourou, French Guiana"));
        assert!(prompt.contains("team model rocket"));
        assert!(prompt.contains("- CRITICAL: airport"));
        assert!(prompt.contains("geopoliticalInsight"));
    }

    #[tokio::test]
    async fn test_enricher_success_and_failure() {
        let ok = NarrativeEnricher::new(Some(Arc::new(Canned(Ok(sample())))), Duration::from_secs(1));
        assert_eq!(ok.narrate(&request(vec![])).await, Some(sample()));

        let failing = NarrativeEnricher::new(
            Some(Arc::new(Canned(Err(NarrativeError::ApiError("500".into()))))),
            Duration::from_secs(1),
        );
        assert_eq!(failing.narrate(&request(vec![])).await, None);

        let mut blank = sample();
        blank.recommendation = "  ".into();
        let incomplete = NarrativeEnricher::new(Some(Arc::new(Canned(Ok(blank)))), Duration::from_secs(1));
        assert_eq!(incomplete.narrate(&request(vec![])).await, None);

        assert_eq!(NarrativeEnricher::disabled().narrate(&request(vec![])).await, None);
    }

    #[tokio::test]
    async fn test_enricher_timeout() {
        let slow = NarrativeEnricher::new(Some(Arc::new(Stalled)), Duration::from_millis(20));
        assert_eq!(slow.narrate(&request(vec![])).await, None);
    }
}
