use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use launch_feasibility::{
    AnalysisRequest, AnalysisResult, Coordinate, FeasibilityError, PlaceInfo,
    RocketConfiguration, ZoneValidation,
};
use serde::Deserialize;

use crate::AppState;

const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub place: PlaceInfo,
    pub rocket: RocketConfiguration,
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ZoneRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub session: Option<String>,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

fn error_status(e: FeasibilityError) -> (StatusCode, String) {
    let status = match e {
        FeasibilityError::InvalidCoordinate(_) | FeasibilityError::InvalidConfiguration(_) => {
            StatusCode::BAD_REQUEST
        }
        FeasibilityError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

pub async fn create_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, (StatusCode, String)> {
    let coordinate = Coordinate::new(req.latitude, req.longitude)
        .map_err(error_status)?
        .with_place(req.place);

    let mut request = AnalysisRequest::new(coordinate, req.rocket);
    request.session_id = req.session_id;

    let result = state.engine.analyze(request).await.map_err(error_status)?;
    state.store.save(&result).await.map_err(|e| {
        tracing::error!("Failed to store analysis {}: {}", result.id, e);
        error_status(e)
    })?;

    Ok(Json(result))
}

pub async fn validate_zone(
    State(state): State<AppState>,
    Json(req): Json<ZoneRequest>,
) -> Result<Json<ZoneValidation>, (StatusCode, String)> {
    let coordinate = Coordinate::new(req.latitude, req.longitude).map_err(error_status)?;
    Ok(Json(state.engine.validator().validate(&coordinate).await))
}

pub async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisResult>>, (StatusCode, String)> {
    let results = state
        .store
        .list(query.session.as_deref())
        .await
        .map_err(error_status)?;
    Ok(Json(results))
}

pub async fn recent_analyses(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<AnalysisResult>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let results = state.store.recent(limit).await.map_err(error_status)?;
    Ok(Json(results))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, (StatusCode, String)> {
    state
        .store
        .get(&id)
        .await
        .map_err(error_status)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("Analysis {} not found", id)))
}
