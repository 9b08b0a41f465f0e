use anyhow::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};
use launch_feasibility::store::{AnalysisStore, InMemoryStore, JsonFileStore};
use launch_feasibility::FeasibilityEngine;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FeasibilityEngine>,
    pub store: Arc<dyn AnalysisStore>,
}

pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/analyses",
            post(routes::create_analysis).get(routes::list_analyses),
        )
        .route("/analyses/recent", get(routes::recent_analyses))
        .route("/analyses/:id", get(routes::get_analysis))
        .route("/zone/validate", post(routes::validate_zone))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "launch_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let offline = env_flag("LAUNCH_OFFLINE");
    let engine = FeasibilityEngine::from_env(offline)?;
    tracing::info!(
        "   POI source: {}",
        if offline { "static hazard table" } else { "Overpass" }
    );

    let store: Arc<dyn AnalysisStore> = match std::env::var("LAUNCH_STORE_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            tracing::info!("   Analyses persisted to {}", path);
            Arc::new(JsonFileStore::open(&path).await?)
        }
        _ => {
            tracing::info!("   Analyses kept in memory");
            Arc::new(InMemoryStore::new())
        }
    };

    let state = AppState {
        engine: Arc::new(engine),
        store,
    };

    let port = std::env::var("LAUNCH_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18700".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🚀 Launch Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "launch-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
