mod webhook;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use storebot_chat::ChatEngine;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChatEngine>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    scraped_pages: Option<i64>,
    cache_status: &'static str,
    last_suggested_count: usize,
    sample_cleaned_content: Option<String>,
    cleaning_enabled: bool,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn webhook_router(rate_limit: RateLimitState) -> Router<AppState> {
    let fulfill = post(webhook::fulfill).fallback(webhook::method_not_allowed);

    Router::new()
        .route("/webhook", fulfill.clone())
        .route("/webhook/", fulfill)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/webhook/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(webhook_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let stats = state.engine.stats().await;
    let cache_status = if stats.cache_loaded { "loaded" } else { "empty" };

    match state.engine.health_snapshot().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(HealthData {
                status: "healthy",
                database: "ok",
                scraped_pages: Some(snapshot.scraped_pages),
                cache_status,
                last_suggested_count: stats.recent_count,
                sample_cleaned_content: Some(snapshot.sample_cleaned_content),
                cleaning_enabled: true,
            }),
        ),
        Err(e) => {
            tracing::warn!(
                request_id = %req_id.0,
                error = %e,
                "health check: page store unavailable"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                    scraped_pages: None,
                    cache_status,
                    last_suggested_count: stats.recent_count,
                    sample_cleaned_content: None,
                    cleaning_enabled: true,
                }),
            )
        }
    }
}
