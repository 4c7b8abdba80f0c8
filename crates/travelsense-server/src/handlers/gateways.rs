//! Recommendation and suggestion endpoints

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::parse_body;
use crate::{AppError, AppState};
use travelsense_core::gateway::{self, SuggestionRequest};
use travelsense_core::{PreferencesInput, Recommendation, Scorer, SessionSnapshot};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scorer: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
}

/// GET /api/health - Liveness and scorer description
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        scorer: state.scorer.describe(),
    })
}

/// POST /api/recommend - Rank destinations for the submitted preferences
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecommendResponse>, AppError> {
    let input: PreferencesInput = parse_body(request).await?;
    let prefs = input.validate().map_err(AppError::from_core)?;

    let recommendations = gateway::recommend_for(&state.scorer, &prefs)
        .await
        .map_err(AppError::from_core)?;

    state
        .session
        .write()
        .await
        .set_recommendations(prefs, recommendations.clone());

    Ok(Json(RecommendResponse {
        success: true,
        recommendations,
    }))
}

/// POST /api/suggest-activities - Scorer suggestions, returned verbatim
pub async fn suggest_activities(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    let body: SuggestionRequest = parse_body(request).await?;

    let payload = gateway::suggest(&state.scorer, &body)
        .await
        .map_err(AppError::from_core)?;

    info!(destination = %body.destination, "Suggested activities");
    Ok(Json(payload.into_inner()))
}

/// GET /api/session - Current preferences, recommendations and plan
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session.read().await.snapshot())
}
