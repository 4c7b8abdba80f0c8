//! Trip plan handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse_body;
use crate::{AppError, AppState};
use travelsense_core::gateway;
use travelsense_core::{
    Activity, ActivitySuggestion, BudgetCategory, SuggestionTicket, TripPlan, TripPlanner,
};

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetShareRequest {
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct ClearPlanResponse {
    pub success: bool,
    /// False when there was no plan to clear
    pub cleared: bool,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub loading: bool,
    pub suggestions: Vec<ActivitySuggestion>,
}

/// GET /api/plan - The active trip plan
pub async fn get_plan(State(state): State<Arc<AppState>>) -> Result<Json<TripPlan>, AppError> {
    let session = state.session.read().await;
    session
        .planner
        .plan()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("No active trip plan"))
}

/// POST /api/plan - Start planning a recommended destination
///
/// Suggestions for the destination are fetched in the background; poll
/// `/api/plan/suggestions` for the result.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<TripPlan>), AppError> {
    let body: CreatePlanRequest = parse_body(request).await?;

    let (ticket, plan) = {
        let mut session = state.session.write().await;
        let ticket = session
            .select_destination(&body.destination)
            .map_err(AppError::from_core)?;
        let plan = session
            .planner
            .plan()
            .cloned()
            .ok_or_else(|| AppError::internal("Plan was not initialized"))?;
        (ticket, plan)
    };

    spawn_suggestion_fetch(state.clone(), ticket);

    Ok((StatusCode::CREATED, Json(plan)))
}

/// Fetch suggestions without holding the session lock, then hand the result
/// back to the planner, which drops it if the plan has changed meanwhile
fn spawn_suggestion_fetch(state: Arc<AppState>, ticket: SuggestionTicket) {
    tokio::spawn(async move {
        let result = gateway::suggest(&state.scorer, &ticket.request).await;
        let applied = state
            .session
            .write()
            .await
            .planner
            .apply_suggestions(&ticket, result);
        debug!(
            generation = ticket.generation,
            destination = %ticket.request.destination,
            applied,
            "Suggestion fetch finished"
        );
    });
}

/// DELETE /api/plan - Discard the active plan
pub async fn clear_plan(State(state): State<Arc<AppState>>) -> Json<ClearPlanResponse> {
    let cleared = state.session.write().await.planner.clear();
    Json(ClearPlanResponse {
        success: true,
        cleared,
    })
}

/// POST /api/plan/activities - Add an activity
pub async fn add_activity(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TripPlan>, AppError> {
    let activity: Activity = parse_body(request).await?;
    if activity.activity.trim().is_empty() {
        return Err(AppError::bad_request("Activity description is required"));
    }
    mutate_plan(&state, |planner| planner.add_activity(activity)).await
}

/// DELETE /api/plan/activities/:index - Remove an activity by position
pub async fn remove_activity(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<TripPlan>, AppError> {
    mutate_plan(&state, |planner| planner.remove_activity(index).map(|_| ())).await
}

/// PUT /api/plan/notes - Replace the trip notes
pub async fn update_notes(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TripPlan>, AppError> {
    let body: NotesRequest = parse_body(request).await?;
    mutate_plan(&state, |planner| planner.update_notes(&body.notes)).await
}

/// PUT /api/plan/dates - Set the trip start and end dates
pub async fn set_dates(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TripPlan>, AppError> {
    let body: DatesRequest = parse_body(request).await?;
    mutate_plan(&state, |planner| planner.set_dates(body.start_date, body.end_date)).await
}

/// PUT /api/plan/budget/:category - Overwrite one budget share
pub async fn set_budget_share(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    request: Request,
) -> Result<Json<TripPlan>, AppError> {
    let category: BudgetCategory = category
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;
    let body: BudgetShareRequest = parse_body(request).await?;
    let amount = body.amount.round() as i64;
    mutate_plan(&state, |planner| planner.set_budget_share(category, amount)).await
}

/// GET /api/plan/suggestions - Suggestions for the active plan
pub async fn get_suggestions(State(state): State<Arc<AppState>>) -> Json<SuggestionsResponse> {
    let session = state.session.read().await;
    Json(SuggestionsResponse {
        loading: session.planner.loading_suggestions(),
        suggestions: session.planner.suggestions().to_vec(),
    })
}

/// Apply a planner mutation under the write lock and return the updated plan
async fn mutate_plan<F>(state: &AppState, mutation: F) -> Result<Json<TripPlan>, AppError>
where
    F: FnOnce(&mut TripPlanner) -> travelsense_core::Result<()>,
{
    let mut session = state.session.write().await;
    mutation(&mut session.planner).map_err(AppError::from_core)?;
    session
        .planner
        .plan()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::conflict("No active trip plan"))
}
