//! Document download handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use tracing::info;

use crate::{AppError, AppState};
use travelsense_core::export;
use travelsense_core::{Document, Preferences, Recommendation, TripPlan};

/// GET /api/export/recommendations.pdf - Report of all current recommendations
pub async fn export_recommendations_pdf(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let (prefs, recommendations) = {
        let session = state.session.read().await;
        (session.preferences().copied(), session.recommendations().to_vec())
    };
    let prefs = require_recommendations(prefs, &recommendations)?;

    let doc = export::render_report(&recommendations, &prefs, None);
    pdf_response(&doc, export::report_filename())
}

/// GET /api/export/plan.pdf - Report scoped to the planned destination
pub async fn export_plan_pdf(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let (prefs, recommendations, plan) = {
        let session = state.session.read().await;
        (
            session.preferences().copied(),
            session.recommendations().to_vec(),
            session.planner.plan().cloned(),
        )
    };
    let plan = require_plan(plan)?;
    let prefs = prefs.ok_or_else(|| AppError::not_found("No preferences submitted"))?;

    let doc = export::render_plan_report(&recommendations, &prefs, &plan);
    pdf_response(&doc, &export::plan_report_filename(&plan.destination))
}

/// GET /api/export/itinerary.pdf - Stand-alone itinerary of the plan
pub async fn export_itinerary_pdf(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let plan = require_plan(state.session.read().await.planner.plan().cloned())?;

    let doc = export::render_itinerary(&plan);
    pdf_response(&doc, &export::itinerary_filename(&plan.destination))
}

/// GET /api/export/plan.ics - Calendar feed of the planned activities
///
/// Answers 204 when the calendar cannot be encoded; the reason is only logged.
pub async fn export_calendar(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let plan = require_plan(state.session.read().await.planner.plan().cloned())?;

    let Some(ics) = export::export_calendar(&plan) else {
        return Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Body::empty())
            .map_err(|e| AppError::internal(&e.to_string()));
    };

    info!(destination = %plan.destination, events = plan.activities.len(), "Exported calendar");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/calendar; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                export::calendar_filename(&plan.destination)
            ),
        )
        .body(Body::from(ics))
        .map_err(|e| AppError::internal(&e.to_string()))
}

fn require_recommendations(
    prefs: Option<Preferences>,
    recommendations: &[Recommendation],
) -> Result<Preferences, AppError> {
    match prefs {
        Some(prefs) if !recommendations.is_empty() => Ok(prefs),
        _ => Err(AppError::not_found("No recommendations to export")),
    }
}

fn require_plan(plan: Option<TripPlan>) -> Result<TripPlan, AppError> {
    plan.ok_or_else(|| AppError::conflict("No active trip plan"))
}

fn pdf_response(doc: &Document, filename: &str) -> Result<Response, AppError> {
    let bytes = doc.to_pdf_bytes();
    info!(filename, pages = doc.page_count(), bytes = bytes.len(), "Exported PDF");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(&e.to_string()))
}
