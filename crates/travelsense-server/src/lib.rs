//! TravelSense Web Server
//!
//! Axum-based REST API for the TravelSense travel planner.
//!
//! The server keeps a single in-memory session (preferences, recommendations,
//! active trip plan) behind one async lock. The lock is never held while the
//! external scorer runs.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Security headers (CSP, nosniff, frame denial)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use travelsense_core::{Scorer, ScorerClient, Session};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub scorer: ScorerClient,
    pub config: ServerConfig,
    /// The single user session
    pub session: RwLock<Session>,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(
    scorer: ScorerClient,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    info!(scorer = %scorer.describe(), backend = scorer.backend().as_str(), "Scorer configured");

    let state = Arc::new(AppState {
        scorer,
        config: config.clone(),
        session: RwLock::new(Session::new()),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Gateways
        .route("/recommend", post(handlers::recommend))
        .route("/suggest-activities", post(handlers::suggest_activities))
        .route("/session", get(handlers::get_session))
        // Trip plan
        .route(
            "/plan",
            get(handlers::get_plan)
                .post(handlers::create_plan)
                .delete(handlers::clear_plan),
        )
        .route("/plan/activities", post(handlers::add_activity))
        .route("/plan/activities/:index", delete(handlers::remove_activity))
        .route("/plan/notes", put(handlers::update_notes))
        .route("/plan/dates", put(handlers::set_dates))
        .route("/plan/budget/:category", put(handlers::set_budget_share))
        .route("/plan/suggestions", get(handlers::get_suggestions))
        // Export
        .route(
            "/export/recommendations.pdf",
            get(handlers::export_recommendations_pdf),
        )
        .route("/export/plan.pdf", get(handlers::export_plan_pdf))
        .route("/export/itinerary.pdf", get(handlers::export_itinerary_pdf))
        .route("/export/plan.ics", get(handlers::export_calendar));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        concat!(
            "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; ",
            "img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; ",
            "frame-ancestors 'none'"
        ),
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    scorer: ScorerClient,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(scorer, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    scorer: ScorerClient,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if let ScorerClient::Mock(_) = scorer {
        warn!("⚠️  Using the mock scorer - recommendations are canned");
    }

    let app = create_router(scorer, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Diagnostic text returned alongside upstream failures
    details: Option<String>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    /// Map a core error onto a status code and client-facing message
    pub fn from_core(err: travelsense_core::Error) -> Self {
        use travelsense_core::Error as E;
        match err {
            E::Validation(msg) => Self::bad_request(&msg),
            E::NotFound(msg) => Self::not_found(&msg),
            E::NoActivePlan => Self::conflict(&E::NoActivePlan.to_string()),
            E::Upstream { message, details } => {
                warn!(message = %message, details = ?details, "Upstream failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    details,
                    internal: None,
                }
            }
            E::Format(msg) => {
                warn!(message = %msg, "Scorer returned an unexpected shape");
                Self::internal(&msg)
            }
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::json!({
            "error": self.message
        });
        if let Some(details) = self.details {
            body["details"] = serde_json::Value::String(details);
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            details: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
