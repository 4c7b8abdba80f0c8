//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod export;
pub mod gateways;
pub mod plan;

// Re-export all handlers for use in router
pub use export::*;
pub use gateways::*;
pub use plan::*;

use axum::extract::Request;
use serde::de::DeserializeOwned;

use crate::AppError;

/// Maximum accepted JSON body size
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Read and decode a JSON request body, answering 400 on failure
pub(crate) async fn parse_body<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}
