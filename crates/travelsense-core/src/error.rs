//! Error types for TravelSense

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    #[error("Invalid response format: {0}")]
    Format(String),

    #[error("No active trip plan")]
    NoActivePlan,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Upstream failure with diagnostic detail attached
    pub fn upstream(message: impl Into<String>, details: impl Into<String>) -> Self {
        let details = details.into();
        Self::Upstream {
            message: message.into(),
            details: if details.trim().is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
