//! Invocation boundary for the external scorer
//!
//! The scorer ranks destinations and suggests activities. It is an opaque
//! collaborator: positional arguments go in, a single JSON document comes out
//! on stdout, and diagnostics go to stderr.
//!
//! # Architecture
//!
//! - `Scorer` trait: the invocation contract
//! - `ScorerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `ProcessScorer` (subprocess), `MockScorer` (canned output)
//!
//! # Usage
//!
//! ```rust,ignore
//! let scorer = ScorerClient::from_config(&ScorerConfig::load(None)?);
//! let output = scorer.invoke(&ScorerCall::recommend(&prefs)).await?;
//! ```

mod mock;
mod process;

pub use mock::{default_recommendations, default_suggestions, MockScorer};
pub use process::ProcessScorer;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::{ScorerBackend, ScorerConfig};
use crate::error::Result;
use crate::models::{format_amount, Preferences};

/// A single request to the scorer
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerCall {
    /// Rank destinations: (budget, weather, activity)
    Recommend {
        budget: String,
        weather: String,
        activity: String,
    },
    /// Suggest activities: (destination, weather, activity_type, budget)
    Suggest {
        destination: String,
        weather: String,
        activity_type: String,
        budget: String,
    },
}

impl ScorerCall {
    pub fn recommend(prefs: &Preferences) -> Self {
        Self::Recommend {
            budget: prefs.budget_arg(),
            weather: prefs.weather.as_str().to_string(),
            activity: prefs.activity.as_str().to_string(),
        }
    }

    pub fn suggest(destination: &str, weather: &str, activity_type: &str, budget: f64) -> Self {
        Self::Suggest {
            destination: destination.to_string(),
            weather: weather.to_string(),
            activity_type: activity_type.to_string(),
            budget: format_amount(budget),
        }
    }

    /// Positional arguments in the order the scripts expect them
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Recommend {
                budget,
                weather,
                activity,
            } => vec![budget.clone(), weather.clone(), activity.clone()],
            Self::Suggest {
                destination,
                weather,
                activity_type,
                budget,
            } => vec![
                destination.clone(),
                weather.clone(),
                activity_type.clone(),
                budget.clone(),
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Recommend { .. } => "recommend",
            Self::Suggest { .. } => "suggest",
        }
    }
}

/// Everything the scorer produced for one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScorerOutput {
    /// None when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    /// Stderr text that was not a debug marker
    pub diagnostics: String,
    /// Stderr lines of the form {"type": "debug", ...}
    pub debug_markers: Vec<Value>,
}

impl ScorerOutput {
    /// Successful output with the given JSON document on stdout
    pub fn json(document: &Value) -> Self {
        Self {
            exit_code: Some(0),
            stdout: document.to_string(),
            ..Default::default()
        }
    }

    /// Build output from raw process streams, separating debug markers
    pub fn from_streams(exit_code: Option<i32>, stdout: String, stderr: &str) -> Self {
        let (diagnostics, debug_markers) = split_stderr(stderr);
        Self {
            exit_code,
            stdout,
            diagnostics,
            debug_markers,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Split stderr into free-form diagnostics and structured debug markers
pub fn split_stderr(stderr: &str) -> (String, Vec<Value>) {
    let mut diagnostics = String::new();
    let mut markers = Vec::new();

    for line in stderr.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) if value.get("type").and_then(Value::as_str) == Some("debug") => {
                debug!(marker = %value, "Scorer debug");
                markers.push(value);
            }
            _ => {
                diagnostics.push_str(line);
                diagnostics.push('\n');
            }
        }
    }

    (diagnostics, markers)
}

/// The scorer invocation contract
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Run one call and collect its output.
    ///
    /// Returns an error only when the scorer could not be run at all
    /// (spawn failure, timeout). A non-zero exit is reported in the output.
    async fn invoke(&self, call: &ScorerCall) -> Result<ScorerOutput>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Concrete scorer client enum
#[derive(Clone)]
pub enum ScorerClient {
    /// External script run as a subprocess
    Process(ProcessScorer),
    /// Canned responses for testing
    Mock(MockScorer),
}

impl ScorerClient {
    pub fn from_config(config: &ScorerConfig) -> Self {
        match config.backend {
            ScorerBackend::Process => ScorerClient::Process(ProcessScorer::from_config(config)),
            ScorerBackend::Mock => ScorerClient::Mock(MockScorer::new()),
        }
    }

    /// Create a mock scorer for testing
    pub fn mock() -> Self {
        ScorerClient::Mock(MockScorer::new())
    }

    pub fn backend(&self) -> ScorerBackend {
        match self {
            ScorerClient::Process(_) => ScorerBackend::Process,
            ScorerClient::Mock(_) => ScorerBackend::Mock,
        }
    }
}

#[async_trait]
impl Scorer for ScorerClient {
    async fn invoke(&self, call: &ScorerCall) -> Result<ScorerOutput> {
        match self {
            ScorerClient::Process(s) => s.invoke(call).await,
            ScorerClient::Mock(s) => s.invoke(call).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ScorerClient::Process(s) => s.describe(),
            ScorerClient::Mock(s) => s.describe(),
        }
    }
}
