//! Recommendation and suggestion gateways
//!
//! Both gateways hand the request to the scorer and turn whatever comes back
//! into either a typed result or a structured [`Error`]. Nothing escapes as a
//! panic.
//!
//! The two gateways intentionally differ: the recommendation gateway treats an
//! `error` field in a decoded payload as a failure, the suggestion gateway
//! returns the decoded payload verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{ActivitySuggestion, Preferences, PreferencesInput, Recommendation};
use crate::scorer::{Scorer, ScorerCall, ScorerOutput};

/// Validate raw preferences, then ask the scorer for ranked destinations
pub async fn recommend<S>(scorer: &S, input: &PreferencesInput) -> Result<Vec<Recommendation>>
where
    S: Scorer + ?Sized,
{
    let prefs = input.validate()?;
    recommend_for(scorer, &prefs).await
}

/// Ask the scorer for ranked destinations. Order is the scorer's; nothing is re-sorted.
pub async fn recommend_for<S>(scorer: &S, prefs: &Preferences) -> Result<Vec<Recommendation>>
where
    S: Scorer + ?Sized,
{
    let call = ScorerCall::recommend(prefs);
    let output = scorer.invoke(&call).await?;
    let recommendations = parse_recommendations(&output)?;

    info!(
        budget = prefs.budget,
        weather = %prefs.weather,
        activity = %prefs.activity,
        count = recommendations.len(),
        "Generated recommendations"
    );

    Ok(recommendations)
}

/// Interpret the scorer's output for a recommend call
pub fn parse_recommendations(output: &ScorerOutput) -> Result<Vec<Recommendation>> {
    if !output.success() {
        warn!(
            exit_code = ?output.exit_code,
            diagnostics = %output.diagnostics,
            "Recommendation scorer failed"
        );
        let details = if output.diagnostics.trim().is_empty() {
            &output.stdout
        } else {
            &output.diagnostics
        };
        return Err(Error::upstream("Failed to generate recommendations", details.as_str()));
    }

    let value: Value = serde_json::from_str(output.stdout.trim()).map_err(|e| {
        warn!(error = %e, raw = %output.stdout, "Unparseable recommendation output");
        Error::upstream(
            "Invalid response format from recommendation engine",
            output.stdout.as_str(),
        )
    })?;

    if let Some(message) = embedded_error(&value) {
        return Err(Error::Upstream {
            message,
            details: None,
        });
    }

    let list = value
        .get("recommendations")
        .filter(|v| v.is_array())
        .ok_or_else(|| Error::Format("Invalid recommendations format received".into()))?;

    serde_json::from_value(list.clone())
        .map_err(|e| Error::Format(format!("Invalid recommendations format received: {}", e)))
}

/// The `error` field of a decoded payload, if it carries one
fn embedded_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Suggestion request body. Fields are passed through to the scorer unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionRequest {
    pub destination: String,
    pub weather: String,
    pub activity_type: String,
    pub budget: f64,
}

impl SuggestionRequest {
    /// Request for a destination using the session's preferences
    pub fn for_destination(destination: &str, prefs: &Preferences) -> Self {
        Self {
            destination: destination.to_string(),
            weather: prefs.weather.as_str().to_string(),
            activity_type: prefs.activity.as_str().to_string(),
            budget: prefs.budget,
        }
    }
}

/// The scorer's decoded suggestion document, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SuggestionPayload(pub Value);

impl SuggestionPayload {
    /// Typed suggestions, or an empty list when the payload reports an error
    /// or has an unexpected shape
    pub fn suggestions(&self) -> Vec<ActivitySuggestion> {
        let Some(list) = self.0.get("suggestions").and_then(Value::as_array) else {
            warn!("Suggestion payload has no suggestions list");
            return Vec::new();
        };

        if let Some(err) = list.iter().find_map(|s| s.get("error")) {
            warn!(error = %err, "Error in suggestions");
            return Vec::new();
        }

        match serde_json::from_value(Value::Array(list.clone())) {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, "Malformed suggestions");
                Vec::new()
            }
        }
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Ask the scorer for activity suggestions at a destination
pub async fn suggest<S>(scorer: &S, request: &SuggestionRequest) -> Result<SuggestionPayload>
where
    S: Scorer + ?Sized,
{
    let call = ScorerCall::suggest(
        &request.destination,
        &request.weather,
        &request.activity_type,
        request.budget,
    );
    let output = scorer.invoke(&call).await?;
    parse_suggestions(&output)
}

/// Interpret the scorer's output for a suggest call
pub fn parse_suggestions(output: &ScorerOutput) -> Result<SuggestionPayload> {
    if !output.success() {
        warn!(
            exit_code = ?output.exit_code,
            diagnostics = %output.diagnostics,
            "Suggestion scorer failed"
        );
        return Err(Error::upstream(
            "Failed to get suggestions",
            output.diagnostics.as_str(),
        ));
    }

    serde_json::from_str(output.stdout.trim())
        .map(SuggestionPayload)
        .map_err(|e| {
            warn!(error = %e, raw = %output.stdout, "Unparseable suggestion output");
            Error::upstream("Invalid response format", output.stdout.as_str())
        })
}
