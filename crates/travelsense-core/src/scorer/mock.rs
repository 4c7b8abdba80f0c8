//! Mock scorer for testing
//!
//! Returns canned output for each call kind and records the calls it saw.
//! Useful for unit tests and development without Python installed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;

use super::{Scorer, ScorerCall, ScorerOutput};

/// Mock scorer with configurable responses
#[derive(Clone)]
pub struct MockScorer {
    recommend: ScorerOutput,
    suggest: ScorerOutput,
    calls: Arc<Mutex<Vec<ScorerCall>>>,
}

impl Default for MockScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScorer {
    /// Mock returning one beach destination and two activities
    pub fn new() -> Self {
        Self {
            recommend: ScorerOutput::json(&default_recommendations()),
            suggest: ScorerOutput::json(&default_suggestions()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_recommend_output(mut self, output: ScorerOutput) -> Self {
        self.recommend = output;
        self
    }

    pub fn with_suggest_output(mut self, output: ScorerOutput) -> Self {
        self.suggest = output;
        self
    }

    /// Respond to recommend calls with this JSON document
    pub fn with_recommend_json(self, document: Value) -> Self {
        self.with_recommend_output(ScorerOutput::json(&document))
    }

    /// Respond to suggest calls with this JSON document
    pub fn with_suggest_json(self, document: Value) -> Self {
        self.with_suggest_output(ScorerOutput::json(&document))
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<ScorerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Scorer for MockScorer {
    async fn invoke(&self, call: &ScorerCall) -> Result<ScorerOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }
        Ok(match call {
            ScorerCall::Recommend { .. } => self.recommend.clone(),
            ScorerCall::Suggest { .. } => self.suggest.clone(),
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Canned recommendation payload in the scorer's wire shape
pub fn default_recommendations() -> Value {
    json!({
        "success": true,
        "recommendations": [
            {
                "destination": "Bali",
                "match_score": 92.5,
                "features": {
                    "budget": 1500.0,
                    "weather": "warm",
                    "activity": "beach",
                    "safety_score": 80.0,
                    "popularity": 90.0,
                    "language_barrier": 40.0,
                    "cuisine_rating": 85.0,
                    "nightlife": 70.0
                }
            }
        ]
    })
}

/// Canned suggestion payload in the scorer's wire shape
pub fn default_suggestions() -> Value {
    json!({
        "suggestions": [
            {
                "name": "Snorkeling Tour",
                "destination_specific": "Snorkeling Tour in Bali",
                "duration": 3,
                "best_time": "morning",
                "estimated_cost": 114.29,
                "score": 0.87
            },
            {
                "name": "Sunset Beach Picnic",
                "destination_specific": "Sunset Beach Picnic in Bali",
                "duration": 2,
                "best_time": "evening",
                "estimated_cost": 57.14,
                "score": 0.79
            }
        ]
    })
}
