//! TravelSense Core Library
//!
//! Shared functionality for the TravelSense travel planner:
//! - Scorer boundary for the external ranking scripts
//! - Recommendation and suggestion gateways
//! - Trip plan state with stale-result protection for suggestion fetches
//! - PDF report, itinerary and iCalendar export
//! - Scorer configuration (embedded defaults, override file, environment)

pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod planner;
pub mod scorer;
pub mod session;

/// Test utilities including stub scorer scripts
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ScorerBackend, ScorerConfig};
pub use error::{Error, Result};
pub use export::Document;
pub use gateway::{SuggestionPayload, SuggestionRequest};
pub use models::{
    Activity, ActivityKind, ActivitySuggestion, BudgetCategory, BudgetSplit, DestinationFeatures,
    Preferences, PreferencesInput, Recommendation, RecommendationCard, TripPlan, Weather,
};
pub use planner::{SuggestionTicket, TripPlanner};
pub use scorer::{MockScorer, ProcessScorer, Scorer, ScorerCall, ScorerClient, ScorerOutput};
pub use session::{Session, SessionSnapshot};
