//! Single-user session state
//!
//! The last submitted preferences, the recommendations they produced, and the
//! trip planner. Everything lives in memory; a restart starts over.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{ActivitySuggestion, Preferences, Recommendation, TripPlan};
use crate::planner::{SuggestionTicket, TripPlanner};

#[derive(Debug, Default)]
pub struct Session {
    preferences: Option<Preferences>,
    recommendations: Vec<Recommendation>,
    pub planner: TripPlanner,
}

/// Serializable copy of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub preferences: Option<Preferences>,
    pub recommendations: Vec<Recommendation>,
    pub plan: Option<TripPlan>,
    pub suggestions: Vec<ActivitySuggestion>,
    pub loading_suggestions: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh recommendation result. The active plan is kept.
    pub fn set_recommendations(
        &mut self,
        prefs: Preferences,
        recommendations: Vec<Recommendation>,
    ) {
        self.preferences = Some(prefs);
        self.recommendations = recommendations;
    }

    pub fn preferences(&self) -> Option<&Preferences> {
        self.preferences.as_ref()
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn recommendation(&self, destination: &str) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|r| r.destination == destination)
    }

    /// Select a destination from the current recommendations and start planning
    pub fn select_destination(&mut self, destination: &str) -> Result<SuggestionTicket> {
        if self.recommendation(destination).is_none() {
            return Err(Error::NotFound(format!(
                "Destination '{}' is not among the current recommendations",
                destination
            )));
        }
        let prefs = self
            .preferences
            .ok_or_else(|| Error::Validation("No preferences submitted yet".into()))?;
        Ok(self.planner.initialize(destination, &prefs))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let planner = self.planner.snapshot();
        SessionSnapshot {
            preferences: self.preferences,
            recommendations: self.recommendations.clone(),
            plan: planner.plan,
            suggestions: planner.suggestions,
            loading_suggestions: planner.loading_suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, Weather};
    use crate::scorer::default_recommendations;

    fn session_with_bali() -> Session {
        let recs: Vec<Recommendation> =
            serde_json::from_value(default_recommendations()["recommendations"].clone()).unwrap();
        let prefs = Preferences::new(2000.0, Weather::Warm, ActivityKind::Beach).unwrap();
        let mut session = Session::new();
        session.set_recommendations(prefs, recs);
        session
    }

    #[test]
    fn test_select_known_destination() {
        let mut session = session_with_bali();
        let ticket = session.select_destination("Bali").unwrap();

        assert_eq!(ticket.request.budget, 2000.0);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.plan.unwrap().destination, "Bali");
        assert!(snapshot.loading_suggestions);
    }

    #[test]
    fn test_select_unknown_destination() {
        let mut session = session_with_bali();
        assert!(matches!(
            session.select_destination("Atlantis"),
            Err(Error::NotFound(_))
        ));
        assert!(session.planner.plan().is_none());
    }

    #[test]
    fn test_new_recommendations_keep_plan() {
        let mut session = session_with_bali();
        session.select_destination("Bali").unwrap();

        let prefs = Preferences::new(500.0, Weather::Cold, ActivityKind::History).unwrap();
        session.set_recommendations(prefs, Vec::new());

        assert!(session.recommendations().is_empty());
        assert!(session.planner.plan().is_some());
    }
}
