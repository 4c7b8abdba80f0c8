//! Trip plan state
//!
//! Holds at most one active [`TripPlan`] together with the activity
//! suggestions fetched for its destination. Mutation is synchronous; callers
//! that share a planner across tasks wrap it in a lock.
//!
//! Suggestion fetches run outside the planner. `initialize` hands out a
//! [`SuggestionTicket`] and the result is delivered back through
//! [`TripPlanner::apply_suggestions`]. A result whose ticket belongs to an
//! earlier plan is dropped.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gateway::{SuggestionPayload, SuggestionRequest};
use crate::models::{Activity, ActivitySuggestion, BudgetCategory, Preferences, TripPlan};

/// Handle for one outstanding suggestion fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionTicket {
    pub generation: u64,
    pub request: SuggestionRequest,
}

/// State machine for the active trip plan
#[derive(Debug, Default)]
pub struct TripPlanner {
    plan: Option<TripPlan>,
    generation: u64,
    pending: Option<u64>,
    suggestions: Vec<ActivitySuggestion>,
}

/// Read-only view of the planner for API responses
#[derive(Debug, Clone, Serialize)]
pub struct PlannerSnapshot {
    pub plan: Option<TripPlan>,
    pub suggestions: Vec<ActivitySuggestion>,
    pub loading_suggestions: bool,
}

impl TripPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh plan for `destination`, replacing any existing one.
    ///
    /// The returned ticket must be passed back to `apply_suggestions` once the
    /// suggestion fetch completes.
    pub fn initialize(&mut self, destination: &str, prefs: &Preferences) -> SuggestionTicket {
        if let Some(old) = &self.plan {
            debug!(previous = %old.destination, "Replacing active plan");
        }

        self.plan = Some(TripPlan::new(destination, prefs.budget));
        self.generation += 1;
        self.pending = Some(self.generation);
        self.suggestions.clear();

        info!(destination, generation = self.generation, "Initialized trip plan");

        SuggestionTicket {
            generation: self.generation,
            request: SuggestionRequest::for_destination(destination, prefs),
        }
    }

    /// Deliver the result of a suggestion fetch.
    ///
    /// Returns false when the ticket is stale and the result was discarded.
    pub fn apply_suggestions(
        &mut self,
        ticket: &SuggestionTicket,
        result: Result<SuggestionPayload>,
    ) -> bool {
        if self.pending != Some(ticket.generation) {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                destination = %ticket.request.destination,
                "Discarding stale suggestions"
            );
            return false;
        }

        self.pending = None;
        self.suggestions = match result {
            Ok(payload) => payload.suggestions(),
            Err(e) => {
                warn!(
                    error = %e,
                    destination = %ticket.request.destination,
                    "Error fetching suggestions"
                );
                Vec::new()
            }
        };
        true
    }

    /// Append an activity and re-sort by day, then by time compared as text
    pub fn add_activity(&mut self, activity: Activity) -> Result<()> {
        let plan = self.plan_mut()?;
        if activity.day == 0 {
            return Err(Error::Validation("Day must be 1 or greater".into()));
        }
        plan.activities.push(activity);
        // Stable, so equal (day, time) keep insertion order
        plan.activities
            .sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.time.cmp(&b.time)));
        Ok(())
    }

    /// Remove the activity at `index` in the sorted sequence
    pub fn remove_activity(&mut self, index: usize) -> Result<Activity> {
        let plan = self.plan_mut()?;
        if index >= plan.activities.len() {
            return Err(Error::NotFound(format!("Activity {} not found", index)));
        }
        Ok(plan.activities.remove(index))
    }

    pub fn update_notes(&mut self, notes: &str) -> Result<()> {
        self.plan_mut()?.notes = notes.to_string();
        Ok(())
    }

    pub fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(Error::Validation(
                    "End date must not be before start date".into(),
                ));
            }
        }
        let plan = self.plan_mut()?;
        plan.start_date = start;
        plan.end_date = end;
        Ok(())
    }

    /// Overwrite one budget share. Other shares are left untouched.
    pub fn set_budget_share(&mut self, category: BudgetCategory, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(Error::Validation("Budget amount cannot be negative".into()));
        }
        self.plan_mut()?.budget.set(category, amount);
        Ok(())
    }

    /// Drop the active plan. Returns whether there was one.
    pub fn clear(&mut self) -> bool {
        self.generation += 1;
        self.pending = None;
        self.suggestions.clear();
        let had_plan = self.plan.take().is_some();
        if had_plan {
            info!("Cleared trip plan");
        }
        had_plan
    }

    pub fn plan(&self) -> Option<&TripPlan> {
        self.plan.as_ref()
    }

    pub fn suggestions(&self) -> &[ActivitySuggestion] {
        &self.suggestions
    }

    pub fn loading_suggestions(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            plan: self.plan.clone(),
            suggestions: self.suggestions.clone(),
            loading_suggestions: self.loading_suggestions(),
        }
    }

    fn plan_mut(&mut self) -> Result<&mut TripPlan> {
        self.plan.as_mut().ok_or(Error::NoActivePlan)
    }
}
