//! Document export
//!
//! Two PDF layouts and a calendar feed:
//! - the recommendation report (preferences, ranked destinations, optional plan)
//! - the itinerary (one plan: dates, budget, activities, notes)
//! - an iCalendar feed with one event per planned activity

mod calendar;
mod document;
mod pdf;

use std::sync::OnceLock;

use regex::Regex;

pub use calendar::{event_start, export_calendar, render_calendar};
pub use document::{
    wrap_text, Document, Font, Layout, Page, TextLine, LINE_HEIGHT, MARGIN, PAGE_BOTTOM,
    PAGE_HEIGHT,
};

use crate::models::{format_amount, BudgetCategory, Preferences, Recommendation, TripPlan};

/// Page-break thresholds for the report layout
const BREAK_BEFORE_BLOCK: f32 = 250.0;
const BREAK_BEFORE_PLAN: f32 = 200.0;
const BREAK_BEFORE_NOTES: f32 = 220.0;
/// Page-break threshold for the itinerary layout
const ITINERARY_BREAK: f32 = 270.0;

/// Wrap width for free-text notes, in millimetres
const NOTES_WIDTH: f32 = 170.0;
const ACTIVITY_NOTES_WIDTH: f32 = 150.0;

const TITLE_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 16.0;
const DESTINATION_SIZE: f32 = 18.0;
const SUBHEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const SMALL_SIZE: f32 = 10.0;

/// Recommendation report, optionally followed by a trip plan.
///
/// Budget percentages are relative to the preference budget, not to the sum
/// of the plan's shares.
pub fn render_report(
    recommendations: &[Recommendation],
    prefs: &Preferences,
    plan: Option<&TripPlan>,
) -> Document {
    let mut layout = Layout::new();

    layout.text("Travel Recommendations & Plan", TITLE_SIZE, Font::Bold);
    layout.gap(10.0);

    layout.text("Your Preferences:", HEADING_SIZE, Font::Bold);
    layout.text(&format!("Budget: ${}", format_amount(prefs.budget)), BODY_SIZE, Font::Regular);
    layout.text(&format!("Weather: {}", prefs.weather), BODY_SIZE, Font::Regular);
    layout.text(&format!("Activity: {}", prefs.activity), BODY_SIZE, Font::Regular);
    layout.gap(10.0);

    for rec in recommendations {
        layout.break_after(BREAK_BEFORE_BLOCK);
        recommendation_block(&mut layout, rec);
        layout.gap(10.0);
    }

    if let Some(plan) = plan {
        layout.break_after(BREAK_BEFORE_PLAN);
        plan_section(&mut layout, plan, prefs);
    }

    layout.finish()
}

/// Report scoped to the plan's destination
pub fn render_plan_report(
    recommendations: &[Recommendation],
    prefs: &Preferences,
    plan: &TripPlan,
) -> Document {
    let selected: Vec<Recommendation> = recommendations
        .iter()
        .filter(|r| r.destination == plan.destination)
        .cloned()
        .collect();
    render_report(&selected, prefs, Some(plan))
}

fn recommendation_block(layout: &mut Layout, rec: &Recommendation) {
    let f = &rec.features;
    layout.text(&rec.destination, DESTINATION_SIZE, Font::Bold);
    layout.text(&format!("Match Score: {:.1}%", rec.match_score), BODY_SIZE, Font::Regular);
    layout.text("Destination Features:", SUBHEADING_SIZE, Font::Bold);
    layout.text(&format!("Weather: {}", f.weather), BODY_SIZE, Font::Regular);
    layout.text(&format!("Main Activity: {}", f.activity), BODY_SIZE, Font::Regular);
    for (label, value) in [
        ("Safety Score", f.safety_score),
        ("Popularity", f.popularity),
        ("Language Barrier", f.language_barrier),
        ("Cuisine Rating", f.cuisine_rating),
        ("Nightlife Rating", f.nightlife),
    ] {
        layout.text(&format!("{}: {:.1}%", label, value), BODY_SIZE, Font::Regular);
    }
}

fn plan_section(layout: &mut Layout, plan: &TripPlan, prefs: &Preferences) {
    layout.text("Travel Plan Details", DESTINATION_SIZE, Font::Bold);
    layout.gap(5.0);

    layout.text("Budget Allocation:", SUBHEADING_SIZE, Font::Bold);
    for (category, amount) in plan.budget.entries() {
        let percent = (amount as f64 / prefs.budget * 100.0).round();
        layout.text(
            &format!("{}: ${} ({}%)", category.label(), amount, percent),
            BODY_SIZE,
            Font::Regular,
        );
    }
    layout.gap(10.0);

    if !plan.activities.is_empty() {
        layout.text("Planned Activities:", SUBHEADING_SIZE, Font::Bold);
        // A header prints whenever the day differs from the previous activity
        let mut current_day = 0;
        for activity in &plan.activities {
            layout.break_after(BREAK_BEFORE_BLOCK);
            if activity.day != current_day {
                current_day = activity.day;
                layout.gap(5.0);
                layout.text(&format!("Day {}:", activity.day), BODY_SIZE, Font::Bold);
            }
            layout.text(
                &format!("{} - {}", activity.time, activity.activity),
                BODY_SIZE,
                Font::Regular,
            );
            if let Some(notes) = activity.notes.as_deref().filter(|n| !n.is_empty()) {
                layout.muted_at(MARGIN + 5.0, notes, SMALL_SIZE);
            }
        }
    }

    if !plan.notes.is_empty() {
        layout.break_after(BREAK_BEFORE_NOTES);
        layout.gap(10.0);
        layout.text("Trip Notes:", SUBHEADING_SIZE, Font::Bold);
        for line in wrap_text(&plan.notes, NOTES_WIDTH, BODY_SIZE) {
            layout.text(&line, BODY_SIZE, Font::Regular);
        }
    }
}

/// Stand-alone itinerary for one plan
pub fn render_itinerary(plan: &TripPlan) -> Document {
    let mut layout = Layout::new();
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string()).unwrap_or_else(|| "TBD".into())
    };

    layout.text(&format!("Travel Plan: {}", plan.destination), 20.0, Font::Bold);
    layout.gap(8.0);
    layout.text(
        &format!("Date: {} to {}", date(plan.start_date), date(plan.end_date)),
        BODY_SIZE,
        Font::Regular,
    );
    layout.gap(8.0);

    layout.text("Budget Allocation:", SUBHEADING_SIZE, Font::Bold);
    layout.gap(3.0);
    for (category, amount) in plan.budget.entries() {
        let label = match category {
            BudgetCategory::Misc => "Miscellaneous",
            other => other.label(),
        };
        layout.text_at(30.0, &format!("{}: ${}", label, amount), BODY_SIZE, Font::Regular);
        layout.gap(3.0);
    }
    layout.text_at(
        30.0,
        &format!("Total Budget: ${}", plan.budget.total()),
        BODY_SIZE,
        Font::Regular,
    );
    layout.gap(13.0);

    layout.text("Activities:", SUBHEADING_SIZE, Font::Bold);
    layout.gap(3.0);

    for activity in &plan.activities {
        layout.break_after(ITINERARY_BREAK);
        layout.text_at(
            30.0,
            &format!("Day {} - {}", activity.day, activity.time),
            BODY_SIZE,
            Font::Regular,
        );
        layout.text_at(40.0, &activity.activity, BODY_SIZE, Font::Regular);
        if let Some(notes) = activity.notes.as_deref().filter(|n| !n.is_empty()) {
            for line in wrap_text(notes, ACTIVITY_NOTES_WIDTH, BODY_SIZE) {
                layout.break_after(ITINERARY_BREAK);
                layout.text_at(40.0, &line, BODY_SIZE, Font::Regular);
            }
        }
        layout.gap(5.0);
    }

    if !plan.notes.is_empty() {
        layout.gap(10.0);
        layout.break_after(ITINERARY_BREAK);
        layout.text("Additional Notes:", SUBHEADING_SIZE, Font::Bold);
        layout.gap(3.0);
        for line in wrap_text(&plan.notes, NOTES_WIDTH, BODY_SIZE) {
            layout.break_after(ITINERARY_BREAK);
            layout.text(&line, BODY_SIZE, Font::Regular);
        }
    }

    layout.finish()
}

/// Lowercase with whitespace runs replaced by `-`
pub fn slug(destination: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    re.replace_all(&destination.to_lowercase(), "-").into_owned()
}

pub fn report_filename() -> &'static str {
    "travel-recommendations.pdf"
}

pub fn plan_report_filename(destination: &str) -> String {
    format!("{}-travel-plan.pdf", destination.to_lowercase())
}

pub fn itinerary_filename(destination: &str) -> String {
    format!("travel-plan-{}.pdf", slug(destination))
}

pub fn calendar_filename(destination: &str) -> String {
    format!("travel-plan-{}.ics", slug(destination))
}
