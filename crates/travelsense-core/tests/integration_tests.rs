//! Integration tests for travelsense-core
//!
//! These tests exercise the full recommend → plan → export workflow.

use chrono::NaiveDate;
use serde_json::json;
use travelsense_core::{
    export::{self, render_calendar, render_report},
    gateway, Activity, Error, MockScorer, PreferencesInput, ProcessScorer, Session,
    SuggestionRequest,
};

fn beach_input() -> PreferencesInput {
    PreferencesInput {
        budget: Some(2000.0),
        weather: Some("warm".into()),
        activity: Some("beach".into()),
    }
}

// =============================================================================
// Recommend → Plan workflow
// =============================================================================

#[tokio::test]
async fn test_bali_end_to_end() {
    let scorer = MockScorer::new();
    let input = beach_input();
    let prefs = input.validate().expect("valid preferences");

    let recommendations = gateway::recommend(&scorer, &input)
        .await
        .expect("Failed to get recommendations");
    assert_eq!(recommendations.len(), 1);

    let card = recommendations[0].card();
    assert_eq!(card.destination, "Bali");
    assert_eq!(card.match_score, "92.5%");

    let mut session = Session::new();
    session.set_recommendations(prefs, recommendations);

    let ticket = session
        .select_destination("Bali")
        .expect("Bali is recommended");
    let plan = session.planner.plan().expect("plan initialized");
    assert_eq!(plan.budget.accommodation, 800);
    assert_eq!(plan.budget.activities, 600);
    assert_eq!(plan.budget.food, 400);
    assert_eq!(plan.budget.transportation, 200);
    assert_eq!(plan.budget.misc, 0);

    // Suggestion fetch completes outside the session
    let payload = gateway::suggest(&scorer, &ticket.request)
        .await
        .expect("Failed to get suggestions");
    assert!(session.planner.apply_suggestions(&ticket, Ok(payload)));

    let first = session.planner.suggestions()[0].to_activity();
    session.planner.add_activity(first).unwrap();
    session
        .planner
        .add_activity(Activity::new(1, "08:00", "Breakfast"))
        .unwrap();

    let plan = session.planner.plan().unwrap();
    assert_eq!(plan.activities[0].activity, "Breakfast");
    // "morning" sorts after "08:00" as text
    assert_eq!(plan.activities[1].activity, "Snorkeling Tour in Bali");

    let doc = render_report(session.recommendations(), &prefs, Some(plan));
    let text = doc.to_text();
    assert!(text.contains("Match Score: 92.5%"));
    assert!(text.contains("Accommodation: $800 (40%)"));
    assert!(text.contains("Day 1:"));

    let pdf = doc.to_pdf_bytes();
    assert!(pdf.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn test_missing_preferences_never_reach_scorer() {
    let scorer = MockScorer::new();
    let input = PreferencesInput {
        budget: Some(0.0),
        ..beach_input()
    };

    let result = gateway::recommend(&scorer, &input).await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn test_stale_suggestions_do_not_overwrite_new_plan() {
    let scorer = MockScorer::new().with_recommend_json(json!({
        "recommendations": [
            {"destination": "Bali", "match_score": 92.5, "features": {
                "budget": 1500.0, "weather": "warm", "activity": "beach",
                "safety_score": 80.0, "popularity": 90.0, "language_barrier": 40.0,
                "cuisine_rating": 85.0, "nightlife": 70.0}},
            {"destination": "Phuket", "match_score": 88.0, "features": {
                "budget": 1200.0, "weather": "warm", "activity": "beach",
                "safety_score": 75.0, "popularity": 85.0, "language_barrier": 50.0,
                "cuisine_rating": 90.0, "nightlife": 85.0}}
        ]
    }));
    let input = beach_input();
    let recs = gateway::recommend(&scorer, &input).await.unwrap();

    let mut session = Session::new();
    session.set_recommendations(input.validate().unwrap(), recs);

    let bali = session.select_destination("Bali").unwrap();
    let phuket = session.select_destination("Phuket").unwrap();

    let late = gateway::suggest(&scorer, &bali.request).await.unwrap();
    assert!(!session.planner.apply_suggestions(&bali, Ok(late)));
    assert!(session.snapshot().loading_suggestions);

    let fresh = gateway::suggest(&scorer, &phuket.request).await.unwrap();
    assert!(session.planner.apply_suggestions(&phuket, Ok(fresh)));
    assert_eq!(session.planner.plan().unwrap().destination, "Phuket");
}

// =============================================================================
// Subprocess scorer
// =============================================================================

#[tokio::test]
async fn test_process_scorer_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("suggest.sh"),
        "echo '{\"type\": \"debug\", \"message\": \"loading\"}' >&2\n\
         printf '{\"suggestions\": [], \"destination\": \"%s\"}' \"$1\"\n",
    )
    .unwrap();
    let scorer = ProcessScorer::new("sh", dir.path()).with_scripts("recommend.sh", "suggest.sh");

    let request = SuggestionRequest {
        destination: "Kyoto".into(),
        weather: "mild".into(),
        activity_type: "culture".into(),
        budget: 3000.0,
    };
    let payload = gateway::suggest(&scorer, &request).await.unwrap();

    assert_eq!(payload.0["destination"], "Kyoto");
    assert!(payload.suggestions().is_empty());
}

#[tokio::test]
async fn test_process_scorer_crash_is_upstream_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("recommend.sh"),
        "echo 'FileNotFoundError: travel_model.pkl' >&2\nexit 1\n",
    )
    .unwrap();
    let scorer = ProcessScorer::new("sh", dir.path()).with_scripts("recommend.sh", "suggest.sh");

    match gateway::recommend(&scorer, &beach_input()).await {
        Err(Error::Upstream { message, details }) => {
            assert_eq!(message, "Failed to generate recommendations");
            assert!(details.unwrap_or_default().contains("travel_model.pkl"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_calendar_for_third_day_activity() {
    let mut plan = travelsense_core::TripPlan::new("Bali", 2000.0);
    plan.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
    plan.activities = vec![Activity::new(3, "14:30", "Snorkeling")];

    let ics = render_calendar(&plan).expect("calendar renders");
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    assert!(ics.contains("DTSTART:20250603T143000"));
    assert!(ics.contains("DURATION:PT1H"));
    assert!(ics.contains("LOCATION:Bali"));
}

#[test]
fn test_export_files_on_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut plan = travelsense_core::TripPlan::new("New York", 1000.0);
    plan.start_date = NaiveDate::from_ymd_opt(2025, 9, 10);
    plan.activities = vec![Activity::new(1, "10:00", "Museum").with_notes("MoMA")];

    let pdf_path = dir.path().join(export::itinerary_filename(&plan.destination));
    export::render_itinerary(&plan).save(&pdf_path).unwrap();
    assert!(pdf_path.ends_with("travel-plan-new-york.pdf"));
    assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF"));

    let ics = export::export_calendar(&plan).expect("calendar renders");
    assert!(ics.contains("SUMMARY:Museum"));
    assert_eq!(export::calendar_filename(&plan.destination), "travel-plan-new-york.ics");
}
