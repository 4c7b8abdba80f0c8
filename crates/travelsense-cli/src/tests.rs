//! CLI command tests

use std::fs;

use clap::Parser;
use serde_json::json;
use travelsense_core::test_utils::StubScorer;
use travelsense_core::{ScorerBackend, TripPlan};

use crate::cli::{Cli, Commands, PreferenceArgs};
use crate::commands::{self, truncate, ExportOutputs};

fn beach_prefs() -> PreferenceArgs {
    PreferenceArgs {
        budget: 2000.0,
        weather: "warm".to_string(),
        activity: "beach".to_string(),
    }
}

fn write_plan(dir: &std::path::Path, plan: &TripPlan) -> std::path::PathBuf {
    let path = dir.join("plan.json");
    fs::write(&path, serde_json::to_string(plan).unwrap()).unwrap();
    path
}

fn bali_plan() -> TripPlan {
    serde_json::from_value(json!({
        "destination": "Bali",
        "budget": {
            "accommodation": 800,
            "activities": 600,
            "food": 400,
            "transportation": 200,
            "misc": 0
        },
        "start_date": "2025-06-01",
        "activities": [
            {"day": 3, "time": "14:30", "activity": "Snorkeling", "notes": "Bring fins"}
        ]
    }))
    .unwrap()
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_recommend() {
    let cli = Cli::try_parse_from([
        "travelsense",
        "recommend",
        "--budget",
        "2000",
        "--weather",
        "warm",
        "--activity",
        "beach",
        "--pdf",
        "out.pdf",
    ])
    .unwrap();

    match cli.command {
        Commands::Recommend { prefs, pdf, json } => {
            assert_eq!(prefs.budget, 2000.0);
            assert_eq!(prefs.weather, "warm");
            assert_eq!(pdf.unwrap().to_str(), Some("out.pdf"));
            assert!(!json);
        }
        _ => panic!("expected recommend"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "travelsense",
        "serve",
        "--port",
        "8080",
        "--verbose",
        "--config",
        "scorer.toml",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("scorer.toml"));
    match cli.command {
        Commands::Serve { port, host, .. } => {
            assert_eq!(port, 8080);
            assert_eq!(host, "127.0.0.1");
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_parse_recommend_requires_budget() {
    let result = Cli::try_parse_from(["travelsense", "recommend", "-w", "warm", "-a", "beach"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_rejects_unknown_preference_values() {
    let weather = Cli::try_parse_from([
        "travelsense", "recommend", "-b", "2000", "-w", "moderate", "-a", "beach",
    ]);
    assert!(weather.is_err());

    let activity = Cli::try_parse_from([
        "travelsense", "recommend", "-b", "2000", "-w", "warm", "-a", "adventure",
    ]);
    assert!(activity.is_err());

    let ok = Cli::try_parse_from([
        "travelsense", "recommend", "-b", "2000", "-w", "cool", "-a", "technology",
    ]);
    assert!(ok.is_ok());
}

// ========== Scorer Config Tests ==========

#[test]
fn test_load_scorer_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scorer.toml");
    fs::write(&path, "[scorer]\nbackend = \"mock\"\n").unwrap();

    let scorer = commands::load_scorer(Some(&path)).unwrap();
    assert_eq!(scorer.backend(), ScorerBackend::Mock);
}

// ========== Recommend Command Tests ==========

#[tokio::test]
async fn test_cmd_recommend_writes_report() {
    let stub = StubScorer::new();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("recs.pdf");

    commands::cmd_recommend(&stub.client(), &beach_prefs(), Some(&pdf), false)
        .await
        .unwrap();

    let bytes = fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert_eq!(stub.calls(), vec!["2000 warm beach"]);
}

#[tokio::test]
async fn test_cmd_recommend_invalid_prefs_skip_scorer() {
    let stub = StubScorer::new();
    let mut prefs = beach_prefs();
    prefs.weather = "  ".to_string();

    let result = commands::cmd_recommend(&stub.client(), &prefs, None, false).await;
    assert!(result.is_err());
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_cmd_recommend_scorer_failure() {
    let stub = StubScorer::new();
    stub.recommend_fails(2, "model missing");

    let err = commands::cmd_recommend(&stub.client(), &beach_prefs(), None, true)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to generate recommendations"));
}

// ========== Suggest Command Tests ==========

#[tokio::test]
async fn test_cmd_suggest() {
    let stub = StubScorer::new();

    commands::cmd_suggest(&stub.client(), "Bali", "warm", "beach", 2000.0, false)
        .await
        .unwrap();

    assert_eq!(stub.calls(), vec!["Bali warm beach 2000"]);
}

#[tokio::test]
async fn test_cmd_suggest_error_payload_is_not_fatal() {
    let stub = StubScorer::new();
    stub.suggest_json(&json!({"suggestions": [{"error": "No activities found"}]}));

    let result = commands::cmd_suggest(&stub.client(), "Bali", "warm", "ski", 500.0, false).await;
    assert!(result.is_ok());
}

// ========== Export Command Tests ==========

#[tokio::test]
async fn test_cmd_export_calendar_and_itinerary() {
    let stub = StubScorer::new();
    let dir = tempfile::tempdir().unwrap();
    let plan_path = write_plan(dir.path(), &bali_plan());

    let outputs = ExportOutputs {
        pdf: None,
        ics: Some(dir.path().join("trip.ics")),
        itinerary: Some(dir.path().join("itinerary.pdf")),
    };
    commands::cmd_export(&stub.client(), &plan_path, &beach_prefs(), &outputs)
        .await
        .unwrap();

    let ics = fs::read_to_string(dir.path().join("trip.ics")).unwrap();
    assert!(ics.contains("DTSTART:20250603T143000"));
    assert!(ics.contains("SUMMARY:Snorkeling"));
    assert!(fs::read(dir.path().join("itinerary.pdf"))
        .unwrap()
        .starts_with(b"%PDF"));

    // Neither document needs recommendations
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_cmd_export_plan_report_fetches_recommendations() {
    let stub = StubScorer::new();
    let dir = tempfile::tempdir().unwrap();
    let plan_path = write_plan(dir.path(), &bali_plan());

    let outputs = ExportOutputs {
        pdf: Some(dir.path().join("plan.pdf")),
        ..ExportOutputs::default()
    };
    commands::cmd_export(&stub.client(), &plan_path, &beach_prefs(), &outputs)
        .await
        .unwrap();

    assert!(dir.path().join("plan.pdf").exists());
    assert_eq!(stub.calls(), vec!["2000 warm beach"]);
}

#[tokio::test]
async fn test_cmd_export_calendar_without_start_date_fails() {
    let stub = StubScorer::new();
    let dir = tempfile::tempdir().unwrap();
    let mut plan = bali_plan();
    plan.start_date = None;
    let plan_path = write_plan(dir.path(), &plan);

    let outputs = ExportOutputs {
        ics: Some(dir.path().join("trip.ics")),
        ..ExportOutputs::default()
    };
    let result = commands::cmd_export(&stub.client(), &plan_path, &beach_prefs(), &outputs).await;

    assert!(result.is_err());
    assert!(!dir.path().join("trip.ics").exists());
}

#[tokio::test]
async fn test_cmd_export_requires_output() {
    let stub = StubScorer::new();
    let dir = tempfile::tempdir().unwrap();
    let plan_path = write_plan(dir.path(), &bali_plan());

    let err = commands::cmd_export(
        &stub.client(),
        &plan_path,
        &beach_prefs(),
        &ExportOutputs::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Nothing to export"));
}

#[test]
fn test_load_plan_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.json");
    fs::write(&path, "{\"destination\": 5}").unwrap();

    let err = commands::load_plan(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid trip plan"));
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Bali", 10), "Bali");
    assert_eq!(truncate("Rio de Janeiro", 8), "Rio d...");
    assert_eq!(truncate("São Paulo", 6), "São...");
}
