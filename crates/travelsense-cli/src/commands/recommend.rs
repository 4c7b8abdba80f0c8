//! Recommendation and suggestion commands

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use travelsense_core::export;
use travelsense_core::gateway::{self, SuggestionRequest};
use travelsense_core::ScorerClient;

use super::truncate;
use crate::cli::PreferenceArgs;

pub async fn cmd_recommend(
    scorer: &ScorerClient,
    args: &PreferenceArgs,
    pdf: Option<&Path>,
    json: bool,
) -> Result<()> {
    let prefs = args.to_input().validate()?;

    let recommendations = gateway::recommend_for(scorer, &prefs)
        .await
        .context("Recommendation request failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else if recommendations.is_empty() {
        println!("No destinations matched your preferences.");
    } else {
        println!("🧭 Recommended destinations\n");
        for (i, rec) in recommendations.iter().enumerate() {
            let card = rec.card();
            println!(
                "  {:>2}. {:<24} {:>7}   {}",
                i + 1,
                truncate(&card.destination, 24),
                card.match_score,
                card.budget
            );
        }
    }

    if let Some(path) = pdf {
        let doc = export::render_report(&recommendations, &prefs, None);
        doc.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), pages = doc.page_count(), "Wrote recommendation report");
        println!("\n📄 Report saved to {}", path.display());
    }

    Ok(())
}

pub async fn cmd_suggest(
    scorer: &ScorerClient,
    destination: &str,
    weather: &str,
    activity_type: &str,
    budget: f64,
    json: bool,
) -> Result<()> {
    let request = SuggestionRequest {
        destination: destination.to_string(),
        weather: weather.to_string(),
        activity_type: activity_type.to_string(),
        budget,
    };

    let payload = gateway::suggest(scorer, &request)
        .await
        .context("Suggestion request failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let suggestions = payload.suggestions();
    if suggestions.is_empty() {
        println!("No activity suggestions for {}.", destination);
        return Ok(());
    }

    println!("🎯 Suggested activities in {}\n", destination);
    for s in &suggestions {
        println!("  • {}", s.destination_specific);
        println!(
            "      {} | best {} | ~${:.0} | score {:.0}%",
            s.duration,
            s.best_time,
            s.estimated_cost,
            s.score * 100.0
        );
    }

    Ok(())
}
