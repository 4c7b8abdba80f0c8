//! Trip plan export command

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use travelsense_core::export;
use travelsense_core::gateway;
use travelsense_core::{ScorerClient, TripPlan};

use crate::cli::PreferenceArgs;

/// Output files requested for an export
#[derive(Debug, Default)]
pub struct ExportOutputs {
    pub pdf: Option<PathBuf>,
    pub ics: Option<PathBuf>,
    pub itinerary: Option<PathBuf>,
}

impl ExportOutputs {
    fn is_empty(&self) -> bool {
        self.pdf.is_none() && self.ics.is_none() && self.itinerary.is_none()
    }
}

/// Read a trip plan saved as JSON
pub fn load_plan(path: &Path) -> Result<TripPlan> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid trip plan in {}", path.display()))
}

pub async fn cmd_export(
    scorer: &ScorerClient,
    plan_path: &Path,
    args: &PreferenceArgs,
    outputs: &ExportOutputs,
) -> Result<()> {
    if outputs.is_empty() {
        bail!("Nothing to export: pass --pdf, --ics or --itinerary");
    }

    let prefs = args.to_input().validate()?;
    let plan = load_plan(plan_path)?;

    println!(
        "🗺️  {} ({} activities)",
        plan.destination,
        plan.activities.len()
    );

    if let Some(path) = &outputs.ics {
        let ics = export::render_calendar(&plan).context("Failed to build calendar")?;
        fs::write(path, ics).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), events = plan.activities.len(), "Wrote calendar");
        println!("   📅 Calendar: {}", path.display());
    }

    if let Some(path) = &outputs.itinerary {
        let doc = export::render_itinerary(&plan);
        doc.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), pages = doc.page_count(), "Wrote itinerary");
        println!("   📄 Itinerary: {}", path.display());
    }

    // The plan report includes the destination's recommendation card
    if let Some(path) = &outputs.pdf {
        let recommendations = gateway::recommend_for(scorer, &prefs)
            .await
            .context("Recommendation request failed")?;
        let doc = export::render_plan_report(&recommendations, &prefs, &plan);
        doc.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), pages = doc.page_count(), "Wrote plan report");
        println!("   📄 Plan report: {}", path.display());
    }

    Ok(())
}
