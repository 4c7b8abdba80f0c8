//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `export` - Trip plan documents (plan report, itinerary, calendar)
//! - `recommend` - Recommendation and suggestion commands
//! - `serve` - Web server command

pub mod export;
pub mod recommend;
pub mod serve;

// Re-export command functions for main.rs
pub use export::*;
pub use recommend::*;
pub use serve::*;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use travelsense_core::{Scorer, ScorerClient, ScorerConfig};

/// Resolve the scorer configuration and build a client from it
pub fn load_scorer(config_path: Option<&Path>) -> Result<ScorerClient> {
    let config = ScorerConfig::load(config_path).context("Failed to load scorer config")?;
    let scorer = ScorerClient::from_config(&config);
    debug!(scorer = %scorer.describe(), "Scorer ready");
    Ok(scorer)
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
