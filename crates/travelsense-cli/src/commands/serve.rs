//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use travelsense_core::{Scorer, ScorerClient};

pub async fn cmd_serve(
    scorer: ScorerClient,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting TravelSense web server...");
    println!("   Scorer: {}", scorer.describe());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Extra CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("TRAVELSENSE_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (TRAVELSENSE_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;

    let config = travelsense_server::ServerConfig { allowed_origins };
    travelsense_server::serve_with_config(scorer, host, port, static_dir_str, config).await?;

    Ok(())
}
