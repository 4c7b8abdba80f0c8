//! TravelSense CLI - Travel recommendations and trip planning
//!
//! Usage:
//!   travelsense serve --port 3000                                Start web server
//!   travelsense recommend -b 2000 -w warm -a beach               Rank destinations
//!   travelsense suggest -d Bali -w warm --activity-type beach -b 2000
//!   travelsense export --plan plan.json -b 2000 -w warm -a beach --ics trip.ics

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let scorer = commands::load_scorer(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(scorer, &host, port, static_dir.as_deref()).await,
        Commands::Recommend { prefs, pdf, json } => {
            commands::cmd_recommend(&scorer, &prefs, pdf.as_deref(), json).await
        }
        Commands::Suggest {
            destination,
            weather,
            activity_type,
            budget,
            json,
        } => {
            commands::cmd_suggest(&scorer, &destination, &weather, &activity_type, budget, json)
                .await
        }
        Commands::Export {
            plan,
            prefs,
            pdf,
            ics,
            itinerary,
        } => {
            let outputs = commands::ExportOutputs {
                pdf,
                ics,
                itinerary,
            };
            commands::cmd_export(&scorer, &plan, &prefs, &outputs).await
        }
    }
}
