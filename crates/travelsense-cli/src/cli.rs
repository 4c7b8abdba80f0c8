//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use travelsense_core::PreferencesInput;

/// TravelSense - Destination recommendations and trip planning
#[derive(Parser)]
#[command(name = "travelsense")]
#[command(about = "Travel recommendations, trip plans and itinerary export", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Scorer config file (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Travel preferences shared by several commands
#[derive(Args, Debug, Clone)]
pub struct PreferenceArgs {
    /// Total trip budget
    #[arg(short, long)]
    pub budget: f64,

    /// Preferred weather
    #[arg(short, long, value_parser = ["cold", "cool", "mild", "warm"])]
    pub weather: String,

    /// Preferred activity
    #[arg(
        short,
        long,
        value_parser = ["beach", "culture", "history", "urban", "technology"]
    )]
    pub activity: String,
}

impl PreferenceArgs {
    pub fn to_input(&self) -> PreferencesInput {
        PreferencesInput {
            budget: Some(self.budget),
            weather: Some(self.weather.clone()),
            activity: Some(self.activity.clone()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static frontend files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Rank destinations for a set of preferences
    Recommend {
        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Also write the recommendation report as a PDF
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Print the raw recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest activities at a destination
    Suggest {
        /// Destination name
        #[arg(short, long)]
        destination: String,

        /// Weather the activities should suit (passed to the scorer as given)
        #[arg(short, long)]
        weather: String,

        /// Activity type to look for
        #[arg(long)]
        activity_type: String,

        /// Trip budget
        #[arg(short, long)]
        budget: f64,

        /// Print the scorer payload verbatim
        #[arg(long)]
        json: bool,
    },

    /// Export a saved trip plan as PDF and iCalendar documents
    Export {
        /// Trip plan JSON file (as returned by GET /api/plan)
        #[arg(long)]
        plan: PathBuf,

        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Write the trip plan report (fetches recommendations)
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Write the calendar feed
        #[arg(long)]
        ics: Option<PathBuf>,

        /// Write the stand-alone itinerary PDF
        #[arg(long)]
        itinerary: Option<PathBuf>,
    },
}
