//! Scorer configuration
//!
//! Config is loaded with a three-layer resolution:
//! 1. Embedded defaults (compiled into binary)
//! 2. Override file (explicit path, or ~/.local/share/travelsense/config/scorer.toml)
//! 3. Environment variables:
//!    - `TRAVELSENSE_SCORER_BACKEND`: process or mock
//!    - `TRAVELSENSE_SCORER_PROGRAM`: interpreter (default: python3)
//!    - `TRAVELSENSE_SCRIPTS_DIR`: directory containing the scorer scripts
//!    - `TRAVELSENSE_SCORER_TIMEOUT_SECS`: per-call timeout

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/scorer.toml");

/// Which scorer implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    /// Spawn the external scripts
    Process,
    /// Canned responses, no subprocess
    Mock,
}

impl ScorerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for ScorerBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "process" | "script" | "python" => Ok(Self::Process),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown scorer backend: {}", s)),
        }
    }
}

/// Settings for invoking the external scorer
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub backend: ScorerBackend,
    /// Interpreter used to run the scripts
    pub program: String,
    /// Script directory, also the working directory of the subprocess
    pub scripts_dir: PathBuf,
    pub recommend_script: String,
    pub suggest_script: String,
    pub timeout: Duration,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            backend: ScorerBackend::Process,
            program: "python3".to_string(),
            scripts_dir: PathBuf::from("scripts"),
            recommend_script: "recommend.py".to_string(),
            suggest_script: "suggest_activities.py".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ScorerConfig {
    /// Load config from defaults, the override file and the environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_file(override_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `TRAVELSENSE_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(backend) = std::env::var("TRAVELSENSE_SCORER_BACKEND") {
            match backend.parse() {
                Ok(b) => self.backend = b,
                Err(e) => warn!(error = %e, "Ignoring TRAVELSENSE_SCORER_BACKEND"),
            }
        }
        if let Some(program) = std::env::var("TRAVELSENSE_SCORER_PROGRAM")
            .ok()
            .filter(|s| !s.is_empty())
        {
            self.program = program;
        }
        if let Some(dir) = std::env::var("TRAVELSENSE_SCRIPTS_DIR")
            .ok()
            .filter(|s| !s.is_empty())
        {
            self.scripts_dir = PathBuf::from(dir);
        }
        if let Some(secs) = std::env::var("TRAVELSENSE_SCORER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout = Duration::from_secs(secs);
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("travelsense").join("config").join("scorer.toml"))
}

/// Load configuration (override first, then default)
fn load_file(override_path: Option<&Path>) -> Result<ScorerConfig> {
    let path = match override_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref p) if p.exists() => {
            debug!(path = %p.display(), "Loading scorer config override");
            fs::read_to_string(p)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        Some(ref p) if override_path.is_some() => {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    scorer: Option<RawScorer>,
}

#[derive(Debug, Deserialize)]
struct RawScorer {
    backend: Option<String>,
    program: Option<String>,
    scripts_dir: Option<String>,
    recommend_script: Option<String>,
    suggest_script: Option<String>,
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<ScorerConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ScorerConfig::default();

    if let Some(scorer) = raw.scorer {
        if let Some(backend) = scorer.backend {
            config.backend = backend.parse().map_err(Error::Config)?;
        }
        if let Some(program) = scorer.program {
            config.program = program;
        }
        if let Some(dir) = scorer.scripts_dir {
            config.scripts_dir = PathBuf::from(dir);
        }
        if let Some(script) = scorer.recommend_script {
            config.recommend_script = script;
        }
        if let Some(script) = scorer.suggest_script {
            config.suggest_script = script;
        }
        if let Some(secs) = scorer.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
    }

    Ok(config)
}
