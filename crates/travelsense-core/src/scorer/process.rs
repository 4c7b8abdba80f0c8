//! Subprocess-backed scorer
//!
//! Runs `<program> <script> <args...>` inside the scripts directory and
//! collects stdout/stderr once the process exits.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::ScorerConfig;
use crate::error::{Error, Result};

use super::{Scorer, ScorerCall, ScorerOutput};

/// Scorer that spawns the external scripts
#[derive(Debug, Clone)]
pub struct ProcessScorer {
    program: String,
    scripts_dir: PathBuf,
    recommend_script: String,
    suggest_script: String,
    timeout: Duration,
}

impl ProcessScorer {
    pub fn new(program: &str, scripts_dir: impl Into<PathBuf>) -> Self {
        let defaults = ScorerConfig::default();
        Self {
            program: program.to_string(),
            scripts_dir: scripts_dir.into(),
            recommend_script: defaults.recommend_script,
            suggest_script: defaults.suggest_script,
            timeout: defaults.timeout,
        }
    }

    pub fn from_config(config: &ScorerConfig) -> Self {
        Self {
            program: config.program.clone(),
            scripts_dir: config.scripts_dir.clone(),
            recommend_script: config.recommend_script.clone(),
            suggest_script: config.suggest_script.clone(),
            timeout: config.timeout,
        }
    }

    pub fn with_scripts(mut self, recommend: &str, suggest: &str) -> Self {
        self.recommend_script = recommend.to_string();
        self.suggest_script = suggest.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn script_for(&self, call: &ScorerCall) -> &str {
        match call {
            ScorerCall::Recommend { .. } => &self.recommend_script,
            ScorerCall::Suggest { .. } => &self.suggest_script,
        }
    }
}

#[async_trait]
impl Scorer for ProcessScorer {
    async fn invoke(&self, call: &ScorerCall) -> Result<ScorerOutput> {
        let script = self.script_for(call);
        let args = call.args();
        let start = Instant::now();

        info!(
            call = call.name(),
            program = %self.program,
            script = %script,
            dir = %self.scripts_dir.display(),
            "Running scorer"
        );

        let child = Command::new(&self.program)
            .arg(script)
            .args(&args)
            .current_dir(&self.scripts_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, program = %self.program, "Failed to start scorer");
                return Err(Error::upstream(
                    format!("Failed to start {} script", call.name()),
                    e.to_string(),
                ));
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Scorer timed out");
                return Err(Error::upstream(
                    format!("The {} script timed out", call.name()),
                    format!("no result after {}s", self.timeout.as_secs()),
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        let result = ScorerOutput::from_streams(output.status.code(), stdout, &stderr);

        debug!(
            call = call.name(),
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            debug_markers = result.debug_markers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Scorer finished"
        );

        Ok(result)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.program, self.scripts_dir.display())
    }
}
