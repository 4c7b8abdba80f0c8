//! Test utilities for travelsense-core
//!
//! Stub scorer scripts in a temporary directory, run through the real
//! subprocess scorer with `sh`. Each script appends its arguments to
//! `calls.log` before answering.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

use crate::config::{ScorerBackend, ScorerConfig};
use crate::scorer::{default_recommendations, default_suggestions, ProcessScorer, ScorerClient};

const RECOMMEND_SCRIPT: &str = "recommend.sh";
const SUGGEST_SCRIPT: &str = "suggest.sh";
const CALL_LOG: &str = "calls.log";

/// Directory of stub scorer scripts
pub struct StubScorer {
    dir: TempDir,
}

impl StubScorer {
    /// Stubs answering with the canned Bali recommendation and suggestions
    pub fn new() -> Self {
        let stub = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        stub.recommend_json(&default_recommendations());
        stub.suggest_json(&default_suggestions());
        stub
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Make the recommend script print `document`
    pub fn recommend_json(&self, document: &Value) {
        self.write(RECOMMEND_SCRIPT, &print_body(&document.to_string()));
    }

    /// Make the suggest script print `document`
    pub fn suggest_json(&self, document: &Value) {
        self.write(SUGGEST_SCRIPT, &print_body(&document.to_string()));
    }

    /// Make the recommend script write `stderr` and exit with `code`
    pub fn recommend_fails(&self, code: i32, stderr: &str) {
        self.write(RECOMMEND_SCRIPT, &fail_body(code, stderr));
    }

    /// Make the suggest script write `stderr` and exit with `code`
    pub fn suggest_fails(&self, code: i32, stderr: &str) {
        self.write(SUGGEST_SCRIPT, &fail_body(code, stderr));
    }

    /// Replace the recommend script body verbatim
    pub fn recommend_raw(&self, body: &str) {
        self.write(RECOMMEND_SCRIPT, &format!("{}{}", log_line(), body));
    }

    pub fn scorer(&self) -> ProcessScorer {
        ProcessScorer::new("sh", self.path()).with_scripts(RECOMMEND_SCRIPT, SUGGEST_SCRIPT)
    }

    pub fn client(&self) -> ScorerClient {
        ScorerClient::Process(self.scorer())
    }

    pub fn config(&self) -> ScorerConfig {
        ScorerConfig {
            backend: ScorerBackend::Process,
            program: "sh".to_string(),
            scripts_dir: self.path().to_path_buf(),
            recommend_script: RECOMMEND_SCRIPT.to_string(),
            suggest_script: SUGGEST_SCRIPT.to_string(),
            ..ScorerConfig::default()
        }
    }

    /// Argument lists the scripts were invoked with, oldest first
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path().join(CALL_LOG))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    fn write(&self, name: &str, body: &str) {
        fs::write(self.path().join(name), body).unwrap();
    }
}

impl Default for StubScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn log_line() -> String {
    format!("printf '%s\\n' \"$*\" >> {}\n", CALL_LOG)
}

fn print_body(stdout: &str) -> String {
    format!("{}cat <<'TRAVELSENSE_EOF'\n{}\nTRAVELSENSE_EOF\n", log_line(), stdout)
}

fn fail_body(code: i32, stderr: &str) -> String {
    format!(
        "{}cat >&2 <<'TRAVELSENSE_EOF'\n{}\nTRAVELSENSE_EOF\nexit {}\n",
        log_line(),
        stderr,
        code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{Scorer, ScorerCall};

    #[tokio::test]
    async fn test_stub_answers_and_logs_calls() {
        let stub = StubScorer::new();
        let call = ScorerCall::suggest("Bali", "warm", "beach", 2000.0);
        let output = stub.scorer().invoke(&call).await.unwrap();

        assert!(output.success());
        let json: Value = serde_json::from_str(&output.stdout).unwrap();
        assert_eq!(json, default_suggestions());
        assert_eq!(stub.calls(), vec!["Bali warm beach 2000"]);
    }

    #[tokio::test]
    async fn test_stub_failure() {
        let stub = StubScorer::new();
        stub.recommend_fails(2, "model.pkl not found");
        let call = ScorerCall::Recommend {
            budget: "2000".into(),
            weather: "warm".into(),
            activity: "beach".into(),
        };
        let output = stub.scorer().invoke(&call).await.unwrap();

        assert_eq!(output.exit_code, Some(2));
        assert!(output.diagnostics.contains("model.pkl not found"));
    }
}
