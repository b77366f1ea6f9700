//! Configuration for metrics runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Discovery table to read
    pub input: PathBuf,
    /// Summary table to append to
    pub output: PathBuf,
    /// Checkouts live at `<checkout_root>/<owner>/<repo>`
    pub checkout_root: PathBuf,
    pub vcs_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    pub analyzer_program: PathBuf,
    pub git_program: PathBuf,
    /// Write a placeholder row instead of nothing when clone/pull fails
    pub placeholder_on_checkout_failure: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("repo_info.csv"),
            output: PathBuf::from("repo_calcs.csv"),
            checkout_root: PathBuf::from("temp_repos"),
            vcs_timeout_secs: 90,
            analysis_timeout_secs: 30,
            analyzer_program: PathBuf::from("radon"),
            git_program: PathBuf::from("git"),
            placeholder_on_checkout_failure: false,
        }
    }
}

impl MetricsConfig {
    #[must_use]
    pub fn vcs_timeout(&self) -> Duration {
        Duration::from_secs(self.vcs_timeout_secs)
    }

    #[must_use]
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}
