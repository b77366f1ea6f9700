//! External static-analysis tool invocation.

use log::debug;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use super::report::AnalysisReport;

/// The four analyzer modes the metrics pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Complexity,
    Raw,
    Halstead,
    Maintainability,
}

impl AnalysisKind {
    /// Subcommand understood by radon.
    #[must_use]
    pub const fn subcommand(&self) -> &'static str {
        match self {
            Self::Complexity => "cc",
            Self::Raw => "raw",
            Self::Halstead => "hal",
            Self::Maintainability => "mi",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Complexity => "cyclomatic complexity",
            Self::Raw => "raw metrics",
            Self::Halstead => "Halstead metrics",
            Self::Maintainability => "maintainability index",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} analysis exited with {status}: {stderr}")]
    Exit {
        kind: AnalysisKind,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{kind} analysis timed out after {duration:?}")]
    Timeout {
        kind: AnalysisKind,
        duration: std::time::Duration,
    },

    #[error("{kind} analysis produced invalid JSON: {source}")]
    Decode {
        kind: AnalysisKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that can analyze a checkout directory.
pub trait Analyzer: Send + Sync {
    fn analyze(
        &self,
        kind: AnalysisKind,
        dir: &Path,
    ) -> impl Future<Output = Result<AnalysisReport, AnalyzerError>> + Send;
}

/// Runs `radon <mode> <dir> --json`.
#[derive(Debug, Clone)]
pub struct RadonAnalyzer {
    program: PathBuf,
}

impl RadonAnalyzer {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for RadonAnalyzer {
    fn default() -> Self {
        Self::new("radon")
    }
}

impl Analyzer for RadonAnalyzer {
    async fn analyze(
        &self,
        kind: AnalysisKind,
        dir: &Path,
    ) -> Result<AnalysisReport, AnalyzerError> {
        debug!("Running {} {} on {}", self.program.display(), kind.subcommand(), dir.display());

        let output = Command::new(&self.program)
            .arg(kind.subcommand())
            .arg(dir)
            .arg("--json")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AnalyzerError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(AnalyzerError::Exit {
                kind,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        AnalysisReport::from_json(&String::from_utf8_lossy(&output.stdout))
            .map_err(|source| AnalyzerError::Decode { kind, source })
    }
}
