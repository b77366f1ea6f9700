//! Code-quality metrics pipeline.
//!
//! Reads the discovery table, materializes each repository, runs the four
//! analyses and appends one summary row per repository to the output table.
//! Individual repositories never abort the batch.

mod analyzer;
mod checkout;
mod config;
mod reduce;
mod report;
mod summary;

pub use analyzer::{AnalysisKind, Analyzer, AnalyzerError, RadonAnalyzer};
pub use checkout::{CheckoutError, GitCheckout, VersionControl, checkout_dir, materialize};
pub use config::MetricsConfig;
pub use reduce::{
    ComplexityGrade, ComplexitySummary, HalsteadMeasures, HalsteadSummary, MaintainabilityIndex,
    RawAverages, RawCounts, RawSummary, reduce_complexity, reduce_halstead,
    reduce_maintainability, reduce_raw,
};
pub use report::{
    AnalysisReport, ComplexityBlock, ComplexityFile, HalsteadFile, HalsteadTotal,
    MaintainabilityFile, RawFile,
};
pub use summary::{
    NOT_AVAILABLE, RepositoryReports, RepositorySummaryRow, SUMMARY_COLUMNS, SummaryRecord,
};

use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::github::search_repositories::RepositoryDescriptor;
use crate::table::{self, TableError};

/// Fatal metrics errors: only the tables themselves can stop a run.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Failed to append to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

pub type MetricsResult<T> = Result<T, MetricsError>;

/// What happened to one repository.
#[derive(Debug)]
pub enum RepositoryOutcome {
    Summarized(Box<RepositorySummaryRow>),
    /// Complexity analysis failed or found no files
    Placeholder,
    /// Clone or update failed; nothing is written by default
    Skipped(CheckoutError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsRunStats {
    pub rows_read: usize,
    pub summarized: usize,
    pub placeholders: usize,
    pub skipped: usize,
}

/// Metrics pipeline over a version-control client and an analyzer.
pub struct MetricsPipeline<V, A> {
    vcs: V,
    analyzer: A,
    config: MetricsConfig,
}

impl MetricsPipeline<GitCheckout, RadonAnalyzer> {
    /// Pipeline backed by gix/git and radon as configured.
    #[must_use]
    pub fn from_config(config: MetricsConfig) -> Self {
        Self::new(
            GitCheckout::new(&config.git_program),
            RadonAnalyzer::new(&config.analyzer_program),
            config,
        )
    }
}

impl<V: VersionControl, A: Analyzer> MetricsPipeline<V, A> {
    pub fn new(vcs: V, analyzer: A, config: MetricsConfig) -> Self {
        Self {
            vcs,
            analyzer,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    #[must_use]
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    #[must_use]
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Process every row of the input table.
    pub async fn run(&self) -> MetricsResult<MetricsRunStats> {
        let input = &self.config.input;
        let rows = read_descriptors(input).map_err(|source| MetricsError::Input {
            path: input.clone(),
            source,
        })?;

        let mut stats = MetricsRunStats {
            rows_read: rows.len(),
            ..MetricsRunStats::default()
        };
        info!("Processing {} repositories from {}", rows.len(), input.display());

        for (index, row) in rows.into_iter().enumerate() {
            let record = match row {
                Ok(descriptor) => match self.process_repository(&descriptor).await {
                    RepositoryOutcome::Summarized(summary) => {
                        stats.summarized += 1;
                        Some(SummaryRecord::Complete(summary))
                    }
                    RepositoryOutcome::Placeholder => {
                        stats.placeholders += 1;
                        Some(SummaryRecord::Placeholder)
                    }
                    RepositoryOutcome::Skipped(e) => {
                        warn!("Skipping {}: {e}", descriptor.name);
                        stats.skipped += 1;
                        if self.config.placeholder_on_checkout_failure {
                            Some(SummaryRecord::Placeholder)
                        } else {
                            None
                        }
                    }
                },
                Err(e) => {
                    warn!("Row {} of {} is unreadable: {e}", index + 1, input.display());
                    stats.placeholders += 1;
                    Some(SummaryRecord::Placeholder)
                }
            };

            if let Some(record) = record {
                self.append(&record)?;
            }
        }

        info!(
            "Metrics finished: {} summarized, {} placeholders, {} skipped of {} rows",
            stats.summarized, stats.placeholders, stats.skipped, stats.rows_read
        );
        Ok(stats)
    }

    /// Materialize, analyze and reduce one repository.
    pub async fn process_repository(&self, descriptor: &RepositoryDescriptor) -> RepositoryOutcome {
        let dir = match materialize(
            &self.vcs,
            &self.config.checkout_root,
            descriptor,
            self.config.vcs_timeout(),
        )
        .await
        {
            Ok(dir) => dir,
            Err(e) => return RepositoryOutcome::Skipped(e),
        };

        info!("Extracting repo {}", dir.display());

        // Complexity gates everything else; an empty report means no source was found
        let complexity = match self.analyze(AnalysisKind::Complexity, &dir).await {
            Some(report) if !report.is_empty() => report,
            Some(_) => {
                warn!("No complexity data for {}", dir.display());
                return RepositoryOutcome::Placeholder;
            }
            None => return RepositoryOutcome::Placeholder,
        };

        let reports = RepositoryReports {
            complexity,
            raw: self.analyze(AnalysisKind::Raw, &dir).await,
            halstead: self.analyze(AnalysisKind::Halstead, &dir).await,
            maintainability: self.analyze(AnalysisKind::Maintainability, &dir).await,
        };

        RepositoryOutcome::Summarized(Box::new(RepositorySummaryRow::summarize(
            descriptor, &reports,
        )))
    }

    async fn analyze(&self, kind: AnalysisKind, dir: &Path) -> Option<AnalysisReport> {
        let timeout = self.config.analysis_timeout();
        match tokio::time::timeout(timeout, self.analyzer.analyze(kind, dir)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                warn!("Error getting {kind} for {}: {e}", dir.display());
                None
            }
            Err(_) => {
                warn!(
                    "{}",
                    AnalyzerError::Timeout {
                        kind,
                        duration: timeout
                    }
                );
                None
            }
        }
    }

    fn append(&self, record: &SummaryRecord) -> MetricsResult<()> {
        table::append_record(&self.config.output, &SUMMARY_COLUMNS, record.to_record()).map_err(
            |source| MetricsError::Output {
                path: self.config.output.clone(),
                source,
            },
        )
    }
}

fn read_descriptors(
    path: &Path,
) -> Result<Vec<Result<RepositoryDescriptor, csv::Error>>, TableError> {
    let mut rdr = table::reader(path)?;
    let rows: Vec<_> = rdr.deserialize().collect();
    Ok(rows)
}
