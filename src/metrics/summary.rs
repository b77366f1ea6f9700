//! Per-repository summary rows of the metrics table.

use crate::github::search_repositories::RepositoryDescriptor;

use super::reduce::{
    ComplexityGrade, ComplexitySummary, HalsteadSummary, MaintainabilityIndex, RawSummary,
    reduce_complexity, reduce_halstead, reduce_maintainability, reduce_raw,
};
use super::report::{
    AnalysisReport, ComplexityFile, HalsteadFile, MaintainabilityFile, RawFile,
};

/// Output columns, in write order.
pub const SUMMARY_COLUMNS: [&str; 20] = [
    "URL",
    "Repository",
    "Stars",
    "Forks",
    "Search_by",
    "Search_order",
    "avg_cc",
    "total_cc",
    "Avg_halstead_volume",
    "avg_halstead_difficulty",
    "avg_halstead_effort",
    "avg_halstead_time",
    "avg_halstead_bugs",
    "files_ignored",
    "avg_sloc",
    "avg_lloc",
    "avg_comments",
    "avg_blank_lines",
    "maintainability_index",
    "cc_grade",
];

/// Cell value used throughout a placeholder row.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySummaryRow {
    pub url: String,
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub search_by: String,
    pub search_order: String,
    pub complexity: ComplexitySummary,
    pub halstead: HalsteadSummary,
    pub raw: RawSummary,
    pub maintainability: MaintainabilityIndex,
    pub grade: ComplexityGrade,
}

/// The four analyzer outputs of one checkout. Only complexity is mandatory.
#[derive(Debug, Clone, Default)]
pub struct RepositoryReports {
    pub complexity: AnalysisReport,
    pub raw: Option<AnalysisReport>,
    pub halstead: Option<AnalysisReport>,
    pub maintainability: Option<AnalysisReport>,
}

impl RepositorySummaryRow {
    /// Reduce the analyzer output of one repository into its summary row.
    ///
    /// Missing raw or Halstead output reduces to zeros; missing or empty
    /// maintainability output becomes [`MaintainabilityIndex::Error`].
    #[must_use]
    pub fn summarize(descriptor: &RepositoryDescriptor, reports: &RepositoryReports) -> Self {
        let complexity = reduce_complexity(&reports.complexity.records::<ComplexityFile>());

        let raw = reports
            .raw
            .as_ref()
            .map(|r| reduce_raw(&r.records::<RawFile>()))
            .unwrap_or_default();

        let halstead = reports
            .halstead
            .as_ref()
            .map(|r| reduce_halstead(&r.records::<HalsteadFile>()))
            .unwrap_or_default();

        let maintainability = match &reports.maintainability {
            Some(report) if !report.is_empty() => {
                reduce_maintainability(&report.records::<MaintainabilityFile>())
            }
            _ => MaintainabilityIndex::Error,
        };

        Self {
            url: descriptor.url.clone(),
            name: descriptor.name.clone(),
            stars: descriptor.stars,
            forks: descriptor.forks,
            search_by: descriptor.searched_by.clone(),
            search_order: descriptor.order.clone(),
            grade: ComplexityGrade::from_average(complexity.average),
            complexity,
            halstead,
            raw,
            maintainability,
        }
    }

    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.url.clone(),
            self.name.clone(),
            self.stars.to_string(),
            self.forks.to_string(),
            self.search_by.clone(),
            self.search_order.clone(),
            self.complexity.average.to_string(),
            self.complexity.total.to_string(),
            self.halstead.averages.volume.to_string(),
            self.halstead.averages.difficulty.to_string(),
            self.halstead.averages.effort.to_string(),
            self.halstead.averages.time.to_string(),
            self.halstead.averages.bugs.to_string(),
            self.halstead.files_ignored.to_string(),
            self.raw.averages.sloc.to_string(),
            self.raw.averages.lloc.to_string(),
            self.raw.averages.comments.to_string(),
            self.raw.averages.blank.to_string(),
            self.maintainability.to_string(),
            self.grade.to_string(),
        ]
    }
}

/// What gets appended for one repository.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryRecord {
    Complete(Box<RepositorySummaryRow>),
    /// Complexity data was unavailable
    Placeholder,
}

impl SummaryRecord {
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        match self {
            Self::Complete(row) => row.to_record(),
            Self::Placeholder => vec![NOT_AVAILABLE.to_string(); SUMMARY_COLUMNS.len()],
        }
    }
}
