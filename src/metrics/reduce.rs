//! Repository-level reductions of per-file analyzer records.
//!
//! These are pure: they see only decoded records and never touch the
//! filesystem or spawn anything.

use log::{debug, warn};
use std::fmt;

use super::report::{ComplexityFile, HalsteadFile, MaintainabilityFile, RawFile};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplexitySummary {
    pub entries: usize,
    pub total: u64,
    pub average: f64,
}

/// Flatten every block of every file; average is 0 with no blocks.
pub fn reduce_complexity<'a, I>(files: I) -> ComplexitySummary
where
    I: IntoIterator<Item = &'a ComplexityFile>,
{
    let mut entries = 0usize;
    let mut total = 0u64;

    for file in files {
        let ComplexityFile::Blocks(blocks) = file else {
            debug!("Skipping complexity entry the analyzer could not parse");
            continue;
        };
        for block in blocks {
            match block.complexity {
                Some(score) => {
                    entries += 1;
                    total += score;
                }
                None => warn!(
                    "'complexity' missing for {}",
                    block.name.as_deref().unwrap_or("<unnamed block>")
                ),
            }
        }
    }

    let average = if entries > 0 {
        total as f64 / entries as f64
    } else {
        0.0
    };

    ComplexitySummary {
        entries,
        total,
        average,
    }
}

/// Line counts summed over the files that reported any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCounts {
    pub sloc: u64,
    pub lloc: u64,
    pub comments: u64,
    pub blank: u64,
    pub multi: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawAverages {
    pub sloc: f64,
    pub lloc: f64,
    pub comments: f64,
    pub blank: f64,
    pub multi: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSummary {
    pub files: usize,
    pub totals: RawCounts,
    pub averages: RawAverages,
}

/// Missing fields count as 0; files with no line counts at all are left out.
pub fn reduce_raw<'a, I>(files: I) -> RawSummary
where
    I: IntoIterator<Item = &'a RawFile>,
{
    let mut count = 0usize;
    let mut totals = RawCounts::default();

    for file in files.into_iter().filter(|f| f.has_metrics()) {
        count += 1;
        totals.sloc += file.sloc.unwrap_or(0);
        totals.lloc += file.lloc.unwrap_or(0);
        totals.comments += file.comments.unwrap_or(0);
        totals.blank += file.blank.unwrap_or(0);
        totals.multi += file.multi.unwrap_or(0);
    }

    let per_file = |total: u64| {
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    };

    RawSummary {
        files: count,
        totals,
        averages: RawAverages {
            sloc: per_file(totals.sloc),
            lloc: per_file(totals.lloc),
            comments: per_file(totals.comments),
            blank: per_file(totals.blank),
            multi: per_file(totals.multi),
        },
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalsteadMeasures {
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub time: f64,
    pub bugs: f64,
}

impl HalsteadMeasures {
    fn scaled(self, divisor: f64) -> Self {
        Self {
            volume: self.volume / divisor,
            difficulty: self.difficulty / divisor,
            effort: self.effort / divisor,
            time: self.time / divisor,
            bugs: self.bugs / divisor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalsteadSummary {
    pub reporting_files: usize,
    /// Files without a `total` section
    pub files_ignored: usize,
    pub totals: HalsteadMeasures,
    pub averages: HalsteadMeasures,
}

/// With no reporting files the averages are the totals (all zero).
pub fn reduce_halstead<'a, I>(files: I) -> HalsteadSummary
where
    I: IntoIterator<Item = &'a HalsteadFile>,
{
    let mut summary = HalsteadSummary::default();

    for file in files {
        let Some(total) = &file.total else {
            summary.files_ignored += 1;
            continue;
        };
        let (Some(volume), Some(difficulty), Some(effort), Some(time), Some(bugs)) = (
            total.volume,
            total.difficulty,
            total.effort,
            total.time,
            total.bugs,
        ) else {
            warn!("Halstead total is missing measures, leaving the file out");
            continue;
        };

        summary.reporting_files += 1;
        summary.totals.volume += volume;
        summary.totals.difficulty += difficulty;
        summary.totals.effort += effort;
        summary.totals.time += time;
        summary.totals.bugs += bugs;
    }

    summary.averages = if summary.reporting_files > 0 {
        summary.totals.scaled(summary.reporting_files as f64)
    } else {
        summary.totals
    };
    summary
}

/// Repository maintainability index, or the marker for a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaintainabilityIndex {
    Average(f64),
    Error,
}

impl fmt::Display for MaintainabilityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average(value) => write!(f, "{value}"),
            Self::Error => f.write_str("Error"),
        }
    }
}

/// Mean of the reported indices, 0 when no file reported one.
pub fn reduce_maintainability<'a, I>(files: I) -> MaintainabilityIndex
where
    I: IntoIterator<Item = &'a MaintainabilityFile>,
{
    let scores: Vec<f64> = files.into_iter().filter_map(|f| f.mi).collect();
    if scores.is_empty() {
        MaintainabilityIndex::Average(0.0)
    } else {
        MaintainabilityIndex::Average(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Coarse grade from average cyclomatic complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityGrade {
    A,
    B,
    C,
}

impl ComplexityGrade {
    #[must_use]
    pub fn from_average(average: f64) -> Self {
        if average < 5.0 {
            Self::A
        } else if average < 10.0 {
            Self::B
        } else {
            Self::C
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for ComplexityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
