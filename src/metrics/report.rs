//! Decoded analyzer output.
//!
//! An [`AnalysisReport`] keeps each file's JSON untouched; typed records are
//! decoded per file so one odd entry cannot sink the whole repository.

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// File path → that file's analyzer output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    files: BTreeMap<String, Value>,
}

impl AnalysisReport {
    /// Parse the top-level JSON object the analyzer prints.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let files = serde_json::from_str(text)?;
        Ok(Self { files })
    }

    #[must_use]
    pub fn from_files(files: BTreeMap<String, Value>) -> Self {
        Self { files }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Decode every file's entry as `T`, dropping entries that don't fit.
    #[must_use]
    pub fn records<T: DeserializeOwned>(&self) -> Vec<T> {
        self.files
            .iter()
            .filter_map(|(path, value)| match T::deserialize(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Ignoring malformed record for {path}: {e}");
                    None
                }
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for AnalysisReport {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// One function, method or class from the complexity analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplexityBlock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub complexity: Option<u64>,
}

/// A file entry of the complexity analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComplexityFile {
    Blocks(Vec<ComplexityBlock>),
    /// The analyzer could not parse the file
    Failed(Value),
}

/// A file entry of the raw line-count analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFile {
    pub loc: Option<u64>,
    pub lloc: Option<u64>,
    pub sloc: Option<u64>,
    pub comments: Option<u64>,
    pub multi: Option<u64>,
    pub blank: Option<u64>,
    pub single_comments: Option<u64>,
    pub error: Option<String>,
}

impl RawFile {
    /// Whether the file reported any line count at all.
    #[must_use]
    pub fn has_metrics(&self) -> bool {
        [
            self.loc,
            self.lloc,
            self.sloc,
            self.comments,
            self.multi,
            self.blank,
            self.single_comments,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// Aggregate Halstead measures of one file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalsteadTotal {
    pub volume: Option<f64>,
    pub difficulty: Option<f64>,
    pub effort: Option<f64>,
    pub time: Option<f64>,
    pub bugs: Option<f64>,
}

/// A file entry of the Halstead analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalsteadFile {
    pub total: Option<HalsteadTotal>,
    pub error: Option<String>,
}

/// A file entry of the maintainability analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintainabilityFile {
    pub mi: Option<f64>,
    pub rank: Option<String>,
    pub error: Option<String>,
}
