//! Duplicate-row removal for result tables.

use csv::StringRecord;
use log::info;
use std::collections::HashSet;
use std::path::Path;

use crate::table::{self, TableResult};

/// Row counts before and after deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupStats {
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Keep the first record for each value of `key_column`, in input order.
///
/// Records too short to have the key column are keyed by the empty string.
#[must_use]
pub fn dedup_records<I>(records: I, key_column: usize) -> Vec<StringRecord>
where
    I: IntoIterator<Item = StringRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.get(key_column).unwrap_or("").to_string()))
        .collect()
}

/// Rewrite `input` into `output` without later duplicates of `key_column`.
///
/// The header row is kept; `output` is overwritten.
pub fn dedup_table(input: &Path, output: &Path, key_column: usize) -> TableResult<DedupStats> {
    let mut rdr = table::reader(input)?;
    let header = rdr.headers()?.clone();
    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
    let rows_in = records.len();

    let kept = dedup_records(records, key_column);

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output)?;
    wtr.write_record(&header)?;
    for record in &kept {
        wtr.write_record(record)?;
    }
    wtr.flush()?;

    let stats = DedupStats {
        rows_in,
        rows_out: kept.len(),
    };
    info!(
        "Removed {} duplicate rows from {} ({} kept)",
        stats.rows_in - stats.rows_out,
        input.display(),
        stats.rows_out
    );
    Ok(stats)
}
