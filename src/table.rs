//! Append-only CSV tables.
//!
//! Every append opens the file, writes one record and closes it again, so an
//! interrupted batch loses at most the row in flight. The header goes in only
//! when the file is empty.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type TableResult<T> = Result<T, TableError>;

fn open_append(path: &Path) -> TableResult<(File, bool)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_empty = file.metadata()?.len() == 0;
    Ok((file, is_empty))
}

/// Append one serde record; field names become the header.
pub fn append_serialized<T: Serialize>(path: &Path, row: &T) -> TableResult<()> {
    let (file, is_empty) = open_append(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(is_empty)
        .from_writer(file);
    wtr.serialize(row)?;
    wtr.flush()?;
    Ok(())
}

/// Append one plain record, writing `header` first if the file is empty.
pub fn append_record<I, F>(path: &Path, header: &[&str], record: I) -> TableResult<()>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let (file, is_empty) = open_append(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_empty {
        wtr.write_record(header)?;
    }
    wtr.write_record(record)?;
    wtr.flush()?;
    Ok(())
}

/// Open a headed table for reading; ragged rows are tolerated.
pub fn reader(path: &Path) -> TableResult<csv::Reader<File>> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}
