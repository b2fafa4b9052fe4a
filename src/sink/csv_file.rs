// src/sink/csv_file.rs
// =============================================================================
// CSV output.
//
// Files are ';'-delimited and start with a UTF-8 byte order mark, so that
// spreadsheet programs open accented titles and the '£' sign correctly.
//
// Layout:
//   <single_dir>/<Title>_<date>.csv                    (one book)
//   <base_dir>/<Category>/<Category>_<date>.csv        (one category)
// =============================================================================

use super::{clean_filename, Sink};
use crate::error::PersistenceError;
use crate::extract::ProductRecord;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITER: u8 = b';';

#[derive(Debug, Clone)]
pub struct CsvSink {
    single_dir: PathBuf,
}

impl CsvSink {
    pub fn new(single_dir: impl Into<PathBuf>) -> Self {
        Self {
            single_dir: single_dir.into(),
        }
    }
}

impl Sink for CsvSink {
    fn save_one(
        &self,
        record: &ProductRecord,
        key: &str,
        stamp: NaiveDate,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.single_dir.join(dated_name(key, stamp));
        write_csv(&path, std::slice::from_ref(record))?;
        Ok(path)
    }

    fn save_batch(
        &self,
        records: &[ProductRecord],
        key: &str,
        base_dir: &Path,
        stamp: NaiveDate,
    ) -> Result<Option<PathBuf>, PersistenceError> {
        if records.is_empty() {
            debug!(category = key, "empty batch, nothing written");
            return Ok(None);
        }

        let path = base_dir.join(clean_filename(key)).join(dated_name(key, stamp));
        write_csv(&path, records)?;
        Ok(Some(path))
    }
}

fn dated_name(key: &str, stamp: NaiveDate) -> String {
    format!("{}_{}.csv", clean_filename(key), stamp.format("%Y-%m-%d"))
}

fn write_csv(path: &Path, records: &[ProductRecord]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::from_io(parent, e))?;
    }

    let mut file = File::create(path).map_err(|e| PersistenceError::from_io(path, e))?;
    file.write_all(UTF8_BOM)
        .map_err(|e| PersistenceError::from_io(path, e))?;

    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| PersistenceError::from_io(path, e))?;

    Ok(())
}
