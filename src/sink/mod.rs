// src/sink/mod.rs
// =============================================================================
// Where finished records go.
//
// The crawler only talks to the Sink trait. CsvSink is the implementation the
// binary uses: one CSV per category, or one CSV per book for single-book runs.
// Sinks own file naming, including the run date suffix that keeps re-runs on
// different days from overwriting each other.
// =============================================================================

mod csv_file;

pub use csv_file::CsvSink;

use crate::error::PersistenceError;
use crate::extract::ProductRecord;
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const MAX_FILENAME_LEN: usize = 50;

pub trait Sink: Send + Sync {
    /// Writes a single record; `key` names the file. Returns the written path.
    fn save_one(
        &self,
        record: &ProductRecord,
        key: &str,
        stamp: NaiveDate,
    ) -> Result<PathBuf, PersistenceError>;

    /// Writes a category's records under `base_dir`.
    ///
    /// An empty batch writes nothing and returns `Ok(None)`.
    fn save_batch(
        &self,
        records: &[ProductRecord],
        key: &str,
        base_dir: &Path,
        stamp: NaiveDate,
    ) -> Result<Option<PathBuf>, PersistenceError>;
}

// Makes a title or category name safe to use as a file name
//
// Steps:
// 1. Drop everything that is not a word character, whitespace or '-'
// 2. Trim, then turn spaces into underscores
// 3. Keep at most 50 characters
//
// Example: "Sapiens: A Brief History" -> "Sapiens_A_Brief_History"
pub fn clean_filename(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("filename regex is valid"));

    re.replace_all(name, "")
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}
