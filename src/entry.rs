//! Defines the [`Entry`] type and the logic for finding and loading entries
//! from the file system. An entry's date comes from its file name, which must
//! look like `YYYY-MM-DD.md`; every other file is ignored.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::{normalize::normalize, stats::MonthKey, stopwords, tokenize::tokenize};

static FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})\.md$").unwrap());

/// A single dated journal entry. Entries are built once per build and never
/// modified afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// The date from the entry's file name.
    pub date: NaiveDate,

    /// The file contents, as read.
    pub raw: String,

    /// The contents with boilerplate removed (see [`crate::normalize`]).
    pub body: String,

    /// The words of `body` that survive stopword filtering, in order.
    pub tokens: Vec<String>,
}

impl Entry {
    /// Builds an entry from its date and raw text, normalizing and
    /// tokenizing the text.
    pub fn new(date: NaiveDate, raw: String) -> Entry {
        let body = normalize(&raw);
        let tokens = stopwords::filter(tokenize(&body)).collect();
        Entry {
            date,
            raw,
            body,
            tokens,
        }
    }

    /// Builds an entry from a file name and its contents. Returns [`None`] if
    /// the file name isn't a valid `YYYY-MM-DD.md` date.
    pub fn from_file(file_name: &str, raw: String) -> Option<Entry> {
        parse_date(file_name).map(|date| Entry::new(date, raw))
    }

    /// The entry's identifier, `YYYY-MM-DD`. This is also the stem of its
    /// output page.
    pub fn id(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// A human-readable title, e.g. `Thursday, January 5, 2023`.
    pub fn title(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::from(self.date)
    }

    /// The entry's month and day, `MM-DD`, which groups it with entries
    /// written on the same date in other years.
    pub fn day_key(&self) -> String {
        format!("{:02}-{:02}", self.date.month(), self.date.day())
    }

    /// The number of words counted for the entry (after filtering).
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Parses the date out of an entry file name. Names that don't have the
/// `YYYY-MM-DD.md` shape, or that name a day which doesn't exist, yield
/// [`None`].
pub fn parse_date(file_name: &str) -> Option<NaiveDate> {
    let captures = FILE_NAME.captures(file_name)?;
    NaiveDate::from_ymd_opt(
        captures[1].parse().ok()?,
        captures[2].parse().ok()?,
        captures[3].parse().ok()?,
    )
}

/// Builds entries from `(file name, contents)` pairs, dropping pairs whose
/// names aren't entry names. The result is ordered by date, oldest first.
pub fn from_sources<I>(sources: I) -> Vec<Entry>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut entries: Vec<Entry> = sources
        .into_iter()
        .filter_map(|(file_name, raw)| Entry::from_file(&file_name, raw))
        .collect();
    entries.sort_by(|a, b| a.date.cmp(&b.date));
    entries
}

/// Finds entry files anywhere beneath `directory`, returning each file's date
/// and path ordered by date.
pub fn entry_files(directory: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    let mut files = Vec::new();
    for result in WalkDir::new(directory) {
        let dir_entry = result?;
        if !dir_entry.file_type().is_file() {
            continue;
        }
        let file_name = dir_entry.file_name().to_string_lossy();
        match parse_date(&file_name) {
            Some(date) => files.push((date, dir_entry.path().to_owned())),
            None => debug!(path = %dir_entry.path().display(), "skipping non-entry file"),
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every entry beneath `directory`, ordered by date.
pub fn load_entries(directory: &Path) -> Result<Vec<Entry>> {
    entry_files(directory)?
        .into_iter()
        .map(|(date, path)| match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Entry::new(date, raw)),
            Err(err) => Err(Error::Read { path, err }),
        })
        .collect()
}

/// Represents the result of an entry-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error finding or reading entry files.
#[derive(Debug)]
pub enum Error {
    /// Returned when an entry file can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when the entries directory can't be walked.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading entry '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the entries directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
