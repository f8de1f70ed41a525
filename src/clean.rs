//! Rewrites entry files in place with their boilerplate removed (see
//! [`crate::normalize`]).

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::entry::{entry_files, Error as EntryError};
use crate::normalize::normalize;

/// What [`clean_entries`] found.
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    /// The number of entry files read.
    pub examined: usize,

    /// The entry files whose contents changed (or would change, on a dry
    /// run), ordered by date.
    pub changed: Vec<PathBuf>,
}

/// Normalizes every entry file beneath `directory`. Files that are already
/// clean are left untouched. If `dry_run` is set, nothing is written and the
/// report lists the files that would have been rewritten.
pub fn clean_entries(directory: &Path, dry_run: bool) -> Result<Report> {
    let mut report = Report::default();
    for (_, path) in entry_files(directory)? {
        report.examined += 1;
        let raw = std::fs::read_to_string(&path).map_err(|err| Error::Io {
            path: path.clone(),
            err,
        })?;
        let cleaned = normalize(&raw);
        if cleaned == raw {
            continue;
        }
        if !dry_run {
            std::fs::write(&path, &cleaned).map_err(|err| Error::Io {
                path: path.clone(),
                err,
            })?;
        }
        info!(path = %path.display(), dry_run, "cleaned entry");
        report.changed.push(path);
    }
    Ok(report)
}

/// Represents the result of a cleaning operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error cleaning entry files.
#[derive(Debug)]
pub enum Error {
    /// Returned when the entry files can't be found.
    Entry(EntryError),

    /// Returned when an entry file can't be read or written.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Entry(err) => err.fmt(f),
            Error::Io { path, err } => {
                write!(f, "Cleaning entry '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Entry(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

impl From<EntryError> for Error {
    /// Converts an [`EntryError`] into an [`Error`]. It allows us to use the
    /// `?` operator when finding entry files.
    fn from(err: EntryError) -> Error {
        Error::Entry(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const DIRTY: &str = "## Must Do's\n- [x] water plants\n\nRained.\n\n## Are we closer?\nYes.\n";

    #[test]
    fn test_clean_entries() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("2023-01-05.md"), DIRTY)?;
        fs::write(dir.path().join("2023-01-06.md"), "Already clean.\n")?;
        fs::write(dir.path().join("todo.md"), DIRTY)?;

        let report = clean_entries(dir.path(), false)?;
        assert_eq!(2, report.examined);
        assert_eq!(vec![dir.path().join("2023-01-05.md")], report.changed);
        assert_eq!("Rained.\n", fs::read_to_string(dir.path().join("2023-01-05.md"))?);
        assert_eq!(DIRTY, fs::read_to_string(dir.path().join("todo.md"))?);

        // a second pass finds nothing left to do
        assert!(clean_entries(dir.path(), false)?.changed.is_empty());
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("2023-01-05.md"), DIRTY)?;

        let report = clean_entries(dir.path(), true)?;
        assert_eq!(1, report.changed.len());
        assert_eq!(DIRTY, fs::read_to_string(dir.path().join("2023-01-05.md"))?);
        Ok(())
    }
}
