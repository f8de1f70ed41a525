//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the entries
//! ([`crate::entry`]), computing their statistics ([`crate::stats`]),
//! rendering the pages ([`crate::write`]), copying the theme's static
//! directory into the output directory, and generating the Atom feed.

use crate::config::Config;
use crate::entry::{load_entries, Error as EntryError};
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::stats::Stats;
use crate::write::{Error as WriteError, Templates, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Builds the site from a [`Config`] object. This calls into
/// [`load_entries`], [`Stats::aggregate`], [`Writer::write_site`] and
/// [`write_feed`] which do the heavy-lifting. This function also copies the
/// static assets from the theme to the output directory.
pub fn build_site(config: &Config) -> Result<()> {
    let entries = load_entries(&config.entries_directory)?;
    info!(
        entries = entries.len(),
        directory = %config.entries_directory.display(),
        "loaded entries"
    );

    let stats = Stats::aggregate(&entries);
    info!(
        words = stats.total_words,
        unique = stats.unique_words,
        months = stats.matrix.months().len(),
        "computed statistics"
    );

    // Parse the template files.
    let templates = Templates {
        home: parse_template(config.home_template.iter())?,
        entry: parse_template(config.entry_template.iter())?,
        compare: parse_template(config.compare_template.iter())?,
        stats: parse_template(config.stats_template.iter())?,
    };

    // Blow away the old output directories so we don't have any collisions.
    // The root output directory itself is left alone in case the user passed
    // the wrong directory.
    rmdir(&config.entries_output_directory)?;
    rmdir(&config.compare_output_directory)?;
    rmdir(&config.static_output_directory)?;
    std::fs::create_dir_all(&config.root_output_directory)?;

    let writer = Writer {
        templates: &templates,
        config,
    };
    let pages = writer.write_site(&entries, &stats)?;
    info!(pages, output = %config.root_output_directory.display(), "wrote pages");

    if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?;
    } else {
        warn!(
            directory = %config.static_source_directory.display(),
            "theme has no static directory"
        );
    }

    write_feed(
        &FeedConfig {
            title: config.title.clone(),
            author: config.author.clone(),
            home_page: config.home_page.clone(),
            feed_url: config.feed_url.clone(),
            entries_url: config.entries_url.clone(),
            max_entries: config.feed_entries,
        },
        &entries,
        File::create(config.root_output_directory.join("feed.atom"))?,
    )?;

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for result in WalkDir::new(src) {
        let entry = result?;
        // `WalkDir` only yields paths beneath `src`
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading, writing,
/// cleaning output directories, parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading entries.
    Entry(EntryError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors walking the static directory.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Entry(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Entry(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<EntryError> for Error {
    /// Converts [`EntryError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: EntryError) -> Error {
        Error::Entry(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}
