//! Loads the project configuration. A project is a directory holding a
//! `daybook.yaml` file, an entries directory, and a theme directory whose
//! `theme.yaml` lists the template files for each kind of page:
//!
//! ```text
//! journal/
//!   daybook.yaml
//!   entries/2023-01-05.md
//!   theme/theme.yaml
//!   theme/static/style.css
//! ```

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::sparkline::Sparkline;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "daybook.yaml";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    title: String,
    site_root: Url,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default = "default_entries_directory")]
    entries_directory: PathBuf,

    #[serde(default = "default_theme_directory")]
    theme_directory: PathBuf,

    #[serde(default)]
    stats: StatsConfig,

    #[serde(default)]
    sparkline: SparklineConfig,

    #[serde(default = "default_feed_entries")]
    feed_entries: usize,
}

fn default_entries_directory() -> PathBuf {
    PathBuf::from("entries")
}

fn default_theme_directory() -> PathBuf {
    PathBuf::from("theme")
}

fn default_feed_entries() -> usize {
    20
}

#[derive(Deserialize)]
struct Theme {
    home_template: Vec<PathBuf>,
    entry_template: Vec<PathBuf>,
    compare_template: Vec<PathBuf>,
    stats_template: Vec<PathBuf>,
}

/// The author named in the Atom feed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// How many words the statistics page lists in each of its tables.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    pub top_words: usize,
    pub spiky_words: usize,
    pub year_top_words: usize,
    pub hapax_limit: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            top_words: 50,
            spiky_words: 20,
            year_top_words: 10,
            hapax_limit: 200,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct SparklineConfig {
    width: f64,
    height: f64,
    stroke: String,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        let Sparkline {
            width,
            height,
            stroke,
        } = Sparkline::default();
        SparklineConfig {
            width,
            height,
            stroke,
        }
    }
}

/// The resolved configuration for a build: every path is absolute (or
/// relative to the working directory) and every URL is joined onto the site
/// root.
#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub author: Option<Author>,
    pub entries_directory: PathBuf,
    pub home_page: Url,
    pub home_template: Vec<PathBuf>,
    pub entry_template: Vec<PathBuf>,
    pub compare_template: Vec<PathBuf>,
    pub stats_template: Vec<PathBuf>,
    pub entries_url: Url,
    pub compare_url: Url,
    pub stats_url: Url,
    pub static_url: Url,
    pub feed_url: Url,
    pub static_source_directory: PathBuf,
    pub root_output_directory: PathBuf,
    pub entries_output_directory: PathBuf,
    pub compare_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
    pub stats: StatsConfig,
    pub sparkline: Sparkline,
    pub feed_entries: usize,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a [`PROJECT_FILE`]
    /// and loads the first one found.
    ///
    /// Relative directories are resolved against the working directory first,
    /// so `.` searches the real parents rather than stopping at the empty
    /// path.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let dir = dir.canonicalize().map_err(|err| Error::Open {
            path: dir.to_owned(),
            err,
        })?;
        match find_project_file(&dir) {
            Some(path) => Config::from_project_file(&path, output_directory),
            None => Err(Error::ProjectNotFound),
        }
    }

    /// Loads the project file at `path` along with the theme it points to.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = load_yaml(path)?;
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        let theme_dir = project_root.join(&project.theme_directory);
        let theme: Theme = load_yaml(&theme_dir.join("theme.yaml"))?;
        let in_theme = |files: Vec<PathBuf>| -> Vec<PathBuf> {
            files.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        // `Url::join` treats the last path segment as a file name unless the
        // URL ends in a slash
        let mut site_root = project.site_root;
        if !site_root.path().ends_with('/') {
            let path = format!("{}/", site_root.path());
            site_root.set_path(&path);
        }

        Ok(Config {
            title: project.title,
            author: project.author,
            entries_directory: project_root.join(&project.entries_directory),
            home_page: site_root.join("index.html")?,
            home_template: in_theme(theme.home_template),
            entry_template: in_theme(theme.entry_template),
            compare_template: in_theme(theme.compare_template),
            stats_template: in_theme(theme.stats_template),
            entries_url: site_root.join("entries/")?,
            compare_url: site_root.join("compare/")?,
            stats_url: site_root.join("stats.html")?,
            static_url: site_root.join("static/")?,
            feed_url: site_root.join("feed.atom")?,
            static_source_directory: theme_dir.join("static"),
            root_output_directory: output_directory.to_owned(),
            entries_output_directory: output_directory.join("entries"),
            compare_output_directory: output_directory.join("compare"),
            static_output_directory: output_directory.join("static"),
            stats: project.stats,
            sparkline: Sparkline {
                width: project.sparkline.width,
                height: project.sparkline.height,
                stroke: project.sparkline.stroke,
            },
            feed_entries: project.feed_entries,
        })
    }
}

fn find_project_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_FILE))
        .find(|path| path.is_file())
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })?;
    serde_yaml::from_reader(file).map_err(|err| Error::DeserializeYaml {
        path: path.to_owned(),
        err,
    })
}

/// Represents the result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project or theme files.
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the directory or any of its
    /// ancestors.
    ProjectNotFound,

    /// Returned when a configuration file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when a configuration file isn't valid YAML or is missing
    /// fields.
    DeserializeYaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when a site URL can't be derived from the site root.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::Open { path, err } => {
                write!(f, "Opening '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml { path, err } => {
                write!(f, "Loading '{}': {}", path.display(), err)
            }
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectNotFound => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml { path: _, err } => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator when joining URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
