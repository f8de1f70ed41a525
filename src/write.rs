use crate::config::Config;
use crate::entry::Entry;
use crate::markdown;
use crate::stats::Stats;
use crate::value::{count, entry_summary, object, stats_value, url_value};
use chrono::Datelike;
use gtmpl::{Template, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// The parsed templates for each kind of page.
pub struct Templates {
    pub home: Template,
    pub entry: Template,
    pub compare: Template,
    pub stats: Template,
}

/// Responsible for templating and writing the site's HTML pages to disk from
/// [`Entry`] sources and their [`Stats`].
pub struct Writer<'a> {
    /// The templates for every kind of page.
    pub templates: &'a Templates,

    /// The site configuration. Page URLs and output directories come from
    /// here, and its title and URLs are made available to every template.
    pub config: &'a Config,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            let site = vec![
                ("site_title", Value::String(self.config.title.clone())),
                ("home_page", url_value(&self.config.home_page)),
                ("static_url", url_value(&self.config.static_url)),
                ("stats_url", url_value(&self.config.stats_url)),
                ("feed_url", url_value(&self.config.feed_url)),
            ];
            for (name, v) in site {
                obj.insert(name.to_owned(), v);
            }
        }
        debug!(path = %page.file_path.display(), "writing page");
        page.template.execute(
            &mut std::fs::File::create(&page.file_path)?,
            &gtmpl::Context::from(value)?,
        )?;
        Ok(())
    }

    /// Builds every page for `entries` (which must be sorted oldest first)
    /// and writes them to disk. Returns the number of pages written.
    pub fn write_site(&self, entries: &[Entry], stats: &Stats) -> Result<usize> {
        let mut pages = vec![self.home_page(entries)?, self.stats_page(stats)];
        pages.extend(self.entry_pages(entries)?);
        pages.extend(self.compare_pages(entries)?);

        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        for page in &pages {
            if let Some(dir) = page.file_path.parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    std::fs::create_dir_all(dir)?;
                }
            }
            self.write_page(page)?;
        }
        Ok(pages.len())
    }

    fn entry_url(&self, entry: &Entry) -> Result<Url> {
        Ok(self.config.entries_url.join(&format!("{}.html", entry.id()))?)
    }

    fn compare_url(&self, day_key: &str) -> Result<Url> {
        Ok(self.config.compare_url.join(&format!("{}.html", day_key))?)
    }

    fn summary(&self, entry: &Entry) -> Result<Value> {
        Ok(entry_summary(
            entry,
            &self.entry_url(entry)?,
            &self.compare_url(&entry.day_key())?,
        ))
    }

    /// Like [`Writer::summary`], with the rendered body added as `body`.
    fn full(&self, entry: &Entry) -> Result<Value> {
        let mut value = self.summary(entry)?;
        if let Value::Object(obj) = &mut value {
            let mut body = String::new();
            markdown::to_html(&mut body, &entry.body);
            obj.insert("body".to_owned(), Value::String(body));
        }
        Ok(value)
    }

    /// The home page lists every entry, grouped by year, newest first. Its
    /// item also carries `urls`, every entry page URL, for picking an entry
    /// at random.
    fn home_page(&self, entries: &[Entry]) -> Result<Page<'_>> {
        let mut years: BTreeMap<i32, Vec<Value>> = BTreeMap::new();
        let mut urls = Vec::with_capacity(entries.len());
        for entry in entries.iter().rev() {
            years
                .entry(entry.date.year())
                .or_default()
                .push(self.summary(entry)?);
            urls.push(url_value(&self.entry_url(entry)?));
        }

        Ok(Page {
            item: object(vec![
                ("entries", count(entries.len())),
                (
                    "years",
                    Value::Array(
                        years
                            .into_iter()
                            .rev()
                            .map(|(year, entries)| {
                                object(vec![
                                    ("year", Value::String(year.to_string())),
                                    ("entries", Value::Array(entries)),
                                ])
                            })
                            .collect(),
                    ),
                ),
                ("urls", Value::Array(urls)),
            ]),
            file_path: self.config.root_output_directory.join("index.html"),
            prev: None,
            next: None,
            template: &self.templates.home,
        })
    }

    fn stats_page(&self, stats: &Stats) -> Page<'_> {
        Page {
            item: stats_value(stats, &self.config.stats, &self.config.sparkline),
            file_path: self.config.root_output_directory.join("stats.html"),
            prev: None,
            next: None,
            template: &self.templates.stats,
        }
    }

    /// One page per entry. `prev` is the previous (older) entry and `next`
    /// the following one. Each page's item also lists, as `same_day`, the
    /// entries written on the same month and day in other years.
    fn entry_pages(&self, entries: &[Entry]) -> Result<Vec<Page<'_>>> {
        let by_day = group_by_day(entries);
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Page> {
                let mut item = self.full(entry)?;
                if let Value::Object(obj) = &mut item {
                    let same_day = by_day[&entry.day_key()]
                        .iter()
                        .filter(|other| other.date != entry.date)
                        .map(|other| self.summary(other))
                        .collect::<Result<Vec<Value>>>()?;
                    obj.insert("same_day".to_owned(), Value::Array(same_day));
                }
                Ok(Page {
                    item,
                    file_path: self
                        .config
                        .entries_output_directory
                        .join(format!("{}.html", entry.id())),
                    prev: match i {
                        0 => None,
                        _ => Some(self.entry_url(&entries[i - 1])?),
                    },
                    next: match entries.get(i + 1) {
                        None => None,
                        Some(next) => Some(self.entry_url(next)?),
                    },
                    template: &self.templates.entry,
                })
            })
            .collect()
    }

    /// One page per month-day on which at least one entry was written,
    /// showing that day's entries from every year, oldest first. `prev` and
    /// `next` step through the calendar's days that have entries.
    fn compare_pages(&self, entries: &[Entry]) -> Result<Vec<Page<'_>>> {
        let by_day = group_by_day(entries);
        let days: Vec<&String> = by_day.keys().collect();
        days.iter()
            .enumerate()
            .map(|(i, day)| -> Result<Page> {
                let day_entries = &by_day[*day];
                let label = day_entries
                    .first()
                    .map(|entry| entry.date.format("%B %-d").to_string())
                    .unwrap_or_default();
                Ok(Page {
                    item: object(vec![
                        ("day", Value::String(label)),
                        ("key", Value::String(day.to_string())),
                        (
                            "entries",
                            Value::Array(
                                day_entries
                                    .iter()
                                    .map(|entry| self.full(entry))
                                    .collect::<Result<Vec<Value>>>()?,
                            ),
                        ),
                    ]),
                    file_path: self
                        .config
                        .compare_output_directory
                        .join(format!("{}.html", day)),
                    prev: match i {
                        0 => None,
                        _ => Some(self.compare_url(days[i - 1])?),
                    },
                    next: match days.get(i + 1) {
                        None => None,
                        Some(next) => Some(self.compare_url(next)?),
                    },
                    template: &self.templates.compare,
                })
            })
            .collect()
    }
}

/// Groups entries by their `MM-DD` day key, preserving entry order within
/// each group.
fn group_by_day(entries: &[Entry]) -> BTreeMap<String, Vec<&Entry>> {
    let mut days: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.day_key()).or_default().push(entry);
    }
    days
}

/// An object representing an output HTML file. A [`Page`] can be converted to a
/// [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The main item for the page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The URL for the previous page, if any.
    prev: Option<Url>,

    /// The URL for the next page, if any.
    next: Option<Url>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a [`Value::Object`]
    /// with fields `item`, `prev`, and `next` (see [`Page`] for descriptions).
    fn to_value(&self) -> Value {
        let option_to_value = |opt: &Option<Url>| match opt {
            Some(url) => url_value(url),
            None => Value::Nil,
        };

        object(vec![
            ("item", self.item.clone()),
            ("prev", option_to_value(&self.prev)),
            ("next", option_to_value(&self.next)),
        ])
    }
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error building a page URL.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. This allows us to use
    /// the `?` operator when joining page URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}
