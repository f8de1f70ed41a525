//! Support for creating Atom feeds from a list of entries.

use crate::config::Author;
use crate::entry::Entry;
use crate::markdown;
use atom_syndication::{Content, Entry as AtomEntry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub author: Option<Author>,
    pub home_page: Url,
    pub feed_url: Url,
    pub entries_url: Url,

    /// The number of most recent entries to include.
    pub max_entries: usize,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Entry`]s sorted oldest first, and writes the result to a
/// [`std::io::Write`]. Entry content is the rendered entry body.
pub fn write_feed<W: Write>(config: &FeedConfig, entries: &[Entry], w: W) -> Result<()> {
    feed(config, entries)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, entries: &[Entry]) -> Result<Feed> {
    let recent: Vec<&Entry> = entries.iter().rev().take(config.max_entries).collect();

    let mut feed = Feed::default();
    feed.set_title(config.title.clone());
    feed.set_id(config.home_page.to_string());
    feed.set_updated(match recent.first() {
        Some(latest) => midnight(latest.date),
        None => Utc::now().into(),
    });
    feed.set_authors(author_to_people(&config.author));
    feed.set_links(vec![
        link(&config.home_page, "alternate"),
        link(&config.feed_url, "self"),
    ]);
    feed.set_entries(
        recent
            .into_iter()
            .map(|entry| feed_entry(config, entry))
            .collect::<Result<Vec<AtomEntry>>>()?,
    );
    Ok(feed)
}

fn feed_entry(config: &FeedConfig, entry: &Entry) -> Result<AtomEntry> {
    let url = config.entries_url.join(&format!("{}.html", entry.id()))?;
    let date = midnight(entry.date);

    let mut body = String::new();
    markdown::to_html(&mut body, &entry.body);
    let mut content = Content::default();
    content.set_content_type(Some("html".to_owned()));
    content.set_value(Some(body));

    let mut atom_entry = AtomEntry::default();
    atom_entry.set_id(url.to_string());
    atom_entry.set_title(entry.title());
    atom_entry.set_updated(date);
    atom_entry.set_published(Some(date));
    atom_entry.set_authors(author_to_people(&config.author));
    atom_entry.set_links(vec![link(&url, "alternate")]);
    atom_entry.set_content(Some(content));
    Ok(atom_entry)
}

/// Entries carry a date but no time, so they are stamped at midnight UTC.
fn midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).into()
}

fn link(url: &Url, rel: &str) -> Link {
    let mut link = Link::default();
    link.set_href(url.to_string());
    link.set_rel(rel.to_owned());
    link
}

fn author_to_people(author: &Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => {
            let mut person = Person::default();
            person.set_name(author.name.clone());
            person.set_email(author.email.clone());
            vec![person]
        }
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and
/// URL issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an entry's URL can't be built.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator when joining entry URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(date: &str, text: &str) -> Entry {
        Entry::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), text.to_owned())
    }

    #[test]
    fn test_feed_takes_most_recent() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let config = FeedConfig {
            title: "Journal".to_owned(),
            author: Some(Author {
                name: "Sam".to_owned(),
                email: None,
            }),
            home_page: Url::parse("https://example.org/index.html")?,
            feed_url: Url::parse("https://example.org/feed.atom")?,
            entries_url: Url::parse("https://example.org/entries/")?,
            max_entries: 2,
        };
        let entries = vec![
            entry("2023-01-01", "First."),
            entry("2023-01-02", "Second."),
            entry("2023-01-03", "*Third*."),
        ];

        let mut out = Vec::new();
        write_feed(&config, &entries, &mut out)?;
        let xml = String::from_utf8(out)?;

        assert!(xml.contains("https://example.org/entries/2023-01-03.html"));
        assert!(xml.contains("https://example.org/entries/2023-01-02.html"));
        assert!(!xml.contains("https://example.org/entries/2023-01-01.html"));
        assert!(xml.contains("2023-01-03T00:00:00"));
        assert!(xml.contains("Tuesday, January 3, 2023"));
        assert!(xml.contains("<name>Sam</name>"));
        Ok(())
    }
}
