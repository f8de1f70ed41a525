//! The library code for the `daybook` static site generator, which turns a
//! directory of dated journal entries (`YYYY-MM-DD.md`) into a browsable
//! site. The architecture can be broken down into three steps:
//!
//! 1. Loading entries from source files on disk ([`crate::entry`])
//! 2. Computing word statistics over all entries ([`crate::stats`] and
//!    [`crate::trend`])
//! 3. Converting the entries and statistics into output files on disk
//!    ([`crate::write`] and [`crate::feed`])
//!
//! Loading an entry is where its text is analysed: the boilerplate is
//! stripped ([`crate::normalize`]), the body is split into words
//! ([`crate::tokenize`]) and common words are dropped
//! ([`crate::stopwords`]). Everything after that works on the filtered words.
//!
//! The statistics step first aggregates counts per entry, year and month,
//! laying each word's monthly counts out on a shared month axis. The trend
//! rankings are then computed from those monthly series and drawn as
//! sparklines ([`crate::sparkline`]) on the statistics page.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod clean;
pub mod config;
pub mod entry;
pub mod feed;
pub mod logging;
pub mod markdown;
pub mod normalize;
pub mod sparkline;
pub mod stats;
pub mod stopwords;
pub mod tokenize;
pub mod trend;
pub mod value;
pub mod write;
