//! Converts entries and statistics into template [`Value`]s. Templates see
//! plain objects, arrays, strings and numbers; nothing here formats HTML
//! except the embedded sparkline SVGs.

use std::collections::HashMap;

use gtmpl::Value;
use url::Url;

use crate::config::StatsConfig;
use crate::entry::Entry;
use crate::sparkline::Sparkline;
use crate::stats::{MonthKey, Stats};
use crate::trend::{hottest_words, spiky_words, Riser, Spike};

/// Builds a [`Value::Object`] from field names and values.
pub fn object<I>(fields: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect::<HashMap<String, Value>>(),
    )
}

/// Converts a count into a template number.
pub fn count(n: usize) -> Value {
    Value::from(n as u64)
}

impl From<MonthKey> for Value {
    fn from(month: MonthKey) -> Value {
        Value::String(month.to_string())
    }
}

pub fn url_value(url: &Url) -> Value {
    Value::String(url.to_string())
}

/// The fields describing an entry in lists and links: `id`, `title`, `date`,
/// `year`, `words`, `url` (its page) and `compare_url` (its compare-day
/// page).
pub fn entry_summary(entry: &Entry, url: &Url, compare_url: &Url) -> Value {
    object(vec![
        ("id", Value::String(entry.id())),
        ("title", Value::String(entry.title())),
        ("date", Value::String(entry.id())),
        ("day", Value::String(entry.date.format("%B %-d").to_string())),
        ("year", Value::String(entry.date.format("%Y").to_string())),
        ("words", count(entry.word_count())),
        ("url", url_value(url)),
        ("compare_url", url_value(compare_url)),
    ])
}

fn word_counts(words: &[(&str, usize)]) -> Value {
    Value::Array(
        words
            .iter()
            .map(|(word, n)| object(vec![("word", Value::String(word.to_string())), ("count", count(*n))]))
            .collect(),
    )
}

fn spike_value(spike: &Spike, sparkline: &Sparkline) -> Value {
    object(vec![
        ("word", Value::String(spike.word.to_owned())),
        ("total", count(spike.total)),
        ("variance", Value::String(format!("{:.1}", spike.variance))),
        ("sparkline", Value::String(sparkline.svg_counts(spike.series))),
    ])
}

fn riser_value(riser: &Riser, sparkline: &Sparkline) -> Value {
    object(vec![
        ("word", Value::String(riser.word.to_owned())),
        ("prev", count(riser.prev_sum)),
        ("recent", count(riser.recent_sum)),
        ("delta", Value::from(riser.delta)),
        ("sparkline", Value::String(sparkline.svg_counts(riser.series))),
    ])
}

/// Everything the statistics page shows. See the field names below; word
/// tables are arrays of `{word, count}` objects.
pub fn stats_value(stats: &Stats, limits: &StatsConfig, sparkline: &Sparkline) -> Value {
    let years = stats
        .years
        .iter()
        .rev()
        .map(|(year, words)| {
            object(vec![
                ("year", Value::String(year.to_string())),
                ("words", count(*words)),
                ("top_words", word_counts(&stats.top_words_in_year(*year, limits.year_top_words))),
            ])
        })
        .collect();
    let months = stats
        .months
        .iter()
        .map(|(month, words)| object(vec![("month", (*month).into()), ("words", count(*words))]))
        .collect();
    let month_totals: Vec<usize> = stats.months.iter().map(|(_, words)| *words).collect();
    let hapax = stats.hapax_legomena();
    let average = match stats.entries {
        0 => 0,
        n => (stats.total_words as f64 / n as f64).round() as usize,
    };

    object(vec![
        ("entries", count(stats.entries)),
        ("total_words", count(stats.total_words)),
        ("unique_words", count(stats.unique_words)),
        ("average_words", count(average)),
        ("years", Value::Array(years)),
        ("months", Value::Array(months)),
        ("months_sparkline", Value::String(sparkline.svg_counts(&month_totals))),
        ("top_words", word_counts(&stats.top_words(limits.top_words))),
        (
            "spiky",
            Value::Array(
                spiky_words(&stats.matrix, limits.spiky_words)
                    .iter()
                    .map(|spike| spike_value(spike, sparkline))
                    .collect(),
            ),
        ),
        (
            "hottest",
            Value::Array(
                hottest_words(&stats.matrix)
                    .iter()
                    .map(|riser| riser_value(riser, sparkline))
                    .collect(),
            ),
        ),
        ("hapax_count", count(hapax.len())),
        (
            "hapax",
            Value::Array(
                hapax
                    .iter()
                    .take(limits.hapax_limit)
                    .map(|word| Value::String(word.to_string()))
                    .collect(),
            ),
        ),
        ("hapax_truncated", Value::Bool(hapax.len() > limits.hapax_limit)),
    ])
}
