//! Aggregates word counts across all entries: totals per entry, per year and
//! per month, frequency tables, and the per-word monthly matrix that
//! [`crate::trend`] ranks. Everything here is computed from scratch for each
//! build.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::entry::Entry;

/// A calendar month. Orders chronologically, and displays as `YYYY-MM` so
/// that the string order agrees with the chronological one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> MonthKey {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The sorted, distinct months in which at least one entry was written. This
/// is the shared time axis for every monthly series; it is built once from
/// the full entry set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthIndex(Vec<MonthKey>);

impl MonthIndex {
    pub fn new(entries: &[Entry]) -> MonthIndex {
        let mut months: Vec<MonthKey> = entries.iter().map(Entry::month_key).collect();
        months.sort();
        months.dedup();
        MonthIndex(months)
    }

    /// Returns the position of `month` on the axis.
    pub fn position(&self, month: MonthKey) -> Option<usize> {
        self.0.binary_search(&month).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn months(&self) -> &[MonthKey] {
        &self.0
    }
}

/// Per-word monthly counts. Each row is a dense array with one slot per
/// month of the [`MonthIndex`] it was built against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordMatrix {
    months: MonthIndex,
    rows: HashMap<String, Vec<usize>>,
}

impl WordMatrix {
    pub fn months(&self) -> &MonthIndex {
        &self.months
    }

    /// Returns the monthly series for `word`, if it occurs at all.
    pub fn series(&self, word: &str) -> Option<&[usize]> {
        self.rows.get(word).map(Vec::as_slice)
    }

    /// Iterates over every word and its monthly series, in no particular
    /// order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.rows
            .iter()
            .map(|(word, series)| (word.as_str(), series.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Word statistics for a whole set of entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    /// The number of entries aggregated.
    pub entries: usize,

    /// The filtered word count of every entry, in entry order.
    pub entry_words: Vec<(NaiveDate, usize)>,

    /// The total number of filtered words across all entries.
    pub total_words: usize,

    /// The number of distinct non-numeric words.
    pub unique_words: usize,

    /// `(year, words)` pairs, ascending by year.
    pub years: Vec<(i32, usize)>,

    /// `(month, words)` pairs, ascending by month.
    pub months: Vec<(MonthKey, usize)>,

    /// Occurrences of every word across all entries.
    pub frequencies: HashMap<String, usize>,

    /// Occurrences of every word, per year.
    pub year_frequencies: BTreeMap<i32, HashMap<String, usize>>,

    /// Occurrences of every word, per month.
    pub matrix: WordMatrix,
}

impl Stats {
    /// Aggregates `entries`. The order of `entries` doesn't affect any of the
    /// totals or tables; only `entry_words` follows it.
    pub fn aggregate(entries: &[Entry]) -> Stats {
        let months = MonthIndex::new(entries);
        let mut rows: HashMap<String, Vec<usize>> = HashMap::new();
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        let mut year_frequencies: BTreeMap<i32, HashMap<String, usize>> = BTreeMap::new();
        let mut year_totals: BTreeMap<i32, usize> = BTreeMap::new();
        let mut month_totals: BTreeMap<MonthKey, usize> = BTreeMap::new();
        let mut entry_words = Vec::with_capacity(entries.len());

        for entry in entries {
            let month = entry.month_key();
            let count = entry.word_count();
            entry_words.push((entry.date, count));
            *year_totals.entry(month.year).or_default() += count;
            *month_totals.entry(month).or_default() += count;

            // `months` was built from these same entries, so every entry's
            // month has a slot
            let slot = match months.position(month) {
                Some(slot) => slot,
                None => continue,
            };
            let year_table = year_frequencies.entry(month.year).or_default();
            for token in &entry.tokens {
                *frequencies.entry(token.clone()).or_default() += 1;
                *year_table.entry(token.clone()).or_default() += 1;
                rows.entry(token.clone())
                    .or_insert_with(|| vec![0; months.len()])[slot] += 1;
            }
        }

        Stats {
            entries: entries.len(),
            total_words: entry_words.iter().map(|(_, count)| count).sum(),
            unique_words: frequencies.keys().filter(|word| !is_numeric(word)).count(),
            entry_words,
            years: year_totals.into_iter().collect(),
            months: month_totals.into_iter().collect(),
            frequencies,
            year_frequencies,
            matrix: WordMatrix { months, rows },
        }
    }

    /// The `n` most frequent words, most frequent first. Words with equal
    /// counts are ordered alphabetically.
    pub fn top_words(&self, n: usize) -> Vec<(&str, usize)> {
        top(&self.frequencies, n)
    }

    /// The `n` most frequent words written in `year`.
    pub fn top_words_in_year(&self, year: i32, n: usize) -> Vec<(&str, usize)> {
        match self.year_frequencies.get(&year) {
            Some(table) => top(table, n),
            None => Vec::new(),
        }
    }

    /// Words used exactly once across all entries, alphabetically. Purely
    /// numeric tokens are left out, as they are from the unique word count.
    pub fn hapax_legomena(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .frequencies
            .iter()
            .filter(|(word, count)| **count == 1 && !is_numeric(word))
            .map(|(word, _)| word.as_str())
            .collect();
        words.sort_unstable();
        words
    }
}

fn top(table: &HashMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut words: Vec<(&str, usize)> = table
        .iter()
        .map(|(word, count)| (word.as_str(), *count))
        .collect();
    words.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    words.truncate(n);
    words
}

/// Reports whether `word` is made only of digits.
pub fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(date: &str, text: &str) -> Entry {
        Entry::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), text.to_owned())
    }

    fn words(n: usize, word: &str) -> String {
        vec![word; n].join(" ")
    }

    #[test]
    fn test_totals_per_year_and_month() {
        let entries = vec![
            entry("2023-01-05", &words(10, "rain")),
            entry("2023-02-10", &words(5, "sun")),
        ];
        let stats = Stats::aggregate(&entries);
        assert_eq!(15, stats.total_words);
        assert_eq!(vec![(2023, 15)], stats.years);
        let months: Vec<(String, usize)> = stats
            .months
            .iter()
            .map(|(month, words)| (month.to_string(), *words))
            .collect();
        assert_eq!(
            vec![("2023-01".to_owned(), 10), ("2023-02".to_owned(), 5)],
            months
        );
    }

    #[test]
    fn test_frequency_table() {
        let stats = Stats::aggregate(&[entry("2023-01-05", "run run fast the a")]);
        let mut wanted = HashMap::new();
        wanted.insert("run".to_owned(), 2);
        wanted.insert("fast".to_owned(), 1);
        assert_eq!(wanted, stats.frequencies);
        assert_eq!(vec![("run", 2), ("fast", 1)], stats.top_words(10));
        assert_eq!(vec!["fast"], stats.hapax_legomena());
    }

    #[test]
    fn test_numeric_tokens_counted_but_not_unique() {
        let stats = Stats::aggregate(&[entry("2023-01-05", "ran 10 km in 2023 ran")]);
        assert_eq!(Some(&1), stats.frequencies.get("10"));
        assert_eq!(Some(&1), stats.frequencies.get("2023"));
        assert_eq!(2, stats.unique_words); // ran, km
        assert_eq!(vec!["km"], stats.hapax_legomena());
    }

    #[test]
    fn test_series_alignment() {
        let entries = vec![
            entry("2022-12-01", "garden garden"),
            entry("2023-03-01", "garden coffee"),
            entry("2023-01-15", "coffee"),
            entry("2023-03-20", "garden"),
        ];
        let stats = Stats::aggregate(&entries);
        let months: Vec<String> = stats
            .matrix
            .months()
            .months()
            .iter()
            .map(MonthKey::to_string)
            .collect();
        assert_eq!(vec!["2022-12", "2023-01", "2023-03"], months);
        assert_eq!(Some(&[2, 0, 2][..]), stats.matrix.series("garden"));
        assert_eq!(Some(&[0, 1, 1][..]), stats.matrix.series("coffee"));
        for (word, series) in stats.matrix.rows() {
            assert_eq!(stats.matrix.months().len(), series.len());
            assert_eq!(stats.frequencies[word], series.iter().sum::<usize>());
        }
    }

    #[test]
    fn test_order_independent() {
        let mut entries = vec![
            entry("2021-06-01", "walked dog park"),
            entry("2023-01-05", "dog slept"),
            entry("2022-03-09", "park bench coffee"),
        ];
        let forward = Stats::aggregate(&entries);
        entries.reverse();
        let backward = Stats::aggregate(&entries);
        assert_eq!(forward.years, backward.years);
        assert_eq!(forward.months, backward.months);
        assert_eq!(forward.frequencies, backward.frequencies);
        assert_eq!(forward.year_frequencies, backward.year_frequencies);
        assert_eq!(forward.matrix, backward.matrix);
        assert_eq!(forward.unique_words, backward.unique_words);
    }

    #[test]
    fn test_top_words_in_year() {
        let stats = Stats::aggregate(&[
            entry("2022-01-01", "tea tea cake"),
            entry("2023-01-01", "coffee"),
        ]);
        assert_eq!(vec![("tea", 2)], stats.top_words_in_year(2022, 1));
        assert!(stats.top_words_in_year(1999, 5).is_empty());
    }

    #[test]
    fn test_empty() {
        let stats = Stats::aggregate(&[]);
        assert_eq!(Stats::default(), stats);
        assert!(stats.top_words(5).is_empty());
        assert!(stats.hapax_legomena().is_empty());
    }

    #[test]
    fn test_boilerplate_only_entry_contributes_nothing() {
        let stats = Stats::aggregate(&[entry("2023-01-05", "## Must Do's\n- [ ] run\n")]);
        assert_eq!(1, stats.entries);
        assert_eq!(vec![(2023, 0)], stats.years);
        assert!(stats.frequencies.is_empty());
    }
}
