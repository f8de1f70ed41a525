//! Ranks words by how their monthly usage changes over time.
//!
//! Both rankings ignore the first month of the [`MonthIndex`], since a
//! journal usually starts partway through it, and only consider words that
//! occur at least [`MIN_OCCURRENCES`] times in the remaining months.
//!
//! * [`spiky_words`] ranks by the population variance of a word's monthly
//!   counts: words used in bursts rather than steadily.
//! * [`hottest_words`] ranks by how much a word's use in the most recent
//!   months exceeds its use in the months just before.
//!
//! [`MonthIndex`]: crate::stats::MonthIndex

use std::cmp::Ordering;

use crate::stats::WordMatrix;

/// The number of occurrences a word needs to be ranked at all.
pub const MIN_OCCURRENCES: usize = 10;

/// The maximum length of the hottest-words ranking.
pub const MAX_HOTTEST: usize = 50;

/// A word ranked by the variance of its monthly counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Spike<'a> {
    pub word: &'a str,

    /// Occurrences across the ranked months.
    pub total: usize,

    pub variance: f64,

    /// Monthly counts, first month dropped.
    pub series: &'a [usize],
}

/// A word whose recent use is up on the window before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Riser<'a> {
    pub word: &'a str,
    pub prev_sum: usize,
    pub recent_sum: usize,

    /// `recent_sum - prev_sum`; always positive.
    pub delta: i64,

    /// Monthly counts, first month dropped.
    pub series: &'a [usize],
}

/// Ranks eligible words by descending variance, returning at most `limit`.
/// Words with equal variance are ordered alphabetically.
pub fn spiky_words(matrix: &WordMatrix, limit: usize) -> Vec<Spike<'_>> {
    let mut spikes: Vec<Spike> = eligible(matrix)
        .map(|(word, series)| Spike {
            word,
            total: series.iter().sum(),
            variance: variance(series),
            series,
        })
        .collect();
    spikes.sort_by(|a, b| {
        b.variance
            .partial_cmp(&a.variance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.word.cmp(b.word))
    });
    spikes.truncate(limit);
    spikes
}

/// Ranks eligible words whose use rose in the most recent window, largest
/// rise first, returning at most [`MAX_HOTTEST`]. Words with equal rises are
/// ordered alphabetically.
pub fn hottest_words(matrix: &WordMatrix) -> Vec<Riser<'_>> {
    let mut risers: Vec<Riser> = eligible(matrix)
        .filter_map(|(word, series)| {
            let (prev_sum, recent_sum) = window_sums(series);
            let delta = recent_sum as i64 - prev_sum as i64;
            match delta > 0 {
                true => Some(Riser {
                    word,
                    prev_sum,
                    recent_sum,
                    delta,
                    series,
                }),
                false => None,
            }
        })
        .collect();
    risers.sort_by(|a, b| b.delta.cmp(&a.delta).then_with(|| a.word.cmp(b.word)));
    risers.truncate(MAX_HOTTEST);
    risers
}

/// The number of months in each window compared by [`hottest_words`], for a
/// series of `months` months: an eighth of it, but between one and three.
pub fn window_size(months: usize) -> usize {
    (months / 8).clamp(1, 3)
}

/// Sums the most recent window of `series` and the window before it. The
/// earlier sum is zero when the series is too short to hold both windows.
pub fn window_sums(series: &[usize]) -> (usize, usize) {
    let n = window_size(series.len());
    let recent_start = series.len().saturating_sub(n);
    let recent: usize = series[recent_start..].iter().sum();
    let prev: usize = match series.len() >= 2 * n {
        true => series[recent_start - n..recent_start].iter().sum(),
        false => 0,
    };
    (prev, recent)
}

/// The population variance of `values`; zero for an empty slice.
pub fn variance(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    values
        .iter()
        .map(|&v| {
            let deviation = v as f64 - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / n
}

/// Yields each word with enough occurrences, alongside its series with the
/// first month dropped.
fn eligible(matrix: &WordMatrix) -> impl Iterator<Item = (&str, &[usize])> {
    matrix
        .rows()
        .map(|(word, series)| (word, series.get(1..).unwrap_or(&[])))
        .filter(|(_, series)| series.iter().sum::<usize>() >= MIN_OCCURRENCES)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::Entry;
    use crate::stats::Stats;
    use chrono::NaiveDate;

    /// Builds a matrix from `(word, monthly counts)` rows by writing one entry
    /// per month, starting in January 2020.
    fn matrix(rows: &[(&str, &[usize])]) -> WordMatrix {
        let months = rows.iter().map(|(_, counts)| counts.len()).max().unwrap_or(0);
        let entries: Vec<Entry> = (0..months)
            .map(|m| {
                let date = NaiveDate::from_ymd_opt(2020 + (m / 12) as i32, (m % 12) as u32 + 1, 1)
                    .unwrap();
                let text: Vec<&str> = rows
                    .iter()
                    .flat_map(|(word, counts)| std::iter::repeat(*word).take(counts[m]))
                    .collect();
                // an anchor word keeps months with no ranked words on the axis
                Entry::new(date, format!("anchor {}", text.join(" ")))
            })
            .collect();
        Stats::aggregate(&entries).matrix
    }

    #[test]
    fn test_variance() {
        assert_eq!(0.0, variance(&[]));
        assert_eq!(0.0, variance(&[4, 4, 4]));
        assert_eq!(4.0, variance(&[2, 4, 4, 4, 5, 5, 7, 9]));
    }

    #[test]
    fn test_window_size() {
        assert_eq!(1, window_size(0));
        assert_eq!(1, window_size(5));
        assert_eq!(2, window_size(16));
        assert_eq!(3, window_size(24));
        assert_eq!(3, window_size(100));
    }

    #[test]
    fn test_window_sums() {
        assert_eq!((8, 9), window_sums(&[0, 1, 2, 8, 9]));
        assert_eq!((0, 3), window_sums(&[3]));
        assert_eq!((0, 0), window_sums(&[]));
        let series: Vec<usize> = (1..=16).collect();
        assert_eq!((13 + 14, 15 + 16), window_sums(&series));
    }

    #[test]
    fn test_hottest_focus() {
        let m = matrix(&[("focus", &[7, 0, 1, 2, 8, 9])]);
        let hottest = hottest_words(&m);
        assert_eq!(
            vec![Riser {
                word: "focus",
                prev_sum: 8,
                recent_sum: 9,
                delta: 1,
                series: &[0, 1, 2, 8, 9],
            }],
            hottest
        );
    }

    #[test]
    fn test_hottest_only_rising_and_ordered() {
        let m = matrix(&[
            ("steady", &[0, 5, 5, 5, 5]),
            ("falling", &[0, 9, 6, 3, 1]),
            ("rising", &[0, 1, 2, 3, 9]),
            ("bump", &[0, 2, 2, 4, 6]),
            ("aside", &[0, 2, 2, 4, 6]),
        ]);
        let words: Vec<&str> = hottest_words(&m).iter().map(|r| r.word).collect();
        assert_eq!(vec!["rising", "aside", "bump"], words);
        for riser in hottest_words(&m) {
            assert!(riser.delta > 0);
            assert_eq!(riser.recent_sum as i64 - riser.prev_sum as i64, riser.delta);
        }
    }

    #[test]
    fn test_first_month_does_not_count_toward_gate() {
        let m = matrix(&[("early", &[20, 1, 2]), ("late", &[0, 4, 6])]);
        let words: Vec<&str> = spiky_words(&m, 10).iter().map(|s| s.word).collect();
        assert_eq!(vec!["late"], words);
    }

    #[test]
    fn test_spiky_ordering_and_ties() {
        let m = matrix(&[
            ("flat", &[0, 5, 5, 5, 5]),
            ("burst", &[0, 0, 20, 0, 0]),
            ("zebra", &[0, 0, 6, 6, 0]),
            ("apple", &[0, 6, 0, 0, 6]),
        ]);
        let spiky = spiky_words(&m, 10);
        let words: Vec<&str> = spiky.iter().map(|s| s.word).collect();
        assert_eq!(vec!["burst", "apple", "zebra", "flat"], words);
        assert_eq!(20, spiky[0].total);
        assert_eq!(&[0, 20, 0, 0], spiky[0].series);
        assert_eq!(2, spiky_words(&m, 2).len());
    }

    #[test]
    fn test_hottest_capped() {
        let names: Vec<String> = (0..60).map(|i| format!("word{:02}", i)).collect();
        let rise: &[usize] = &[0, 0, 10];
        let rows: Vec<(&str, &[usize])> = names.iter().map(|name| (name.as_str(), rise)).collect();
        let m = matrix(&rows);
        let hottest = hottest_words(&m);
        assert_eq!(MAX_HOTTEST, hottest.len());
        assert_eq!("word00", hottest[0].word);
    }

    #[test]
    fn test_degenerate_indexes() {
        assert!(spiky_words(&WordMatrix::default(), 10).is_empty());
        assert!(hottest_words(&WordMatrix::default()).is_empty());
        let single_month = matrix(&[("lonely", &[50])]);
        assert!(spiky_words(&single_month, 10).is_empty());
        assert!(hottest_words(&single_month).is_empty());
    }
}
