//! The fixed English stopword list and the filter that applies it.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const WORDS: &[&str] = &[
    // articles and determiners
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each",
    "every", "all", "both", "no", "such", "other", "another",
    // conjunctions
    "and", "or", "but", "nor", "so", "yet", "because", "if", "then", "than",
    "though", "although", "while", "whether", "as",
    // pronouns
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves",
    "you", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "they",
    "them", "their", "theirs", "themselves", "what", "which", "who", "whom",
    "whose", "there", "here",
    // auxiliaries
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "done", "will", "would",
    "shall", "should", "can", "could", "may", "might", "must", "get", "got",
    // contractions
    "i'm", "i've", "i'd", "i'll", "it's", "that's", "there's", "don't",
    "doesn't", "didn't", "isn't", "wasn't", "aren't", "weren't", "can't",
    "couldn't", "won't", "wouldn't", "shouldn't", "haven't", "hasn't",
    "you're", "we're", "they're", "let's",
    // prepositions
    "of", "in", "on", "at", "to", "for", "with", "from", "by", "about",
    "into", "onto", "over", "under", "up", "down", "out", "off", "through",
    "after", "before", "between", "during", "until", "upon", "around",
    "against", "without", "within",
    // discourse
    "not", "just", "also", "very", "really", "too", "more", "most", "much",
    "only", "own", "same", "now", "when", "where", "why", "how", "again",
    "further", "once", "like", "well", "even", "still", "lot", "bit",
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| WORDS.iter().copied().collect());

/// Reports whether `word` is a stopword. Matching is case-insensitive.
pub fn is_stopword(word: &str) -> bool {
    match word.bytes().any(|b| b.is_ascii_uppercase()) {
        true => STOPWORDS.contains(word.to_ascii_lowercase().as_str()),
        false => STOPWORDS.contains(word),
    }
}

/// Drops stopwords and single-character tokens, preserving the order of
/// everything else.
pub fn filter<I>(tokens: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = String>,
{
    tokens
        .into_iter()
        .filter(|token| token.chars().count() > 1 && !is_stopword(token))
}
