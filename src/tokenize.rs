//! Splits entry text into lowercase word tokens. Markdown constructs that
//! aren't prose (code, images, link targets) are removed before splitting.
//! The resulting [`Tokens`] still contain stopwords; see
//! [`crate::stopwords::filter`].

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```|~~~.*?~~~").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]*`").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s']").unwrap());

/// Tokenizes `text`. The markup is stripped eagerly (it needs whole-text
/// regex passes) but tokens are produced lazily as the iterator advances.
pub fn tokenize(text: &str) -> Tokens {
    let text = FENCED_CODE.replace_all(text, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = IMAGE.replace_all(&text, " ");
    let text = LINK.replace_all(&text, "$1");
    let text = text.to_lowercase().replace(['’', '‘', 'ʼ'], "'");
    Tokens {
        text: NON_WORD.replace_all(&text, " ").into_owned(),
        position: 0,
    }
}

/// An iterator over the whitespace-separated words of cleaned text. Each
/// word has surrounding apostrophes trimmed so that quoted words (`'word'`)
/// count as the word itself; fragments that are nothing but apostrophes are
/// skipped.
#[derive(Clone, Debug)]
pub struct Tokens {
    text: String,
    position: usize,
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let rest = &self.text[self.position..];
            let start = rest.find(|c: char| !c.is_whitespace())?;
            let rest = &rest[start..];
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            self.position += start + len;

            let word = rest[..len].trim_matches('\'');
            if !word.is_empty() {
                return Some(word.to_owned());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(
            vec!["hello", "world", "it's", "2023", "fine"],
            words("Hello, World! It's 2023... (fine)")
        );
    }

    #[test]
    fn test_normalizes_curly_apostrophes() {
        assert_eq!(vec!["don't", "can't"], words("Don’t can‘t"));
    }

    #[test]
    fn test_removes_code_images_and_links() {
        let text = "before\n```rust\nlet x = 1;\n```\nuse `cargo build` here \
                    ![a cat](cat.png) [my site](https://example.org) after";
        assert_eq!(vec!["before", "use", "here", "my", "site", "after"], words(text));
    }

    #[test]
    fn test_tilde_fences() {
        assert_eq!(vec!["a", "b"], words("a\n~~~\nhidden words\n~~~\nb"));
    }

    #[test]
    fn test_trims_quote_apostrophes() {
        assert_eq!(vec!["quoted", "runners"], words("'quoted' ' '' runners'"));
    }

    #[test]
    fn test_empty_input() {
        assert!(words("").is_empty());
        assert!(words("  \n\t ").is_empty());
        assert!(words("!!! --- ???").is_empty());
    }

    #[test]
    fn test_deterministic_and_restartable() {
        let text = "Walked the dog. Walked again!";
        let tokens = tokenize(text);
        let first: Vec<String> = tokens.clone().collect();
        let second: Vec<String> = tokens.collect();
        assert_eq!(first, second);
        assert_eq!(first, words(text));
    }

    #[test]
    fn test_non_ascii_letters_split_words() {
        assert_eq!(vec!["caf", "ol"], words("café olé"));
    }
}
