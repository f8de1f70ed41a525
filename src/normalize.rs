//! Strips the boilerplate that journal entries are written around: the
//! "Must Do's" checklist at the top and the link/closer section at the
//! bottom. What remains is the entry body, which is both what gets rendered
//! on entry pages and what the word statistics are computed from.
//!
//! The work is split into two scans over the entry's lines:
//!
//! 1. [`body_start`] finds the first line after the checklist header (if any).
//! 2. [`body_end`] finds the first footer marker at or after that line.
//!
//! [`normalize`] slices the lines between the two and tidies up blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the checklist header, e.g. `## Must Do's`, `must dos:`, `MUST DO`.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:#+\s*)?must\s+do(?:['’]?s)?\s*:?\s*$").unwrap()
});

/// Matches bulleted, numbered and checkbox list items.
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(?:[-*+]|\d+[.)])(?:\s|$)|\[[ xX]\])").unwrap());

/// Matches any of the lines that open the footer section.
static FOOTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"^\s*\[\[\s*link to\b",
        r"|^\s*(?:#+\s*)?link to\b",
        r"|^\s*(?:#+\s*)?are we closer\b",
        r"|\b100 days\b",
    ))
    .unwrap()
});

/// Matches two or more consecutive blank lines, counting lines of only
/// spaces and tabs as blank.
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Returns the body of a raw entry with the checklist header and the footer
/// removed. Runs of two or more blank lines (whitespace-only lines included)
/// are collapsed into a single blank line, and the result is trimmed and
/// terminated by exactly one newline. An entry that is nothing but
/// boilerplate normalizes to the empty string.
///
/// Normalizing already-normalized text is a no-op unless the body itself
/// contains a line that looks like a checklist header: the first such line
/// always opens the checklist, so a second pass strips up to the next one.
pub fn normalize(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let start = body_start(&lines);
    let end = body_end(&lines, start);

    let body = lines[start..end].join("\n");
    let body = BLANK_RUNS.replace_all(&body, "\n\n");
    let body = body.trim();
    match body.is_empty() {
        true => String::new(),
        false => format!("{}\n", body),
    }
}

/// Returns the index of the first line of the body. If there is a checklist
/// header, that is the first line after it which is neither blank nor a list
/// item; otherwise it is the first line.
pub fn body_start(lines: &[&str]) -> usize {
    match lines.iter().position(|line| HEADER.is_match(line)) {
        None => 0,
        Some(header) => {
            let skipped = lines[header + 1..]
                .iter()
                .take_while(|line| line.trim().is_empty() || LIST_ITEM.is_match(line))
                .count();
            header + 1 + skipped
        }
    }
}

/// Returns the index one past the last line of the body: the first footer
/// marker at or after `start`, or `lines.len()` if there isn't one.
pub fn body_end(lines: &[&str], start: usize) -> usize {
    lines[start..]
        .iter()
        .position(|line| FOOTER.is_match(line))
        .map_or(lines.len(), |offset| start + offset)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strips_header_and_footer() {
        let raw = "## Must Do's\n- [ ] task\n\nBody text here.\n\n[[link to]]\nfooter junk";
        assert_eq!("Body text here.\n", normalize(raw));
    }

    #[test]
    fn test_header_variants() {
        for header in &["# must dos", "MUST DO'S:", "Must Do’s", "### Must do"] {
            let raw = format!("{}\n1. one\n2) two\n* three\n[x] four\n\nToday.", header);
            assert_eq!("Today.\n", normalize(&raw), "header {:?}", header);
        }
    }

    #[test]
    fn test_text_before_header_is_dropped() {
        let raw = "preamble\n## Must Do's\n- a\nkept\n";
        assert_eq!("kept\n", normalize(raw));
    }

    #[test]
    fn test_no_boilerplate() {
        assert_eq!("Just a day.\n", normalize("\n\nJust a day.\n\n"));
    }

    #[test]
    fn test_footer_variants() {
        let footers = [
            "## Link to yesterday",
            "link to: [[2023-01-04]]",
            "[[ Link to ]]",
            "# Are we closer?",
            "Only 100 DAYS to go",
        ];
        for footer in &footers {
            let raw = format!("Body.\n{}\nignored\n", footer);
            assert_eq!("Body.\n", normalize(&raw), "footer {:?}", footer);
        }
    }

    #[test]
    fn test_hundred_days_respects_word_boundaries() {
        let raw = "Body.\n1100 days is a long time.\n";
        assert_eq!(raw, normalize(raw));
    }

    #[test]
    fn test_footer_only_searched_after_header() {
        let raw = "are we closer\n## Must Do's\n- x\nBody.\n";
        assert_eq!("Body.\n", normalize(raw));
    }

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!("a\n\nb\n", normalize("a\n\n\n\n\nb"));
        assert_eq!("a\n\nb\n", normalize("a\n\nb"));
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        assert_eq!("a\n\nb\n", normalize("a\n  \n \n\t\n  \nb\n"));
        assert_eq!("a\n\nb\n", normalize("a\n \n\nb"));
    }

    #[test]
    fn test_body_header_line_opens_checklist_on_next_pass() {
        let once = normalize("## Must Do's\n- a\nBody\nMust do\nMore");
        assert_eq!("Body\nMust do\nMore\n", once);
        assert_eq!("More\n", normalize(&once));
    }

    #[test]
    fn test_all_boilerplate_is_empty() {
        assert_eq!("", normalize("## Must Do's\n- [ ] one\n- [x] two\n\n[[link to]]\n"));
        assert_eq!("", normalize(""));
        assert_eq!("", normalize("   \n\n"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "## Must Do's\n- [ ] task\n\nBody text here.\n\n\n\nMore.\n[[link to]]\nx",
            "plain\n\n\n\ntext   ",
            "spaced\n  \n\t\n \nout\n",
            "",
        ];
        for input in &inputs {
            let once = normalize(input);
            assert_eq!(once, normalize(&once));
        }
    }
}
