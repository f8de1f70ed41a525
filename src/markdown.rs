//! Converts entry bodies from Markdown to HTML.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use regex::Regex;

/// `[[2023-01-05]]`-style links to other entries.
static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(\d{4}-\d{2}-\d{2})\]\]").unwrap());

/// Relative links to other entries' source files, optionally with an anchor.
static ENTRY_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\./)?(\d{4}-\d{2}-\d{2})\.md(#.*)?$").unwrap());

/// Renders `markdown` as HTML and appends it to `out`. Entry pages sit
/// beneath a page title, so headings are demoted by one level. Links to other
/// entries, either as `[[YYYY-MM-DD]]` or as links to `YYYY-MM-DD.md`, are
/// pointed at those entries' pages.
pub fn to_html(out: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let markdown = WIKI_LINK.replace_all(markdown, "[$1]($1.md)");
    html::push_html(
        out,
        Parser::new_ext(&markdown, options).map(|ev| match ev {
            Event::Start(tag) => Event::Start(convert_tag(tag)),
            Event::End(tag) => Event::End(convert_tag(tag)),
            _ => ev,
        }),
    );
}

fn convert_tag(tag: Tag) -> Tag {
    match tag {
        Tag::Heading(level) => Tag::Heading((level + 1).min(6)),
        Tag::Link(link_type, url, title) => Tag::Link(link_type, convert_link(url), title),
        _ => tag,
    }
}

fn convert_link(url: CowStr) -> CowStr {
    if !ENTRY_LINK.is_match(&url) {
        return url;
    }
    let converted = ENTRY_LINK.replace(&url, "$1.html$2").into_owned();
    CowStr::Boxed(converted.into_boxed_str())
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(markdown: &str) -> String {
        let mut out = String::new();
        to_html(&mut out, markdown);
        out
    }

    #[test]
    fn test_demotes_headings() {
        assert_eq!("<h2>Morning</h2>\n<h6>Deep</h6>\n", render("# Morning\n###### Deep"));
    }

    #[test]
    fn test_rewrites_entry_links() {
        assert_eq!(
            "<p><a href=\"2023-01-04.html#walk\">yesterday</a></p>\n",
            render("[yesterday](2023-01-04.md#walk)")
        );
        assert_eq!(
            "<p>see <a href=\"2023-01-04.html\">2023-01-04</a></p>\n",
            render("see [[2023-01-04]]")
        );
    }

    #[test]
    fn test_leaves_other_links() {
        assert_eq!(
            "<p><a href=\"https://example.org/notes.md\">notes</a></p>\n",
            render("[notes](https://example.org/notes.md)")
        );
    }
}
