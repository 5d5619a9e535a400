//! Author-provided HTML is cleaned here before any reader sees it.

use ammonia::Builder;
use std::collections::HashSet;

const WORDS_PER_MINUTE: usize = 200;

fn rich_text_policy() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_tags(["figure", "figcaption", "mark", "u"])
        .add_tag_attributes("img", ["loading"])
        .add_tag_attributes("a", ["target"])
        .link_rel(Some("noopener noreferrer"))
        .url_schemes(HashSet::from(["http", "https", "mailto", "tel"]));
    builder
}

/// Keeps formatting, links and images; drops scripts, styles and event
/// handler attributes.
pub fn sanitize_html(html: &str) -> String {
    rich_text_policy().clean(html).to_string()
}

/// Visible text with all markup removed.
pub fn plain_text(html: &str) -> String {
    Builder::empty().clean(html).to_string()
}

/// Estimated reading time, never below one minute.
pub fn read_time_minutes(html: &str) -> i32 {
    let words = plain_text(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}
