//! Cleaning of anonymously submitted note text.
//!
//! Submitted bodies and bylines are reduced to plain text before they are
//! stored: markup is stripped, basic entities are decoded and whitespace is
//! normalized. Markup that only appears once entities are decoded is
//! stripped too, so stored text never contains a tag. Bodies keep their line structure. HTML is only produced on the
//! way out by [`body_html`], which escapes everything and joins lines with
//! `<br>`.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a cleaned note body, in characters.
pub const MAX_BODY_CHARS: usize = 5_000;

/// Maximum length of a cleaned byline, in characters.
pub const MAX_BYLINE_CHARS: usize = 200;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

/// A tag opens with `<` followed by a letter, `/`, `!` or `?`; a bare `<`
/// as in `1 < 2` is text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^>]*>").expect("valid tag regex"));

/// Entities decoded after tags are removed. `&amp;` must stay last so that
/// `&amp;lt;` decodes to the literal text `&lt;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Remove comments and tags, decode basic entities and collapse whitespace.
///
/// The result is a single line of plain text.
pub fn strip_tags(input: &str) -> String {
    collapse_whitespace(&to_plain_text(input))
}

/// Clean a note body, preserving its line breaks.
///
/// Each line is stripped and whitespace-collapsed independently; blank lines
/// at the start and end are dropped, blank lines in the middle are kept.
pub fn clean_body(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let plain = to_plain_text(&normalized);

    let lines: Vec<String> = plain.split('\n').map(collapse_whitespace).collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());

    let body = match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    };

    truncate_chars(&body, MAX_BODY_CHARS)
}

/// Clean a byline into a single line of plain text.
pub fn clean_byline(input: &str) -> String {
    truncate_chars(&strip_tags(input), MAX_BYLINE_CHARS)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a stored plain-text body as an HTML fragment.
///
/// Every line is escaped; lines are joined with `<br>`.
pub fn body_html(body: &str) -> String {
    body.split('\n')
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip markup, decode entities, then strip whatever markup the decoding
/// produced.
fn to_plain_text(input: &str) -> String {
    remove_markup(&decode_entities(&remove_markup(input)))
}

fn remove_markup(input: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(input, "");
    TAG_RE.replace_all(&without_comments, "").into_owned()
}

fn decode_entities(input: &str) -> String {
    ENTITIES
        .iter()
        .fold(input.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters without splitting a code point.
fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].trim_end().to_string(),
        None => input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
