//! Text cleanup shared by ingestion and the summary builder.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Character limit for digest excerpts.
pub const EXCERPT_MAX_CHARS: usize = 220;

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn strip_html(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Cut at the first sentence-ending punctuation followed by whitespace.
/// Text without such a boundary comes back whole.
pub fn first_sentence(s: &str) -> &str {
    let mut iter = s.char_indices().peekable();
    while let Some((i, ch)) = iter.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some((_, next)) = iter.peek() {
                if next.is_whitespace() {
                    return &s[..i + ch.len_utf8()];
                }
            }
        }
    }
    s
}

/// First-sentence excerpt of a raw (possibly HTML) body, truncated to
/// `max_chars` with an ellipsis when cut.
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    let clean = strip_html(raw);
    let sentence = first_sentence(&clean);
    if sentence.chars().count() <= max_chars {
        return sentence.to_string();
    }
    let mut out: String = sentence.chars().take(max_chars).collect();
    out.push('…');
    out
}
