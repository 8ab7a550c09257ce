// src/extractors/lists.rs

use crate::extractors::cleaner::clean_latex;
use once_cell::sync::Lazy;
use regex::Regex;

pub const ELLIPSIS: &str = "...";

static ITEM_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\item\s+").expect("Failed to compile ITEM_MARKER_RE"));

// Ends an item body: the next item marker or the end of the enclosing list.
static ITEM_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\item|\\end").expect("Failed to compile ITEM_END_RE"));

// Ends the first paragraph: a blank line or a heading command.
static PARAGRAPH_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n[ \t]*\r?\n|\\(?:chapter|section|subsection)\b")
        .expect("Failed to compile PARAGRAPH_END_RE")
});

/// Cleaned `\item` texts of a block, in document order. Items that clean to
/// nothing are dropped; no count limit is applied here.
pub fn extract_items(block: &str) -> Vec<String> {
    ITEM_MARKER_RE
        .find_iter(block)
        .filter_map(|marker| {
            let body_start = marker.end();
            let body_end = ITEM_END_RE
                .find_at(block, body_start)
                .map_or(block.len(), |m| m.start());
            let item = clean_latex(&block[body_start..body_end]);
            (!item.is_empty()).then_some(item)
        })
        .collect()
}

/// Keeps the first `n` items.
pub fn take_items(mut items: Vec<String>, n: usize) -> Vec<String> {
    items.truncate(n);
    items
}

/// First paragraph of a block, cleaned and capped at `max_length` characters.
///
/// When the cleaned paragraph is too long it is cut at the last space within
/// the cap and [`ELLIPSIS`] is appended; with no space in range the cut is hard.
pub fn extract_first_paragraph(block: &str, max_length: usize) -> String {
    let content = block.trim_start();

    // Without a boundary the whole block is the paragraph; the cap below
    // applies to cleaned text so markup is never cut mid-argument.
    let paragraph = match PARAGRAPH_END_RE.find(content) {
        Some(boundary) => &content[..boundary.start()],
        None => content,
    };

    let cleaned = clean_latex(paragraph);
    if cleaned.chars().count() <= max_length {
        return cleaned;
    }

    let capped = char_prefix(&cleaned, max_length);
    let kept = capped.rsplit_once(' ').map_or(capped, |(head, _)| head);
    format!("{}{}", kept, ELLIPSIS)
}

// Longest prefix of `text` holding at most `max_chars` characters.
fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
