//! Snippet extraction around the first query occurrence.

const ELLIPSIS: char = '…';

/// Extract a window of `size` characters centred on the first case-insensitive
/// occurrence of `query` in `content`.
///
/// Without an occurrence the window starts at the beginning. Ellipses mark
/// truncation on either side. Positions are counted in characters, never bytes.
pub fn snippet(content: &str, query: &str, size: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let anchor = find_ignore_case(&chars, query).unwrap_or(0);

    let start = anchor.saturating_sub(size / 2);
    let end = start.saturating_add(size).min(chars.len());

    let window: String = chars[start..end].iter().collect();
    let mut out = String::with_capacity(window.len() + 2 * ELLIPSIS.len_utf8());
    if start > 0 {
        out.push(ELLIPSIS);
    }
    out.push_str(window.trim());
    if end < chars.len() {
        out.push(ELLIPSIS);
    }
    out
}

/// Character index of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    // Lowercasing can expand a char, so keep a map back to source positions.
    let mut folded = Vec::with_capacity(haystack.len());
    let mut origin = Vec::with_capacity(haystack.len());
    for (i, c) in haystack.iter().enumerate() {
        for lc in c.to_lowercase() {
            folded.push(lc);
            origin.push(i);
        }
    }

    folded
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
        .map(|pos| origin[pos])
}
