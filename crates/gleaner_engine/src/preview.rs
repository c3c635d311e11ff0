pub const DEFAULT_PREVIEW_CHARS: usize = 1000;

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn content_preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
