//! Utility functions for utf8 string slices.
//!
//! Mostly thin wrappers over str_indices, with fast paths for ascii text.

/// Converts from char-index to byte-index in a string slice.
///
/// Any past-the-end index will return the one-past-the-end byte index.
///
/// Runs in O(N) time.
#[inline]
pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    str_indices::chars::to_byte_idx(text, char_idx)
}

/// Counts the chars (unicode scalar values) in `text`.
#[inline]
pub(crate) fn count_chars(text: &str) -> usize {
    if text.len() <= 1 { text.len() }
    else { str_indices::chars::count(text) }
}

/// Char offsets of every '\n' in `text`, in increasing order.
///
/// A 0x0A byte can never appear inside a multi-byte utf8 sequence, so we scan
/// bytes and only count chars between consecutive hits.
pub(crate) fn line_feed_offsets(text: &str, all_ascii: bool) -> Vec<usize> {
    let bytes = text.as_bytes();
    if all_ascii {
        return bytes.iter().enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(i, _)| i)
            .collect();
    }

    let mut result = Vec::new();
    let mut last_byte = 0;
    let mut last_char = 0;
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' {
            last_char += count_chars(&text[last_byte..i]);
            last_byte = i;
            result.push(last_char);
        }
    }
    result
}

/// Find the largest prefix of `text` which fits in `max_bytes` without
/// splitting a codepoint. Returns (bytes, chars). Always takes at least one
/// char so callers make progress even if `max_bytes` is tiny.
pub(crate) fn chunk_boundary(text: &str, max_bytes: usize) -> (usize, usize) {
    let mut byte_pos = 0;
    let mut char_pos = 0;
    for c in text.chars() {
        let cs = c.len_utf8();
        if cs + byte_pos > max_bytes && char_pos > 0 { break }
        char_pos += 1;
        byte_pos += cs;
    }
    (byte_pos, char_pos)
}
