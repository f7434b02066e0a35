/// Split document text into line contents.
///
/// `str::split('\n')` preserves trailing empty segments, which matches editor line semantics
/// (N newlines => N+1 lines). Carriage returns are left in place so the text round-trips.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}

/// Number of columns (chars) in a line.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of a char column, clamped to the end of the text.
pub(crate) fn byte_offset(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
