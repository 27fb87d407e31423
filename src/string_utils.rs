//! UTF-8 and UTF-16 offset helpers
//!
//! Rust strings are UTF-8 and egui cursors are char indices, while
//! highlight ranges can be reported in UTF-16 code units. Text like `ø` or
//! `🎉` makes these three units disagree, so every conversion between them
//! goes through here.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Largest index `<= index` on a UTF-8 character boundary, clamped to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest index `>= index` on a UTF-8 character boundary, clamped to `s.len()`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit Conversions
// ─────────────────────────────────────────────────────────────────────────────

/// Number of UTF-16 code units needed to encode `s`.
#[inline]
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Convert a byte offset into a UTF-16 code unit offset.
#[allow(dead_code)]
pub fn byte_to_utf16(s: &str, byte_offset: usize) -> usize {
    utf16_len(&s[..floor_char_boundary(s, byte_offset)])
}

/// Convert a char index (as used by egui cursors) into a byte offset.
pub fn char_to_byte(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte offset into a char index.
pub fn byte_to_char(s: &str, byte_offset: usize) -> usize {
    s[..floor_char_boundary(s, byte_offset)].chars().count()
}

/// The char immediately before `byte_offset`, if any.
pub fn char_before(s: &str, byte_offset: usize) -> Option<char> {
    s[..floor_char_boundary(s, byte_offset)].chars().next_back()
}

/// The char starting at `byte_offset`, if any.
pub fn char_at(s: &str, byte_offset: usize) -> Option<char> {
    s.get(byte_offset..).and_then(|rest| rest.chars().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_on_multibyte() {
        let s = "på"; // 'å' is 2 bytes
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(ceil_char_boundary(s, 2), 3);
        assert_eq!(floor_char_boundary(s, 99), 3);
    }

    #[test]
    fn test_utf16_len_counts_surrogate_pairs() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("å"), 1);
        assert_eq!(utf16_len("🎉"), 2);
    }

    #[test]
    fn test_byte_to_utf16() {
        let s = "🎉 *x*";
        // emoji is 4 bytes, 2 UTF-16 units
        assert_eq!(byte_to_utf16(s, 4), 2);
        assert_eq!(byte_to_utf16(s, 5), 3);
    }

    #[test]
    fn test_char_byte_roundtrip() {
        let s = "æøå abc";
        assert_eq!(char_to_byte(s, 3), 6);
        assert_eq!(byte_to_char(s, 6), 3);
        assert_eq!(char_to_byte(s, 100), s.len());
    }

    #[test]
    fn test_neighbour_chars() {
        let s = "a_b";
        assert_eq!(char_before(s, 1), Some('a'));
        assert_eq!(char_at(s, 1), Some('_'));
        assert_eq!(char_before(s, 0), None);
        assert_eq!(char_at(s, 3), None);
    }
}
