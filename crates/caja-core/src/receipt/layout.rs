//! Fixed-column text helpers shared by the printed and shared receipts.
//!
//! All widths are counted in characters, not bytes, so accented names
//! ("Ñoquis", "Plátano") line up like ASCII ones.

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keeps at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// A full-width rule made of `ch`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Places `left` and `right` on one line of `width` characters, with at
/// least one space between them. `left` is cut when both do not fit.
pub fn pad_between(left: &str, right: &str, width: usize) -> String {
    let right_len = char_len(right);
    let room = width.saturating_sub(right_len + 1);
    let left = if char_len(left) > room {
        truncate_chars(left, room)
    } else {
        left.to_string()
    };

    let spaces = width.saturating_sub(char_len(&left) + right_len).max(1);
    format!("{}{}{}", left, " ".repeat(spaces), right)
}

/// Greedy word wrap to `width` characters.
///
/// Words longer than the width are split across lines. Always returns at
/// least one line, so an empty name still occupies a row.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        if chars.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };

        if needed > width {
            lines.push(std::mem::take(&mut current));
            current.extend(chars.iter());
            current_len = chars.len();
        } else {
            if current_len > 0 {
                current.push(' ');
            }
            current.extend(chars.iter());
            current_len = needed;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_text("Pan amasado", 20), ["Pan amasado"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("Queso mantecoso laminado 250 g", 12),
            ["Queso", "mantecoso", "laminado 250", "g"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(
            wrap_text("ABCDEFGHIJ xy", 4),
            ["ABCD", "EFGH", "IJ", "xy"]
        );
        assert_eq!(wrap_text("ab ABCDEFGH", 4), ["ab", "ABCD", "EFGH"]);
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        assert_eq!(wrap_text("ñññ ñ", 5), ["ñññ ñ"]);
    }

    #[test]
    fn test_wrap_empty_is_one_blank_line() {
        assert_eq!(wrap_text("", 10), [""]);
        assert_eq!(wrap_text("   ", 10), [""]);
    }

    #[test]
    fn test_pad_between() {
        assert_eq!(pad_between("TOTAL", "$15.000", 16), "TOTAL    $15.000");
        assert_eq!(char_len(&pad_between("Plátano", "$990", 20)), 20);
        assert_eq!(pad_between("a very long label", "$1", 8), "a ve $1");
    }

    #[test]
    fn test_truncate_and_rule() {
        assert_eq!(truncate_chars("Galletas de chocolate", 8), "Galletas");
        assert_eq!(truncate_chars("Té", 8), "Té");
        assert_eq!(rule('-', 4), "----");
    }
}
