//! Greedy word wrapping against measured pixel widths.

use super::font::TextFont;

/// Wrap `text` into lines no wider than `max_width` pixels.
///
/// Words are split on whitespace and packed greedily: each word is appended
/// to the current line if the joined candidate still measures within
/// `max_width`, otherwise the current line is flushed and the word starts a
/// new one. A single word wider than `max_width` is never split; it gets a
/// line of its own and overflows.
///
/// Every returned line is non-empty. Whitespace-only input yields no lines.
pub fn wrap_text(text: &str, max_width: i32, measure: impl Fn(&str) -> i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };

        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line = word.to_string();
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// [`wrap_text`] using a font's measured bounding-box width.
pub fn wrap_with_font(text: &str, font: &dyn TextFont, max_width: i32) -> Vec<String> {
    wrap_text(text, max_width, |s| font.measure(s).width())
}
