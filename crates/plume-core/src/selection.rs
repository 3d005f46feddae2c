//! Line index → selection range and scroll position.
//!
//! Offsets are counted in UTF-16 code units, the unit the browser textarea
//! uses for `selectionStart`/`selectionEnd`. For ASCII sources they equal
//! byte offsets.

use serde::{Deserialize, Serialize};

/// A character range into the flattened source text (lines joined by `\n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The selected substring of `text`, or `None` if the range does not
    /// fall on character boundaries of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = byte_offset(text, self.start)?;
        let end = byte_offset(text, self.end)?;
        text.get(start..end)
    }
}

/// Vertical text metrics used to scroll a line into view.
///
/// `line_height` is an assumed constant, not a measurement of the rendered
/// textarea. If the real line height differs (font, zoom, wrapping), the
/// computed scroll position drifts proportionally to the line index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMetrics {
    /// Line height in CSS pixels.
    pub line_height: f64,
}

impl Default for LineMetrics {
    fn default() -> Self {
        Self { line_height: 20.0 }
    }
}

/// Compute the range covering `lines[line_index]`, excluding its separator.
///
/// Returns `None` when `line_index` is out of bounds.
#[must_use]
pub fn select_line<S: AsRef<str>>(line_index: usize, lines: &[S]) -> Option<SelectionRange> {
    let target = lines.get(line_index)?;
    let start: usize = lines[..line_index]
        .iter()
        .map(|line| utf16_len(line.as_ref()) + 1)
        .sum();
    Some(SelectionRange {
        start,
        end: start + utf16_len(target.as_ref()),
    })
}

/// Scroll offset that vertically centres `line_index` in a viewport of
/// `viewport_height` pixels: `max(0, line_top - viewport_height / 2)`.
pub fn scroll_offset_for_line(line_index: usize, viewport_height: f64, metrics: LineMetrics) -> f64 {
    let line_top = line_index as f64 * metrics.line_height;
    (line_top - viewport_height / 2.0).max(0.0)
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Convert a UTF-16 offset into a byte offset of `text`.
fn byte_offset(text: &str, utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == utf16_offset {
            return Some(byte);
        }
        units += ch.len_utf16();
    }
    (units == utf16_offset).then_some(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_line_range() {
        let range = select_line(0, &["Alice -> Bob: Hello"]).unwrap();
        assert_eq!(range, SelectionRange { start: 0, end: 19 });
    }

    #[test]
    fn later_lines_skip_separators() {
        let lines = ["@startuml", "A -> B", "", "@enduml"];
        assert_eq!(select_line(1, &lines), Some(SelectionRange { start: 10, end: 16 }));
        assert_eq!(select_line(2, &lines), Some(SelectionRange { start: 17, end: 17 }));
        assert_eq!(select_line(3, &lines), Some(SelectionRange { start: 18, end: 25 }));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(select_line(1, &["only"]), None);
        assert_eq!(select_line(0, &[] as &[&str]), None);
    }

    #[test]
    fn range_roundtrips_for_every_line() {
        let lines = ["@startuml", "class 动物 {", "  +名称: String", "}", "😀 emoji", "@enduml"];
        let text = lines.join("\n");
        for (i, line) in lines.iter().enumerate() {
            let range = select_line(i, &lines).unwrap();
            assert_eq!(range.slice(&text), Some(*line), "line {i}");
        }
    }

    #[test]
    fn offsets_are_utf16_units() {
        let range = select_line(1, &["😀", "x"]).unwrap();
        assert_eq!(range, SelectionRange { start: 3, end: 4 });
    }

    #[test]
    fn scroll_centres_line_and_clamps_at_zero() {
        let m = LineMetrics::default();
        assert_eq!(scroll_offset_for_line(0, 400.0, m), 0.0);
        assert_eq!(scroll_offset_for_line(5, 400.0, m), 0.0);
        assert_eq!(scroll_offset_for_line(30, 400.0, m), 400.0);
        let tall = LineMetrics { line_height: 24.0 };
        assert_eq!(scroll_offset_for_line(10, 100.0, tall), 190.0);
    }
}
