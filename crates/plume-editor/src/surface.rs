//! The text-editing surface holding the diagram source.
//!
//! The correlation engine never owns the source text. It reads it through
//! [`TextSurface`] and asks the surface to focus, select, and scroll.

use plume_core::{LineMetrics, SelectionRange, scroll_offset_for_line, select_line, split_lines};

/// A scrollable plain-text editor (a `<textarea>` in the browser).
///
/// Selection offsets are UTF-16 code units, as in the DOM.
pub trait TextSurface {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn selection(&self) -> SelectionRange;
    fn set_selection(&mut self, range: SelectionRange);
    fn focus(&mut self);
    /// Visible height of the scroll viewport in CSS pixels.
    fn viewport_height(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, offset: f64);
}

/// Focus the surface, select `range`, and scroll `line_index` to the middle
/// of the viewport.
///
/// `range` must have been computed from the surface's current text.
pub fn apply_selection<S: TextSurface + ?Sized>(
    surface: &mut S,
    line_index: usize,
    range: SelectionRange,
    metrics: LineMetrics,
) {
    surface.focus();
    surface.set_selection(range);
    let offset = scroll_offset_for_line(line_index, surface.viewport_height(), metrics);
    surface.set_scroll_top(offset);
}

/// Select and reveal one line of the surface's current text.
///
/// Out-of-range indices leave the surface untouched and return `None`.
pub fn highlight_line<S: TextSurface + ?Sized>(
    surface: &mut S,
    line_index: usize,
    metrics: LineMetrics,
) -> Option<SelectionRange> {
    let snapshot = surface.text();
    let range = select_line(line_index, &split_lines(&snapshot))?;
    apply_selection(surface, line_index, range, metrics);
    Some(range)
}

/// An in-memory [`TextSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSurface {
    text: String,
    selection: SelectionRange,
    scroll_top: f64,
    viewport_height: f64,
    /// How many times `focus()` was requested.
    pub focus_count: usize,
}

impl BufferSurface {
    pub fn new(text: &str, viewport_height: f64) -> Self {
        Self {
            text: text.to_string(),
            selection: SelectionRange::default(),
            scroll_top: 0.0,
            viewport_height,
            focus_count: 0,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focus_count > 0
    }

    /// The currently selected text.
    pub fn selected_text(&self) -> Option<&str> {
        self.selection.slice(&self.text)
    }
}

impl Default for BufferSurface {
    fn default() -> Self {
        Self::new("", 400.0)
    }
}

impl TextSurface for BufferSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    /// Replacing the value collapses the caret to the end, like a textarea.
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        let end = self.text.encode_utf16().count();
        self.selection = SelectionRange { start: end, end };
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, range: SelectionRange) {
        self.selection = range;
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.scroll_top = offset;
    }
}
