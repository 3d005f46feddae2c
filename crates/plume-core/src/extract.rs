//! Element → label extraction.
//!
//! Derives the human-readable name a rendered element stands for, which the
//! locator then searches for in the source text.

use crate::model::RenderedElement;

/// Extract the label of a rendered element.
///
/// - A text-bearing element is labelled by its own trimmed text.
/// - Any other element is labelled by the trimmed text of its first
///   text-bearing descendant in document order. That descendant wins even
///   when its text is blank; the search does not continue past it.
/// - Without a text-bearing descendant the label is empty, which callers
///   treat as "nothing to look up".
#[must_use]
pub fn extract_label<E: RenderedElement>(element: &E) -> String {
    if element.category().is_text() {
        return element.own_text().unwrap_or_default().trim().to_string();
    }

    first_text_descendant(element)
        .and_then(|text| text.own_text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Pre-order depth-first search below `element` for a text-bearing node.
fn first_text_descendant<E: RenderedElement>(element: &E) -> Option<E> {
    let mut stack: Vec<E> = element.children();
    stack.reverse();
    while let Some(next) = stack.pop() {
        if next.category().is_text() {
            return Some(next);
        }
        let mut kids = next.children();
        kids.reverse();
        stack.extend(kids);
    }
    None
}
