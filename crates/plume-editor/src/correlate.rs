//! Click-to-source correlation: rendered element → source line.
//!
//! The controller owns the whole jump pipeline for one interaction:
//!
//! 1. **Extract** the element's label (its own text, or its first text
//!    descendant's).
//! 2. **Locate** the first source line containing the label.
//! 3. **Select** that line in the text surface and scroll it into view.
//!
//! Each interaction is a stateless request/response. The label is located
//! and the selection computed against one snapshot of the source text, and
//! that snapshot's range is what gets applied.

use crate::dispatch::{
    HoverHandler, HoverState, HoverStyle, InteractionDispatch, PrimaryHandler, StyleChange,
};
use crate::status::{Severity, StatusSink};
use crate::surface::{TextSurface, apply_selection};
use plume_core::model::RenderedElement;
use plume_core::{LineMetrics, SelectionRange, extract_label, locate_line, select_line, split_lines};
use std::cell::RefCell;
use std::rc::Rc;

/// Result of one primary interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// The element has no derivable label; nothing was searched.
    NoLabel,
    /// The surface now selects `range` on `line`.
    Jumped {
        label: String,
        line: usize,
        range: SelectionRange,
    },
    /// No source line contains `label`; the surface was not touched.
    NotFound { label: String },
}

impl Correlation {
    pub fn jumped(&self) -> bool {
        matches!(self, Correlation::Jumped { .. })
    }
}

/// Binds rendered elements to the text surface and status sink it was
/// constructed with.
pub struct CorrelationController<S, K> {
    surface: Rc<RefCell<S>>,
    status: Rc<RefCell<K>>,
    metrics: LineMetrics,
    hover: HoverStyle,
}

impl<S: TextSurface, K: StatusSink> CorrelationController<S, K> {
    pub fn new(
        surface: Rc<RefCell<S>>,
        status: Rc<RefCell<K>>,
        metrics: LineMetrics,
        hover: HoverStyle,
    ) -> Self {
        Self {
            surface,
            status,
            metrics,
            hover,
        }
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    pub fn status(&self) -> &Rc<RefCell<K>> {
        &self.status
    }

    /// Run the extract → locate → select pipeline for `element`.
    pub fn correlate<E: RenderedElement>(&self, element: &E) -> Correlation {
        let label = extract_label(element);
        if label.is_empty() {
            log::trace!("interaction on {:?} element without label", element.category());
            return Correlation::NoLabel;
        }

        let snapshot = self.surface.borrow().text();
        let lines = split_lines(&snapshot);
        let located = locate_line(&label, &lines)
            .and_then(|line| select_line(line, &lines).map(|range| (line, range)));

        match located {
            Some((line, range)) => {
                apply_selection(&mut *self.surface.borrow_mut(), line, range, self.metrics);
                log::info!("jumped to line {} for {label:?}", line + 1);
                self.status.borrow_mut().update(
                    &format!("Jumped to the line containing \"{label}\""),
                    Severity::Success,
                );
                Correlation::Jumped { label, line, range }
            }
            None => {
                log::warn!("no source line contains {label:?}");
                self.status.borrow_mut().update(
                    &format!("No line containing \"{label}\" was found"),
                    Severity::Error,
                );
                Correlation::NotFound { label }
            }
        }
    }

    /// Presentation change for a hover transition. No data-model effect.
    pub fn hover_changed(&self, state: HoverState) -> StyleChange {
        self.hover.style_for(state)
    }

    /// Bind click and hover handlers to every eligible element under (and
    /// including) `root`. Returns the number of bound elements.
    ///
    /// Eligible: text runs, basic shapes, and participant/use-case/class
    /// groups. Nested eligible elements are bound individually.
    pub fn attach<'h, E, D>(self: &Rc<Self>, root: &E, dispatch: &mut D) -> usize
    where
        E: RenderedElement + 'h,
        D: InteractionDispatch<'h, E>,
        S: 'h,
        K: 'h,
    {
        let mut bound = 0;
        self.attach_subtree(root, dispatch, &mut bound);
        log::debug!("bound {bound} diagram elements");
        bound
    }

    fn attach_subtree<'h, E, D>(self: &Rc<Self>, element: &E, dispatch: &mut D, bound: &mut usize)
    where
        E: RenderedElement + 'h,
        D: InteractionDispatch<'h, E>,
        S: 'h,
        K: 'h,
    {
        if element.category().is_interactive() {
            dispatch.on_primary_interaction(element, self.primary_handler());
            dispatch.on_hover_change(element, self.hover_handler());
            *bound += 1;
        }
        for child in element.children() {
            self.attach_subtree(&child, dispatch, bound);
        }
    }

    fn primary_handler<'h, E>(self: &Rc<Self>) -> PrimaryHandler<'h, E>
    where
        E: RenderedElement + 'h,
        S: 'h,
        K: 'h,
    {
        let controller = Rc::clone(self);
        Box::new(move |target: &E| controller.correlate(target))
    }

    fn hover_handler<'h, E>(self: &Rc<Self>) -> HoverHandler<'h, E>
    where
        E: 'h,
        S: 'h,
        K: 'h,
    {
        let controller = Rc::clone(self);
        Box::new(move |_target: &E, state: HoverState| controller.hover_changed(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RecordingDispatch;
    use crate::status::StatusLog;
    use crate::surface::BufferSurface;
    use plume_core::parse_svg;
    use pretty_assertions::assert_eq;

    type Controller = CorrelationController<BufferSurface, StatusLog>;

    fn controller(text: &str) -> Rc<Controller> {
        Rc::new(CorrelationController::new(
            Rc::new(RefCell::new(BufferSurface::new(text, 300.0))),
            Rc::new(RefCell::new(StatusLog::new())),
            LineMetrics::default(),
            HoverStyle::default(),
        ))
    }

    #[test]
    fn jump_selects_line_and_reports_success() {
        let ctl = controller("Alice -> Bob: Hello");
        let doc = parse_svg("<svg><text>Bob</text></svg>").unwrap();
        let text = doc.root_element().children()[0];

        let result = ctl.correlate(&text);
        assert_eq!(
            result,
            Correlation::Jumped {
                label: "Bob".into(),
                line: 0,
                range: SelectionRange { start: 0, end: 19 },
            }
        );
        let surface = ctl.surface().borrow();
        assert_eq!(surface.selection(), SelectionRange { start: 0, end: 19 });
        assert!(surface.is_focused());
        let status = ctl.status().borrow();
        assert_eq!(status.last().unwrap().severity, Severity::Success);
    }

    #[test]
    fn miss_reports_error_without_touching_surface() {
        let ctl = controller("Alice -> Bob: Hello");
        let doc = parse_svg("<svg><text>Carol</text></svg>").unwrap();
        let text = doc.root_element().children()[0];
        let before = ctl.surface().borrow().clone();

        let result = ctl.correlate(&text);
        assert_eq!(result, Correlation::NotFound { label: "Carol".into() });
        assert_eq!(*ctl.surface().borrow(), before);
        let status = ctl.status().borrow();
        let last = status.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert!(last.text.contains("Carol"));
    }

    #[test]
    fn empty_label_is_silent() {
        let ctl = controller("Alice -> Bob: Hello");
        let doc = parse_svg(r#"<svg><g class="participant"><rect/></g></svg>"#).unwrap();
        let group = doc.root_element().children()[0];

        assert_eq!(ctl.correlate(&group), Correlation::NoLabel);
        assert!(ctl.status().borrow().is_empty());
        assert_eq!(ctl.surface().borrow().focus_count, 0);
    }

    #[test]
    fn attach_binds_only_eligible_elements() {
        let ctl = controller("");
        let doc = parse_svg(
            r#"<svg><defs/><g><g class="participant"><rect/><text>A</text></g><line/><g class="link"><path/></g></g></svg>"#,
        )
        .unwrap();
        let mut dispatch = RecordingDispatch::new();
        let bound = ctl.attach(&doc.root_element(), &mut dispatch);

        let tags: Vec<&str> = dispatch.bound_elements().iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["g", "rect", "text", "path"]);
        assert_eq!(bound, 4);
    }

    #[test]
    fn hover_is_presentational() {
        let ctl = controller("A");
        let doc = parse_svg("<svg><text>A</text></svg>").unwrap();
        let text = doc.root_element().children()[0];
        let mut dispatch = RecordingDispatch::new();
        ctl.attach(&doc.root_element(), &mut dispatch);

        let enter = dispatch.hover(&text, HoverState::Enter).unwrap();
        let leave = dispatch.hover(&text, HoverState::Leave).unwrap();
        assert_eq!((enter.opacity, leave.opacity), (0.7, 1.0));
        assert!(ctl.status().borrow().is_empty());
        assert_eq!(ctl.surface().borrow().focus_count, 0);
    }
}
