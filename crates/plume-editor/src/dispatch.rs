//! Interaction dispatch: binding handlers to rendered elements.
//!
//! The UI toolkit decides how events reach an element (DOM listeners in the
//! browser, a recorded list in tests); the correlation controller only hands
//! over one primary handler and one hover handler per eligible element.
//!
//! Contract for implementors:
//!
//! - **Primary interaction** (click): stop propagation and prevent the
//!   default action *before* running the handler, so a click on a text run
//!   nested inside a participant group is handled once, by the innermost
//!   bound element.
//! - **Hover change**: run the handler on enter/leave and apply the returned
//!   [`StyleChange`] to the element itself.
//!
//! Bindings belong to one rendered tree. When a new render replaces the
//! tree, the old bindings are dropped with it and new ones are attached.

use crate::correlate::Correlation;
use serde::{Deserialize, Serialize};

/// Handler for a click-equivalent interaction on an element.
pub type PrimaryHandler<'h, E> = Box<dyn FnMut(&E) -> Correlation + 'h>;

/// Handler for pointer enter/leave on an element.
pub type HoverHandler<'h, E> = Box<dyn FnMut(&E, HoverState) -> StyleChange + 'h>;

/// Registers interaction handlers on rendered elements of type `E`.
pub trait InteractionDispatch<'h, E: 'h> {
    fn on_primary_interaction(&mut self, element: &E, handler: PrimaryHandler<'h, E>);
    fn on_hover_change(&mut self, element: &E, handler: HoverHandler<'h, E>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Enter,
    Leave,
}

/// Opacity used for the hover affordance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverStyle {
    pub hover_opacity: f64,
    pub rest_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            hover_opacity: 0.7,
            rest_opacity: 1.0,
        }
    }
}

impl HoverStyle {
    pub fn style_for(&self, state: HoverState) -> StyleChange {
        let opacity = match state {
            HoverState::Enter => self.hover_opacity,
            HoverState::Leave => self.rest_opacity,
        };
        StyleChange {
            opacity,
            pointer_cursor: true,
        }
    }
}

/// Presentation change to apply to a hovered element. Purely visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleChange {
    pub opacity: f64,
    pub pointer_cursor: bool,
}

/// A dispatcher that stores bindings in memory and replays interactions on
/// request. Used by native front ends and tests.
pub struct RecordingDispatch<'h, E> {
    primary: Vec<(E, PrimaryHandler<'h, E>)>,
    hover: Vec<(E, HoverHandler<'h, E>)>,
}

impl<E> Default for RecordingDispatch<'_, E> {
    fn default() -> Self {
        Self {
            primary: Vec::new(),
            hover: Vec::new(),
        }
    }
}

impl<'h, E: Clone + PartialEq + 'h> RecordingDispatch<'h, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements with a primary binding, in registration order.
    pub fn bound_elements(&self) -> Vec<E> {
        self.primary.iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn is_bound(&self, element: &E) -> bool {
        self.primary.iter().any(|(e, _)| e == element)
    }

    /// Simulate a click on `element`. `None` if the element has no binding.
    pub fn click(&mut self, element: &E) -> Option<Correlation> {
        let (bound, handler) = self.primary.iter_mut().find(|(e, _)| e == element)?;
        Some(handler(bound))
    }

    /// Simulate pointer enter/leave on `element`.
    pub fn hover(&mut self, element: &E, state: HoverState) -> Option<StyleChange> {
        let (bound, handler) = self.hover.iter_mut().find(|(e, _)| e == element)?;
        Some(handler(bound, state))
    }

    /// Drop every binding (the rendered tree was replaced).
    pub fn clear(&mut self) {
        self.primary.clear();
        self.hover.clear();
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

impl<'h, E: Clone + 'h> InteractionDispatch<'h, E> for RecordingDispatch<'h, E> {
    fn on_primary_interaction(&mut self, element: &E, handler: PrimaryHandler<'h, E>) {
        self.primary.push((element.clone(), handler));
    }

    fn on_hover_change(&mut self, element: &E, handler: HoverHandler<'h, E>) {
        self.hover.push((element.clone(), handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_style_toggles_opacity() {
        let style = HoverStyle::default();
        assert_eq!(style.style_for(HoverState::Enter).opacity, 0.7);
        assert_eq!(style.style_for(HoverState::Leave).opacity, 1.0);
        assert!(style.style_for(HoverState::Leave).pointer_cursor);
    }

    #[test]
    fn recording_dispatch_replays_bindings() {
        let mut dispatch: RecordingDispatch<'_, u32> = RecordingDispatch::new();
        dispatch.on_primary_interaction(&7, Box::new(|_| Correlation::NoLabel));
        dispatch.on_hover_change(
            &7,
            Box::new(|_, state| HoverStyle::default().style_for(state)),
        );

        assert!(dispatch.is_bound(&7));
        assert_eq!(dispatch.click(&7), Some(Correlation::NoLabel));
        assert_eq!(dispatch.click(&8), None);
        assert_eq!(
            dispatch.hover(&7, HoverState::Enter).map(|s| s.opacity),
            Some(0.7)
        );

        dispatch.clear();
        assert!(dispatch.is_empty());
    }
}
