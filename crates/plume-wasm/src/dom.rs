//! DOM-backed collaborators for the editor session.
//!
//! The session only sees the `plume-editor` traits; everything here maps
//! them onto live page nodes: the `<textarea>` holding the source, the
//! status line, and the listeners bound to the displayed `<svg>`.

use plume_core::SelectionRange;
use plume_core::model::{ElementCategory, RenderedElement};
use plume_editor::dispatch::{HoverHandler, PrimaryHandler, StyleChange};
use plume_editor::{HoverState, InteractionDispatch, Severity, StatusMessage, StatusSink, TextSurface};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlTextAreaElement, SvgElement};

// ─── Rendered elements ───────────────────────────────────────────────────

/// A live element of the displayed diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement(pub Element);

impl RenderedElement for DomElement {
    fn category(&self) -> ElementCategory {
        let tag = self.0.tag_name().to_ascii_lowercase();
        ElementCategory::classify(&tag, self.0.get_attribute("class").as_deref())
    }

    fn own_text(&self) -> Option<String> {
        if self.category().is_text() {
            Some(self.0.text_content().unwrap_or_default())
        } else {
            None
        }
    }

    fn children(&self) -> Vec<Self> {
        let list = self.0.children();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .map(DomElement)
            .collect()
    }
}

// ─── Source textarea ─────────────────────────────────────────────────────

pub struct TextAreaSurface {
    element: HtmlTextAreaElement,
}

impl TextAreaSurface {
    pub fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }
}

impl TextSurface for TextAreaSurface {
    fn text(&self) -> String {
        self.element.value()
    }

    fn set_text(&mut self, text: &str) {
        self.element.set_value(text);
    }

    fn selection(&self) -> SelectionRange {
        let start = self.element.selection_start().ok().flatten().unwrap_or(0);
        let end = self.element.selection_end().ok().flatten().unwrap_or(start);
        SelectionRange {
            start: start as usize,
            end: end as usize,
        }
    }

    fn set_selection(&mut self, range: SelectionRange) {
        if let Err(err) = self
            .element
            .set_selection_range(range.start as u32, range.end as u32)
        {
            log::warn!("set_selection_range failed: {err:?}");
        }
    }

    fn focus(&mut self) {
        let _ = self.element.focus();
    }

    fn viewport_height(&self) -> f64 {
        f64::from(self.element.client_height())
    }

    // `scrollTop` goes through Reflect: its binding type changed between
    // web-sys releases (i32 → f64).
    fn scroll_top(&self) -> f64 {
        js_sys::Reflect::get(&self.element, &JsValue::from_str("scrollTop"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn set_scroll_top(&mut self, offset: f64) {
        let _ = js_sys::Reflect::set(
            &self.element,
            &JsValue::from_str("scrollTop"),
            &JsValue::from_f64(offset),
        );
    }
}

// ─── Status line ─────────────────────────────────────────────────────────

/// Writes messages into a status element as `class="status <severity>"`.
pub struct DomStatus {
    element: Element,
    last: Option<StatusMessage>,
}

impl DomStatus {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            last: None,
        }
    }
}

impl StatusSink for DomStatus {
    fn update(&mut self, message: &str, severity: Severity) {
        self.element.set_text_content(Some(message));
        self.element
            .set_class_name(&format!("status {}", severity.as_str()));
        self.last = Some(StatusMessage {
            text: message.to_string(),
            severity,
        });
    }

    fn last(&self) -> Option<&StatusMessage> {
        self.last.as_ref()
    }
}

// ─── Event listeners ─────────────────────────────────────────────────────

struct Listener {
    target: Element,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Binds session handlers as DOM event listeners and owns their closures.
///
/// Listeners live until `clear` (called before each re-render) or drop.
#[derive(Default)]
pub struct DomDispatch {
    listeners: Vec<Listener>,
}

impl DomDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered DOM listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Detach and drop every listener.
    pub fn clear(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }

    fn listen(&mut self, target: &Element, event: &'static str, callback: Closure<dyn FnMut(Event)>) {
        match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener {
                target: target.clone(),
                event,
                callback,
            }),
            Err(err) => log::warn!("failed to bind {event}: {err:?}"),
        }
    }
}

impl Drop for DomDispatch {
    fn drop(&mut self) {
        self.clear();
    }
}

fn apply_style(element: &Element, change: StyleChange) {
    let Some(svg) = element.dyn_ref::<SvgElement>() else {
        return;
    };
    let style = svg.style();
    let _ = style.set_property("opacity", &change.opacity.to_string());
    if change.pointer_cursor {
        let _ = style.set_property("cursor", "pointer");
    }
}

impl InteractionDispatch<'static, DomElement> for DomDispatch {
    fn on_primary_interaction(
        &mut self,
        element: &DomElement,
        mut handler: PrimaryHandler<'static, DomElement>,
    ) {
        let target = element.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // Innermost bound element wins.
            event.stop_propagation();
            event.prevent_default();
            let outcome = handler(&target);
            log::trace!("click → {outcome:?}");
        });
        self.listen(&element.0, "click", callback);
    }

    fn on_hover_change(&mut self, element: &DomElement, handler: HoverHandler<'static, DomElement>) {
        let shared = Rc::new(RefCell::new(handler));
        for (event, state) in [
            ("mouseenter", HoverState::Enter),
            ("mouseleave", HoverState::Leave),
        ] {
            let shared = Rc::clone(&shared);
            let target = element.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let mut hover = shared.borrow_mut();
                let change = (*hover)(&target, state);
                apply_style(&target.0, change);
            });
            self.listen(&element.0, event, callback);
        }
    }
}
