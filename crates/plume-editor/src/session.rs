//! Editor session: render lifecycle, view transform, and status reporting.
//!
//! A `Session` is the per-page state of the editor. It is built from an
//! injected text surface and status sink, owns the correlation controller
//! and the pan/zoom transform, and holds the current rendered tree.
//!
//! Render lifecycle:
//!
//! - `begin_render` validates the source and produces the request; the
//!   network round trip itself belongs to the caller.
//! - `apply_render` replaces the rendered tree wholesale on success. There
//!   is no diffing: old bindings must be dropped and `attach_*` called again.
//!   The view transform is reset to identity on every successful render.
//! - Failures replace the diagram with an error panel and leave the session
//!   usable.

use crate::correlate::CorrelationController;
use crate::dispatch::{HoverStyle, InteractionDispatch};
use crate::examples::{Example, builtin_examples};
use crate::input::InputEvent;
use crate::render::{PLACEHOLDER_HTML, RenderError, RenderRequest, RenderResponse, error_panel_html};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::status::{Severity, StatusMessage, StatusSink};
use crate::surface::TextSurface;
use plume_core::model::{ElementRef, RenderedElement};
use plume_core::{LineMetrics, SvgDocument, ViewTransform, WheelOutcome, ZoomConfig};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Tunables for a session. Every field may be omitted from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub zoom: ZoomConfig,
    pub metrics: LineMetrics,
    pub hover: HoverStyle,
}

impl SessionConfig {
    /// Parse a JSON object of overrides. Zoom limits that cannot be used
    /// (non-positive, non-finite, or `min_scale > max_scale`) are rejected.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid session config: {e}"))?;
        config
            .zoom
            .validate()
            .map_err(|e| format!("Invalid session config: {e}"))?;
        Ok(config)
    }
}

/// What the preview panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Placeholder,
    Diagram { markup: String },
    Error(RenderError),
}

impl Preview {
    /// Markup to place in the preview panel.
    pub fn html(&self) -> String {
        match self {
            Preview::Placeholder => PLACEHOLDER_HTML.to_string(),
            Preview::Diagram { markup } => markup.clone(),
            Preview::Error(err) => error_panel_html(err),
        }
    }
}

/// Effect of an input event on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// The browser's default action must be suppressed.
    pub prevent_default: bool,
    /// The container transform must be re-applied.
    pub transform_changed: bool,
    /// A shortcut the caller must act on (e.g. start a render).
    pub action: Option<ShortcutAction>,
}

pub struct Session<S, K> {
    controller: Rc<CorrelationController<S, K>>,
    transform: ViewTransform,
    document: Option<SvgDocument>,
    preview: Preview,
    examples: Vec<Example>,
    /// Last render/loading outcome shown, cleared once the user edits.
    feedback: RefCell<Option<StatusMessage>>,
}

impl<S: TextSurface, K: StatusSink> Session<S, K> {
    pub fn new(surface: Rc<RefCell<S>>, status: Rc<RefCell<K>>, config: SessionConfig) -> Self {
        status.borrow_mut().update("Ready", Severity::Default);
        Self {
            controller: Rc::new(CorrelationController::new(
                surface,
                status,
                config.metrics,
                config.hover,
            )),
            transform: ViewTransform::new(config.zoom),
            document: None,
            preview: Preview::Placeholder,
            examples: builtin_examples(),
            feedback: RefCell::new(None),
        }
    }

    pub fn controller(&self) -> &Rc<CorrelationController<S, K>> {
        &self.controller
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        self.controller.surface()
    }

    pub fn status(&self) -> &Rc<RefCell<K>> {
        self.controller.status()
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// The tree of the last successful render, if it is still displayed.
    pub fn document(&self) -> Option<&SvgDocument> {
        self.document.as_ref()
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    fn report(&self, message: &str, severity: Severity) {
        self.status().borrow_mut().update(message, severity);
    }

    /// Report a render or loading outcome that goes stale on the next edit.
    fn report_feedback(&self, message: &str, severity: Severity) {
        self.report(message, severity);
        *self.feedback.borrow_mut() = Some(StatusMessage {
            text: message.to_string(),
            severity,
        });
    }

    // ─── Render lifecycle ────────────────────────────────────────────────

    /// Build a render request from the current source.
    ///
    /// Blank source is rejected without a request: the status shows an
    /// error and the editor regains focus.
    pub fn begin_render(&mut self) -> Result<RenderRequest, RenderError> {
        let source = self.surface().borrow().text();
        let code = source.trim();
        if code.is_empty() {
            let err = RenderError::EmptySource;
            self.report(&err.status_text(), Severity::Error);
            self.surface().borrow_mut().focus();
            return Err(err);
        }

        self.report("Rendering SVG diagram...", Severity::Loading);
        Ok(RenderRequest::svg(code))
    }

    /// Apply the renderer's answer. On success the previous tree is
    /// discarded and the new one returned for binding.
    pub fn apply_render(&mut self, response: RenderResponse) -> Result<&SvgDocument, RenderError> {
        match response.into_document() {
            Ok((markup, document)) => {
                log::debug!("render replaced diagram ({} elements)", document.len());
                self.transform.reset();
                self.preview = Preview::Diagram { markup };
                self.report_feedback(
                    "SVG rendered! Click a diagram element to jump to its source",
                    Severity::Success,
                );
                let document = &*self.document.insert(document);
                Ok(document)
            }
            Err(err) => {
                self.render_failed(err.clone());
                Err(err)
            }
        }
    }

    /// The render request itself failed (offline, server down…).
    pub fn network_failed(&mut self, message: &str) -> RenderError {
        let err = RenderError::Network(message.to_string());
        self.render_failed(err.clone());
        err
    }

    /// Show `err` in place of the diagram.
    pub fn render_failed(&mut self, err: RenderError) {
        log::warn!("render failed: {err}");
        self.report_feedback(&err.status_text(), Severity::Error);
        self.document = None;
        self.preview = Preview::Error(err);
    }

    /// Bind click/hover handlers on the current parsed tree.
    pub fn attach_document<'h, D>(&'h self, dispatch: &mut D) -> usize
    where
        D: InteractionDispatch<'h, ElementRef<'h>>,
        S: 'h,
        K: 'h,
    {
        match &self.document {
            Some(doc) => self.controller.attach(&doc.root_element(), dispatch),
            None => 0,
        }
    }

    /// Bind click/hover handlers on any rendered tree (e.g. live DOM nodes
    /// for the diagram just displayed).
    pub fn attach<'h, E, D>(&self, root: &E, dispatch: &mut D) -> usize
    where
        E: RenderedElement + 'h,
        D: InteractionDispatch<'h, E>,
        S: 'h,
        K: 'h,
    {
        self.controller.attach(root, dispatch)
    }

    // ─── View transform ──────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in();
        self.report_zoom();
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out();
        self.report_zoom();
    }

    pub fn reset_zoom(&mut self) {
        self.transform.reset();
        self.report_zoom();
    }

    fn report_zoom(&self) {
        self.report(
            &format!("Zoom: {}%", self.transform.zoom_percent()),
            Severity::Default,
        );
    }

    /// Route a normalized input event to the transform or shortcut map.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputOutcome {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                self.transform.begin_pan(*x, *y, *button);
                InputOutcome::default()
            }
            InputEvent::PointerMove { x, y } => InputOutcome {
                transform_changed: self.transform.pan_to(*x, *y),
                ..InputOutcome::default()
            },
            InputEvent::PointerUp => {
                self.transform.end_pan();
                InputOutcome::default()
            }
            InputEvent::Wheel { delta_y, modifiers } => {
                let outcome = self.transform.wheel(*delta_y, modifiers.command());
                let zoomed = outcome == WheelOutcome::Zoomed;
                if zoomed {
                    self.report_zoom();
                }
                InputOutcome {
                    prevent_default: outcome.prevents_default(),
                    transform_changed: zoomed,
                    action: None,
                }
            }
            InputEvent::Key { key, modifiers } => {
                let action = ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                );
                let transform_changed = match action {
                    Some(ShortcutAction::ZoomIn) => {
                        self.zoom_in();
                        true
                    }
                    Some(ShortcutAction::ZoomOut) => {
                        self.zoom_out();
                        true
                    }
                    Some(ShortcutAction::ZoomReset) => {
                        self.reset_zoom();
                        true
                    }
                    Some(ShortcutAction::Render) | None => false,
                };
                InputOutcome {
                    prevent_default: action.is_some(),
                    transform_changed,
                    action,
                }
            }
        }
    }

    // ─── Source text ─────────────────────────────────────────────────────

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Replace the example list (e.g. with the server's).
    pub fn set_examples(&mut self, examples: Vec<Example>) {
        self.examples = examples;
    }

    pub fn examples_failed(&self, message: &str) {
        log::warn!("loading examples failed: {message}");
        self.report_feedback("Failed to load examples", Severity::Error);
    }

    /// Load example `index` into the editor. Unknown indices are ignored.
    pub fn load_example(&mut self, index: usize) -> bool {
        let Some(example) = self.examples.get(index) else {
            return false;
        };
        {
            let mut surface = self.surface().borrow_mut();
            surface.set_text(&example.code);
            surface.focus();
        }
        self.report(&format!("Loaded example: {}", example.name), Severity::Success);
        true
    }

    /// Empty the editor and the preview.
    pub fn clear(&mut self) {
        {
            let mut surface = self.surface().borrow_mut();
            surface.set_text("");
            surface.focus();
        }
        self.document = None;
        self.preview = Preview::Placeholder;
        self.transform.reset();
        self.report("Editor cleared", Severity::Default);
    }

    /// The user typed. A render or loading outcome still on display is
    /// replaced by a hint; any other status (a jump, a loaded example,
    /// connectivity) is left alone.
    pub fn source_edited(&self) {
        let Some(feedback) = self.feedback.borrow_mut().take() else {
            return;
        };
        let stale = self.status().borrow().last() == Some(&feedback);
        if stale {
            self.report("Modified, render to see the result", Severity::Default);
        }
    }

    pub fn connectivity_changed(&self, online: bool) {
        if online {
            self.report("Network connection restored", Severity::Success);
        } else {
            self.report("Network connection lost", Severity::Error);
        }
    }
}
