//! WASM bridge for Plume: exposes the editor session to the page script.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the network:
//! it asks for a render request, performs the fetch, and hands the JSON
//! response back. Everything else (binding, correlation, pan/zoom, status)
//! happens here.

mod dom;

pub use dom::{DomDispatch, DomElement, DomStatus, TextAreaSurface};

use plume_core::{NodeIndex, SvgDocument, extract_label, parse_svg};
use plume_editor::examples::ExamplesResponse;
use plume_editor::input::{InputEvent, Modifiers};
use plume_editor::render::RenderResponse;
use plume_editor::shortcuts::ShortcutAction;
use plume_editor::{InputOutcome, Session, SessionConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlTextAreaElement, SvgElement};

/// The page-facing editor controller.
///
/// Wraps the session with its DOM collaborators and the listeners bound to
/// the currently displayed diagram.
#[wasm_bindgen]
pub struct PlumeEditor {
    session: Session<TextAreaSurface, DomStatus>,
    dispatch: DomDispatch,
    preview: Element,
}

#[wasm_bindgen]
impl PlumeEditor {
    /// Mount on the source textarea, status line, and preview panel with
    /// the given element ids. `config_json` optionally overrides
    /// `SessionConfig` fields, e.g. `{"zoom":{"max_scale":3.0}}`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        editor_id: &str,
        status_id: &str,
        preview_id: &str,
        config_json: Option<String>,
    ) -> Result<PlumeEditor, JsValue> {
        console_error_panic_hook_setup();
        console_logger_setup();

        let config = match config_json.as_deref() {
            Some(json) => SessionConfig::from_json(json).map_err(|e| JsValue::from_str(&e))?,
            None => SessionConfig::default(),
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let editor = find_element(&document, editor_id)?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| JsValue::from_str(&format!("#{editor_id} is not a <textarea>")))?;
        let status = find_element(&document, status_id)?;
        let preview = find_element(&document, preview_id)?;

        let session = Session::new(
            Rc::new(RefCell::new(TextAreaSurface::new(editor))),
            Rc::new(RefCell::new(DomStatus::new(status))),
            config,
        );
        preview.set_inner_html(&session.preview().html());

        Ok(Self {
            session,
            dispatch: DomDispatch::new(),
            preview,
        })
    }

    // ─── Render lifecycle ────────────────────────────────────────────────

    /// Validate the source and build the `/api/render` body.
    ///
    /// Returns JSON `{"ok":true,"request":{...}}` or `{"ok":false,"error":"..."}`.
    pub fn begin_render(&mut self) -> String {
        match self.session.begin_render() {
            Ok(request) => serde_json::json!({ "ok": true, "request": request }).to_string(),
            Err(err) => serde_json::json!({ "ok": false, "error": err.to_string() }).to_string(),
        }
    }

    /// Display the `/api/render` response and bind the new diagram.
    /// Returns `true` if a diagram is now displayed.
    pub fn apply_render_response(&mut self, json: &str) -> bool {
        self.dispatch.clear();
        let displayed = match RenderResponse::from_json(json) {
            Ok(response) => self.session.apply_render(response).is_ok(),
            Err(err) => {
                self.session.render_failed(err);
                false
            }
        };
        self.preview.set_inner_html(&self.session.preview().html());
        if displayed {
            let bound = self.bind_diagram();
            log::info!("diagram displayed, {bound} elements clickable");
            self.apply_transform();
        }
        displayed
    }

    /// The render fetch itself failed.
    pub fn network_failed(&mut self, message: &str) {
        self.dispatch.clear();
        self.session.network_failed(message);
        self.preview.set_inner_html(&self.session.preview().html());
    }

    // ─── Pointer / wheel / keyboard ──────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) {
        self.route(InputEvent::from_pointer_down(x, y, button));
    }

    /// Returns `true` if the diagram moved.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.route(InputEvent::from_pointer_move(x, y)).transform_changed
    }

    pub fn pointer_up(&mut self) {
        self.route(InputEvent::PointerUp);
    }

    /// Returns `true` if the page must call `preventDefault()`.
    pub fn wheel(&mut self, delta_y: f64, ctrl: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            ctrl,
            meta,
            ..Modifiers::NONE
        };
        self.route(InputEvent::from_wheel(delta_y, modifiers))
            .prevent_default
    }

    /// Handle a keyboard event. Returns JSON:
    /// `{"handled":bool, "action":"<action_name>"}`. The page starts a
    /// render fetch when the action is `"render"`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let outcome = self.route(InputEvent::from_key(key, modifiers));
        let action = outcome.action.map_or("none", action_to_name);
        let handled = if outcome.prevent_default { "true" } else { "false" };
        format!(r#"{{"handled":{handled},"action":"{action}"}}"#)
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
        self.apply_transform();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
        self.apply_transform();
    }

    pub fn reset_zoom(&mut self) {
        self.session.reset_zoom();
        self.apply_transform();
    }

    /// Current CSS `transform` of the diagram.
    pub fn transform_css(&self) -> String {
        self.session.transform().css_transform()
    }

    // ─── Source text ─────────────────────────────────────────────────────

    /// The example list as JSON: `{"examples":[{"name","code","description"}]}`.
    pub fn examples_json(&self) -> String {
        let payload = ExamplesResponse {
            examples: self.session.examples().to_vec(),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| r#"{"examples":[]}"#.to_string())
    }

    /// Replace the example list with the `/api/examples` response.
    pub fn set_examples_json(&mut self, json: &str) -> bool {
        match ExamplesResponse::from_json(json) {
            Ok(payload) => {
                self.session.set_examples(payload.examples);
                true
            }
            Err(e) => {
                self.session.examples_failed(&e);
                false
            }
        }
    }

    pub fn examples_failed(&self, message: &str) {
        self.session.examples_failed(message);
    }

    pub fn load_example(&mut self, index: usize) -> bool {
        self.session.load_example(index)
    }

    pub fn clear(&mut self) {
        self.dispatch.clear();
        self.session.clear();
        self.preview.set_inner_html(&self.session.preview().html());
    }

    /// Call from the textarea's `input` event.
    pub fn source_edited(&self) {
        self.session.source_edited();
    }

    /// Call from the window's `online` / `offline` events.
    pub fn connectivity_changed(&self, online: bool) {
        self.session.connectivity_changed(online);
    }
}

impl PlumeEditor {
    fn route(&mut self, event: InputEvent) -> InputOutcome {
        let outcome = self.session.handle_input(&event);
        if outcome.transform_changed {
            self.apply_transform();
        }
        outcome
    }

    fn displayed_svg(&self) -> Option<Element> {
        self.preview.query_selector("svg").ok().flatten()
    }

    fn bind_diagram(&mut self) -> usize {
        match self.displayed_svg() {
            Some(svg) => self.session.attach(&DomElement(svg), &mut self.dispatch),
            None => {
                log::warn!("preview holds no <svg> element to bind");
                0
            }
        }
    }

    fn apply_transform(&self) {
        let Some(svg) = self.displayed_svg() else {
            return;
        };
        if let Some(svg) = svg.dyn_ref::<SvgElement>() {
            let style = svg.style();
            let _ = style.set_property("transform-origin", "0 0");
            let _ = style.set_property("transform", &self.session.transform().css_transform());
        }
    }
}

fn find_element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id #{id}")))
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Render => "render",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomReset => "zoomReset",
    }
}

// ─── Panic hook and console logging ──────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Plume WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Routes `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn console_logger_setup() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// Change the console log level (`"off"`, `"error"` … `"trace"`).
/// Returns `false` for unknown level names.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

// ─── Standalone functions (no mounted editor needed) ─────────────────────

/// Check that `markup` is displayable SVG.
/// Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_svg(markup: &str) -> String {
    match parse_svg(markup) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e }).to_string(),
    }
}

/// Parse `markup` and return its element tree as JSON for debugging panels.
/// Returns JSON `{"ok":true,"root":{...}}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn outline_json(markup: &str) -> String {
    match parse_svg(markup) {
        Ok(doc) => {
            let root = collect_outline(&doc, doc.root);
            serde_json::json!({ "ok": true, "root": root }).to_string()
        }
        Err(e) => serde_json::json!({ "ok": false, "error": e }).to_string(),
    }
}

/// Recursively collect elements into a serializable tree. Interactive
/// elements carry the label a click would search for.
fn collect_outline(doc: &SvgDocument, idx: NodeIndex) -> serde_json::Value {
    let element = doc.element(idx);
    let node = element.node();
    let children: Vec<serde_json::Value> = doc
        .children(idx)
        .into_iter()
        .map(|child| collect_outline(doc, child))
        .collect();

    let mut obj = serde_json::json!({ "tag": node.tag });
    if let Some(id) = &node.id {
        obj["id"] = serde_json::Value::String(id.clone());
    }
    if !node.classes.is_empty() {
        obj["class"] = serde_json::Value::String(node.class_attr());
    }
    if node.category.is_interactive() {
        obj["label"] = serde_json::Value::String(extract_label(&element));
    }
    if !children.is_empty() {
        obj["children"] = serde_json::Value::Array(children);
    }
    obj
}
