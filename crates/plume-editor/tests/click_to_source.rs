//! Integration tests: rendered diagram → bound handlers → editor selection.
//!
//! Drives a `Session` through a render, binds the parsed tree with a
//! recording dispatcher, and replays clicks and hovers the way the page
//! would deliver them.

use plume_core::SelectionRange;
use plume_core::model::ElementRef;
use plume_editor::dispatch::RecordingDispatch;
use plume_editor::render::RenderResponse;
use plume_editor::{
    BufferSurface, Correlation, HoverState, Session, SessionConfig, Severity, StatusLog,
    StatusSink, TextSurface,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const SEQUENCE_SVG: &str = include_str!("fixtures/sequence.svg");
const SEQUENCE_SRC: &str = include_str!("fixtures/sequence.puml");
const USECASE_SVG: &str = include_str!("fixtures/usecase.svg");
const USECASE_SRC: &str = include_str!("fixtures/usecase.puml");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rendered_session(source: &str, svg: &str, viewport: f64) -> Session<BufferSurface, StatusLog> {
    init_logging();
    let mut session = Session::new(
        Rc::new(RefCell::new(BufferSurface::new(source, viewport))),
        Rc::new(RefCell::new(StatusLog::new())),
        SessionConfig::default(),
    );
    session
        .apply_render(RenderResponse::ok(svg))
        .expect("fixture should render");
    session
}

fn text_element<'a>(session: &'a Session<BufferSurface, StatusLog>, text: &str) -> ElementRef<'a> {
    session
        .document()
        .unwrap()
        .elements()
        .into_iter()
        .find(|e| e.tag() == "text" && e.text_content() == text)
        .unwrap_or_else(|| panic!("no <text> with {text:?}"))
}

fn last_status(session: &Session<BufferSurface, StatusLog>) -> (String, Severity) {
    let status = session.status().borrow();
    let m = status.last().unwrap();
    (m.text.clone(), m.severity)
}

// ─── Binding ─────────────────────────────────────────────────────────────

#[test]
fn attach_binds_every_interactive_element() {
    let session = rendered_session(SEQUENCE_SRC, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    assert_eq!(session.attach_document(&mut dispatch), 10);
    assert_eq!(dispatch.len(), 10);

    // Lifeline groups and connector lines are not clickable.
    let doc = session.document().unwrap();
    let lifeline = doc.element_by_id("elem_lifeline_Alice").unwrap();
    assert!(!dispatch.is_bound(&lifeline));
}

#[test]
fn usecase_groups_and_their_children_are_bound_individually() {
    let session = rendered_session(USECASE_SRC, USECASE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let doc = session.document().unwrap();
    let usecase = doc.element_by_id("ent0003").unwrap();
    let actor = doc.element_by_id("ent0002").unwrap();
    assert!(dispatch.is_bound(&usecase));
    assert!(!dispatch.is_bound(&actor));
    for child in doc.children(usecase.index()) {
        assert!(dispatch.is_bound(&doc.element(child)));
    }
}

// ─── Click → source ──────────────────────────────────────────────────────

#[test]
fn clicking_participant_label_selects_declaration() {
    let session = rendered_session(SEQUENCE_SRC, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let bob = text_element(&session, "Bob");
    let outcome = dispatch.click(&bob).unwrap();
    assert_eq!(
        outcome,
        Correlation::Jumped {
            label: "Bob".into(),
            line: 2,
            range: SelectionRange { start: 28, end: 43 },
        }
    );

    let surface = session.surface().borrow();
    assert_eq!(surface.selected_text(), Some("participant Bob"));
    assert!(surface.is_focused());
    assert_eq!(
        last_status(&session),
        (
            "Jumped to the line containing \"Bob\"".to_string(),
            Severity::Success
        )
    );
}

#[test]
fn clicking_group_uses_its_first_text() {
    let session = rendered_session(USECASE_SRC, USECASE_SVG, 40.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let profile = session.document().unwrap().element_by_id("ent0004").unwrap();
    let outcome = dispatch.click(&profile).unwrap();
    assert!(matches!(outcome, Correlation::Jumped { line: 5, .. }));

    let surface = session.surface().borrow();
    assert_eq!(
        surface.selected_text(),
        Some("  usecase \"View profile\" as UC2")
    );
    // Line 5 at 20px per line, centred in a 40px viewport.
    assert_eq!(surface.scroll_top(), 80.0);
}

#[test]
fn message_text_matches_case_insensitively() {
    let source = "@startuml\nalice -> bob: AUTHENTICATION request\n@enduml";
    let session = rendered_session(source, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let message = text_element(&session, "Authentication Request");
    assert!(matches!(
        dispatch.click(&message),
        Some(Correlation::Jumped { line: 1, .. })
    ));
}

#[test]
fn unmatched_label_reports_error_and_keeps_selection() {
    let source = "@startuml\nparticipant Alice\n@enduml";
    let session = rendered_session(source, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let before = session.surface().borrow().selection();
    let bob = text_element(&session, "Bob");
    assert_eq!(
        dispatch.click(&bob),
        Some(Correlation::NotFound {
            label: "Bob".into()
        })
    );
    assert_eq!(session.surface().borrow().selection(), before);
    assert_eq!(last_status(&session).1, Severity::Error);
}

#[test]
fn shape_without_text_is_silent() {
    let session = rendered_session(SEQUENCE_SRC, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);
    let status_count = session.status().borrow().len();

    let arrow_head = session
        .document()
        .unwrap()
        .elements()
        .into_iter()
        .find(|e| e.tag() == "polygon")
        .unwrap();
    assert_eq!(dispatch.click(&arrow_head), Some(Correlation::NoLabel));
    assert_eq!(session.status().borrow().len(), status_count);
    assert!(!session.surface().borrow().is_focused());
}

// ─── Hover ───────────────────────────────────────────────────────────────

#[test]
fn hover_dims_and_restores() {
    let session = rendered_session(SEQUENCE_SRC, SEQUENCE_SVG, 400.0);
    let mut dispatch = RecordingDispatch::new();
    session.attach_document(&mut dispatch);

    let alice = text_element(&session, "Alice");
    let enter = dispatch.hover(&alice, HoverState::Enter).unwrap();
    let leave = dispatch.hover(&alice, HoverState::Leave).unwrap();
    assert_eq!((enter.opacity, leave.opacity), (0.7, 1.0));
    assert!(enter.pointer_cursor);
    assert_eq!(session.surface().borrow().selection(), SelectionRange::default());
}

// ─── Re-render ───────────────────────────────────────────────────────────

#[test]
fn rerender_replaces_tree_and_bindings() {
    let mut session = rendered_session(USECASE_SRC, SEQUENCE_SVG, 400.0);
    {
        let mut dispatch = RecordingDispatch::new();
        assert_eq!(session.attach_document(&mut dispatch), 10);
    }

    session.apply_render(RenderResponse::ok(USECASE_SVG)).unwrap();
    let mut dispatch = RecordingDispatch::new();
    assert_eq!(session.attach_document(&mut dispatch), 10);
    assert!(session.document().unwrap().element_by_id("ent0003").is_some());
    assert!(
        session
            .document()
            .unwrap()
            .element_by_id("elem_lifeline_Alice")
            .is_none()
    );
}

#[test]
fn failed_render_leaves_nothing_to_bind() {
    let mut session = rendered_session(SEQUENCE_SRC, SEQUENCE_SVG, 400.0);
    assert!(session.apply_render(RenderResponse::failed("boom")).is_err());
    let mut dispatch = RecordingDispatch::new();
    assert_eq!(session.attach_document(&mut dispatch), 0);
}
