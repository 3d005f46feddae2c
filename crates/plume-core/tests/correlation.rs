//! Integration tests: SVG payload → element tree → label → source line → range.
//!
//! Exercises the full `plume-core` correlation pipeline on renderer-shaped
//! output without any UI collaborator.

use plume_core::model::{ElementCategory, GroupRole, RenderedElement};
use plume_core::{
    SelectionRange, SvgDocument, extract_label, locate_in_text, locate_line, parse_svg,
    select_line, split_lines,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sequence_doc() -> SvgDocument {
    init_logging();
    parse_svg(include_str!("fixtures/sequence.svg")).expect("sequence fixture should parse")
}

/// Follow one element through extract → locate → select against `source`.
fn correlate<E: RenderedElement>(element: &E, source: &str) -> Option<(usize, SelectionRange)> {
    let label = extract_label(element);
    let lines = split_lines(source);
    let line = locate_line(&label, &lines)?;
    Some((line, select_line(line, &lines)?))
}

// ─── Tree shape ──────────────────────────────────────────────────────────

#[test]
fn sequence_fixture_has_participant_groups() {
    let doc = sequence_doc();
    let participants: Vec<String> = doc
        .elements()
        .iter()
        .filter(|e| e.category() == ElementCategory::Group(GroupRole::Participant))
        .map(extract_label)
        .collect();
    assert_eq!(participants, vec!["Alice", "Bob"]);
}

#[test]
fn every_interactive_element_is_reachable() {
    let doc = sequence_doc();
    let interactive = doc
        .elements()
        .iter()
        .filter(|e| e.category().is_interactive())
        .count();
    // 2 participant groups, 2 rects, 4 texts, 2 polygons.
    assert_eq!(interactive, 10);
}

// ─── End to end ──────────────────────────────────────────────────────────

#[test]
fn participant_click_selects_declaration_line() {
    let doc = sequence_doc();
    let source = include_str!("fixtures/sequence.puml");
    let bob = doc
        .elements()
        .into_iter()
        .find(|e| e.category().is_text() && e.text_content() == "Bob")
        .unwrap();

    let (line, range) = correlate(&bob, source).unwrap();
    assert_eq!(line, 2);
    assert_eq!(range.slice(source), Some("participant Bob"));
}

#[test]
fn message_polygon_resolves_through_group_text() {
    let doc = sequence_doc();
    let source = include_str!("fixtures/sequence.puml");
    // Arrow heads carry no text of their own; a message group does.
    let message = doc
        .elements()
        .into_iter()
        .find(|e| e.node().classes.iter().any(|c| c == "message"))
        .unwrap();
    assert_eq!(extract_label(&message), "Authentication Request");

    let (line, _) = correlate(&message, source).unwrap();
    assert_eq!(line, 3);

    let arrow_head = message.children()[0];
    assert_eq!(correlate(&arrow_head, source), None);
}

#[test]
fn usecase_fixture_correlates_by_label() {
    init_logging();
    let doc = parse_svg(include_str!("fixtures/usecase.svg")).unwrap();
    let source = "@startuml\nactor User as u\nusecase \"Log in\" as UC1\nusecase \"View profile\" as UC2\nu --> UC1\n@enduml";

    let login = doc.element_by_id("ent0003").unwrap();
    assert_eq!(login.category(), ElementCategory::Group(GroupRole::UseCase));
    assert_eq!(locate_in_text(&extract_label(&login), source), Some(2));

    // "entity" is not a participant/usecase/class group.
    let actor = doc.element_by_id("ent0002").unwrap();
    assert!(!actor.category().is_interactive());
    assert_eq!(extract_label(&actor), "User");
    assert_eq!(locate_in_text("User", source), Some(1));

    let link = doc.element_by_id("lnk5").unwrap();
    assert_eq!(extract_label(&link), "");
}

#[test]
fn spec_scenario_alice_bob_hello() {
    let source = "Alice -> Bob: Hello";
    let doc = parse_svg("<svg><g class=\"participant\"><text>Bob</text></g></svg>").unwrap();
    let group = doc.root_element().children()[0];

    assert_eq!(extract_label(&group), "Bob");
    assert_eq!(locate_in_text("Bob", source), Some(0));
    assert_eq!(
        select_line(0, &[source]),
        Some(SelectionRange { start: 0, end: 19 })
    );
    assert_eq!(locate_in_text("Carol", source), None);
}
