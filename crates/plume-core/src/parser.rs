//! SVG markup → `SvgDocument`.
//!
//! Built on `quick-xml` 0.37's pull reader, configured to be forgiving the
//! way the browser is when the payload is dropped into the page: unquoted
//! attribute values are accepted, an end tag closes the nearest open element
//! with the same name (stray ones are ignored) and anything still open at the
//! end of input is closed there. The prolog, doctype, comments and processing
//! instructions are skipped.
//!
//! The document root is the first `<svg>` element in document order, the same
//! element `querySelector("svg")` would return for the payload.

use crate::model::{SvgDocument, SvgNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a rendered SVG payload into an element tree.
///
/// Broken nesting is repaired rather than reported. The only failure is a
/// payload that contains no `<svg>` element at all.
#[must_use = "parsing result should be used"]
pub fn parse_svg(input: &str) -> Result<SvgDocument, String> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack: Vec<ParsedElement> = Vec::new();
    let mut top_level: Vec<ParsedElement> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                // Truncated or garbled markup: keep what was read so far.
                log::warn!(
                    "SVG markup error at byte {}: {err}",
                    reader.buffer_position()
                );
                break;
            }
        };
        match event {
            Event::Start(tag) => stack.push(ParsedElement::from_tag(&tag)),
            Event::Empty(tag) => {
                let element = ParsedElement::from_tag(&tag);
                attach(&mut stack, &mut top_level, element);
            }
            Event::End(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                close(&mut stack, &mut top_level, &name);
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    open.text
                        .push_str(&decode_entities(&String::from_utf8_lossy(&text)));
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    while let Some(open) = stack.pop() {
        log::debug!("auto-closing <{}> at end of input", open.tag);
        attach(&mut stack, &mut top_level, open);
    }

    let svg = top_level
        .into_iter()
        .find_map(ParsedElement::into_first_svg)
        .ok_or_else(|| "No <svg> root element found".to_string())?;

    let mut doc = SvgDocument::new(svg.node);
    let root = doc.root;
    for child in svg.children {
        insert_element_recursive(&mut doc, root, child);
    }

    log::debug!("parsed SVG document with {} elements", doc.len());
    Ok(doc)
}

/// Internal representation during parsing before inserting into the graph.
#[derive(Debug)]
struct ParsedElement {
    tag: String,
    node: SvgNode,
    text: String,
    children: Vec<ParsedElement>,
}

impl ParsedElement {
    fn from_tag(tag: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut id = None;
        let mut class_attr = None;
        let mut attributes = tag.html_attributes();
        attributes.with_checks(false);
        for attr in attributes.filter_map(Result::ok) {
            let slot = match attr.key.as_ref() {
                b"id" => &mut id,
                b"class" => &mut class_attr,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(decode_entities(&String::from_utf8_lossy(&attr.value)));
            }
        }
        let local = name.rsplit(':').next().unwrap_or(&name);
        Self {
            node: SvgNode::new(local, id, class_attr.as_deref()),
            tag: name.clone(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Depth-first search for the first `<svg>` element, consuming `self`.
    fn into_first_svg(self) -> Option<ParsedElement> {
        if self.node.tag == "svg" {
            return Some(self);
        }
        self.children.into_iter().find_map(Self::into_first_svg)
    }
}

/// Close `element`: finalize its text content and hand it to its parent.
fn attach(stack: &mut [ParsedElement], top_level: &mut Vec<ParsedElement>, mut element: ParsedElement) {
    element.node.text = std::mem::take(&mut element.text);
    match stack.last_mut() {
        Some(parent) => {
            parent.text.push_str(&element.node.text);
            parent.children.push(element);
        }
        None => top_level.push(element),
    }
}

/// Handle `</name>`: close the nearest open element called `name` together
/// with everything opened inside it. An end tag matching nothing is dropped.
fn close(stack: &mut Vec<ParsedElement>, top_level: &mut Vec<ParsedElement>, name: &str) {
    let Some(pos) = stack.iter().rposition(|open| open.tag == name) else {
        log::debug!("ignoring stray </{name}>");
        return;
    };
    while stack.len() > pos {
        if let Some(open) = stack.pop() {
            if open.tag != name {
                log::debug!("</{name}> implicitly closes <{}>", open.tag);
            }
            attach(stack, top_level, open);
        }
    }
}

fn insert_element_recursive(
    doc: &mut SvgDocument,
    parent: petgraph::graph::NodeIndex,
    parsed: ParsedElement,
) {
    let idx = doc.add_node(parent, parsed.node);
    for child in parsed.children {
        insert_element_recursive(doc, idx, child);
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// Decode the predefined XML entities, `&nbsp;` and numeric character
/// references. Unknown or malformed references are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find(';').and_then(|end| {
            decode_reference(&rest[1..end]).map(|c| (c, end))
        }) {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
