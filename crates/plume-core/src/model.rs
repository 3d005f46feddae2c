//! Rendered-diagram element model.
//!
//! A successful render produces an SVG document; Plume keeps it as a tree of
//! drawable nodes (text runs, basic shapes, groups). The tree is rebuilt from
//! scratch on every render and never patched in place.
//!
//! Correlation code does not depend on this concrete tree. It only sees the
//! [`RenderedElement`] capability set, which the browser bridge also
//! implements directly on live DOM nodes.

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

// ─── Categories ──────────────────────────────────────────────────────────

/// Basic SVG shape elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Circle,
    Polygon,
    Path,
}

/// What a `<g>` container stands for, judged from its `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupRole {
    Participant,
    UseCase,
    Class,
    /// Any other grouping (layers, clusters, link groups…).
    Plain,
}

impl GroupRole {
    /// Classify a group by substring match on its raw `class` attribute.
    ///
    /// Matching is case-sensitive, mirroring CSS `[class*="…"]` selectors.
    pub fn from_class(class_attr: &str) -> Self {
        if class_attr.contains("participant") {
            GroupRole::Participant
        } else if class_attr.contains("usecase") {
            GroupRole::UseCase
        } else if class_attr.contains("class") {
            GroupRole::Class
        } else {
            GroupRole::Plain
        }
    }
}

/// Tag/category of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCategory {
    /// A text-bearing leaf (`<text>`).
    Text,
    Shape(ShapeKind),
    Group(GroupRole),
    /// Everything else: the `<svg>` root, `<defs>`, `<line>`, `<tspan>`…
    Other,
}

impl ElementCategory {
    /// Classify an element from its tag name and optional `class` attribute.
    ///
    /// Namespace prefixes (`svg:rect`) are ignored.
    pub fn classify(tag: &str, class_attr: Option<&str>) -> Self {
        let local = tag.rsplit(':').next().unwrap_or(tag);
        match local {
            "text" => ElementCategory::Text,
            "rect" => ElementCategory::Shape(ShapeKind::Rect),
            "ellipse" => ElementCategory::Shape(ShapeKind::Ellipse),
            "circle" => ElementCategory::Shape(ShapeKind::Circle),
            "polygon" => ElementCategory::Shape(ShapeKind::Polygon),
            "path" => ElementCategory::Shape(ShapeKind::Path),
            "g" => ElementCategory::Group(GroupRole::from_class(class_attr.unwrap_or(""))),
            _ => ElementCategory::Other,
        }
    }

    /// Whether elements of this category receive click/hover bindings.
    pub fn is_interactive(self) -> bool {
        match self {
            ElementCategory::Text | ElementCategory::Shape(_) => true,
            ElementCategory::Group(role) => role != GroupRole::Plain,
            ElementCategory::Other => false,
        }
    }

    pub fn is_text(self) -> bool {
        self == ElementCategory::Text
    }
}

// ─── Element capability ──────────────────────────────────────────────────

/// The capability set the correlation engine needs from a rendered node.
///
/// Implemented by [`ElementRef`] (parsed SVG tree) and by the browser
/// bridge's DOM wrapper. Children are returned in document order.
pub trait RenderedElement: Sized {
    fn category(&self) -> ElementCategory;

    /// Full text content for text-bearing elements, `None` otherwise.
    fn own_text(&self) -> Option<String>;

    fn children(&self) -> Vec<Self>;
}

// ─── SVG tree ────────────────────────────────────────────────────────────

/// A single element of a parsed SVG document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvgNode {
    /// Local tag name, e.g. `rect`, `g`, `text`.
    pub tag: String,
    pub id: Option<String>,
    /// Whitespace-separated `class` attribute tokens.
    pub classes: SmallVec<[String; 2]>,
    pub category: ElementCategory,
    /// Concatenated character data of this element and all descendants,
    /// in document order (DOM `textContent`).
    pub text: String,
}

impl SvgNode {
    pub fn new(tag: &str, id: Option<String>, class_attr: Option<&str>) -> Self {
        let classes = class_attr
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self {
            tag: tag.to_string(),
            id,
            classes,
            category: ElementCategory::classify(tag, class_attr),
            text: String::new(),
        }
    }

    /// The `class` attribute re-joined with single spaces.
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

/// A parsed SVG document: an ordered tree rooted at the `<svg>` element.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    /// The underlying directed graph (parent → child edges).
    pub graph: StableDiGraph<SvgNode, ()>,

    /// The `<svg>` root element.
    pub root: NodeIndex,

    /// Index from `id` attribute → NodeIndex for fast lookup.
    pub id_index: HashMap<String, NodeIndex>,
}

impl SvgDocument {
    /// Create a document containing only the given root element.
    #[must_use]
    pub fn new(root_node: SvgNode) -> Self {
        let mut graph = StableDiGraph::new();
        let mut id_index = HashMap::new();
        let id = root_node.id.clone();
        let root = graph.add_node(root_node);
        if let Some(id) = id {
            id_index.insert(id, root);
        }
        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Append a child node under `parent`. Children keep insertion order.
    pub fn add_node(&mut self, parent: NodeIndex, node: SvgNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        if let Some(id) = id {
            // First occurrence wins, like `getElementById`.
            self.id_index.entry(id).or_insert(idx);
        }
        idx
    }

    /// Look up an element by its `id` attribute.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&SvgNode> {
        self.graph.node_weight(idx)
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in document (insertion) order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// All strict descendants of `idx` in document (pre-)order.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.children(idx).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Number of elements in the document, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Handle to the root element.
    pub fn root_element(&self) -> ElementRef<'_> {
        self.element(self.root)
    }

    /// Handle to an arbitrary element.
    pub fn element(&self, idx: NodeIndex) -> ElementRef<'_> {
        ElementRef { doc: self, idx }
    }

    /// Handle to the element with the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.index_of(id).map(|idx| self.element(idx))
    }

    /// Every element in document order, root first.
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .map(|idx| self.element(idx))
            .collect()
    }
}

// ─── Element handle ──────────────────────────────────────────────────────

/// A borrowed handle to one element of an [`SvgDocument`].
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a SvgDocument,
    idx: NodeIndex,
}

impl<'a> ElementRef<'a> {
    pub fn index(&self) -> NodeIndex {
        self.idx
    }

    pub fn document(&self) -> &'a SvgDocument {
        self.doc
    }

    pub fn node(&self) -> &'a SvgNode {
        &self.doc.graph[self.idx]
    }

    pub fn tag(&self) -> &'a str {
        &self.node().tag
    }

    pub fn id(&self) -> Option<&'a str> {
        self.node().id.as_deref()
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.doc.parent(self.idx).map(|p| self.doc.element(p))
    }

    /// DOM-style `textContent`, defined for every element.
    pub fn text_content(&self) -> &'a str {
        &self.node().text
    }
}

impl RenderedElement for ElementRef<'_> {
    fn category(&self) -> ElementCategory {
        self.node().category
    }

    fn own_text(&self) -> Option<String> {
        let node = self.node();
        node.category.is_text().then(|| node.text.clone())
    }

    fn children(&self) -> Vec<Self> {
        self.doc
            .children(self.idx)
            .into_iter()
            .map(|idx| self.doc.element(idx))
            .collect()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.idx == other.idx
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        write!(f, "<{}", node.tag)?;
        if let Some(id) = &node.id {
            write!(f, " #{id}")?;
        }
        if !node.classes.is_empty() {
            write!(f, " .{}", node.classes.join("."))?;
        }
        write!(f, ">")
    }
}
