pub mod extract;
pub mod locate;
pub mod model;
pub mod parser;
pub mod selection;
pub mod transform;

pub use extract::extract_label;
pub use locate::{locate_in_text, locate_line, split_lines};
pub use model::*;
pub use parser::parse_svg;
pub use selection::{LineMetrics, SelectionRange, scroll_offset_for_line, select_line};
pub use transform::{PanState, ViewTransform, WheelOutcome, ZoomConfig};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
