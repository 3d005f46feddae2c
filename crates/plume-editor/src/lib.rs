pub mod correlate;
pub mod dispatch;
pub mod examples;
pub mod input;
pub mod render;
pub mod session;
pub mod shortcuts;
pub mod status;
pub mod surface;

pub use correlate::{Correlation, CorrelationController};
pub use dispatch::{HoverState, HoverStyle, InteractionDispatch, StyleChange};
pub use session::{InputOutcome, Preview, Session, SessionConfig};
pub use status::{Severity, StatusLog, StatusMessage, StatusSink};
pub use surface::{BufferSurface, TextSurface};
