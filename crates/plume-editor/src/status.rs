//! Status line feedback.
//!
//! Every correlation attempt, render attempt, and zoom action reports a
//! single human-readable line plus a severity tag. The browser renders the
//! tag as a CSS class (`status success`, `status error`…).

use std::fmt;

/// Severity tag of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Default,
    Success,
    Error,
    Loading,
}

impl Severity {
    /// CSS class name for this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Default => "default",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Loading => "loading",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

/// Where status messages go.
pub trait StatusSink {
    fn update(&mut self, message: &str, severity: Severity);

    /// The most recent message, if any.
    fn last(&self) -> Option<&StatusMessage>;
}

/// In-memory sink that keeps every message. Used natively and in tests.
#[derive(Debug, Default)]
pub struct StatusLog {
    pub history: Vec<StatusMessage>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl StatusSink for StatusLog {
    fn update(&mut self, message: &str, severity: Severity) {
        self.history.push(StatusMessage {
            text: message.to_string(),
            severity,
        });
    }

    fn last(&self) -> Option<&StatusMessage> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_history_in_order() {
        let mut log = StatusLog::new();
        log.update("Ready", Severity::Default);
        log.update("Rendering SVG diagram...", Severity::Loading);
        assert_eq!(log.len(), 2);
        let last = log.last().unwrap();
        assert_eq!(last.severity, Severity::Loading);
        assert_eq!(last.severity.to_string(), "loading");
    }
}
