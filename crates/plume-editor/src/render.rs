//! Render protocol with the remote diagram service.
//!
//! The service is an opaque collaborator: it receives source text and returns
//! either SVG markup or a human-readable failure. Plume only checks that a
//! root `<svg>` element exists before treating the payload as a diagram.

use plume_core::{SvgDocument, parse_svg};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format requested from the renderer. Only vector output supports
/// click-to-source, so it is the only format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
}

/// `POST /api/render` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub format: OutputFormat,
}

impl RenderRequest {
    pub fn svg(code: &str) -> Self {
        Self {
            code: code.to_string(),
            format: OutputFormat::Svg,
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Serialization error: {e}"))
    }
}

/// `POST /api/render` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// SVG markup on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl RenderResponse {
    pub fn ok(svg: &str) -> Self {
        Self {
            success: true,
            message: "Rendered".to_string(),
            image_url: None,
            image_data: Some(svg.to_string()),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json)
            .map_err(|e| RenderError::Service(format!("Invalid response: {e}")))
    }

    /// Turn the response into a parsed diagram or a render error.
    pub fn into_document(self) -> Result<(String, SvgDocument), RenderError> {
        if !self.success {
            return Err(RenderError::Service(self.message));
        }
        let markup = self
            .image_data
            .ok_or_else(|| RenderError::Markup("Response contains no SVG data".to_string()))?;
        let document = parse_svg(&markup).map_err(RenderError::Markup)?;
        Ok((markup, document))
    }
}

/// Why a render did not produce an interactive diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The source text is blank; no request was sent.
    EmptySource,
    /// The renderer answered with a failure message.
    Service(String),
    /// The payload is not usable SVG.
    Markup(String),
    /// The request never completed.
    Network(String),
}

impl RenderError {
    /// The line shown in the status bar.
    pub fn status_text(&self) -> String {
        match self {
            RenderError::EmptySource => "Please enter diagram source".to_string(),
            RenderError::Service(msg) => format!("Render failed: {msg}"),
            RenderError::Markup(_) => "SVG display failed".to_string(),
            RenderError::Network(_) => "Network request failed".to_string(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptySource => write!(f, "diagram source is empty"),
            RenderError::Service(msg) => write!(f, "{msg}"),
            RenderError::Markup(msg) => write!(f, "SVG display failed: {msg}"),
            RenderError::Network(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Escape text for inclusion in HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for the preview panel when a render fails.
pub fn error_panel_html(error: &RenderError) -> String {
    format!(
        "<div class=\"error-message\"><strong>SVG render failed</strong><br>{}<br><br>\
         <small>Hint: check the diagram syntax; source must start with @startuml and end with @enduml</small></div>",
        escape_html(&error.to_string())
    )
}

/// Markup for the empty preview panel.
pub const PLACEHOLDER_HTML: &str =
    "<div class=\"placeholder\">Click \"Render\" to see the diagram</div>";
