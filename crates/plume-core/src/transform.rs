//! Pan & zoom state for the rendered-diagram container.
//!
//! The transform is presentation-only: it is applied as one CSS transform to
//! the element wrapping the rendered SVG, never to the interactive
//! sub-elements. Hit-testing and label extraction keep working on the
//! untransformed logical tree, so correlation is independent of zoom/pan.

use serde::{Deserialize, Serialize};

/// Zoom step and limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Scale increment per zoom-in/zoom-out action.
    pub step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            min_scale: 0.1,
            max_scale: 5.0,
        }
    }
}

impl ZoomConfig {
    /// Check that every value is finite and positive and that
    /// `min_scale <= max_scale`.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("step", self.step),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("zoom {name} must be a positive number, got {value}"));
            }
        }
        if self.min_scale > self.max_scale {
            return Err(format!(
                "zoom min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            ));
        }
        Ok(())
    }

    /// A usable copy: unusable values fall back to the defaults and
    /// inverted limits are swapped.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let usable = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        let step = usable(self.step, defaults.step);
        let min_scale = usable(self.min_scale, defaults.min_scale);
        let max_scale = usable(self.max_scale, defaults.max_scale);
        Self {
            step,
            min_scale: min_scale.min(max_scale),
            max_scale: min_scale.max(max_scale),
        }
    }
}

/// An in-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanState {
    /// Press position minus the translation at press time.
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// What a wheel event did to the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// No zoom modifier held: leave the event to the page (normal scrolling).
    Ignored,
    /// Zoomed (or hit a limit); the default scroll action must be suppressed.
    Zoomed,
}

impl WheelOutcome {
    pub fn prevents_default(self) -> bool {
        self == WheelOutcome::Zoomed
    }
}

/// Affine view state: `translate(tx, ty)` followed by `scale(s)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    config: ZoomConfig,
    pan: Option<PanState>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl ViewTransform {
    pub fn new(config: ZoomConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("{err}; using sanitized zoom limits");
        }
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            config: config.sanitized(),
            pan: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn config(&self) -> ZoomConfig {
        self.config
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.config.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.config.step);
    }

    /// Set the scale, saturating at the configured limits.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.config.min_scale, self.config.max_scale);
    }

    /// Back to identity: scale 1, no translation. Also abandons any drag.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translate_x = 0.0;
        self.translate_y = 0.0;
        self.pan = None;
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }

    /// Current zoom as a whole percentage (for status text).
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Handle a wheel event. Zooms only while the modifier is held; scrolling
    /// up (`delta_y < 0`) zooms in, scrolling down zooms out.
    pub fn wheel(&mut self, delta_y: f64, modifier_held: bool) -> WheelOutcome {
        if !modifier_held {
            return WheelOutcome::Ignored;
        }
        if delta_y < 0.0 {
            self.zoom_in();
        } else if delta_y > 0.0 {
            self.zoom_out();
        }
        log::trace!("wheel zoom dy={delta_y} → scale {}", self.scale);
        WheelOutcome::Zoomed
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    /// Start a drag at pointer `(x, y)`. Only the primary button (0) pans.
    /// Returns `true` if a drag started.
    pub fn begin_pan(&mut self, x: f64, y: f64, button: i16) -> bool {
        if button != 0 {
            return false;
        }
        self.pan = Some(PanState {
            anchor_x: x - self.translate_x,
            anchor_y: y - self.translate_y,
        });
        true
    }

    /// Follow the pointer while a drag is active. Returns `true` if the
    /// translation changed.
    pub fn pan_to(&mut self, x: f64, y: f64) -> bool {
        let Some(pan) = self.pan else {
            return false;
        };
        self.translate_x = x - pan.anchor_x;
        self.translate_y = y - pan.anchor_y;
        true
    }

    /// End the drag. Safe to call when no drag is active.
    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// CSS `transform` value for the container: translate first, then scale.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}
