//! Input abstraction layer.
//!
//! Normalizes mouse, wheel, and keyboard events from the preview surface
//! into a unified `InputEvent` enum consumed by the session.

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// ⌘ on macOS, Ctrl elsewhere. Also the wheel-zoom qualifier.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button pressed over the preview surface.
    PointerDown { x: f64, y: f64, button: i16 },

    /// Pointer moved anywhere on the page.
    PointerMove { x: f64, y: f64 },

    /// Button released anywhere on the page.
    PointerUp,

    /// Wheel over the preview surface.
    Wheel { delta_y: f64, modifiers: Modifiers },

    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64, button: i16) -> Self {
        Self::PointerDown { x, y, button }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_wheel(delta_y: f64, modifiers: Modifiers) -> Self {
        Self::Wheel { delta_y, modifiers }
    }

    pub fn from_key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}
