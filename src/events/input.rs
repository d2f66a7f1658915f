//! Raw input coming from the window/host layer

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::event::{Key, Modifiers, MouseButton};

/// One raw event as reported by the host window
///
/// Positions are in unscaled window coordinates; the root applies its
/// configured scale before hit testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    MouseDown {
        button: MouseButton,
        x: f32,
        y: f32,
        #[serde(default)]
        mods: Modifiers,
    },
    MouseUp {
        button: MouseButton,
        x: f32,
        y: f32,
        #[serde(default)]
        mods: Modifiers,
    },
    CursorMoved {
        x: f32,
        y: f32,
    },
    Scroll {
        dx: f32,
        dy: f32,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        mods: Modifiers,
    },
    KeyUp {
        key: Key,
        #[serde(default)]
        mods: Modifiers,
    },
    KeyRepeat {
        key: Key,
        #[serde(default)]
        mods: Modifiers,
    },
    Char {
        ch: char,
        #[serde(default)]
        mods: Modifiers,
    },
    Resize {
        width: f32,
        height: f32,
    },
    WindowFocus {
        focused: bool,
    },
    /// Host time since the window opened
    FrameTick {
        elapsed: Duration,
    },
}

impl InputEvent {
    pub fn mouse_down(button: MouseButton, x: f32, y: f32) -> Self {
        InputEvent::MouseDown {
            button,
            x,
            y,
            mods: Modifiers::empty(),
        }
    }

    pub fn mouse_up(button: MouseButton, x: f32, y: f32) -> Self {
        InputEvent::MouseUp {
            button,
            x,
            y,
            mods: Modifiers::empty(),
        }
    }

    pub fn cursor(x: f32, y: f32) -> Self {
        InputEvent::CursorMoved { x, y }
    }

    pub fn key_down(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            mods: Modifiers::empty(),
        }
    }

    pub fn char(ch: char) -> Self {
        InputEvent::Char {
            ch,
            mods: Modifiers::empty(),
        }
    }
}

/// What the host should do with a raw event after the GUI processed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Pass the event on to the underlying scene
    Forward,
    /// The GUI claimed the event
    Consumed,
}

impl Routing {
    pub fn is_forwarded(self) -> bool {
        self == Routing::Forward
    }
}
