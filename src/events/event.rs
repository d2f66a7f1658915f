//! Event identifiers and payloads delivered to panel handlers

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::layout::Point;
use crate::panel::PanelId;

/// Cursor entered the panel or one of its descendants
pub const ON_CURSOR_ENTER: &str = "cursor-enter";
/// Cursor left the panel and all of its descendants
pub const ON_CURSOR_LEAVE: &str = "cursor-leave";
/// Cursor moved over the panel
pub const ON_CURSOR: &str = "cursor";
/// Mouse button pressed over the panel
pub const ON_MOUSE_DOWN: &str = "mouse-down";
/// Mouse button released over the panel
pub const ON_MOUSE_UP: &str = "mouse-up";
/// Mouse button pressed somewhere else
pub const ON_MOUSE_DOWN_OUT: &str = "mouse-down-outside";
/// Mouse button released somewhere else
pub const ON_MOUSE_UP_OUT: &str = "mouse-up-outside";
pub const ON_KEY_DOWN: &str = "key-down";
pub const ON_KEY_UP: &str = "key-up";
pub const ON_KEY_REPEAT: &str = "key-repeat";
pub const ON_CHAR: &str = "char";
/// Panel became the key focus holder
pub const ON_FOCUS: &str = "focus-gained";
/// Panel stopped being the key focus holder
pub const ON_FOCUS_LOST: &str = "focus-lost";
pub const ON_RESIZE: &str = "resize";
pub const ON_ENABLE: &str = "enable-changed";
pub const ON_CLICK: &str = "click";
pub const ON_CHANGE: &str = "value-changed";
/// Broadcast on the root panel when a radio button gets checked
pub const ON_RADIO_GROUP: &str = "radio-group-changed";
pub const ON_SCROLL: &str = "scroll";

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button (scroll wheel)
    Middle,
    /// Right mouse button
    Right,
    /// Any other button, by host index
    Other(u16),
}

/// Keys the toolkit and its widgets care about
///
/// Printable text arrives separately as [`ON_CHAR`] events, so only the
/// editing and navigation keys are named here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    KpEnter,
    Space,
    Escape,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// Unnamed key, by host key code
    Other(u32),
}

impl Key {
    /// Keys that activate buttons and check boxes
    pub fn is_activation(&self) -> bool {
        matches!(self, Key::Enter | Key::KpEnter | Key::Space)
    }
}

bitflags! {
    /// Keyboard modifier state at the time of an event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const SUPER = 1 << 3;
    }
}

bitflags! {
    /// Stop-propagation request raised by handlers during one raw event
    ///
    /// The set is cleared when the root starts processing a raw event and
    /// inspected once all derived events were delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Stop: u8 {
        /// Do not deliver the event to further panels or ancestors
        const GUI  = 1 << 0;
        /// Do not forward the raw event to the host (3D) layer
        const HOST = 1 << 1;
        const ALL  = Self::GUI.bits() | Self::HOST.bits();
    }
}

/// Payload carried alongside an event identifier
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventData {
    /// No payload
    #[default]
    None,
    /// Cursor position in window coordinates (already scaled)
    Cursor { x: f32, y: f32 },
    /// Mouse button event at a position
    Mouse {
        button: MouseButton,
        x: f32,
        y: f32,
        mods: Modifiers,
    },
    /// Scroll delta and the cursor position it happened at
    Scroll { dx: f32, dy: f32, x: f32, y: f32 },
    Key { key: Key, mods: Modifiers },
    Char { ch: char, mods: Modifiers },
    Size { width: f32, height: f32 },
    Enabled(bool),
    /// A radio button of `group` was checked
    RadioGroup { group: String, source: PanelId },
    Checked(bool),
    Selected(Option<usize>),
    Text(String),
    Value(f32),
}

impl EventData {
    /// Window position carried by cursor, mouse and scroll payloads
    pub fn position(&self) -> Option<Point> {
        match *self {
            EventData::Cursor { x, y }
            | EventData::Mouse { x, y, .. }
            | EventData::Scroll { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<Key> {
        match *self {
            EventData::Key { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn mouse_button(&self) -> Option<MouseButton> {
        match *self {
            EventData::Mouse { button, .. } => Some(button),
            _ => None,
        }
    }
}

/// An event as seen by one handler
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Event identifier, one of the `ON_*` constants or a custom name
    pub name: &'a str,
    /// Panel the handler is subscribed on
    pub panel: PanelId,
    pub data: &'a EventData,
}

impl<'a> Event<'a> {
    pub fn new(name: &'a str, panel: PanelId, data: &'a EventData) -> Self {
        Self { name, panel, data }
    }

    pub fn position(&self) -> Option<Point> {
        self.data.position()
    }
}
