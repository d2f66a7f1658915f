// Platform adapter translating winit window events into GUI input

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, KeyLocation, NamedKey};

use crate::events::{InputEvent, Key, Modifiers, MouseButton};

/// Pixels per scroll line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 20.0;

/// Converts winit window events into [`InputEvent`]s
///
/// winit reports the cursor position and modifier state only when they
/// change, so the translator remembers both and stamps them onto button and
/// key events.
#[derive(Debug, Default)]
pub struct WinitTranslator {
    cursor: (f32, f32),
    mods: Modifiers,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position seen, in physical pixels
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.mods
    }

    /// Translate one window event
    ///
    /// A key press with text yields the key event followed by one char event
    /// per printable character. Events the GUI has no use for yield nothing.
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                vec![InputEvent::CursorMoved {
                    x: self.cursor.0,
                    y: self.cursor.1,
                }]
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = translate_button(*button);
                let (x, y) = self.cursor;
                let mods = self.mods;
                vec![match state {
                    ElementState::Pressed => InputEvent::MouseDown { button, x, y, mods },
                    ElementState::Released => InputEvent::MouseUp { button, x, y, mods },
                }]
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(dx, dy) => (*dx, *dy),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (pos.x as f32 / PIXELS_PER_LINE, pos.y as f32 / PIXELS_PER_LINE)
                    }
                };
                vec![InputEvent::Scroll { dx, dy }]
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                let mut mods = Modifiers::empty();
                mods.set(Modifiers::SHIFT, state.shift_key());
                mods.set(Modifiers::CTRL, state.control_key());
                mods.set(Modifiers::ALT, state.alt_key());
                mods.set(Modifiers::SUPER, state.super_key());
                self.mods = mods;
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = translate_key(&event.logical_key, event.location);
                let mods = self.mods;
                let mut out = vec![match (event.state, event.repeat) {
                    (ElementState::Pressed, false) => InputEvent::KeyDown { key, mods },
                    (ElementState::Pressed, true) => InputEvent::KeyRepeat { key, mods },
                    (ElementState::Released, _) => InputEvent::KeyUp { key, mods },
                }];
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        out.extend(
                            text.chars()
                                .filter(|ch| !ch.is_control())
                                .map(|ch| InputEvent::Char { ch, mods }),
                        );
                    }
                }
                out
            }
            WindowEvent::Resized(size) => vec![InputEvent::Resize {
                width: size.width as f32,
                height: size.height as f32,
            }],
            WindowEvent::Focused(focused) => vec![InputEvent::WindowFocus { focused: *focused }],
            WindowEvent::CursorLeft { .. } => vec![InputEvent::WindowFocus { focused: false }],
            _ => Vec::new(),
        }
    }
}

fn translate_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

fn translate_key(key: &WinitKey, location: KeyLocation) -> Key {
    match key {
        WinitKey::Named(named) => match named {
            NamedKey::Enter if location == KeyLocation::Numpad => Key::KpEnter,
            NamedKey::Enter => Key::Enter,
            NamedKey::Space => Key::Space,
            NamedKey::Escape => Key::Escape,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            _ => Key::Other(0),
        },
        WinitKey::Character(text) if text.as_str() == " " => Key::Space,
        WinitKey::Character(text) => Key::Other(text.chars().next().map_or(0, u32::from)),
        _ => Key::Other(0),
    }
}
