// Single-line text edit widget for OrbitKit

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::events::{
    Event, EventData, Key, MouseButton, Stop, ON_CHANGE, ON_CHAR, ON_FOCUS, ON_FOCUS_LOST, ON_KEY_DOWN,
    ON_KEY_REPEAT, ON_MOUSE_DOWN,
};
use crate::kit::Widget;
use crate::panel::PanelId;
use crate::root::Root;
use crate::timer::TimerId;

#[derive(Debug, Default)]
struct EditState {
    text: String,
    /// Text as of the last commit
    committed: String,
    /// Caret position in characters
    caret: usize,
    caret_visible: bool,
    blink: Option<TimerId>,
}

impl EditState {
    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Apply an editing key; other keys are ignored
    fn edit(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                if self.caret > 0 {
                    self.caret -= 1;
                    let at = self.byte_index(self.caret);
                    self.text.remove(at);
                }
            }
            Key::Delete => {
                if self.caret < self.char_count() {
                    let at = self.byte_index(self.caret);
                    self.text.remove(at);
                }
            }
            Key::Left => self.caret = self.caret.saturating_sub(1),
            Key::Right => self.caret = (self.caret + 1).min(self.char_count()),
            Key::Home => self.caret = 0,
            Key::End => self.caret = self.char_count(),
            _ => {}
        }
    }

    /// Take the text to report if it changed since the last commit
    fn commit(&mut self) -> Option<String> {
        if self.text == self.committed {
            return None;
        }
        self.committed = self.text.clone();
        Some(self.text.clone())
    }
}

/// Single-line text input
///
/// Clicking takes key focus. While focused, typed characters are inserted at
/// the caret, editing keys move it or delete, and the caret blinks on a timer
/// that only runs while the edit holds focus. Losing focus or pressing Enter
/// commits: `value-changed` with [`EventData::Text`] is dispatched when the
/// text differs from the previous commit. Key and char events never reach the
/// host while the edit is focused.
#[derive(Debug, Clone)]
pub struct Edit {
    panel: PanelId,
    state: Rc<RefCell<EditState>>,
}

impl Edit {
    pub fn new(root: &mut Root, width: f32, height: f32) -> Self {
        let panel = root.create_panel(width, height);
        let edit = Self {
            panel,
            state: Rc::new(RefCell::new(EditState::default())),
        };
        edit.install(root);
        edit
    }

    fn install(&self, root: &mut Root) {
        root.subscribe(self.panel, ON_MOUSE_DOWN, |root, ev| {
            if ev.data.mouse_button() == Some(MouseButton::Left) {
                root.set_key_focus(Some(ev.panel));
                root.stop_propagation(Stop::ALL);
            }
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_FOCUS, move |root, _| {
            let period = Duration::from_millis(root.config().caret_blink_ms);
            let blink_state = state.clone();
            let timer = root.set_interval(period, move |_, _| {
                let mut state = blink_state.borrow_mut();
                state.caret_visible = !state.caret_visible;
            });

            let mut state = state.borrow_mut();
            state.caret_visible = true;
            if let Some(old) = state.blink.replace(timer) {
                root.clear_timer(old);
            }
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_FOCUS_LOST, move |root, ev| {
            let (blink, committed) = {
                let mut state = state.borrow_mut();
                state.caret_visible = false;
                (state.blink.take(), state.commit())
            };
            if let Some(timer) = blink {
                root.clear_timer(timer);
            }
            if let Some(text) = committed {
                root.dispatch(ev.panel, ON_CHANGE, &EventData::Text(text));
            }
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_CHAR, move |root, ev| {
            if let EventData::Char { ch, .. } = *ev.data {
                if !ch.is_control() {
                    let mut state = state.borrow_mut();
                    let at = state.byte_index(state.caret);
                    state.text.insert(at, ch);
                    state.caret += 1;
                }
            }
            root.stop_propagation(Stop::HOST);
        });

        for name in [ON_KEY_DOWN, ON_KEY_REPEAT] {
            let state = self.state.clone();
            root.subscribe(self.panel, name, move |root, ev| on_key(root, ev, &state));
        }
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Replace the text from code; the caret moves to the end and nothing is
    /// dispatched
    pub fn set_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.committed = text.to_string();
        state.caret = state.char_count();
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.state.borrow().caret
    }

    pub fn caret_visible(&self) -> bool {
        self.state.borrow().caret_visible
    }

    /// Whether the caret blink timer is running
    pub fn is_blinking(&self) -> bool {
        self.state.borrow().blink.is_some()
    }
}

impl Widget for Edit {
    fn panel(&self) -> PanelId {
        self.panel
    }
}

fn on_key(root: &mut Root, ev: &Event<'_>, state: &Rc<RefCell<EditState>>) {
    let Some(key) = ev.data.key() else {
        return;
    };
    match key {
        Key::Enter | Key::KpEnter => {
            let committed = state.borrow_mut().commit();
            if let Some(text) = committed {
                root.dispatch(ev.panel, ON_CHANGE, &EventData::Text(text));
            }
        }
        Key::Escape => root.set_key_focus(None),
        key => state.borrow_mut().edit(key),
    }
    root.stop_propagation(Stop::HOST);
}
