// Button widget for OrbitKit

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{
    EventData, MouseButton, Stop, SubscriptionId, ON_CLICK, ON_CURSOR_LEAVE, ON_KEY_DOWN, ON_MOUSE_DOWN,
    ON_MOUSE_UP, ON_MOUSE_UP_OUT,
};
use crate::kit::Widget;
use crate::panel::PanelId;
use crate::root::Root;

#[derive(Debug, Default)]
struct ButtonState {
    text: String,
    pressed: bool,
}

/// Push button dispatching `click`
///
/// A click needs the left button to go down and come back up over the
/// button; moving the cursor off the button in between cancels it. While the
/// button holds key focus, Enter and Space click it too.
#[derive(Debug, Clone)]
pub struct Button {
    panel: PanelId,
    state: Rc<RefCell<ButtonState>>,
}

impl Button {
    pub fn new(root: &mut Root, text: &str, width: f32, height: f32) -> Self {
        let panel = root.create_panel(width, height);
        let state = Rc::new(RefCell::new(ButtonState {
            text: text.to_string(),
            pressed: false,
        }));
        let button = Self { panel, state };
        button.install(root);
        button
    }

    fn install(&self, root: &mut Root) {
        let state = self.state.clone();
        root.subscribe(self.panel, ON_MOUSE_DOWN, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            state.borrow_mut().pressed = true;
            root.set_key_focus(Some(ev.panel));
            root.stop_propagation(Stop::ALL);
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_MOUSE_UP, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            let was_pressed = std::mem::take(&mut state.borrow_mut().pressed);
            if was_pressed {
                root.dispatch(ev.panel, ON_CLICK, &EventData::None);
                root.stop_propagation(Stop::ALL);
            }
        });

        for name in [ON_MOUSE_UP_OUT, ON_CURSOR_LEAVE] {
            let state = self.state.clone();
            root.subscribe(self.panel, name, move |_, _| state.borrow_mut().pressed = false);
        }

        root.subscribe(self.panel, ON_KEY_DOWN, |root, ev| {
            if ev.data.key().is_some_and(|key| key.is_activation()) {
                root.dispatch(ev.panel, ON_CLICK, &EventData::None);
                root.stop_propagation(Stop::ALL);
            }
        });
    }

    /// Subscribe a click handler
    pub fn on_click<F>(&self, root: &mut Root, handler: F) -> Option<SubscriptionId>
    where
        F: Fn(&mut Root) + 'static,
    {
        root.subscribe(self.panel, ON_CLICK, move |root, _| handler(root))
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn set_text(&self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }

    pub fn is_pressed(&self) -> bool {
        self.state.borrow().pressed
    }
}

impl Widget for Button {
    fn panel(&self) -> PanelId {
        self.panel
    }
}
