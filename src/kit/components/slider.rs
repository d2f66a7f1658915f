// Slider widget for OrbitKit

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{EventData, MouseButton, Stop, ON_CHANGE, ON_CURSOR, ON_MOUSE_DOWN, ON_MOUSE_UP, ON_SCROLL};
use crate::kit::Widget;
use crate::panel::PanelId;
use crate::root::Root;

/// Value change per scroll unit
const SCROLL_STEP: f32 = 0.05;

#[derive(Debug, Default)]
struct SliderState {
    value: f32,
    dragging: bool,
}

/// Horizontal slider over the range `[0, 1]`
///
/// Pressing the left button captures both mouse and cursor focus, so the
/// drag keeps tracking even when the cursor leaves the slider; the value
/// follows the cursor's horizontal position across the content box. Scrolling
/// over the slider nudges the value. Every change dispatches `value-changed`
/// with [`EventData::Value`].
#[derive(Debug, Clone)]
pub struct Slider {
    panel: PanelId,
    state: Rc<RefCell<SliderState>>,
}

impl Slider {
    pub fn new(root: &mut Root, width: f32, height: f32) -> Self {
        let panel = root.create_panel(width, height);
        let slider = Self {
            panel,
            state: Rc::new(RefCell::new(SliderState::default())),
        };
        slider.install(root);
        slider
    }

    fn install(&self, root: &mut Root) {
        let state = self.state.clone();
        root.subscribe(self.panel, ON_MOUSE_DOWN, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            state.borrow_mut().dragging = true;
            root.set_mouse_focus(Some(ev.panel));
            root.set_cursor_focus(Some(ev.panel));
            if let Some(point) = ev.data.position() {
                track(root, ev.panel, &state, point.x);
            }
            root.stop_propagation(Stop::ALL);
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_CURSOR, move |root, ev| {
            let dragging = state.borrow().dragging;
            if let (true, Some(point)) = (dragging, ev.data.position()) {
                track(root, ev.panel, &state, point.x);
                root.stop_propagation(Stop::ALL);
            }
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_MOUSE_UP, move |root, _| {
            let was_dragging = std::mem::take(&mut state.borrow_mut().dragging);
            if was_dragging {
                root.set_mouse_focus(None);
                root.set_cursor_focus(None);
                root.stop_propagation(Stop::ALL);
            }
        });

        let state = self.state.clone();
        root.subscribe(self.panel, ON_SCROLL, move |root, ev| {
            if let EventData::Scroll { dy, .. } = *ev.data {
                let value = state.borrow().value + dy * SCROLL_STEP;
                set_value(root, ev.panel, &state, value);
                root.stop_propagation(Stop::ALL);
            }
        });
    }

    pub fn value(&self) -> f32 {
        self.state.borrow().value
    }

    /// Set the value from code, clamped to `[0, 1]`
    pub fn set_value(&self, root: &mut Root, value: f32) {
        set_value(root, self.panel, &self.state, value);
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }
}

impl Widget for Slider {
    fn panel(&self) -> PanelId {
        self.panel
    }
}

fn track(root: &mut Root, panel: PanelId, state: &Rc<RefCell<SliderState>>, x: f32) {
    let Some(rect) = root.tree().content_rect(panel) else {
        return;
    };
    if rect.width() <= 0.0 {
        return;
    }
    set_value(root, panel, state, (x - rect.x()) / rect.width());
}

fn set_value(root: &mut Root, panel: PanelId, state: &Rc<RefCell<SliderState>>, value: f32) {
    let value = value.clamp(0.0, 1.0);
    {
        let mut state = state.borrow_mut();
        if state.value == value {
            return;
        }
        state.value = value;
    }
    root.dispatch(panel, ON_CHANGE, &EventData::Value(value));
}
