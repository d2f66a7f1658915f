// CheckBox widget for OrbitKit, doubling as a radio button

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{
    EventData, MouseButton, Stop, SubscriptionId, ON_CHANGE, ON_KEY_DOWN, ON_MOUSE_DOWN, ON_RADIO_GROUP,
};
use crate::kit::Widget;
use crate::panel::{PanelId, TreeResult};
use crate::root::Root;

#[derive(Debug, Default)]
struct CheckState {
    checked: bool,
    /// Radio group name; checking one member unchecks the others
    group: Option<String>,
}

/// Two-state check box
///
/// Toggles on a left click or on Enter/Space while holding key focus, and
/// dispatches `value-changed` with [`EventData::Checked`] once per change.
///
/// A check box with a group is a radio button: checking it broadcasts
/// `radio-group-changed` on the root panel, every other member of the same
/// group unchecks itself, and clicking an already checked member does
/// nothing.
#[derive(Debug, Clone)]
pub struct CheckBox {
    panel: PanelId,
    state: Rc<RefCell<CheckState>>,
    group_subscription: Option<SubscriptionId>,
}

impl CheckBox {
    pub fn new(root: &mut Root, width: f32, height: f32) -> Self {
        Self::build(root, None, width, height)
    }

    /// Create a radio button belonging to `group`
    pub fn radio(root: &mut Root, group: &str, width: f32, height: f32) -> Self {
        Self::build(root, Some(group.to_string()), width, height)
    }

    fn build(root: &mut Root, group: Option<String>, width: f32, height: f32) -> Self {
        let panel = root.create_panel(width, height);
        let is_radio = group.is_some();
        let state = Rc::new(RefCell::new(CheckState { checked: false, group }));

        let toggle_state = state.clone();
        root.subscribe(panel, ON_MOUSE_DOWN, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            root.set_key_focus(Some(ev.panel));
            toggle(root, ev.panel, &toggle_state);
            root.stop_propagation(Stop::ALL);
        });

        let key_state = state.clone();
        root.subscribe(panel, ON_KEY_DOWN, move |root, ev| {
            if ev.data.key().is_some_and(|key| key.is_activation()) {
                toggle(root, ev.panel, &key_state);
                root.stop_propagation(Stop::ALL);
            }
        });

        let group_subscription = if is_radio {
            let group_state = state.clone();
            let top = root.root_panel();
            root.subscribe(top, ON_RADIO_GROUP, move |root, ev| {
                let EventData::RadioGroup { group, source } = ev.data else {
                    return;
                };
                if *source == panel {
                    return;
                }
                let unchecked = {
                    let mut state = group_state.borrow_mut();
                    let same_group = state.group.as_deref() == Some(group.as_str());
                    if same_group && state.checked {
                        state.checked = false;
                        true
                    } else {
                        false
                    }
                };
                if unchecked {
                    root.dispatch(panel, ON_CHANGE, &EventData::Checked(false));
                }
            })
        } else {
            None
        };

        Self {
            panel,
            state,
            group_subscription,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    pub fn group(&self) -> Option<String> {
        self.state.borrow().group.clone()
    }

    /// Set the checked state from code, with the same notifications as a
    /// click
    pub fn set_checked(&self, root: &mut Root, checked: bool) {
        if self.is_checked() != checked {
            set_state(root, self.panel, &self.state, checked);
        }
    }

    /// Release the check box panel and its radio group subscription
    pub fn dispose(self, root: &mut Root) -> TreeResult<()> {
        if let Some(subscription) = self.group_subscription {
            let top = root.root_panel();
            root.unsubscribe(top, subscription);
        }
        root.dispose(self.panel)
    }
}

impl Widget for CheckBox {
    fn panel(&self) -> PanelId {
        self.panel
    }
}

fn toggle(root: &mut Root, panel: PanelId, state: &Rc<RefCell<CheckState>>) {
    let (checked, is_radio) = {
        let state = state.borrow();
        (state.checked, state.group.is_some())
    };
    if is_radio && checked {
        return;
    }
    set_state(root, panel, state, !checked);
}

fn set_state(root: &mut Root, panel: PanelId, state: &Rc<RefCell<CheckState>>, checked: bool) {
    let group = {
        let mut state = state.borrow_mut();
        state.checked = checked;
        state.group.clone()
    };
    root.dispatch(panel, ON_CHANGE, &EventData::Checked(checked));

    if let (true, Some(group)) = (checked, group) {
        let top = root.root_panel();
        root.dispatch(top, ON_RADIO_GROUP, &EventData::RadioGroup { group, source: panel });
    }
}
