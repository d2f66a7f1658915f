// DropDown widget for OrbitKit

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::events::{
    EventData, Key, MouseButton, Stop, ON_CHANGE, ON_FOCUS_LOST, ON_KEY_DOWN, ON_MOUSE_DOWN, ON_MOUSE_DOWN_OUT,
};
use crate::kit::Widget;
use crate::panel::{PanelId, TreeResult};
use crate::root::Root;

#[derive(Debug)]
struct DropDownState {
    items: Vec<String>,
    item_panels: Vec<PanelId>,
    selected: Option<usize>,
    /// Panel holding the items, hung below the header
    list: PanelId,
    item_height: f32,
}

/// Single-choice list that opens below a header panel
///
/// Clicking the header toggles the list. Clicking an item selects it,
/// dispatches `value-changed` with [`EventData::Selected`] on the header and
/// closes the list. A mouse-down anywhere outside both the header and the
/// open list closes it without selecting anything. Up and Down move the
/// selection while the header holds key focus.
#[derive(Debug, Clone)]
pub struct DropDown {
    panel: PanelId,
    state: Rc<RefCell<DropDownState>>,
}

impl DropDown {
    pub fn new(root: &mut Root, width: f32, height: f32) -> TreeResult<Self> {
        let panel = root.create_panel(width, height);
        let list = root.create_panel(width, 0.0);
        root.set_position(list, 0.0, height);
        // Open lists overlap whatever follows the drop-down
        root.set_z(list, 1.0);
        root.set_visible(list, false);
        if let Some(node) = root.panel_mut(list) {
            node.name = Some("dropdown-list".to_string());
        }
        root.add_child(panel, list)?;

        let state = Rc::new(RefCell::new(DropDownState {
            items: Vec::new(),
            item_panels: Vec::new(),
            selected: None,
            list,
            item_height: height,
        }));
        let dropdown = Self { panel, state };
        dropdown.install(root);
        Ok(dropdown)
    }

    fn install(&self, root: &mut Root) {
        let list = self.list();

        root.subscribe(self.panel, ON_MOUSE_DOWN, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            root.set_key_focus(Some(ev.panel));
            let open = root.panel(list).is_some_and(|node| node.visible());
            set_open(root, list, !open);
            root.stop_propagation(Stop::ALL);
        });

        root.subscribe(self.panel, ON_MOUSE_DOWN_OUT, move |root, ev| {
            let Some(point) = ev.data.position() else {
                return;
            };
            let open = root.panel(list).is_some_and(|node| node.visible());
            if open && !root.inside_borders(list, point) {
                set_open(root, list, false);
            }
        });

        root.subscribe(self.panel, ON_FOCUS_LOST, move |root, _| set_open(root, list, false));

        let state = self.state.clone();
        root.subscribe(self.panel, ON_KEY_DOWN, move |root, ev| {
            let Some(key) = ev.data.key() else {
                return;
            };
            let (selected, count) = {
                let state = state.borrow();
                (state.selected, state.items.len())
            };
            match key {
                Key::Down if count > 0 => {
                    let next = selected.map_or(0, |i| (i + 1).min(count - 1));
                    select(root, ev.panel, &state, next);
                }
                Key::Up if count > 0 => {
                    let next = selected.map_or(0, |i| i.saturating_sub(1));
                    select(root, ev.panel, &state, next);
                }
                Key::Escape => set_open(root, list, false),
                key if key.is_activation() => {
                    let open = root.panel(list).is_some_and(|node| node.visible());
                    set_open(root, list, !open);
                }
                _ => return,
            }
            root.stop_propagation(Stop::ALL);
        });
    }

    fn list(&self) -> PanelId {
        self.state.borrow().list
    }

    /// Append an item, returning its index
    pub fn add_item(&self, root: &mut Root, text: &str) -> TreeResult<usize> {
        let (list, index, width, height) = {
            let state = self.state.borrow();
            let width = root.panel(self.panel).map_or(0.0, |node| node.content_size().width);
            (state.list, state.items.len(), width, state.item_height)
        };

        let item = root.create_panel(width, height);
        root.set_position(item, 0.0, index as f32 * height);
        root.add_child(list, item)?;
        root.set_size(list, width, (index + 1) as f32 * height);

        let header = self.panel;
        let state = self.state.clone();
        root.subscribe(item, ON_MOUSE_DOWN, move |root, ev| {
            if ev.data.mouse_button() != Some(MouseButton::Left) {
                return;
            }
            select(root, header, &state, index);
            set_open(root, list, false);
            root.stop_propagation(Stop::ALL);
        });

        let mut state = self.state.borrow_mut();
        state.items.push(text.to_string());
        state.item_panels.push(item);
        Ok(index)
    }

    /// Select an item from code, notifying like a click would
    pub fn select(&self, root: &mut Root, index: usize) {
        if index < self.len() {
            select(root, self.panel, &self.state, index);
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    pub fn selected_text(&self) -> Option<String> {
        let state = self.state.borrow();
        state.selected.and_then(|i| state.items.get(i).cloned())
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_open(&self, root: &Root) -> bool {
        root.panel(self.list()).is_some_and(|node| node.visible())
    }

    pub fn open(&self, root: &mut Root) {
        set_open(root, self.list(), true);
    }

    pub fn close(&self, root: &mut Root) {
        set_open(root, self.list(), false);
    }

    /// Panel of the item at `index`
    pub fn item_panel(&self, index: usize) -> Option<PanelId> {
        self.state.borrow().item_panels.get(index).copied()
    }
}

impl Widget for DropDown {
    fn panel(&self) -> PanelId {
        self.panel
    }
}

fn set_open(root: &mut Root, list: PanelId, open: bool) {
    if root.panel(list).is_some_and(|node| node.visible() != open) {
        debug!("{} {}", list, if open { "opened" } else { "closed" });
        root.set_visible(list, open);
    }
}

fn select(root: &mut Root, header: PanelId, state: &Rc<RefCell<DropDownState>>, index: usize) {
    {
        let mut state = state.borrow_mut();
        if state.selected == Some(index) {
            return;
        }
        state.selected = Some(index);
    }
    root.dispatch(header, ON_CHANGE, &EventData::Selected(Some(index)));
}
