//! Routing of raw window input to panels

use log::trace;

use super::Root;
use crate::events::{
    walk_ancestors, Bounds, EventData, InputEvent, Key, Modifiers, MouseButton, PropagationMode, Routing, Stop,
    ON_CHAR, ON_CURSOR, ON_CURSOR_ENTER, ON_CURSOR_LEAVE, ON_KEY_DOWN, ON_KEY_REPEAT, ON_KEY_UP, ON_MOUSE_DOWN,
    ON_MOUSE_DOWN_OUT, ON_MOUSE_UP, ON_MOUSE_UP_OUT, ON_SCROLL,
};
use crate::layout::Point;
use crate::panel::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Down,
    Up,
}

impl Press {
    fn event_name(self) -> &'static str {
        match self {
            Press::Down => ON_MOUSE_DOWN,
            Press::Up => ON_MOUSE_UP,
        }
    }

    fn outside_name(self) -> &'static str {
        match self {
            Press::Down => ON_MOUSE_DOWN_OUT,
            Press::Up => ON_MOUSE_UP_OUT,
        }
    }
}

impl Root {
    /// Process one raw window event to completion
    ///
    /// Returns whether the host should still forward the event to whatever
    /// lies below the GUI. It is consumed when a modal panel is active or a
    /// handler raised [`Stop::HOST`]. Cursor, scroll, key and char events are
    /// also consumed whenever a panel took them: a focus holder, or the
    /// panel under the cursor.
    pub fn handle_event(&mut self, event: &InputEvent) -> Routing {
        self.stop = Stop::empty();
        trace!("input {:?}", event);

        let taken = match *event {
            InputEvent::MouseDown { button, x, y, mods } => {
                self.on_mouse(Press::Down, button, x, y, mods);
                false
            }
            InputEvent::MouseUp { button, x, y, mods } => {
                self.on_mouse(Press::Up, button, x, y, mods);
                false
            }
            InputEvent::CursorMoved { x, y } => self.on_cursor(x, y),
            InputEvent::Scroll { dx, dy } => self.on_scroll(dx, dy),
            InputEvent::KeyDown { key, mods } => self.on_key(ON_KEY_DOWN, key, mods),
            InputEvent::KeyUp { key, mods } => self.on_key(ON_KEY_UP, key, mods),
            InputEvent::KeyRepeat { key, mods } => self.on_key(ON_KEY_REPEAT, key, mods),
            InputEvent::Char { ch, mods } => self.on_focused_key_event(ON_CHAR, EventData::Char { ch, mods }),
            InputEvent::Resize { width, height } => {
                let root_panel = self.root_panel;
                self.set_size(root_panel, width, height);
                false
            }
            InputEvent::WindowFocus { focused } => {
                if !focused {
                    // The cursor cannot be over any panel of an unfocused window
                    self.update_target(None);
                }
                false
            }
            InputEvent::FrameTick { elapsed } => {
                self.run_timers(elapsed);
                false
            }
        };

        let routing = if taken || self.modal().is_some() || self.stop.contains(Stop::HOST) {
            Routing::Consumed
        } else {
            Routing::Forward
        };
        trace!("input routed: {:?} (stop {:?})", routing, self.stop);
        routing
    }

    fn scaled(&self, x: f32, y: f32) -> Point {
        Point::new(x * self.config.scale_x, y * self.config.scale_y)
    }

    fn on_mouse(&mut self, press: Press, button: MouseButton, x: f32, y: f32, mods: Modifiers) {
        let point = self.scaled(x, y);
        self.cursor = point;
        let data = EventData::Mouse {
            button,
            x: point.x,
            y: point.y,
            mods,
        };

        if let Some(captured) = self.mouse_focus() {
            if self.accepts_input(captured) {
                trace!("{} captured by {}", press.event_name(), captured);
                self.dispatch(captured, press.event_name(), &data);
                self.stop |= Stop::ALL;
            }
            return;
        }

        let result = self.hit_tester.hit_test(&self.tree, self.root_panel, point);

        for &missed in &result.misses {
            if !self.can_dispatch(missed) {
                continue;
            }
            self.deliver_hover(missed, false);
            self.dispatch(missed, press.outside_name(), &data);
        }

        if result.hits.is_empty() {
            if press == Press::Down && self.config.clear_focus_on_empty_click {
                self.set_key_focus(None);
            }
            return;
        }

        for &hit in &result.hits {
            // An earlier handler may have disposed or detached this panel
            if !self.tree.get(hit).is_some_and(|node| node.is_attached()) || !self.accepts_input(hit) {
                continue;
            }
            self.deliver_hover(hit, true);
            self.dispatch(hit, press.event_name(), &data);
            if self.stop.contains(Stop::GUI) {
                break;
            }
        }
    }

    /// Returns whether a panel took the motion
    fn on_cursor(&mut self, x: f32, y: f32) -> bool {
        let point = self.scaled(x, y);
        self.cursor = point;
        let data = EventData::Cursor { x: point.x, y: point.y };

        if let Some(captured) = self.cursor_focus() {
            if !self.accepts_input(captured) {
                return false;
            }
            self.dispatch(captured, ON_CURSOR, &data);
            return true;
        }

        let target = self.hit_tester.hit_test_top(&self.tree, self.root_panel, point);
        self.update_target(target);

        let Some(target) = self.target() else {
            return false;
        };
        if self.can_dispatch(target) {
            let bounds = self.walk_bounds();
            self.propagate(target, PropagationMode::FirstSubscribed, bounds, ON_CURSOR, &data);
        }
        true
    }

    fn on_scroll(&mut self, dx: f32, dy: f32) -> bool {
        let data = EventData::Scroll {
            dx,
            dy,
            x: self.cursor.x,
            y: self.cursor.y,
        };

        if let Some(captured) = self.scroll_focus() {
            if !self.accepts_input(captured) {
                return false;
            }
            self.dispatch(captured, ON_SCROLL, &data);
            return true;
        }

        let Some(target) = self.target() else {
            return false;
        };
        if self.can_dispatch(target) {
            let bounds = self.walk_bounds();
            self.propagate(target, PropagationMode::FirstSubscribed, bounds, ON_SCROLL, &data);
        }
        true
    }

    fn on_key(&mut self, name: &str, key: Key, mods: Modifiers) -> bool {
        self.on_focused_key_event(name, EventData::Key { key, mods })
    }

    /// Deliver to the key focus holder; `false` when there is none able to
    /// take input
    fn on_focused_key_event(&mut self, name: &str, data: EventData) -> bool {
        let Some(focused) = self.key_focus().filter(|&id| self.accepts_input(id)) else {
            return false;
        };
        self.dispatch(focused, name, &data);
        true
    }

    /// Bounds of every hover and cursor walk: never past the window panel,
    /// never out of the modal panel
    fn walk_bounds(&self) -> Bounds {
        Bounds::none()
            .excluding(Some(self.root_panel))
            .including(self.modal())
    }

    /// Move the cached cursor target, notifying the panels the cursor left
    /// and entered
    ///
    /// The lowest common ancestor of the old and new target hears neither.
    fn update_target(&mut self, new: Option<PanelId>) {
        let old = self.target();
        if old == new {
            return;
        }
        trace!("cursor target {:?} -> {:?}", old, new);
        self.target = new;

        let common = match (old, new) {
            (Some(old), Some(new)) => self.tree.lowest_common_ancestor(old, new),
            _ => None,
        };
        let mut bounds = self.walk_bounds();
        if common.is_some() {
            bounds.exclude = common;
        }

        if let Some(old) = old {
            let moved_inside = new.is_some_and(|new| self.tree.is_ancestor_of(old, new));
            if !moved_inside && self.can_dispatch(old) {
                walk_ancestors(self, old, PropagationMode::All, bounds, |root, id| {
                    root.deliver_hover(id, false)
                });
            }
        }

        if let Some(new) = new {
            let moved_outward = old.is_some_and(|old| self.tree.is_ancestor_of(new, old));
            // A leave handler may have disposed the new target
            if !moved_outward && self.tree.contains(new) && self.can_dispatch(new) {
                walk_ancestors(self, new, PropagationMode::All, bounds, |root, id| {
                    root.deliver_hover(id, true)
                });
            }
        }
    }

    /// Deliver cursor-enter or cursor-leave to one panel unless its hover
    /// flag already matches
    pub(super) fn deliver_hover(&mut self, id: PanelId, entering: bool) -> usize {
        let Some(node) = self.tree.get_mut(id) else {
            return 0;
        };
        if node.cursor_enter == entering {
            return 0;
        }
        node.cursor_enter = entering;

        let name = if entering { ON_CURSOR_ENTER } else { ON_CURSOR_LEAVE };
        let data = EventData::Cursor {
            x: self.cursor.x,
            y: self.cursor.y,
        };
        self.dispatch(id, name, &data)
    }
}
