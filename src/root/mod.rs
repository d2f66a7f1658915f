//! The root manager of one GUI window
//!
//! A [`Root`] owns the panel tree of a window and everything needed to turn
//! the window's raw input into panel events: the focus registers, the modal
//! panel, the panel currently under the cursor and the stop-propagation bits
//! of the event being processed. One root exists per window; nothing here is
//! global, so several windows (and tests) each get an independent instance.

mod routing;

use std::rc::Rc;
use std::time::Duration;

use log::debug;

use crate::config::{ModalPolicy, RootConfig};
use crate::events::{
    propagate_to_ancestors, Bounds, Dispatcher, Event, EventData, HitTester, PropagationMode, Stop,
    SubscriptionId, ON_ENABLE, ON_FOCUS, ON_FOCUS_LOST, ON_RESIZE,
};
use crate::layout::Point;
use crate::panel::{PanelId, PanelNode, PanelTree, TreeResult};
use crate::timer::{TimerId, TimerManager};

/// Root manager routing window input to a panel tree
#[derive(Debug)]
pub struct Root {
    tree: PanelTree,
    /// Window-sized panel; hit tests start below it
    root_panel: PanelId,
    config: RootConfig,
    /// When set, only this panel and its descendants receive events
    modal: Option<PanelId>,
    /// Receives every key and char event
    key_focus: Option<PanelId>,
    /// Receives every mouse button event, bypassing hit testing
    mouse_focus: Option<PanelId>,
    /// Receives every scroll event
    scroll_focus: Option<PanelId>,
    /// Receives every cursor motion event
    cursor_focus: Option<PanelId>,
    /// Panel under the cursor after the last cursor event
    target: Option<PanelId>,
    stop: Stop,
    /// Last cursor position, already scaled
    cursor: Point,
    hit_tester: HitTester,
    timers: TimerManager<Root>,
}

impl Root {
    /// Create a root for a window of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, RootConfig::default())
    }

    pub fn with_config(width: f32, height: f32, config: RootConfig) -> Self {
        let mut tree = PanelTree::new();
        let root_panel = tree.create_root(width, height);
        if let Some(node) = tree.get_mut(root_panel) {
            node.name = Some("root".to_string());
        }
        Self {
            tree,
            root_panel,
            config,
            modal: None,
            key_focus: None,
            mouse_focus: None,
            scroll_focus: None,
            cursor_focus: None,
            target: None,
            stop: Stop::empty(),
            cursor: Point::zero(),
            hit_tester: HitTester::new(),
            timers: TimerManager::new(),
        }
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// Change the window scale applied to raw coordinates
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.config.scale_x = scale_x;
        self.config.scale_y = scale_y;
    }

    /// The window-sized panel at the top of the tree
    pub fn root_panel(&self) -> PanelId {
        self.root_panel
    }

    pub fn tree(&self) -> &PanelTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut PanelTree {
        &mut self.tree
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelNode> {
        self.tree.get(id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut PanelNode> {
        self.tree.get_mut(id)
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    /// Last cursor position in scaled window coordinates
    pub fn cursor_position(&self) -> Point {
        self.cursor
    }

    // Tree structure

    /// Create a detached panel
    pub fn create_panel(&mut self, width: f32, height: f32) -> PanelId {
        self.tree.create(width, height)
    }

    pub fn add_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.tree.add_child(parent, child)
    }

    pub fn insert_child(&mut self, parent: PanelId, index: usize, child: PanelId) -> TreeResult<()> {
        self.tree.insert_child(parent, index, child)
    }

    pub fn remove_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.tree.remove_child(parent, child)
    }

    /// Release a panel, its subtree and every register pointing into it
    ///
    /// A key focus holder inside the subtree gets `focus-lost` first.
    pub fn dispose(&mut self, id: PanelId) -> TreeResult<()> {
        if id == self.root_panel {
            return Err(crate::panel::TreeError::InvalidRelationship(
                "the root panel lives as long as the root".to_string(),
            ));
        }
        if !self.tree.contains(id) {
            return Err(crate::panel::TreeError::PanelNotFound(id));
        }
        if self.key_focus.is_some_and(|held| self.tree.is_ancestor_of(id, held)) {
            self.set_key_focus(None);
            // The focus-lost handler disposed the panel itself
            if !self.tree.contains(id) {
                return Ok(());
            }
        }
        let removed = self.tree.dispose(id)?;
        for register in [
            &mut self.modal,
            &mut self.key_focus,
            &mut self.mouse_focus,
            &mut self.scroll_focus,
            &mut self.cursor_focus,
            &mut self.target,
        ] {
            if register.is_some_and(|held| removed.contains(&held)) {
                *register = None;
            }
        }
        Ok(())
    }

    // Panel state

    pub fn set_position(&mut self, id: PanelId, x: f32, y: f32) {
        if let Some(node) = self.tree.get_mut(id) {
            node.set_position(x, y);
        }
    }

    pub fn set_z(&mut self, id: PanelId, z: f32) {
        if let Some(node) = self.tree.get_mut(id) {
            node.set_z(z);
        }
    }

    pub fn set_visible(&mut self, id: PanelId, visible: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            node.set_visible(visible);
        }
    }

    /// Resize the content box, dispatching `resize` when the size changed
    pub fn set_size(&mut self, id: PanelId, width: f32, height: f32) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let old = node.content_size();
        if old.width == width && old.height == height {
            return;
        }
        node.content.width = width;
        node.content.height = height;
        self.dispatch(id, ON_RESIZE, &EventData::Size { width, height });
    }

    /// Enable or disable a panel, dispatching `enable-changed` on change
    ///
    /// Disabling releases every focus register the panel holds and ends its
    /// hover, sending `focus-lost` and `cursor-leave` while it can still
    /// receive them.
    pub fn set_enabled(&mut self, id: PanelId, enabled: bool) {
        if self.tree.get(id).map_or(true, |node| node.enabled == enabled) {
            return;
        }
        if !enabled {
            self.release(id);
        }
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        node.enabled = enabled;
        self.dispatch(id, ON_ENABLE, &EventData::Enabled(enabled));
    }

    fn release(&mut self, id: PanelId) {
        if self.key_focus == Some(id) {
            self.set_key_focus(None);
        }
        for register in [&mut self.mouse_focus, &mut self.scroll_focus, &mut self.cursor_focus] {
            if *register == Some(id) {
                *register = None;
            }
        }
        self.deliver_hover(id, false);
    }

    /// Whether the scaled window point lies within the panel's border box
    pub fn inside_borders(&self, id: PanelId, point: Point) -> bool {
        self.tree.inside_borders(id, point)
    }

    // Subscriptions and dispatch

    /// Subscribe a handler on a panel; `None` when the panel does not exist
    pub fn subscribe<F>(&mut self, id: PanelId, name: &str, handler: F) -> Option<SubscriptionId>
    where
        F: Fn(&mut Root, &Event<'_>) + 'static,
    {
        let node = self.tree.get_mut(id)?;
        Some(node.dispatcher.subscribe_shared(name, Rc::new(handler)))
    }

    pub fn unsubscribe(&mut self, id: PanelId, subscription: SubscriptionId) -> bool {
        self.tree
            .get_mut(id)
            .is_some_and(|node| node.dispatcher.unsubscribe(subscription))
    }

    /// Invoke the handlers for `name` on one panel
    ///
    /// Returns the number of handlers invoked. Handlers unsubscribed by an
    /// earlier handler of the same dispatch are skipped; unknown panels
    /// dispatch nothing.
    pub fn dispatch(&mut self, id: PanelId, name: &str, data: &EventData) -> usize {
        let Some(node) = self.tree.get(id) else {
            return 0;
        };
        let handlers = node.dispatcher.snapshot(name);
        if handlers.is_empty() {
            return 0;
        }

        let event = Event::new(name, id, data);
        Dispatcher::invoke(handlers, self, &event, |root, subscription| {
            root.tree
                .get(id)
                .is_some_and(|node| node.dispatcher.contains(subscription))
        })
    }

    /// Dispatch `name` up the ancestor chain of `target`
    pub fn propagate(
        &mut self,
        target: PanelId,
        mode: PropagationMode,
        bounds: Bounds,
        name: &str,
        data: &EventData,
    ) -> usize {
        propagate_to_ancestors(self, target, mode, bounds, name, data)
    }

    /// Request stopping the event being processed
    pub fn stop_propagation(&mut self, stop: Stop) {
        self.stop |= stop;
    }

    /// Stop bits raised so far for the current raw event
    pub fn stop_flags(&self) -> Stop {
        self.stop
    }

    // Focus and modal registers

    /// Resolve a register to a panel that can still take events
    fn live(&self, held: Option<PanelId>) -> Option<PanelId> {
        held.filter(|&id| self.tree.get(id).is_some_and(PanelNode::is_attached))
    }

    /// Whether the modal panel allows delivering events to `id`
    pub fn can_dispatch(&self, id: PanelId) -> bool {
        match self.live(self.modal) {
            Some(modal) => self.tree.is_ancestor_of(modal, id),
            None => true,
        }
    }

    /// Whether `id` may receive input right now: allowed by the modal panel
    /// and enabled
    pub fn accepts_input(&self, id: PanelId) -> bool {
        self.can_dispatch(id) && self.is_enabled(id)
    }

    fn is_enabled(&self, id: PanelId) -> bool {
        self.tree.get(id).is_some_and(PanelNode::enabled)
    }

    pub fn modal(&self) -> Option<PanelId> {
        self.live(self.modal)
    }

    /// Gate all event delivery to `panel` and its descendants
    ///
    /// Changing the modal panel clears key and cursor focus, plus mouse and
    /// scroll focus under [`ModalPolicy::ClearAll`].
    pub fn set_modal(&mut self, panel: Option<PanelId>) {
        let panel = panel.filter(|&id| self.tree.contains(id));
        if self.modal == panel {
            return;
        }
        debug!("modal panel {:?} -> {:?}", self.modal, panel);
        self.modal = panel;
        self.set_key_focus(None);
        self.cursor_focus = None;
        if self.config.modal_policy == ModalPolicy::ClearAll {
            self.mouse_focus = None;
            self.scroll_focus = None;
        }
    }

    pub fn key_focus(&self) -> Option<PanelId> {
        self.live(self.key_focus)
    }

    /// Move key focus, dispatching `focus-lost` to the previous holder before
    /// `focus-gained` to the new one
    ///
    /// Disabled panels cannot take focus; asking for one clears it.
    pub fn set_key_focus(&mut self, panel: Option<PanelId>) {
        let panel = panel.filter(|&id| self.is_enabled(id));
        let old = self.key_focus.filter(|&id| self.tree.contains(id));
        if old == panel {
            self.key_focus = panel;
            return;
        }

        debug!("key focus {:?} -> {:?}", old, panel);
        self.key_focus = None;
        if let Some(old) = old {
            self.dispatch(old, ON_FOCUS_LOST, &EventData::None);
            // The focus-lost handler moved focus itself; that later request wins
            if self.key_focus.is_some() {
                return;
            }
        }
        self.key_focus = panel;
        if let Some(new) = panel {
            self.dispatch(new, ON_FOCUS, &EventData::None);
        }
    }

    pub fn mouse_focus(&self) -> Option<PanelId> {
        self.live(self.mouse_focus)
    }

    /// Capture all mouse button events for `panel`
    pub fn set_mouse_focus(&mut self, panel: Option<PanelId>) {
        debug!("mouse focus {:?} -> {:?}", self.mouse_focus, panel);
        self.mouse_focus = panel.filter(|&id| self.is_enabled(id));
    }

    pub fn scroll_focus(&self) -> Option<PanelId> {
        self.live(self.scroll_focus)
    }

    /// Capture all scroll events for `panel`
    pub fn set_scroll_focus(&mut self, panel: Option<PanelId>) {
        debug!("scroll focus {:?} -> {:?}", self.scroll_focus, panel);
        self.scroll_focus = panel.filter(|&id| self.is_enabled(id));
    }

    pub fn cursor_focus(&self) -> Option<PanelId> {
        self.live(self.cursor_focus)
    }

    /// Capture all cursor motion for `panel`
    pub fn set_cursor_focus(&mut self, panel: Option<PanelId>) {
        debug!("cursor focus {:?} -> {:?}", self.cursor_focus, panel);
        self.cursor_focus = panel.filter(|&id| self.is_enabled(id));
    }

    /// Panel under the cursor as of the last cursor event
    pub fn target(&self) -> Option<PanelId> {
        self.target.filter(|&id| self.tree.contains(id))
    }

    // Timers

    /// Run `callback` once, `delay` after the last frame tick
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: Fn(&mut Root, TimerId) + 'static,
    {
        self.timers.set_timeout(delay, Rc::new(callback))
    }

    /// Run `callback` every `period`
    pub fn set_interval<F>(&mut self, period: Duration, callback: F) -> TimerId
    where
        F: Fn(&mut Root, TimerId) + 'static,
    {
        self.timers.set_interval(period, Rc::new(callback))
    }

    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.timers.clear(id)
    }

    pub fn timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    fn run_timers(&mut self, now: Duration) {
        for id in self.timers.advance(now) {
            if let Some(callback) = self.timers.fire(id) {
                callback(self, id);
            }
        }
    }
}
