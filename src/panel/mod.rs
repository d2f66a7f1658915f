//! Panels: the visual nodes events are routed to
//!
//! A panel owns its geometry, its visibility and enabled flags, and the
//! handlers subscribed on it. Panels live in a [`PanelTree`] arena and refer
//! to each other by [`PanelId`], so a handler that disposes a panel while an
//! event is walking the tree leaves only a stale id behind, never a dangling
//! reference.

mod tree;

pub use tree::{Ancestors, PanelTree, TreeError, TreeResult};

use std::fmt;

use crate::events::Dispatcher;
use crate::layout::{EdgeValues, Point, Rect, Size};
use crate::root::Root;

/// Unique identifier of a panel within one tree
///
/// Identifiers are never reused, so an id that outlived its panel simply
/// resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    /// Build an id from its raw value
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel#{}", self.0)
    }
}

/// A node of the panel tree
#[derive(Debug)]
pub struct PanelNode {
    id: PanelId,
    /// Optional label used in logs
    pub name: Option<String>,
    /// Margin box origin relative to the parent's content area
    pub(crate) position: Point,
    /// Stacking order relative to the parent; higher is closer to the viewer
    pub(crate) z: f32,
    pub(crate) content: Size,
    pub(crate) margin: EdgeValues,
    pub(crate) border: EdgeValues,
    pub(crate) padding: EdgeValues,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    /// Set once a cursor-enter was delivered, cleared by cursor-leave
    pub(crate) cursor_enter: bool,
    pub(crate) parent: Option<PanelId>,
    pub(crate) children: Vec<PanelId>,
    /// Whether the panel hangs under the tree's root panel
    pub(crate) attached: bool,
    pub(crate) dispatcher: Dispatcher<Root>,
}

impl PanelNode {
    pub(crate) fn new(id: PanelId, width: f32, height: f32) -> Self {
        Self {
            id,
            name: None,
            position: Point::zero(),
            z: 0.0,
            content: Size::new(width, height),
            margin: EdgeValues::zero(),
            border: EdgeValues::zero(),
            padding: EdgeValues::zero(),
            visible: true,
            enabled: true,
            cursor_enter: false,
            parent: None,
            children: Vec::new(),
            attached: false,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn margin(&self) -> EdgeValues {
        self.margin
    }

    pub fn border(&self) -> EdgeValues {
        self.border
    }

    pub fn padding(&self) -> EdgeValues {
        self.padding
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Size of the border box: content, padding and borders
    pub fn border_size(&self) -> Size {
        Size::new(
            self.content.width + self.padding.horizontal() + self.border.horizontal(),
            self.content.height + self.padding.vertical() + self.border.vertical(),
        )
    }

    /// Size of the margin box, the full footprint of the panel
    pub fn outer_size(&self) -> Size {
        let border = self.border_size();
        Size::new(
            border.width + self.margin.horizontal(),
            border.height + self.margin.vertical(),
        )
    }

    /// Offset from the margin box origin to the content box origin
    pub fn content_offset(&self) -> Point {
        Point::new(
            self.margin.left + self.border.left + self.padding.left,
            self.margin.top + self.border.top + self.padding.top,
        )
    }

    /// Border box relative to the given margin box origin
    pub(crate) fn border_rect_at(&self, origin: Point) -> Rect {
        let size = self.border_size();
        Rect::new(
            origin.x + self.margin.left,
            origin.y + self.margin.top,
            size.width,
            size.height,
        )
    }

    /// The panel's own visibility flag, ignoring ancestors
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a cursor-enter is outstanding for this panel
    pub fn cursor_entered(&self) -> bool {
        self.cursor_enter
    }

    pub fn parent(&self) -> Option<PanelId> {
        self.parent
    }

    pub fn children(&self) -> &[PanelId] {
        &self.children
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn dispatcher(&self) -> &Dispatcher<Root> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<Root> {
        &mut self.dispatcher
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Point::new(x, y);
    }

    pub fn set_z(&mut self, z: f32) {
        self.z = z;
    }

    pub fn set_margin(&mut self, margin: EdgeValues) {
        self.margin = margin;
    }

    pub fn set_border(&mut self, border: EdgeValues) {
        self.border = border;
    }

    pub fn set_padding(&mut self, padding: EdgeValues) {
        self.padding = padding;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
