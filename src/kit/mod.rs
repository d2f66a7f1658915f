// OrbitKit widgets built on the panel event core

pub mod components;

use crate::events::{Event, EventData, SubscriptionId};
use crate::panel::{PanelId, TreeResult};
use crate::root::Root;

/// Capabilities shared by every widget
///
/// A widget owns one panel in the root's tree and talks to it through the
/// root; the tree stays the single owner of panel state.
pub trait Widget {
    /// The panel backing this widget
    fn panel(&self) -> PanelId;

    fn children<'r>(&self, root: &'r Root) -> &'r [PanelId] {
        root.tree().children(self.panel())
    }

    /// Append `child` to this widget's panel
    fn add(&self, root: &mut Root, child: &dyn Widget) -> TreeResult<()> {
        root.add_child(self.panel(), child.panel())
    }

    fn remove(&self, root: &mut Root, child: &dyn Widget) -> TreeResult<()> {
        root.remove_child(self.panel(), child.panel())
    }

    /// Dispatch `name` to this widget's panel only
    fn dispatch(&self, root: &mut Root, name: &str, data: &EventData) -> usize {
        root.dispatch(self.panel(), name, data)
    }

    fn subscribe<F>(&self, root: &mut Root, name: &str, handler: F) -> Option<SubscriptionId>
    where
        F: Fn(&mut Root, &Event<'_>) + 'static,
        Self: Sized,
    {
        root.subscribe(self.panel(), name, handler)
    }
}

/// A bare panel is the simplest widget, typically a container
impl Widget for PanelId {
    fn panel(&self) -> PanelId {
        *self
    }
}

/// Re-export of common components for convenience
pub mod prelude {
    pub use crate::kit::components::button::Button;
    pub use crate::kit::components::checkbox::CheckBox;
    pub use crate::kit::components::dropdown::DropDown;
    pub use crate::kit::components::edit::Edit;
    pub use crate::kit::components::slider::Slider;
    pub use crate::kit::Widget;
}
