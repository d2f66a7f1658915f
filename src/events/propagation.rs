//! Ancestor-chain event propagation
//!
//! Events aimed at a panel travel up its parent chain. How far they go
//! depends on the [`PropagationMode`] and on the optional [`Bounds`]:
//!
//! - `FirstSubscribed` stops at the first panel (the target included) that
//!   has at least one handler for the event.
//! - `All` delivers to every panel on the way; enter/leave notifications use
//!   it so every highlighted ancestor hears about the transition.
//! - `Bounds::exclude` stops the walk before reaching that panel.
//! - `Bounds::include` delivers to that panel and stops right after.
//!
//! Disabled panels are passed over: they hear nothing and never count as the
//! first subscriber. A handler raising [`Stop::GUI`] also ends the walk. The parent of each
//! panel is read before its handlers run, so a handler may detach or dispose
//! the panel being visited; the walk then continues from the remembered
//! parent if it still exists.

use super::event::{EventData, Stop};
use crate::panel::{PanelId, PanelNode};
use crate::root::Root;

/// How far an event travels up the ancestor chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    /// Stop at the first panel with a handler for the event
    FirstSubscribed,
    /// Deliver to every panel in the chain
    All,
}

/// Optional limits of an ancestor walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Stop before this panel; it and everything above never see the event
    pub exclude: Option<PanelId>,
    /// Deliver to this panel, then stop
    pub include: Option<PanelId>,
}

impl Bounds {
    /// Walk until the chain ends
    pub fn none() -> Self {
        Self::default()
    }

    pub fn excluding(mut self, ancestor: Option<PanelId>) -> Self {
        self.exclude = ancestor;
        self
    }

    pub fn including(mut self, ancestor: Option<PanelId>) -> Self {
        self.include = ancestor;
        self
    }
}

/// Walk from `target` up its ancestors calling `deliver` on each panel
///
/// `deliver` returns the number of handlers it invoked. Returns the total
/// over the walk.
pub fn walk_ancestors<F>(
    root: &mut Root,
    target: PanelId,
    mode: PropagationMode,
    bounds: Bounds,
    mut deliver: F,
) -> usize
where
    F: FnMut(&mut Root, PanelId) -> usize,
{
    let mut total = 0;
    let mut current = Some(target);

    while let Some(id) = current {
        if bounds.exclude == Some(id) || !root.tree().contains(id) {
            break;
        }
        let parent = root.tree().parent(id);

        let enabled = root.tree().get(id).is_some_and(PanelNode::enabled);
        let count = if enabled { deliver(root, id) } else { 0 };
        total += count;

        if bounds.include == Some(id)
            || (mode == PropagationMode::FirstSubscribed && count > 0)
            || root.stop_flags().contains(Stop::GUI)
        {
            break;
        }
        current = parent;
    }
    total
}

/// Dispatch `name` to `target` and its ancestors
///
/// Returns the number of handlers invoked over the whole walk.
pub fn propagate_to_ancestors(
    root: &mut Root,
    target: PanelId,
    mode: PropagationMode,
    bounds: Bounds,
    name: &str,
    data: &EventData,
) -> usize {
    walk_ancestors(root, target, mode, bounds, |root, id| root.dispatch(id, name, data))
}
