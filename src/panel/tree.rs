//! Panel tree arena
//!
//! This module owns every [`PanelNode`] and maintains the parent/child
//! relation between them: ordered children, ancestor tests, lowest common
//! ancestors and absolute geometry.

use std::collections::HashMap;

use log::{debug, warn};

use super::{PanelId, PanelNode};
use crate::layout::{Point, Rect, Size};

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors specific to tree operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Panel not found in the tree
    #[error("Panel not found: {0}")]
    PanelNotFound(PanelId),

    /// Adding the child would create a cycle
    #[error("Cannot add {child} under {parent}: {child} is {parent} or one of its ancestors")]
    CycleDetected { parent: PanelId, child: PanelId },

    /// Invalid parent-child relationship
    #[error("Invalid parent-child relationship: {0}")]
    InvalidRelationship(String),
}

/// Arena of panels keyed by [`PanelId`]
#[derive(Debug, Default)]
pub struct PanelTree {
    nodes: HashMap<PanelId, PanelNode>,
    /// The window-sized panel everything attached hangs from
    root: Option<PanelId>,
    next_id: u64,
}

impl PanelTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached panel with the given content size
    pub fn create(&mut self, width: f32, height: f32) -> PanelId {
        let id = PanelId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, PanelNode::new(id, width, height));
        id
    }

    /// Create a panel and make it the root panel
    pub fn create_root(&mut self, width: f32, height: f32) -> PanelId {
        let id = self.create(width, height);
        self.replace_root(id);
        id
    }

    /// Make `id` the root panel; it and its subtree become attached
    pub fn set_root(&mut self, id: PanelId) -> TreeResult<()> {
        if !self.contains(id) {
            return Err(TreeError::PanelNotFound(id));
        }
        self.replace_root(id);
        Ok(())
    }

    fn replace_root(&mut self, id: PanelId) {
        if let Some(old) = self.root.replace(id) {
            self.set_attached(old, false);
        }
        self.set_attached(id, true);
    }

    pub fn root(&self) -> Option<PanelId> {
        self.root
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: PanelId) -> Option<&PanelNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut PanelNode> {
        self.nodes.get_mut(&id)
    }

    fn node(&self, id: PanelId) -> TreeResult<&PanelNode> {
        self.nodes.get(&id).ok_or(TreeError::PanelNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: PanelId) -> Option<PanelId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Children of `id` in stacking order; empty for unknown ids
    pub fn children(&self, id: PanelId) -> &[PanelId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Append `child` as the last child of `parent`
    pub fn add_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` among the children of `parent`
    ///
    /// The child is first detached from its previous parent. Indices past the
    /// end append.
    pub fn insert_child(&mut self, parent: PanelId, index: usize, child: PanelId) -> TreeResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_of(child, parent) {
            warn!("rejected cyclic insert of {} under {}", child, parent);
            return Err(TreeError::CycleDetected { parent, child });
        }
        if self.root == Some(child) {
            return Err(TreeError::InvalidRelationship(format!(
                "root panel {} cannot become a child of {}",
                child, parent
            )));
        }

        self.unlink(child);

        let attached = match self.nodes.get_mut(&parent) {
            Some(node) => {
                let index = index.min(node.children.len());
                node.children.insert(index, child);
                node.attached
            }
            None => return Err(TreeError::PanelNotFound(parent)),
        };
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        self.set_attached(child, attached);
        debug!("added {} under {}", child, parent);
        Ok(())
    }

    /// Remove `child` from the children of `parent`; the child stays in the arena
    pub fn remove_child(&mut self, parent: PanelId, child: PanelId) -> TreeResult<()> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(TreeError::InvalidRelationship(format!(
                "{} is not a child of {}",
                child, parent
            )));
        }
        self.unlink(child);
        self.set_attached(child, false);
        debug!("removed {} from {}", child, parent);
        Ok(())
    }

    /// Detach `id` from its parent, if any
    pub fn detach(&mut self, id: PanelId) -> TreeResult<()> {
        match self.node(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Remove `id` and its whole subtree from the arena
    ///
    /// Returns the removed ids, the panel itself first. Subscriptions are
    /// released together with the nodes.
    pub fn dispose(&mut self, id: PanelId) -> TreeResult<Vec<PanelId>> {
        self.node(id)?;
        self.unlink(id);
        let removed = self.descendants(id);
        for removed_id in &removed {
            if let Some(mut node) = self.nodes.remove(removed_id) {
                node.dispatcher.clear();
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        debug!("disposed {} ({} panels)", id, removed.len());
        Ok(removed)
    }

    /// `id` followed by all its descendants in pre-order
    pub fn descendants(&self, id: PanelId) -> Vec<PanelId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Iterate from `id` up through its ancestors, `id` included
    pub fn ancestors(&self, id: PanelId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// True when `other` is `ancestor` itself or one of its descendants
    pub fn is_ancestor_of(&self, ancestor: PanelId, other: PanelId) -> bool {
        self.ancestors(other).any(|id| id == ancestor)
    }

    /// Deepest panel that is an ancestor of both `a` and `b`
    ///
    /// Returns `a` when `a == b`, and `None` for panels in disjoint trees.
    pub fn lowest_common_ancestor(&self, a: PanelId, b: PanelId) -> Option<PanelId> {
        let chain: Vec<PanelId> = self.ancestors(a).collect();
        self.ancestors(b).find(|id| chain.contains(id))
    }

    /// Whether the panel and every ancestor are visible
    pub fn is_visible(&self, id: PanelId) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(&a).is_some_and(|n| n.visible))
    }

    /// Screen position of the panel's margin box origin
    pub fn absolute_position(&self, id: PanelId) -> Option<Point> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => {
                let parent_node = self.nodes.get(&parent)?;
                let origin = self
                    .absolute_position(parent)?
                    .offset(parent_node.content_offset());
                Some(origin.offset(node.position))
            }
            None => Some(node.position),
        }
    }

    /// Stacking order including the z of every ancestor
    pub fn absolute_z(&self, id: PanelId) -> f32 {
        self.ancestors(id)
            .filter_map(|a| self.nodes.get(&a))
            .map(|n| n.z)
            .sum()
    }

    /// Border box of the panel in screen coordinates
    pub fn border_rect(&self, id: PanelId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let origin = self.absolute_position(id)?;
        Some(node.border_rect_at(origin))
    }

    /// Content box of the panel in screen coordinates
    pub fn content_rect(&self, id: PanelId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let rect = self.border_rect(id)?;
        Some(rect.inset(&node.border).inset(&node.padding))
    }

    /// Whether the screen point lies within the panel's border box
    pub fn inside_borders(&self, id: PanelId, point: Point) -> bool {
        self.border_rect(id)
            .is_some_and(|rect| rect.contains_point(point))
    }

    /// Change the content size without notifying anyone
    pub fn set_content_size(&mut self, id: PanelId, width: f32, height: f32) -> TreeResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::PanelNotFound(id))?;
        node.content = Size::new(width, height);
        Ok(())
    }

    fn unlink(&mut self, child: PanelId) {
        let Some(parent) = self.nodes.get_mut(&child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }
    }

    fn set_attached(&mut self, id: PanelId, attached: bool) {
        for descendant in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(&descendant) {
                node.attached = attached;
            }
        }
    }
}

/// Iterator over a panel and its ancestors, innermost first
pub struct Ancestors<'a> {
    tree: &'a PanelTree,
    next: Option<PanelId>,
}

impl Iterator for Ancestors<'_> {
    type Item = PanelId;

    fn next(&mut self) -> Option<PanelId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
