//! Current selection of an edit session.
//!
//! Like the document, the selection supports nested update brackets: changes
//! made inside a bracket produce a single change notification when the
//! outermost bracket closes.

use docgraph_model::NodeId;
use tracing::debug;

/// Ordered set of selected objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    items: Vec<NodeId>,
}

impl SelectionGroup {
    /// Returns `None` for an empty list; duplicates keep their first position
    pub fn from_objects(objects: impl IntoIterator<Item = NodeId>) -> Option<Self> {
        let mut items: Vec<NodeId> = Vec::new();
        for object in objects {
            if !items.contains(&object) {
                items.push(object);
            }
        }
        if items.is_empty() {
            None
        } else {
            Some(Self { items })
        }
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn contains(&self, object: NodeId) -> bool {
        self.items.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Selection {
    group: Option<SelectionGroup>,
    update_depth: u32,
    pending_change: bool,
    revision: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self) -> Option<&SelectionGroup> {
        self.group.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_none()
    }

    /// Number of change notifications emitted so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// # Panics
    ///
    /// Panics when no bracket is open.
    pub fn end_update(&mut self) {
        assert!(
            self.update_depth > 0,
            "selection end_update called without a matching begin_update"
        );
        self.update_depth -= 1;
        if self.update_depth == 0 && self.pending_change {
            self.notify();
        }
    }

    pub fn select(&mut self, group: Option<SelectionGroup>) {
        if self.group == group {
            return;
        }
        self.group = group;
        if self.update_depth == 0 {
            self.notify();
        } else {
            self.pending_change = true;
        }
    }

    pub fn select_objects(&mut self, objects: impl IntoIterator<Item = NodeId>) {
        self.select(SelectionGroup::from_objects(objects));
    }

    pub fn clear(&mut self) {
        self.select(None);
    }

    fn notify(&mut self) {
        self.pending_change = false;
        self.revision += 1;
        debug!(
            revision = self.revision,
            selected = self.group.as_ref().map_or(0, SelectionGroup::len),
            "selection changed"
        );
    }
}
