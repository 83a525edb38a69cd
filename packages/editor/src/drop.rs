//! # Drop targets
//!
//! Decides where dragged objects land in a container and builds the job
//! placing them there.
//!
//! Accessory resolution, first success wins:
//!
//! 1. the accessory named by the caller, if any
//! 2. the main accessory of the container
//! 3. the first accessory, in declared order, accepting every dragged object
//!
//! A rejected drop builds no job.

use crate::batch::{SelectionBatchJob, SelectionUpdate};
use crate::context::EditorContext;
use crate::job::Job;
use crate::jobs::{InsertAsAccessoryJob, ModifyObjectPropertyJob, ReIndexObjectJob, RemoveObjectJob, SetRootJob};
use crate::mask::{Accessory, HierarchyMask};
use crate::metadata::ContainerKind;
use docgraph_model::{NodeId, PropertyName};
use tracing::debug;

/// Value written to the alignment of objects dropped in a border region
pub const DEFAULT_BORDER_ALIGNMENT: &str = "CENTER";

pub fn border_alignment_property() -> PropertyName {
    PropertyName::attached("BorderPane", "alignment")
}

/// What is being dragged
pub trait DragSource {
    /// Dragged objects, in drag order
    fn dragged_objects(&self) -> &[NodeId];

    /// Description of the job performing the drop
    fn description(&self) -> String;
}

/// Objects taken from the document being edited (or detached ones built
/// for insertion)
#[derive(Debug, Clone)]
pub struct DocumentDragSource {
    objects: Vec<NodeId>,
    description: String,
}

impl DocumentDragSource {
    pub fn new(objects: Vec<NodeId>) -> Self {
        let description = match objects.len() {
            1 => "Drop object".to_string(),
            n => format!("Drop {} objects", n),
        };
        Self {
            objects,
            description,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl DragSource for DocumentDragSource {
    fn dragged_objects(&self) -> &[NodeId] {
        &self.objects
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Drop into an accessory of a container element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryDropTarget {
    target: NodeId,
    accessory: Option<Accessory>,
}

impl AccessoryDropTarget {
    /// `accessory` of `None` lets the container pick one
    pub fn new(target: NodeId, accessory: Option<Accessory>) -> Self {
        Self { target, accessory }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn accessory(&self) -> Option<Accessory> {
        self.accessory
    }

    pub fn resolve_accessory(&self, ctx: &EditorContext, source: &dyn DragSource) -> Option<Accessory> {
        let dragged = source.dragged_objects();
        if dragged.is_empty() || ctx.document.element(self.target).is_none() {
            return None;
        }
        let mask = ctx.mask(self.target);
        let non_virtual: Vec<NodeId> = dragged
            .iter()
            .copied()
            .filter(|&o| !ctx.is_virtual(o))
            .collect();

        let resolved = match self.accessory {
            Some(accessory) => explicit_accessory(&mask, accessory, dragged, &non_virtual),
            None => main_accessory(&mask, dragged, &non_virtual)
                .or_else(|| first_compatible_accessory(&mask, dragged)),
        };
        debug!(
            target = %self.target,
            dragged = dragged.len(),
            accessory = ?resolved,
            "resolved drop accessory"
        );
        resolved
    }

    pub fn accept_drag_source(&self, ctx: &EditorContext, source: &dyn DragSource) -> bool {
        self.resolve_accessory(ctx, source).is_some()
    }

    /// Job performing the drop, selecting the dropped objects
    pub fn make_drop_job(&self, ctx: &EditorContext, source: &dyn DragSource) -> Option<Job> {
        let accessory = self.resolve_accessory(ctx, source)?;
        let dragged = source.dragged_objects();
        let mask = ctx.mask(self.target);

        let mut batch = SelectionBatchJob::new(
            source.description(),
            SelectionUpdate::Objects(dragged.to_vec()),
        );
        if dragged.iter().all(|&o| mask.accessory_of(o) == Some(accessory)) {
            for &object in dragged {
                batch.add(ctx.job(ReIndexObjectJob::new(object, None)));
            }
            return Some(ctx.job(batch));
        }

        for &object in dragged {
            if ctx.document.parent(object).is_some() || ctx.document.root() == Some(object) {
                batch.add(ctx.job(RemoveObjectJob::new(object)));
            }
        }
        for &object in dragged {
            batch.add(ctx.job(InsertAsAccessoryJob::new(object, self.target, accessory)));
        }
        if mask.kind() == ContainerKind::Border && accessory.is_region() {
            let alignment = border_alignment_property();
            for &object in dragged {
                let Some(type_name) = ctx.document.type_name(object) else {
                    continue;
                };
                if ctx.is_virtual(object)
                    || ctx.document.text_value(object, &alignment).is_some()
                    || ctx.metadata().default_value(type_name, &alignment).is_some()
                {
                    continue;
                }
                batch.add(ctx.job(ModifyObjectPropertyJob::new(
                    object,
                    alignment.clone(),
                    Some(DEFAULT_BORDER_ALIGNMENT.to_string()),
                )));
            }
        }
        Some(ctx.job(batch))
    }
}

fn explicit_accessory(
    mask: &HierarchyMask<'_>,
    accessory: Accessory,
    dragged: &[NodeId],
    non_virtual: &[NodeId],
) -> Option<Accessory> {
    if !mask.has_accessory(accessory) {
        return None;
    }
    if !accessory.is_collection() {
        if non_virtual.len() > 1 {
            return None;
        }
        let incoming = non_virtual
            .iter()
            .any(|&o| mask.accessory_of(o) != Some(accessory));
        let held_by_other = mask
            .accessory_values(accessory)
            .iter()
            .any(|v| !dragged.contains(v));
        if incoming && held_by_other {
            return None;
        }
    }
    if dragged
        .iter()
        .all(|&o| mask.is_accepting_accessory(accessory, o))
    {
        Some(accessory)
    } else {
        None
    }
}

fn main_accessory(
    mask: &HierarchyMask<'_>,
    dragged: &[NodeId],
    non_virtual: &[NodeId],
) -> Option<Accessory> {
    let main = mask.main_accessory()?;
    let single_object = dragged.len() == 1 && non_virtual.len() == 1;
    if (main.is_collection() || single_object)
        && dragged.iter().all(|&o| mask.is_accepting_sub_component(o))
    {
        Some(main)
    } else {
        None
    }
}

fn first_compatible_accessory(mask: &HierarchyMask<'_>, dragged: &[NodeId]) -> Option<Accessory> {
    mask.accessories().iter().copied().find(|&accessory| {
        if !accessory.is_collection() && dragged.len() > 1 {
            // Stricter than skipping only occupied singletons: an empty
            // singleton cannot take several objects either.
            return false;
        }
        dragged
            .iter()
            .all(|&o| mask.is_accepting_accessory(accessory, o))
    })
}

/// Drop that makes a single object the root of an empty document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootDropTarget;

impl RootDropTarget {
    pub fn accept_drag_source(&self, ctx: &EditorContext, source: &dyn DragSource) -> bool {
        match source.dragged_objects() {
            [object] => {
                ctx.document.root().is_none()
                    && ctx.document.element(*object).is_some()
                    && !ctx.is_virtual(*object)
            }
            _ => false,
        }
    }

    pub fn make_drop_job(&self, ctx: &EditorContext, source: &dyn DragSource) -> Option<Job> {
        if !self.accept_drag_source(ctx, source) {
            return None;
        }
        let object = source.dragged_objects()[0];
        let mut batch = SelectionBatchJob::new(
            source.description(),
            SelectionUpdate::Objects(vec![object]),
        );
        if ctx.document.parent(object).is_some() {
            batch.add(ctx.job(RemoveObjectJob::new(object)));
        }
        batch.add(ctx.job(SetRootJob::new(Some(object))));
        Some(ctx.job(batch))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Accessory(AccessoryDropTarget),
    Root(RootDropTarget),
}

impl DropTarget {
    pub fn accessory(target: NodeId, accessory: Option<Accessory>) -> Self {
        DropTarget::Accessory(AccessoryDropTarget::new(target, accessory))
    }

    pub fn root() -> Self {
        DropTarget::Root(RootDropTarget)
    }

    pub fn accept_drag_source(&self, ctx: &EditorContext, source: &dyn DragSource) -> bool {
        match self {
            DropTarget::Accessory(target) => target.accept_drag_source(ctx, source),
            DropTarget::Root(target) => target.accept_drag_source(ctx, source),
        }
    }

    pub fn make_drop_job(&self, ctx: &EditorContext, source: &dyn DragSource) -> Option<Job> {
        match self {
            DropTarget::Accessory(target) => target.make_drop_job(ctx, source),
            DropTarget::Root(target) => target.make_drop_job(ctx, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ExtensionRegistry;
    use crate::metadata::BuiltinMetadata;
    use docgraph_model::{Document, TreeNode};
    use std::rc::Rc;

    fn context(tree: Option<TreeNode>) -> EditorContext {
        EditorContext::new(
            Document::from_tree(tree, None).unwrap(),
            Rc::new(BuiltinMetadata::new()),
            Rc::new(ExtensionRegistry::new()),
        )
    }

    #[test]
    fn test_empty_drag_is_rejected() {
        let ctx = context(Some(TreeNode::element("VBox")));
        let root = ctx.document.root().unwrap();
        let target = AccessoryDropTarget::new(root, None);
        assert!(!target.accept_drag_source(&ctx, &DocumentDragSource::new(vec![])));
    }

    #[test]
    fn test_pane_takes_many_in_children() {
        let mut ctx = context(Some(TreeNode::element("VBox")));
        let root = ctx.document.root().unwrap();
        let a = ctx.document.new_element("Button");
        let b = ctx.document.new_element("Label");
        let source = DocumentDragSource::new(vec![a, b]);
        let target = AccessoryDropTarget::new(root, None);
        assert_eq!(target.resolve_accessory(&ctx, &source), Some(Accessory::Children));
    }

    #[test]
    fn test_border_main_accessory_takes_single_object() {
        let mut ctx = context(Some(TreeNode::element("BorderPane")));
        let root = ctx.document.root().unwrap();
        let a = ctx.document.new_element("Button");
        let b = ctx.document.new_element("Label");
        let target = AccessoryDropTarget::new(root, None);

        let single = DocumentDragSource::new(vec![a]);
        assert_eq!(target.resolve_accessory(&ctx, &single), Some(Accessory::Center));

        // no singleton can take two objects
        let double = DocumentDragSource::new(vec![a, b]);
        assert_eq!(target.resolve_accessory(&ctx, &double), None);
    }

    #[test]
    fn test_virtual_object_falls_through_to_its_accessory() {
        let mut ctx = context(Some(TreeNode::element("Button")));
        let root = ctx.document.root().unwrap();
        let tooltip = ctx.document.new_element("Tooltip");
        let target = AccessoryDropTarget::new(root, None);
        let source = DocumentDragSource::new(vec![tooltip]);
        assert_eq!(target.resolve_accessory(&ctx, &source), Some(Accessory::Tooltip));
    }

    #[test]
    fn test_explicit_occupied_singleton_rejects_new_object() {
        let mut ctx = context(Some(
            TreeNode::element("BorderPane")
                .with_values("top", vec![TreeNode::element("ToolBar")]),
        ));
        let root = ctx.document.root().unwrap();
        let label = ctx.document.new_element("Label");
        let target = AccessoryDropTarget::new(root, Some(Accessory::Top));
        assert!(!target.accept_drag_source(&ctx, &DocumentDragSource::new(vec![label])));

        let bottom = AccessoryDropTarget::new(root, Some(Accessory::Bottom));
        assert!(bottom.accept_drag_source(&ctx, &DocumentDragSource::new(vec![label])));
    }

    #[test]
    fn test_region_drop_sets_alignment() {
        let mut ctx = context(Some(TreeNode::element("BorderPane")));
        let root = ctx.document.root().unwrap();
        let label = ctx.document.new_element("Label");
        let target = AccessoryDropTarget::new(root, Some(Accessory::Left));

        let mut job = target
            .make_drop_job(&ctx, &DocumentDragSource::new(vec![label]))
            .unwrap();
        job.execute(&mut ctx);

        assert_eq!(ctx.mask(root).accessory_values(Accessory::Left), &[label]);
        assert_eq!(
            ctx.document.text_value(label, &border_alignment_property()),
            Some(DEFAULT_BORDER_ALIGNMENT)
        );
        assert!(ctx.selection.group().unwrap().contains(label));

        job.undo(&mut ctx);
        assert!(ctx.mask(root).accessory_property(Accessory::Left).is_none());
        assert_eq!(ctx.document.text_value(label, &border_alignment_property()), None);
        assert!(ctx.selection.is_empty());
    }

    #[test]
    fn test_root_drop_only_into_empty_document() {
        let mut ctx = context(None);
        let pane = ctx.document.new_element("AnchorPane");
        let tooltip = ctx.document.new_element("Tooltip");

        let target = DropTarget::root();
        assert!(!target.accept_drag_source(&ctx, &DocumentDragSource::new(vec![tooltip])));
        assert!(!target.accept_drag_source(&ctx, &DocumentDragSource::new(vec![pane, tooltip])));

        let mut job = target
            .make_drop_job(&ctx, &DocumentDragSource::new(vec![pane]))
            .unwrap();
        job.execute(&mut ctx);
        assert_eq!(ctx.document.root(), Some(pane));
        assert!(!target.accept_drag_source(&ctx, &DocumentDragSource::new(vec![pane])));
    }
}
