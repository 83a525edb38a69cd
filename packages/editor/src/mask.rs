//! # Accessories and masks
//!
//! A mask exposes the insertion points ("accessories") of an element in
//! terms that do not depend on the element's type:
//!
//! | kind      | accessories (declared order)                          | main     |
//! |-----------|-------------------------------------------------------|----------|
//! | `Pane`    | CHILDREN, CONTEXT_MENU, TOOLTIP                       | CHILDREN |
//! | `Grid`    | CHILDREN, CONTEXT_MENU, TOOLTIP                       | CHILDREN |
//! | `Border`  | TOP, BOTTOM, LEFT, RIGHT, CENTER, CONTEXT_MENU, TOOLTIP | CENTER |
//! | `Content` | CONTENT, CONTEXT_MENU, TOOLTIP                        | CONTENT  |
//! | `Leaf`    | CONTEXT_MENU, TOOLTIP                                 | -        |
//! | `Plain`   | -                                                     | -        |

use crate::batch::BatchJob;
use crate::context::EditorContext;
use crate::job::Job;
use crate::jobs::ModifyObjectPropertyJob;
use crate::metadata::{ContainerKind, Metadata};
use docgraph_model::{Document, NodeId, PropertyName};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessory {
    Children,
    Top,
    Bottom,
    Left,
    Right,
    Center,
    Content,
    ContextMenu,
    Tooltip,
}

const PANE_ACCESSORIES: &[Accessory] = &[
    Accessory::Children,
    Accessory::ContextMenu,
    Accessory::Tooltip,
];

const BORDER_ACCESSORIES: &[Accessory] = &[
    Accessory::Top,
    Accessory::Bottom,
    Accessory::Left,
    Accessory::Right,
    Accessory::Center,
    Accessory::ContextMenu,
    Accessory::Tooltip,
];

const CONTENT_ACCESSORIES: &[Accessory] = &[
    Accessory::Content,
    Accessory::ContextMenu,
    Accessory::Tooltip,
];

const LEAF_ACCESSORIES: &[Accessory] = &[Accessory::ContextMenu, Accessory::Tooltip];

impl Accessory {
    pub const ALL: [Accessory; 9] = [
        Accessory::Children,
        Accessory::Top,
        Accessory::Bottom,
        Accessory::Left,
        Accessory::Right,
        Accessory::Center,
        Accessory::Content,
        Accessory::ContextMenu,
        Accessory::Tooltip,
    ];

    /// Name of the property storing this accessory's objects
    pub fn property_name(self) -> PropertyName {
        let name = match self {
            Accessory::Children => "children",
            Accessory::Top => "top",
            Accessory::Bottom => "bottom",
            Accessory::Left => "left",
            Accessory::Right => "right",
            Accessory::Center => "center",
            Accessory::Content => "content",
            Accessory::ContextMenu => "contextMenu",
            Accessory::Tooltip => "tooltip",
        };
        PropertyName::new(name)
    }

    pub fn from_property_name(name: &PropertyName) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|accessory| &accessory.property_name() == name)
    }

    /// Collections accept many objects, singletons at most one
    pub fn is_collection(self) -> bool {
        matches!(self, Accessory::Children)
    }

    /// One of the four regions or the center of a border container
    pub fn is_region(self) -> bool {
        matches!(
            self,
            Accessory::Top | Accessory::Bottom | Accessory::Left | Accessory::Right | Accessory::Center
        )
    }

    /// The only type a virtual accessory accepts
    pub fn virtual_type(self) -> Option<&'static str> {
        match self {
            Accessory::ContextMenu => Some("ContextMenu"),
            Accessory::Tooltip => Some("Tooltip"),
            _ => None,
        }
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accessory::Children => "CHILDREN",
            Accessory::Top => "TOP",
            Accessory::Bottom => "BOTTOM",
            Accessory::Left => "LEFT",
            Accessory::Right => "RIGHT",
            Accessory::Center => "CENTER",
            Accessory::Content => "CONTENT",
            Accessory::ContextMenu => "CONTEXT_MENU",
            Accessory::Tooltip => "TOOLTIP",
        };
        f.write_str(name)
    }
}

/// Accessory view of one element
pub struct HierarchyMask<'a> {
    doc: &'a Document,
    metadata: &'a dyn Metadata,
    element: NodeId,
    kind: ContainerKind,
}

impl<'a> HierarchyMask<'a> {
    /// Intrinsics and virtual elements get a `Plain` mask
    pub fn new(doc: &'a Document, metadata: &'a dyn Metadata, element: NodeId) -> Self {
        let kind = match doc.type_name(element) {
            Some(t) if !metadata.is_virtual(t) => metadata.container_kind(t),
            _ => ContainerKind::Plain,
        };
        Self {
            doc,
            metadata,
            element,
            kind,
        }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn accessories(&self) -> &'static [Accessory] {
        match self.kind {
            ContainerKind::Pane | ContainerKind::Grid => PANE_ACCESSORIES,
            ContainerKind::Border => BORDER_ACCESSORIES,
            ContainerKind::Content => CONTENT_ACCESSORIES,
            ContainerKind::Leaf => LEAF_ACCESSORIES,
            ContainerKind::Plain => &[],
        }
    }

    pub fn has_accessory(&self, accessory: Accessory) -> bool {
        self.accessories().contains(&accessory)
    }

    pub fn main_accessory(&self) -> Option<Accessory> {
        match self.kind {
            ContainerKind::Pane | ContainerKind::Grid => Some(Accessory::Children),
            ContainerKind::Border => Some(Accessory::Center),
            ContainerKind::Content => Some(Accessory::Content),
            ContainerKind::Leaf | ContainerKind::Plain => None,
        }
    }

    /// Property node currently storing the accessory, if present
    pub fn accessory_property(&self, accessory: Accessory) -> Option<NodeId> {
        self.doc.property(self.element, &accessory.property_name())
    }

    pub fn accessory_values(&self, accessory: Accessory) -> &'a [NodeId] {
        match self.accessory_property(accessory) {
            Some(property) => self.doc.values(property),
            None => &[],
        }
    }

    pub fn is_occupied(&self, accessory: Accessory) -> bool {
        !self.accessory_values(accessory).is_empty()
    }

    /// Objects under the main accessory
    pub fn sub_components(&self) -> &'a [NodeId] {
        match self.main_accessory() {
            Some(main) => self.accessory_values(main),
            None => &[],
        }
    }

    /// Accessory of this element holding `object`, if any
    pub fn accessory_of(&self, object: NodeId) -> Option<Accessory> {
        if self.doc.parent_element(object) != Some(self.element) {
            return None;
        }
        let property = self.doc.parent_property(object)?;
        let name = self.doc.node(property).property_name()?;
        Accessory::from_property_name(name).filter(|&a| self.has_accessory(a))
    }

    pub fn is_virtual_object(&self, object: NodeId) -> bool {
        self.doc
            .type_name(object)
            .is_some_and(|t| self.metadata.is_virtual(t))
    }

    /// Type-level compatibility of `object` with `accessory`. Also refuses
    /// the element itself and its ancestors, which would create a cycle.
    pub fn is_accepting_accessory(&self, accessory: Accessory, object: NodeId) -> bool {
        if !self.has_accessory(accessory) || !self.doc.node(object).is_object() {
            return false;
        }
        if self.doc.is_descendant_of(self.element, object) {
            return false;
        }
        match accessory.virtual_type() {
            Some(virtual_type) => self.doc.type_name(object) == Some(virtual_type),
            None => !self.is_virtual_object(object),
        }
    }

    pub fn is_accepting_sub_component(&self, object: NodeId) -> bool {
        self.main_accessory()
            .is_some_and(|main| self.is_accepting_accessory(main, object))
    }
}

pub fn column_index_property() -> PropertyName {
    PropertyName::attached("GridPane", "columnIndex")
}

pub fn row_index_property() -> PropertyName {
    PropertyName::attached("GridPane", "rowIndex")
}

/// Row/column geometry of a grid container
pub struct GridMask<'a> {
    mask: HierarchyMask<'a>,
}

impl<'a> GridMask<'a> {
    /// `None` unless the element is a grid container
    pub fn new(mask: HierarchyMask<'a>) -> Option<Self> {
        if mask.kind() == ContainerKind::Grid {
            Some(Self { mask })
        } else {
            None
        }
    }

    pub fn mask(&self) -> &HierarchyMask<'a> {
        &self.mask
    }

    pub fn children(&self) -> &'a [NodeId] {
        self.mask.accessory_values(Accessory::Children)
    }

    pub fn column_constraints(&self) -> &'a [NodeId] {
        self.mask
            .doc
            .children(self.mask.element, &PropertyName::new("columnConstraints"))
    }

    pub fn row_constraints(&self) -> &'a [NodeId] {
        self.mask
            .doc
            .children(self.mask.element, &PropertyName::new("rowConstraints"))
    }

    /// Column of a child; an absent or unreadable index counts as 0
    pub fn column_index(&self, child: NodeId) -> usize {
        self.read_index(child, &column_index_property())
    }

    /// Row of a child; an absent or unreadable index counts as 0
    pub fn row_index(&self, child: NodeId) -> usize {
        self.read_index(child, &row_index_property())
    }

    pub fn cell_of(&self, child: NodeId) -> (usize, usize) {
        (self.column_index(child), self.row_index(child))
    }

    /// max(column constraints, 1 + highest child column index)
    pub fn columns_size(&self) -> usize {
        let used = self
            .children()
            .iter()
            .map(|&c| self.column_index(c).saturating_add(1))
            .max()
            .unwrap_or(0);
        self.column_constraints().len().max(used)
    }

    /// max(row constraints, 1 + highest child row index)
    pub fn rows_size(&self) -> usize {
        let used = self
            .children()
            .iter()
            .map(|&c| self.row_index(c).saturating_add(1))
            .max()
            .unwrap_or(0);
        self.row_constraints().len().max(used)
    }

    /// First child placed at the given cell
    pub fn child_at(&self, column: usize, row: usize) -> Option<NodeId> {
        self.children()
            .iter()
            .copied()
            .find(|&c| self.cell_of(c) == (column, row))
    }

    fn read_index(&self, child: NodeId, property: &PropertyName) -> usize {
        let doc = self.mask.doc;
        let stored = doc.text_value(child, property).map(str::to_string);
        let value = stored.or_else(|| {
            doc.type_name(child)
                .and_then(|t| self.mask.metadata.default_value(t, property))
        });
        value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

/// Job moving a grid child to another cell.
///
/// Indices equal to the metadata default are removed rather than written.
/// Returns `None` when the child already sits in that cell.
pub fn move_to_cell_job(
    ctx: &EditorContext,
    child: NodeId,
    column: usize,
    row: usize,
) -> Option<Job> {
    let container = ctx.document.parent_element(child)?;
    let grid = GridMask::new(ctx.mask(container))?;
    let type_name = ctx.document.type_name(child)?;

    let mut batch = BatchJob::new(format!("Move to cell ({}, {})", column, row));
    for (property, current, target) in [
        (column_index_property(), grid.column_index(child), column),
        (row_index_property(), grid.row_index(child), row),
    ] {
        if current == target {
            continue;
        }
        let default = ctx.metadata().default_value(type_name, &property);
        let value = if default.as_deref() == Some(target.to_string().as_str()) {
            None
        } else {
            Some(target.to_string())
        };
        batch.add(ctx.job(ModifyObjectPropertyJob::new(child, property, value)));
    }

    if batch.is_empty() {
        None
    } else {
        Some(ctx.job(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::BuiltinMetadata;
    use docgraph_model::TreeNode;

    fn button_at(column: Option<usize>, row: Option<usize>) -> TreeNode {
        let mut button = TreeNode::element("Button");
        if let Some(c) = column {
            button = button.with_text("GridPane.columnIndex", c.to_string());
        }
        if let Some(r) = row {
            button = button.with_text("GridPane.rowIndex", r.to_string());
        }
        button
    }

    fn grid(constraints: usize, children: Vec<TreeNode>) -> Document {
        let mut tree = TreeNode::element("GridPane");
        if constraints > 0 {
            tree = tree.with_values(
                "columnConstraints",
                (0..constraints)
                    .map(|_| TreeNode::element("ColumnConstraints"))
                    .collect(),
            );
        }
        Document::from_tree(Some(tree.with_values("children", children)), None).unwrap()
    }

    #[test]
    fn test_columns_size_from_child_indices() {
        let doc = grid(
            0,
            vec![
                button_at(Some(0), None),
                button_at(Some(2), None),
                button_at(Some(1), None),
            ],
        );
        let metadata = BuiltinMetadata::new();
        let mask = HierarchyMask::new(&doc, &metadata, doc.root().unwrap());
        let grid = GridMask::new(mask).unwrap();
        assert_eq!(grid.columns_size(), 3);
        assert_eq!(grid.rows_size(), 1);
    }

    #[test]
    fn test_columns_size_from_constraints() {
        let doc = grid(5, vec![button_at(Some(0), None), button_at(Some(1), None)]);
        let metadata = BuiltinMetadata::new();
        let grid = GridMask::new(HierarchyMask::new(&doc, &metadata, doc.root().unwrap())).unwrap();
        assert_eq!(grid.columns_size(), 5);
        assert_eq!(grid.column_constraints().len(), 5);
    }

    #[test]
    fn test_absent_index_reads_as_zero() {
        let doc = grid(0, vec![button_at(None, Some(3)), button_at(Some(1), Some(1))]);
        let metadata = BuiltinMetadata::new();
        let grid = GridMask::new(HierarchyMask::new(&doc, &metadata, doc.root().unwrap())).unwrap();
        let first = grid.children()[0];
        assert_eq!(grid.cell_of(first), (0, 3));
        assert_eq!(grid.child_at(0, 3), Some(first));
        assert_eq!(grid.child_at(1, 1), Some(grid.children()[1]));
        assert_eq!(grid.child_at(4, 4), None);
        assert_eq!(grid.rows_size(), 4);
    }

    #[test]
    fn test_largest_index_saturates_size() {
        let doc = grid(0, vec![button_at(Some(usize::MAX), Some(usize::MAX))]);
        let metadata = BuiltinMetadata::new();
        let grid = GridMask::new(HierarchyMask::new(&doc, &metadata, doc.root().unwrap())).unwrap();
        assert_eq!(grid.columns_size(), usize::MAX);
        assert_eq!(grid.rows_size(), usize::MAX);
        assert_eq!(grid.child_at(usize::MAX, usize::MAX), Some(grid.children()[0]));
    }

    #[test]
    fn test_empty_grid_has_no_cells() {
        let doc = grid(0, vec![]);
        let metadata = BuiltinMetadata::new();
        let grid = GridMask::new(HierarchyMask::new(&doc, &metadata, doc.root().unwrap())).unwrap();
        assert_eq!(grid.columns_size(), 0);
        assert_eq!(grid.rows_size(), 0);
    }

    #[test]
    fn test_border_accessories_and_main() {
        let doc = Document::from_tree(
            Some(
                TreeNode::element("BorderPane")
                    .with_values("top", vec![TreeNode::element("ToolBar")]),
            ),
            None,
        )
        .unwrap();
        let metadata = BuiltinMetadata::new();
        let root = doc.root().unwrap();
        let mask = HierarchyMask::new(&doc, &metadata, root);

        assert_eq!(mask.main_accessory(), Some(Accessory::Center));
        assert_eq!(mask.accessories()[0], Accessory::Top);
        assert!(mask.is_occupied(Accessory::Top));
        assert!(!mask.is_occupied(Accessory::Center));

        let toolbar = mask.accessory_values(Accessory::Top)[0];
        assert_eq!(mask.accessory_of(toolbar), Some(Accessory::Top));
        assert!(!Accessory::Top.is_collection());
    }

    #[test]
    fn test_virtual_accessories_accept_only_their_type() {
        let mut doc = Document::from_tree(Some(TreeNode::element("Button")), None).unwrap();
        let menu = doc.new_element("ContextMenu");
        let label = doc.new_element("Label");
        let metadata = BuiltinMetadata::new();
        let mask = HierarchyMask::new(&doc, &metadata, doc.root().unwrap());

        assert!(mask.is_accepting_accessory(Accessory::ContextMenu, menu));
        assert!(!mask.is_accepting_accessory(Accessory::Tooltip, menu));
        assert!(!mask.is_accepting_accessory(Accessory::ContextMenu, label));
        assert!(!mask.is_accepting_sub_component(label));
    }

    #[test]
    fn test_mask_refuses_ancestors() {
        let doc = Document::from_tree(
            Some(TreeNode::element("VBox").with_values("children", vec![TreeNode::element("HBox")])),
            None,
        )
        .unwrap();
        let metadata = BuiltinMetadata::new();
        let root = doc.root().unwrap();
        let inner = doc.children(root, &PropertyName::new("children"))[0];
        let mask = HierarchyMask::new(&doc, &metadata, inner);
        assert!(!mask.is_accepting_sub_component(root));
        assert!(!mask.is_accepting_sub_component(inner));
    }
}
