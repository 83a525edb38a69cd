//! Drop resolution and grid placement against realistic layouts

use docgraph_editor::{
    move_to_cell_job, Accessory, AccessoryDropTarget, BuiltinMetadata, ContainerKind,
    DocumentDragSource, DropTarget, EditSession, ExtensionRegistry, GridMask, Metadata,
};
use docgraph_model::{Document, NodeId, PropertyName, TreeNode};
use std::rc::Rc;

fn session(tree: TreeNode) -> EditSession {
    EditSession::new(
        Document::from_tree(Some(tree), None).unwrap(),
        Rc::new(BuiltinMetadata::new()),
        Rc::new(ExtensionRegistry::new()),
    )
}

fn values(session: &EditSession, element: NodeId, name: &str) -> Vec<NodeId> {
    session
        .document()
        .children(element, &PropertyName::new(name))
        .to_vec()
}

/// BorderPane { top: [ToolBar], center: [VBox { children: [Button, Label] }] }
fn border_layout() -> EditSession {
    session(
        TreeNode::element("BorderPane")
            .with_values("top", vec![TreeNode::element("ToolBar")])
            .with_values(
                "center",
                vec![TreeNode::element("VBox").with_values(
                    "children",
                    vec![TreeNode::element("Button"), TreeNode::element("Label")],
                )],
            ),
    )
}

#[test]
fn test_two_objects_on_occupied_singleton_are_rejected() {
    let session = border_layout();
    let root = session.document().root().unwrap();
    let vbox = values(&session, root, "center")[0];
    let kids = values(&session, vbox, "children");

    let target = AccessoryDropTarget::new(root, Some(Accessory::Top));
    let source = DocumentDragSource::new(kids.clone());
    assert!(!target.accept_drag_source(session.context(), &source));
    assert!(target.make_drop_job(session.context(), &source).is_none());

    // even into an empty singleton, two non-virtual objects do not fit
    let bottom = AccessoryDropTarget::new(root, Some(Accessory::Bottom));
    assert!(!bottom.accept_drag_source(session.context(), &source));
}

#[test]
fn test_moving_between_containers_is_one_undo_step() {
    let mut session = border_layout();
    let root = session.document().root().unwrap();
    let vbox = values(&session, root, "center")[0];
    let kids = values(&session, vbox, "children");
    let before = session.document().to_tree();

    let target = DropTarget::accessory(root, Some(Accessory::Bottom));
    assert!(session
        .drop_objects(&target, &DocumentDragSource::new(vec![kids[1]]))
        .unwrap());

    assert_eq!(values(&session, root, "bottom"), vec![kids[1]]);
    assert_eq!(values(&session, vbox, "children"), vec![kids[0]]);
    let alignment = PropertyName::attached("BorderPane", "alignment");
    assert_eq!(session.document().text_value(kids[1], &alignment), Some("CENTER"));
    assert_eq!(session.undo_stack().undo_levels(), 1);

    session.undo();
    assert_eq!(session.document().to_tree(), before);
}

#[test]
fn test_single_drop_on_border_replaces_center_occupant() {
    let mut session = border_layout();
    let root = session.document().root().unwrap();
    let vbox = values(&session, root, "center")[0];
    let before = session.document().to_tree();
    let button = session.context_mut().document.new_element("Button");

    let target = AccessoryDropTarget::new(root, None);
    let source = DocumentDragSource::new(vec![button]);
    assert_eq!(
        target.resolve_accessory(session.context(), &source),
        Some(Accessory::Center)
    );
    assert!(session
        .drop_objects(&DropTarget::Accessory(target), &source)
        .unwrap());

    // the previous occupant is detached, not kept alongside
    assert_eq!(values(&session, root, "center"), vec![button]);
    assert_eq!(session.document().parent(vbox), None);
    assert_eq!(session.undo_stack().undo_levels(), 1);

    session.undo();
    assert_eq!(values(&session, root, "center"), vec![vbox]);
    assert_eq!(session.document().parent(button), None);
    assert_eq!(session.document().to_tree(), before);

    session.redo();
    assert_eq!(values(&session, root, "center"), vec![button]);
}

#[test]
fn test_drop_in_same_accessory_reorders() {
    let mut session = border_layout();
    let root = session.document().root().unwrap();
    let vbox = values(&session, root, "center")[0];
    let kids = values(&session, vbox, "children");

    let target = DropTarget::accessory(vbox, None);
    assert!(session
        .drop_objects(&target, &DocumentDragSource::new(vec![kids[0]]))
        .unwrap());
    assert_eq!(values(&session, vbox, "children"), vec![kids[1], kids[0]]);

    session.undo();
    assert_eq!(values(&session, vbox, "children"), kids);
}

#[test]
fn test_drop_on_leaf_only_takes_virtual_objects() {
    let mut session = border_layout();
    let root = session.document().root().unwrap();
    let vbox = values(&session, root, "center")[0];
    let button = values(&session, vbox, "children")[0];
    let menu = session.context_mut().document.new_element("ContextMenu");
    let label = session.context_mut().document.new_element("Label");

    let target = DropTarget::accessory(button, None);
    assert!(!target.accept_drag_source(session.context(), &DocumentDragSource::new(vec![label])));
    assert!(session
        .drop_objects(&target, &DocumentDragSource::new(vec![menu]))
        .unwrap());
    assert_eq!(values(&session, button, "contextMenu"), vec![menu]);
}

#[test]
fn test_configured_container_kind() {
    let mut metadata = BuiltinMetadata::new();
    metadata.register_container("SplitPane", ContainerKind::Pane);
    assert_eq!(metadata.container_kind("SplitPane"), ContainerKind::Pane);

    let mut session = EditSession::new(
        Document::from_tree(Some(TreeNode::element("SplitPane")), None).unwrap(),
        Rc::new(metadata),
        Rc::new(ExtensionRegistry::new()),
    );
    let root = session.document().root().unwrap();
    let a = session.context_mut().document.new_element("Button");
    let b = session.context_mut().document.new_element("Button");
    assert!(session
        .drop_objects(&DropTarget::accessory(root, None), &DocumentDragSource::new(vec![a, b]))
        .unwrap());
    assert_eq!(values(&session, root, "children"), vec![a, b]);
}

fn grid_session() -> EditSession {
    session(
        TreeNode::element("GridPane").with_values(
            "children",
            vec![
                TreeNode::element("Label"),
                TreeNode::element("TextField").with_text("GridPane.columnIndex", "1"),
            ],
        ),
    )
}

#[test]
fn test_move_to_cell_writes_indices_and_drops_defaults() {
    let mut session = grid_session();
    let root = session.document().root().unwrap();
    let kids = values(&session, root, "children");
    let column = PropertyName::attached("GridPane", "columnIndex");
    let row = PropertyName::attached("GridPane", "rowIndex");

    let job = move_to_cell_job(session.context(), kids[0], 2, 3).unwrap();
    session.execute(job).unwrap();
    assert_eq!(session.document().text_value(kids[0], &column), Some("2"));
    assert_eq!(session.document().text_value(kids[0], &row), Some("3"));
    {
        let grid = GridMask::new(session.context().mask(root)).unwrap();
        assert_eq!(grid.columns_size(), 3);
        assert_eq!(grid.rows_size(), 4);
        assert_eq!(grid.child_at(2, 3), Some(kids[0]));
    }

    // moving back to column 0 removes the property instead of writing "0"
    let job = move_to_cell_job(session.context(), kids[1], 0, 0).unwrap();
    session.execute(job).unwrap();
    assert_eq!(session.document().text_value(kids[1], &column), None);

    assert!(move_to_cell_job(session.context(), kids[1], 0, 0).is_none());

    session.undo();
    session.undo();
    assert_eq!(session.document().text_value(kids[0], &column), None);
    assert_eq!(session.document().text_value(kids[1], &column), Some("1"));
}

#[test]
fn test_move_to_cell_outside_grid() {
    let session = border_layout();
    let root = session.document().root().unwrap();
    let toolbar = values(&session, root, "top")[0];
    assert!(move_to_cell_job(session.context(), toolbar, 1, 1).is_none());
}
