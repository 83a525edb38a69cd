//! # Document
//!
//! Owns the node arena, the root object and the revision counter.
//!
//! ## Update brackets
//!
//! ```text
//! begin_update ─▶ begin_update ─▶ mutate... ─▶ end_update ─▶ end_update
//!                                                              │
//!                          will_refresh / did_refresh ◀────────┘
//!                          revision += 1
//! ```
//!
//! Brackets nest. Only the outermost `end_update` notifies observers and
//! bumps the revision. Every structural mutation must happen inside a
//! bracket. The depth counter is not a lock: callers serialize access.

use crate::node::{
    CollectionProperty, Element, Intrinsic, IntrinsicKind, Node, NodeId, NodeKind, PropertyName,
    TextProperty,
};
use crate::observer::{RevisionListener, SceneObserver};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: Option<NodeId>,
    location: Option<PathBuf>,
    revision: u64,
    update_depth: u32,
    observers: Vec<Box<dyn SceneObserver>>,
    revision_listeners: Vec<RevisionListener>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("location", &self.location)
            .field("revision", &self.revision)
            .field("update_depth", &self.update_depth)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Document {
    /// Empty document (no root)
    pub fn new(location: Option<PathBuf>) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            location,
            revision: 0,
            update_depth: 0,
            observers: Vec::new(),
            revision_listeners: Vec::new(),
        }
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: Option<PathBuf>) {
        self.location = location;
    }

    // ------------------------------------------------------------------
    // Revision and update brackets
    // ------------------------------------------------------------------

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn update_depth(&self) -> u32 {
        self.update_depth
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// Close an update bracket.
    ///
    /// # Panics
    ///
    /// Panics when no bracket is open.
    pub fn end_update(&mut self) {
        assert!(
            self.update_depth > 0,
            "end_update called without a matching begin_update"
        );
        self.update_depth -= 1;
        if self.update_depth == 0 {
            self.refresh();
        }
    }

    /// Run `f` inside one update bracket
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_update();
        let result = f(self);
        self.end_update();
        result
    }

    pub fn add_observer(&mut self, observer: Box<dyn SceneObserver>) {
        self.observers.push(observer);
    }

    /// Register a listener called with the new revision after each refresh
    pub fn on_revision(&mut self, listener: RevisionListener) {
        self.revision_listeners.push(listener);
    }

    fn refresh(&mut self) {
        let mut observers = std::mem::take(&mut self.observers);
        for observer in observers.iter_mut() {
            observer.will_refresh(self);
        }
        for observer in observers.iter_mut() {
            observer.did_refresh(self);
        }
        self.observers = observers;

        self.revision += 1;
        debug!(revision = self.revision, "document refreshed");

        let mut listeners = std::mem::take(&mut self.revision_listeners);
        for listener in listeners.iter_mut() {
            listener(self.revision);
        }
        self.revision_listeners = listeners;
    }

    fn assert_updating(&self, operation: &str) {
        assert!(
            self.update_depth > 0,
            "{} must run inside begin_update/end_update",
            operation
        );
    }

    // ------------------------------------------------------------------
    // Root
    // ------------------------------------------------------------------

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Replace the root object, inside its own update bracket.
    ///
    /// # Panics
    ///
    /// Panics if `root` is a property or is still attached somewhere.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.update(|doc| doc.set_root_unbracketed(root));
    }

    /// Replace the root object within the caller's update bracket
    pub fn set_root_unbracketed(&mut self, root: Option<NodeId>) {
        self.assert_updating("set_root");
        if let Some(new_root) = root {
            let node = self.node(new_root);
            assert!(node.is_object(), "root must be an object, got {}", new_root);
            assert!(node.parent.is_none(), "root {} is still attached", new_root);
        }
        self.root = root;
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// # Panics
    ///
    /// Panics if `id` was not allocated by this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn intrinsic(&self, id: NodeId) -> Option<&Intrinsic> {
        self.get(id).and_then(Node::as_intrinsic)
    }

    pub fn text_property(&self, id: NodeId) -> Option<&TextProperty> {
        self.get(id).and_then(Node::as_text)
    }

    pub fn collection_property(&self, id: NodeId) -> Option<&CollectionProperty> {
        self.get(id).and_then(Node::as_collection)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Collection property holding an object
    pub fn parent_property(&self, object: NodeId) -> Option<NodeId> {
        let node = self.node(object);
        if node.is_object() {
            node.parent
        } else {
            None
        }
    }

    /// Element owning a property, or owning the property that holds an object
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        if node.is_object() {
            node.parent.and_then(|p| self.node(p).parent)
        } else {
            node.parent
        }
    }

    /// Position of a node inside its parent: index among the collection
    /// values for objects, among the element properties for properties
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        match &self.node(parent).kind {
            NodeKind::Collection(c) => c.values.iter().position(|&v| v == id),
            NodeKind::Element(e) => e.properties.iter().position(|&p| p == id),
            _ => None,
        }
    }

    /// Property nodes of an element (empty for anything else)
    pub fn properties(&self, element: NodeId) -> &[NodeId] {
        self.element(element).map(Element::properties).unwrap_or(&[])
    }

    pub fn property(&self, element: NodeId, name: &PropertyName) -> Option<NodeId> {
        self.properties(element)
            .iter()
            .copied()
            .find(|&p| self.node(p).property_name() == Some(name))
    }

    /// Values of a collection property (empty for anything else)
    pub fn values(&self, collection: NodeId) -> &[NodeId] {
        self.collection_property(collection)
            .map(CollectionProperty::values)
            .unwrap_or(&[])
    }

    /// Objects held under `name` on `element`
    pub fn children(&self, element: NodeId, name: &PropertyName) -> &[NodeId] {
        match self.property(element, name) {
            Some(p) => self.values(p),
            None => &[],
        }
    }

    /// Text value of `name` on `element`, if set as a text property
    pub fn text_value(&self, element: NodeId, name: &PropertyName) -> Option<&str> {
        self.property(element, name)
            .and_then(|p| self.text_property(p))
            .map(|t| t.value.as_str())
    }

    pub fn element_id(&self, element: NodeId) -> Option<&str> {
        self.element(element).and_then(|e| e.id.as_deref())
    }

    pub fn type_name(&self, element: NodeId) -> Option<&str> {
        self.element(element).map(|e| e.type_name.as_str())
    }

    /// True if `node` is `ancestor` or sits below it
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// True if the node is reachable from the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        match self.root {
            Some(root) => self.is_descendant_of(node, root),
            None => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Construction (detached nodes, no bracket required)
    // ------------------------------------------------------------------

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn new_element(&mut self, type_name: impl Into<String>) -> NodeId {
        self.alloc(Node::detached(NodeKind::Element(Element {
            type_name: type_name.into(),
            id: None,
            controller: None,
            properties: Vec::new(),
        })))
    }

    pub fn new_intrinsic(&mut self, kind: IntrinsicKind, source: impl Into<String>) -> NodeId {
        self.alloc(Node::detached(NodeKind::Intrinsic(Intrinsic {
            kind,
            source: source.into(),
        })))
    }

    pub fn new_text_property(&mut self, name: PropertyName, value: impl Into<String>) -> NodeId {
        self.alloc(Node::detached(NodeKind::Text(TextProperty {
            name,
            value: value.into(),
        })))
    }

    pub fn new_collection_property(&mut self, name: PropertyName) -> NodeId {
        self.alloc(Node::detached(NodeKind::Collection(CollectionProperty {
            name,
            values: Vec::new(),
        })))
    }

    /// Detached deep copy of a node and everything it owns
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        match self.node(id).kind.clone() {
            NodeKind::Element(element) => {
                let copy = self.alloc(Node::detached(NodeKind::Element(Element {
                    properties: Vec::new(),
                    ..element.clone()
                })));
                for property in element.properties {
                    let p = self.deep_copy(property);
                    self.attach_property(copy, p, None);
                }
                copy
            }
            NodeKind::Collection(collection) => {
                let copy = self.alloc(Node::detached(NodeKind::Collection(CollectionProperty {
                    name: collection.name.clone(),
                    values: Vec::new(),
                })));
                for value in collection.values {
                    let v = self.deep_copy(value);
                    self.attach_value(copy, v, None);
                }
                copy
            }
            kind @ (NodeKind::Intrinsic(_) | NodeKind::Text(_)) => self.alloc(Node::detached(kind)),
        }
    }

    // ------------------------------------------------------------------
    // Structural mutation (bracketed)
    // ------------------------------------------------------------------

    /// Attach a detached property to an element at `index` (append if `None`).
    ///
    /// # Panics
    ///
    /// Panics outside an update bracket, if `element` is not an element, if
    /// `property` is not a detached property, or if the element already has
    /// a property with the same name.
    pub fn add_property(&mut self, element: NodeId, property: NodeId, index: Option<usize>) {
        self.assert_updating("add_property");
        self.attach_property(element, property, index);
    }

    /// Detach a property from its element, returning the element and the
    /// position it occupied.
    ///
    /// # Panics
    ///
    /// Panics outside an update bracket or if the property is detached.
    pub fn remove_property(&mut self, property: NodeId) -> (NodeId, usize) {
        self.assert_updating("remove_property");
        let element = self
            .node(property)
            .parent
            .unwrap_or_else(|| panic!("property {} is not attached", property));
        let index = match &mut self.node_mut(element).kind {
            NodeKind::Element(e) => {
                let index = e
                    .properties
                    .iter()
                    .position(|&p| p == property)
                    .unwrap_or_else(|| panic!("{} not listed on its element", property));
                e.properties.remove(index);
                index
            }
            _ => panic!("parent of property {} is not an element", property),
        };
        self.node_mut(property).parent = None;
        (element, index)
    }

    /// Attach a detached object to a collection property at `index`
    /// (append if `None`).
    ///
    /// # Panics
    ///
    /// Panics outside an update bracket, if `collection` is not a collection
    /// property, or if `object` is not a detached object.
    pub fn add_value(&mut self, collection: NodeId, object: NodeId, index: Option<usize>) {
        self.assert_updating("add_value");
        self.attach_value(collection, object, index);
    }

    /// Detach an object from its collection property, returning the
    /// collection and the position it occupied.
    ///
    /// # Panics
    ///
    /// Panics outside an update bracket or if the object is not held by a
    /// collection property.
    pub fn remove_value(&mut self, object: NodeId) -> (NodeId, usize) {
        self.assert_updating("remove_value");
        let collection = self
            .parent_property(object)
            .unwrap_or_else(|| panic!("object {} is not held by a property", object));
        let index = match &mut self.node_mut(collection).kind {
            NodeKind::Collection(c) => {
                let index = c
                    .values
                    .iter()
                    .position(|&v| v == object)
                    .unwrap_or_else(|| panic!("{} not listed in its collection", object));
                c.values.remove(index);
                index
            }
            _ => panic!("parent of object {} is not a collection", object),
        };
        self.node_mut(object).parent = None;
        (collection, index)
    }

    /// Replace the value of a text property, returning the previous value
    pub fn set_text_value(&mut self, property: NodeId, value: impl Into<String>) -> String {
        self.assert_updating("set_text_value");
        match &mut self.node_mut(property).kind {
            NodeKind::Text(text) => std::mem::replace(&mut text.value, value.into()),
            _ => panic!("{} is not a text property", property),
        }
    }

    /// Replace the id of an element, returning the previous id
    pub fn set_element_id(&mut self, element: NodeId, id: Option<String>) -> Option<String> {
        self.assert_updating("set_element_id");
        match &mut self.node_mut(element).kind {
            NodeKind::Element(e) => std::mem::replace(&mut e.id, id),
            _ => panic!("{} is not an element", element),
        }
    }

    /// Replace the source of an intrinsic, returning the previous source
    pub fn set_intrinsic_source(&mut self, intrinsic: NodeId, source: impl Into<String>) -> String {
        self.assert_updating("set_intrinsic_source");
        match &mut self.node_mut(intrinsic).kind {
            NodeKind::Intrinsic(i) => std::mem::replace(&mut i.source, source.into()),
            _ => panic!("{} is not an intrinsic", intrinsic),
        }
    }

    pub(crate) fn attach_property(&mut self, element: NodeId, property: NodeId, index: Option<usize>) {
        let node = self.node(property);
        let name = node
            .property_name()
            .cloned()
            .unwrap_or_else(|| panic!("{} is not a property", property));
        assert!(node.parent.is_none(), "property {} is already attached", property);
        assert!(
            self.property(element, &name).is_none(),
            "element {} already has property {}",
            element,
            name
        );
        match &mut self.node_mut(element).kind {
            NodeKind::Element(e) => {
                let at = index.unwrap_or(e.properties.len()).min(e.properties.len());
                e.properties.insert(at, property);
            }
            _ => panic!("{} is not an element", element),
        }
        self.node_mut(property).parent = Some(element);
    }

    pub(crate) fn attach_value(&mut self, collection: NodeId, object: NodeId, index: Option<usize>) {
        let node = self.node(object);
        assert!(node.is_object(), "{} is not an object", object);
        assert!(node.parent.is_none(), "object {} is already attached", object);
        assert!(self.root != Some(object), "object {} is the document root", object);
        match &mut self.node_mut(collection).kind {
            NodeKind::Collection(c) => {
                let at = index.unwrap_or(c.values.len()).min(c.values.len());
                c.values.insert(at, object);
            }
            _ => panic!("{} is not a collection property", collection),
        }
        self.node_mut(object).parent = Some(collection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingObserver {
        will: Rc<Cell<u32>>,
        did: Rc<Cell<u32>>,
    }

    impl SceneObserver for CountingObserver {
        fn will_refresh(&mut self, _document: &Document) {
            self.will.set(self.will.get() + 1);
        }

        fn did_refresh(&mut self, _document: &Document) {
            self.did.set(self.did.get() + 1);
        }
    }

    fn counted() -> (Document, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let will = Rc::new(Cell::new(0));
        let did = Rc::new(Cell::new(0));
        let mut doc = Document::default();
        doc.add_observer(Box::new(CountingObserver {
            will: will.clone(),
            did: did.clone(),
        }));
        (doc, will, did)
    }

    #[test]
    fn test_nested_brackets_refresh_once() {
        let (mut doc, will, did) = counted();

        doc.begin_update();
        doc.begin_update();
        doc.end_update();
        assert_eq!(doc.revision(), 0);
        assert_eq!(will.get(), 0);
        doc.end_update();

        assert_eq!(doc.revision(), 1);
        assert_eq!(will.get(), 1);
        assert_eq!(did.get(), 1);
    }

    #[test]
    #[should_panic(expected = "end_update called without a matching begin_update")]
    fn test_end_update_at_depth_zero_panics() {
        let mut doc = Document::default();
        doc.end_update();
    }

    #[test]
    fn test_set_root_refreshes_once() {
        let (mut doc, will, _) = counted();
        let root = doc.new_element("AnchorPane");
        doc.set_root(Some(root));
        assert_eq!(doc.root(), Some(root));
        assert_eq!(doc.revision(), 1);
        assert_eq!(will.get(), 1);
    }

    #[test]
    fn test_revision_listener_sees_new_revision() {
        let seen = Rc::new(Cell::new(0u64));
        let mut doc = Document::default();
        let sink = seen.clone();
        doc.on_revision(Box::new(move |revision| sink.set(revision)));
        doc.update(|_| {});
        doc.update(|_| {});
        assert_eq!(seen.get(), 2);
    }

    #[test]
    #[should_panic(expected = "add_value must run inside begin_update/end_update")]
    fn test_mutation_outside_bracket_panics() {
        let mut doc = Document::default();
        let collection = doc.new_collection_property(PropertyName::new("children"));
        let child = doc.new_element("Button");
        doc.add_value(collection, child, None);
    }

    #[test]
    fn test_add_and_remove_value_track_parent() {
        let mut doc = Document::default();
        let root = doc.new_element("VBox");
        let children = doc.new_collection_property(PropertyName::new("children"));
        let a = doc.new_element("Button");
        let b = doc.new_element("Label");

        doc.update(|doc| {
            doc.set_root_unbracketed(Some(root));
            doc.add_property(root, children, None);
            doc.add_value(children, a, None);
            doc.add_value(children, b, Some(0));
        });

        assert_eq!(doc.values(children), &[b, a]);
        assert_eq!(doc.parent_element(a), Some(root));
        assert_eq!(doc.index_in_parent(a), Some(1));
        assert!(doc.is_attached(a));

        let (collection, index) = doc.update(|doc| doc.remove_value(b));
        assert_eq!((collection, index), (children, 0));
        assert_eq!(doc.parent(b), None);
        assert!(!doc.is_attached(b));
    }

    #[test]
    fn test_deep_copy_is_detached_and_equal() {
        let mut doc = Document::default();
        let root = doc.new_element("VBox");
        let text = doc.new_text_property(PropertyName::new("spacing"), "4");
        doc.update(|doc| {
            doc.set_root_unbracketed(Some(root));
            doc.add_property(root, text, None);
        });

        let copy = doc.deep_copy(root);
        assert_ne!(copy, root);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.object_tree(copy), doc.object_tree(root));
    }

    #[test]
    fn test_text_value_lookup() {
        let mut doc = Document::default();
        let root = doc.new_element("Button");
        let name = PropertyName::attached("GridPane", "rowIndex");
        let text = doc.new_text_property(name.clone(), "2");
        doc.update(|doc| {
            doc.set_root_unbracketed(Some(root));
            doc.add_property(root, text, None);
        });
        assert_eq!(doc.text_value(root, &name), Some("2"));
        let old = doc.update(|doc| doc.set_text_value(text, "3"));
        assert_eq!(old, "2");
        assert_eq!(doc.text_value(root, &name), Some("3"));
    }
}
