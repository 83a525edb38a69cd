use docgraph_model::{Document, NodeId};

/// Which callbacks a collector receives during a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Elements and intrinsics only
    Objects,
    /// Text and collection properties only
    Properties,
    ObjectsAndProperties,
}

impl Strategy {
    pub fn visits_objects(self) -> bool {
        matches!(self, Strategy::Objects | Strategy::ObjectsAndProperties)
    }

    pub fn visits_properties(self) -> bool {
        matches!(self, Strategy::Properties | Strategy::ObjectsAndProperties)
    }
}

/// Query over the node graph, driven by a depth-first pre-order walk.
///
/// The walk descends through every owned node. `accept_*` returning false
/// prunes the node and everything below it; `collect_*` is only called for
/// the node kinds selected by [`Collector::strategy`].
pub trait Collector {
    type Output;

    fn strategy(&self) -> Strategy;

    fn accept_object(&self, _doc: &Document, _object: NodeId) -> bool {
        true
    }

    fn accept_property(&self, _doc: &Document, _property: NodeId) -> bool {
        true
    }

    fn collect_object(&mut self, _doc: &Document, _object: NodeId) {}

    fn collect_property(&mut self, _doc: &Document, _property: NodeId) {}

    /// Consume the collector and return what it accumulated
    fn collected(self) -> Self::Output;
}

/// Run a collector over the whole document
pub fn collect<C: Collector>(doc: &Document, mut collector: C) -> C::Output {
    if let Some(root) = doc.root() {
        walk_object(doc, root, &mut collector);
    }
    collector.collected()
}

/// Run a collector over the subtree starting at `start` (object or property)
pub fn collect_from<C: Collector>(doc: &Document, start: NodeId, mut collector: C) -> C::Output {
    if doc.node(start).is_object() {
        walk_object(doc, start, &mut collector);
    } else {
        walk_property(doc, start, &mut collector);
    }
    collector.collected()
}

pub fn walk_object<C: Collector>(doc: &Document, object: NodeId, collector: &mut C) {
    if !collector.accept_object(doc, object) {
        return;
    }
    if collector.strategy().visits_objects() {
        collector.collect_object(doc, object);
    }
    for &property in doc.properties(object) {
        walk_property(doc, property, collector);
    }
}

pub fn walk_property<C: Collector>(doc: &Document, property: NodeId, collector: &mut C) {
    if !collector.accept_property(doc, property) {
        return;
    }
    if collector.strategy().visits_properties() {
        collector.collect_property(doc, property);
    }
    for &value in doc.values(property) {
        walk_object(doc, value, collector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgraph_model::{IntrinsicKind, TreeNode};

    /// Records the visit order as node labels
    struct Trace {
        strategy: Strategy,
        seen: Vec<String>,
    }

    impl Collector for Trace {
        type Output = Vec<String>;

        fn strategy(&self) -> Strategy {
            self.strategy
        }

        fn collect_object(&mut self, doc: &Document, object: NodeId) {
            self.seen.push(doc.node(object).label());
        }

        fn collect_property(&mut self, doc: &Document, property: NodeId) {
            self.seen.push(doc.node(property).label());
        }

        fn collected(self) -> Vec<String> {
            self.seen
        }
    }

    fn doc() -> Document {
        let tree = TreeNode::element("VBox").with_text("spacing", "4").with_values(
            "children",
            vec![
                TreeNode::element("Button").with_id("ok"),
                TreeNode::intrinsic(IntrinsicKind::Reference, "ok"),
            ],
        );
        Document::from_tree(Some(tree), None).unwrap()
    }

    fn trace(strategy: Strategy) -> Vec<String> {
        collect(
            &doc(),
            Trace {
                strategy,
                seen: Vec::new(),
            },
        )
    }

    #[test]
    fn test_pre_order_with_both_strategies() {
        assert_eq!(
            trace(Strategy::ObjectsAndProperties),
            vec![
                "VBox",
                "spacing=\"4\"",
                "children[2]",
                "Button #ok",
                "fx:reference ok"
            ]
        );
    }

    #[test]
    fn test_objects_only() {
        assert_eq!(
            trace(Strategy::Objects),
            vec!["VBox", "Button #ok", "fx:reference ok"]
        );
    }

    #[test]
    fn test_properties_only() {
        assert_eq!(
            trace(Strategy::Properties),
            vec!["spacing=\"4\"", "children[2]"]
        );
    }

    #[test]
    fn test_empty_document_collects_nothing() {
        let seen = collect(
            &Document::default(),
            Trace {
                strategy: Strategy::ObjectsAndProperties,
                seen: Vec::new(),
            },
        );
        assert!(seen.is_empty());
    }
}
