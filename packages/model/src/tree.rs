//! Owned tree form of a document.
//!
//! External readers hand a parsed [`TreeNode`] to [`Document::from_tree`];
//! writers get one back from [`Document::to_tree`] or raw bytes from
//! [`Document::to_bytes`]. The tree form is also what structural equality
//! is measured on.

use crate::document::Document;
use crate::error::ModelError;
use crate::node::{
    CollectionProperty, Element, Intrinsic, IntrinsicKind, Node, NodeId, NodeKind, PropertyName,
    TextProperty,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Element {
        #[serde(rename = "typeName")]
        type_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        controller: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        properties: Vec<TreeProperty>,
    },
    Intrinsic {
        kind: IntrinsicKind,
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeProperty {
    Text { name: PropertyName, value: String },
    Collection { name: PropertyName, values: Vec<TreeNode> },
}

impl TreeProperty {
    pub fn name(&self) -> &PropertyName {
        match self {
            TreeProperty::Text { name, .. } | TreeProperty::Collection { name, .. } => name,
        }
    }
}

impl TreeNode {
    pub fn element(type_name: impl Into<String>) -> Self {
        TreeNode::Element {
            type_name: type_name.into(),
            id: None,
            controller: None,
            properties: Vec::new(),
        }
    }

    pub fn intrinsic(kind: IntrinsicKind, source: impl Into<String>) -> Self {
        TreeNode::Intrinsic {
            kind,
            source: source.into(),
        }
    }

    /// Set the id of an element; no-op on intrinsics
    pub fn with_id(mut self, new_id: impl Into<String>) -> Self {
        if let TreeNode::Element { id, .. } = &mut self {
            *id = Some(new_id.into());
        }
        self
    }

    pub fn with_controller(mut self, class: impl Into<String>) -> Self {
        if let TreeNode::Element { controller, .. } = &mut self {
            *controller = Some(class.into());
        }
        self
    }

    pub fn with_text(mut self, name: impl Into<PropertyName>, value: impl Into<String>) -> Self {
        if let TreeNode::Element { properties, .. } = &mut self {
            properties.push(TreeProperty::Text {
                name: name.into(),
                value: value.into(),
            });
        }
        self
    }

    pub fn with_values(mut self, name: impl Into<PropertyName>, values: Vec<TreeNode>) -> Self {
        if let TreeNode::Element { properties, .. } = &mut self {
            properties.push(TreeProperty::Collection {
                name: name.into(),
                values,
            });
        }
        self
    }

    /// Check that no element declares a property name twice
    pub fn validate(&self) -> Result<(), ModelError> {
        if let TreeNode::Element {
            type_name,
            properties,
            ..
        } = self
        {
            let mut seen = HashSet::new();
            for property in properties {
                if !seen.insert(property.name()) {
                    return Err(ModelError::DuplicateProperty {
                        type_name: type_name.clone(),
                        name: property.name().clone(),
                    });
                }
                if let TreeProperty::Collection { values, .. } = property {
                    values.iter().try_for_each(TreeNode::validate)?;
                }
            }
        }
        Ok(())
    }

    /// Copy of this tree without element ids, for comparing clones
    pub fn without_ids(&self) -> TreeNode {
        match self {
            TreeNode::Element {
                type_name,
                controller,
                properties,
                ..
            } => TreeNode::Element {
                type_name: type_name.clone(),
                id: None,
                controller: controller.clone(),
                properties: properties
                    .iter()
                    .map(|p| match p {
                        TreeProperty::Text { .. } => p.clone(),
                        TreeProperty::Collection { name, values } => TreeProperty::Collection {
                            name: name.clone(),
                            values: values.iter().map(TreeNode::without_ids).collect(),
                        },
                    })
                    .collect(),
            },
            TreeNode::Intrinsic { .. } => self.clone(),
        }
    }
}

impl Document {
    /// Build a document from a parsed tree. The revision starts at 0.
    pub fn from_tree(root: Option<TreeNode>, location: Option<PathBuf>) -> Result<Self, ModelError> {
        let mut doc = Document::new(location);
        doc.root = root.as_ref().map(|tree| doc.insert_tree(tree)).transpose()?;
        Ok(doc)
    }

    /// Decode a document serialized by [`Document::to_bytes`]
    pub fn from_bytes(bytes: &[u8], location: Option<PathBuf>) -> Result<Self, ModelError> {
        let root: Option<TreeNode> = serde_json::from_slice(bytes)?;
        Self::from_tree(root, location)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec_pretty(&self.to_tree())?)
    }

    pub fn to_tree(&self) -> Option<TreeNode> {
        self.root().map(|root| self.object_tree(root))
    }

    /// Tree form of an object (element or intrinsic) and everything it owns.
    ///
    /// # Panics
    ///
    /// Panics if `object` is a property node.
    pub fn object_tree(&self, object: NodeId) -> TreeNode {
        match self.node(object).kind() {
            NodeKind::Element(element) => TreeNode::Element {
                type_name: element.type_name.clone(),
                id: element.id.clone(),
                controller: element.controller.clone(),
                properties: element
                    .properties()
                    .iter()
                    .map(|&p| self.property_tree(p))
                    .collect(),
            },
            NodeKind::Intrinsic(intrinsic) => TreeNode::Intrinsic {
                kind: intrinsic.kind,
                source: intrinsic.source.clone(),
            },
            _ => panic!("object_tree called on property node {}", object),
        }
    }

    fn property_tree(&self, property: NodeId) -> TreeProperty {
        match self.node(property).kind() {
            NodeKind::Text(text) => TreeProperty::Text {
                name: text.name.clone(),
                value: text.value.clone(),
            },
            NodeKind::Collection(collection) => TreeProperty::Collection {
                name: collection.name.clone(),
                values: collection
                    .values()
                    .iter()
                    .map(|&v| self.object_tree(v))
                    .collect(),
            },
            _ => panic!("property_tree called on object node {}", property),
        }
    }

    /// Allocate a detached subtree from its tree form.
    ///
    /// The whole tree is checked before anything is allocated: an element
    /// declaring the same property name twice is rejected.
    pub fn insert_tree(&mut self, tree: &TreeNode) -> Result<NodeId, ModelError> {
        tree.validate()?;
        Ok(self.alloc_tree(tree))
    }

    fn alloc_tree(&mut self, tree: &TreeNode) -> NodeId {
        match tree {
            TreeNode::Element {
                type_name,
                id,
                controller,
                properties,
            } => {
                let element = self.alloc(Node::detached(NodeKind::Element(Element {
                    type_name: type_name.clone(),
                    id: id.clone(),
                    controller: controller.clone(),
                    properties: Vec::new(),
                })));
                for property in properties {
                    let p = self.insert_property_tree(property);
                    self.attach_property(element, p, None);
                }
                element
            }
            TreeNode::Intrinsic { kind, source } => {
                self.alloc(Node::detached(NodeKind::Intrinsic(Intrinsic {
                    kind: *kind,
                    source: source.clone(),
                })))
            }
        }
    }

    fn insert_property_tree(&mut self, tree: &TreeProperty) -> NodeId {
        match tree {
            TreeProperty::Text { name, value } => self.alloc(Node::detached(NodeKind::Text(TextProperty {
                name: name.clone(),
                value: value.clone(),
            }))),
            TreeProperty::Collection { name, values } => {
                let collection = self.alloc(Node::detached(NodeKind::Collection(CollectionProperty {
                    name: name.clone(),
                    values: Vec::new(),
                })));
                for value in values {
                    let v = self.alloc_tree(value);
                    self.attach_value(collection, v, None);
                }
                collection
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::element("VBox")
            .with_id("root")
            .with_controller("app.MainController")
            .with_values(
                "children",
                vec![
                    TreeNode::element("Button").with_id("ok").with_text("text", "OK"),
                    TreeNode::intrinsic(IntrinsicKind::Reference, "ok"),
                ],
            )
    }

    #[test]
    fn test_tree_round_trips_through_document() {
        let doc = Document::from_tree(Some(sample()), None).unwrap();
        assert_eq!(doc.to_tree(), Some(sample()));
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["typeName"], "VBox");
        assert_eq!(json["properties"][0]["type"], "collection");
        assert_eq!(json["properties"][0]["values"][1]["kind"], "reference");
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = Document::from_bytes(b"{ not json", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_duplicate_property_is_rejected() {
        let tree = TreeNode::element("VBox").with_values(
            "children",
            vec![TreeNode::element("Label")
                .with_text("labelFor", "$field")
                .with_text("labelFor", "other")],
        );
        match tree.validate() {
            Err(ModelError::DuplicateProperty { type_name, name }) => {
                assert_eq!(type_name, "Label");
                assert_eq!(name, PropertyName::new("labelFor"));
            }
            other => panic!("expected duplicate property, got {:?}", other),
        }

        let mut doc = Document::new(None);
        assert!(doc.insert_tree(&tree).is_err());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn test_without_ids_strips_nested_ids() {
        let stripped = sample().without_ids();
        if let TreeNode::Element { id, properties, .. } = &stripped {
            assert!(id.is_none());
            if let TreeProperty::Collection { values, .. } = &properties[0] {
                assert!(matches!(&values[0], TreeNode::Element { id: None, .. }));
            } else {
                panic!("expected collection");
            }
        } else {
            panic!("expected element");
        }
    }
}
