//! Node types of the editable graph.
//!
//! A document is made of four kinds of nodes:
//!
//! ```text
//! Element ──owns──▶ TextProperty        (leaf value, maybe "$id")
//!    │
//!    └────owns──▶ CollectionProperty ──owns──▶ Element | Intrinsic
//! ```
//!
//! Elements and intrinsics are *objects*: they live inside a collection
//! property or at the document root. Text and collection properties are
//! *properties*: they always belong to exactly one element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node stored in a [`crate::Document`].
///
/// Handles are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name of a property, optionally scoped to a residence type
/// (`GridPane.columnIndex` is the `columnIndex` property owned by `GridPane`
/// but stored on the child).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PropertyName {
    pub residence: Option<String>,
    pub name: String,
}

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            residence: None,
            name: name.into(),
        }
    }

    /// Static (attached) property such as `BorderPane.alignment`
    pub fn attached(residence: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            residence: Some(residence.into()),
            name: name.into(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.residence.is_some()
    }

    /// Parse the display form. `Type.name` is treated as an attached
    /// property when `Type` starts with an uppercase letter.
    pub fn parse(text: &str) -> Self {
        if let Some((residence, name)) = text.split_once('.') {
            if residence.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && !name.is_empty() {
                return Self::attached(residence, name);
            }
        }
        Self::new(text)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.residence {
            Some(residence) => write!(f, "{}.{}", residence, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<String> for PropertyName {
    fn from(value: String) -> Self {
        PropertyName::parse(&value)
    }
}

impl From<&str> for PropertyName {
    fn from(value: &str) -> Self {
        PropertyName::parse(value)
    }
}

impl From<PropertyName> for String {
    fn from(value: PropertyName) -> Self {
        value.to_string()
    }
}

/// Kind of an intrinsic marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntrinsicKind {
    Reference,
    Copy,
    Include,
}

impl fmt::Display for IntrinsicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntrinsicKind::Reference => f.write_str("reference"),
            IntrinsicKind::Copy => f.write_str("copy"),
            IntrinsicKind::Include => f.write_str("include"),
        }
    }
}

/// Object instance with named properties
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub type_name: String,
    pub id: Option<String>,
    /// Controller class bound to this element, if any
    pub controller: Option<String>,
    pub(crate) properties: Vec<NodeId>,
}

impl Element {
    /// Property nodes in declaration order
    pub fn properties(&self) -> &[NodeId] {
        &self.properties
    }
}

/// Reference / copy / include marker naming an element by id
#[derive(Debug, Clone, PartialEq)]
pub struct Intrinsic {
    pub kind: IntrinsicKind,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProperty {
    pub name: PropertyName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionProperty {
    pub name: PropertyName,
    pub(crate) values: Vec<NodeId>,
}

impl CollectionProperty {
    pub fn values(&self) -> &[NodeId] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Intrinsic(Intrinsic),
    Text(TextProperty),
    Collection(CollectionProperty),
}

/// A node and its owning parent.
///
/// Objects point at the collection property holding them; properties point
/// at their element. Detached nodes and the root have no parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn detached(kind: NodeKind) -> Self {
        Self { kind, parent: None }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Elements and intrinsics
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_) | NodeKind::Intrinsic(_))
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_) | NodeKind::Collection(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_intrinsic(&self) -> Option<&Intrinsic> {
        match &self.kind {
            NodeKind::Intrinsic(intrinsic) => Some(intrinsic),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextProperty> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionProperty> {
        match &self.kind {
            NodeKind::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Name of a text or collection property
    pub fn property_name(&self) -> Option<&PropertyName> {
        match &self.kind {
            NodeKind::Text(text) => Some(&text.name),
            NodeKind::Collection(collection) => Some(&collection.name),
            _ => None,
        }
    }

    /// Short label used in logs and outlines
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Element(e) => match &e.id {
                Some(id) => format!("{} #{}", e.type_name, id),
                None => e.type_name.clone(),
            },
            NodeKind::Intrinsic(i) => format!("fx:{} {}", i.kind, i.source),
            NodeKind::Text(t) => format!("{}=\"{}\"", t.name, t.value),
            NodeKind::Collection(c) => format!("{}[{}]", c.name, c.values.len()),
        }
    }
}
