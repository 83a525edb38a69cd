//! # Docgraph Model
//!
//! In-memory node graph backing an editable UI description.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ reader: bytes / TreeNode → Document          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: Document                              │
//! │  - node arena (elements, intrinsics, props)  │
//! │  - parent back-references                    │
//! │  - update brackets + revision counter        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ projection: SceneObserver (external)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! References between elements are by id only (`fx:reference`-style
//! intrinsics and `$id` text values); they are never ownership edges.

mod document;
mod error;
mod node;
mod observer;
pub mod reference;
mod tree;

pub use document::Document;
pub use error::ModelError;
pub use node::{
    CollectionProperty, Element, Intrinsic, IntrinsicKind, Node, NodeId, NodeKind, PropertyName,
    TextProperty,
};
pub use observer::{RevisionListener, SceneObserver};
pub use reference::{is_reference_expression, parse_reference_expression, reference_expression};
pub use tree::{TreeNode, TreeProperty};
