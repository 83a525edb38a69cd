//! # Docgraph Editor
//!
//! Reversible editing of a [`docgraph_model::Document`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ intent: drop targets / reference expansion  │
//! └─────────────────────────────────────────────┘
//!                     ↓ builds
//! ┌─────────────────────────────────────────────┐
//! │ jobs: execute / undo / redo                 │
//! │  - extension hooks around every job         │
//! │  - batches coalesce refreshes               │
//! │  - undo stack owned by the session          │
//! └─────────────────────────────────────────────┘
//!                     ↓ mutates (bracketed)
//! ┌─────────────────────────────────────────────┐
//! │ model: Document + Selection                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Masks translate container types into accessories (children, regions,
//! content, context menu, tooltip) so that drop resolution never looks at
//! type names directly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docgraph_editor::{BuiltinMetadata, DocumentDragSource, DropTarget, EditSession, ExtensionRegistry};
//!
//! let mut session = EditSession::new(document, Rc::new(BuiltinMetadata::new()), Rc::new(ExtensionRegistry::new()));
//!
//! let target = DropTarget::accessory(container, None);
//! if session.drop_objects(&target, &DocumentDragSource::new(vec![button]))? {
//!     session.undo();
//! }
//! ```

mod batch;
mod cloner;
mod context;
mod drop;
mod errors;
mod job;
mod jobs;
mod mask;
mod metadata;
mod references;
mod selection;
mod session;
mod undo_stack;

pub use batch::{BatchJob, SelectionBatchJob, SelectionUpdate};
pub use cloner::Cloner;
pub use context::EditorContext;
pub use drop::{
    border_alignment_property, AccessoryDropTarget, DocumentDragSource, DragSource, DropTarget,
    RootDropTarget, DEFAULT_BORDER_ALIGNMENT,
};
pub use errors::EditorError;
pub use job::{
    ExtensionRegistry, Job, JobExtension, JobExtensionFactory, JobOp, JobState, SubJobs,
};
pub use jobs::{
    AddPropertyJob, AddPropertyValueJob, InsertAsAccessoryJob, ModifyObjectPropertyJob,
    ReIndexObjectJob, RemoveObjectJob, RemovePropertyJob, RemovePropertyValueJob, SetRootJob,
};
pub use mask::{
    column_index_property, move_to_cell_job, row_index_property, Accessory, GridMask,
    HierarchyMask,
};
pub use metadata::{BuiltinMetadata, ContainerKind, Metadata};
pub use references::{
    expand_reference_job, find_referent, DeleteObjectJob, ExpandAllReferencesJob,
    ExpandExpressionReferenceJob, ExpandIntrinsicReferenceJob, ExpandReferenceJob,
};
pub use selection::{Selection, SelectionGroup};
pub use session::EditSession;
pub use undo_stack::{UndoStack, DEFAULT_MAX_UNDO_LEVELS};
