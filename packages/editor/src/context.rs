//! # Editor Context
//!
//! Everything a job touches while it runs: the document being edited, its
//! selection, the type metadata and the job extension registry.
//!
//! Document and selection are owned per open document. Metadata and the
//! extension registry are application-wide and shared between contexts.

use crate::job::{ExtensionRegistry, Job, JobOp};
use crate::mask::HierarchyMask;
use crate::metadata::Metadata;
use crate::selection::Selection;
use docgraph_model::{Document, NodeId};
use std::fmt;
use std::rc::Rc;

pub struct EditorContext {
    pub document: Document,
    pub selection: Selection,
    metadata: Rc<dyn Metadata>,
    extensions: Rc<ExtensionRegistry>,
}

impl fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorContext")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl EditorContext {
    pub fn new(
        document: Document,
        metadata: Rc<dyn Metadata>,
        extensions: Rc<ExtensionRegistry>,
    ) -> Self {
        Self {
            document,
            selection: Selection::new(),
            metadata,
            extensions,
        }
    }

    pub fn metadata(&self) -> &dyn Metadata {
        self.metadata.as_ref()
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Accessory view of an element
    pub fn mask(&self, element: NodeId) -> HierarchyMask<'_> {
        HierarchyMask::new(&self.document, self.metadata.as_ref(), element)
    }

    /// True for elements whose type is virtual
    pub fn is_virtual(&self, object: NodeId) -> bool {
        self.document
            .type_name(object)
            .is_some_and(|t| self.metadata.is_virtual(t))
    }

    /// Wrap an op into a job carrying fresh extension instances
    pub fn job(&self, op: impl JobOp + 'static) -> Job {
        self.job_boxed(Box::new(op))
    }

    pub fn job_boxed(&self, op: Box<dyn JobOp>) -> Job {
        Job::new(op, self.extensions.instantiate())
    }
}
