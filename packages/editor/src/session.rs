//! # Edit Session
//!
//! One open document: its editor context and its undo history.
//!
//! The session is the composition root for editing. Metadata and the
//! extension registry are shared with other sessions of the application;
//! the document, the selection and the undo stack belong to this session.

use crate::context::EditorContext;
use crate::drop::{DragSource, DropTarget};
use crate::errors::EditorError;
use crate::job::{ExtensionRegistry, Job, JobOp};
use crate::metadata::Metadata;
use crate::references::{expand_reference_job, DeleteObjectJob, ExpandAllReferencesJob};
use crate::selection::Selection;
use crate::undo_stack::UndoStack;
use docgraph_model::{Document, NodeId};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug)]
pub struct EditSession {
    context: EditorContext,
    undo_stack: UndoStack,
}

impl EditSession {
    pub fn new(
        document: Document,
        metadata: Rc<dyn Metadata>,
        extensions: Rc<ExtensionRegistry>,
    ) -> Self {
        Self {
            context: EditorContext::new(document, metadata, extensions),
            undo_stack: UndoStack::new(),
        }
    }

    /// Replace the undo history with one bounded to `max_levels`
    pub fn with_max_undo_levels(mut self, max_levels: usize) -> Self {
        self.undo_stack = UndoStack::with_max_levels(max_levels);
        self
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    /// Direct access, for callers running jobs outside the undo history
    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.context
    }

    pub fn document(&self) -> &Document {
        &self.context.document
    }

    pub fn selection(&self) -> &Selection {
        &self.context.selection
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    pub fn into_document(self) -> Document {
        self.context.document
    }

    /// Wrap an op with this session's extensions
    pub fn job(&self, op: impl JobOp + 'static) -> Job {
        self.context.job(op)
    }

    /// Execute a job and record it for undo
    pub fn execute(&mut self, job: Job) -> Result<(), EditorError> {
        self.undo_stack.push(job, &mut self.context)
    }

    pub fn undo(&mut self) -> bool {
        self.undo_stack.undo(&mut self.context)
    }

    pub fn redo(&mut self) -> bool {
        self.undo_stack.redo(&mut self.context)
    }

    /// Perform a drop; `Ok(false)` when the target rejects the source
    pub fn drop_objects(
        &mut self,
        target: &DropTarget,
        source: &dyn DragSource,
    ) -> Result<bool, EditorError> {
        match target.make_drop_job(&self.context, source) {
            Some(job) => {
                self.execute(job)?;
                Ok(true)
            }
            None => {
                debug!(?target, "drop rejected");
                Ok(false)
            }
        }
    }

    /// Expand one reference; `Ok(false)` when it cannot be expanded
    pub fn expand_reference(&mut self, reference: NodeId) -> Result<bool, EditorError> {
        match expand_reference_job(&self.context, reference) {
            Some(job) => {
                self.execute(job)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Expand every reference; `Ok(false)` when none can be expanded
    pub fn expand_all_references(&mut self) -> Result<bool, EditorError> {
        let job = self.job(ExpandAllReferencesJob::new());
        if !job.is_executable(&self.context) {
            return Ok(false);
        }
        self.execute(job)?;
        Ok(true)
    }

    /// Delete an object, inlining references to it held elsewhere
    pub fn delete_object(&mut self, object: NodeId) -> Result<(), EditorError> {
        let job = self.job(DeleteObjectJob::new(object));
        self.execute(job)
    }
}
