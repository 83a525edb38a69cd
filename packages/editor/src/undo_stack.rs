//! # Undo/Redo Stack
//!
//! Tracks executed jobs and replays them backwards or forwards.
//!
//! ## Design
//!
//! - Only executable jobs are accepted; the stack executes them itself
//! - Undo moves the most recent job to the redo stack
//! - Redo moves it back
//! - Pushing a new job clears the redo stack
//! - Composite edits are pushed as one `BatchJob`, giving one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let job = ctx.job(ModifyObjectPropertyJob::new(button, "text".into(), Some("OK".into())));
//! stack.push(job, &mut ctx)?;
//!
//! stack.undo(&mut ctx);
//! stack.redo(&mut ctx);
//! ```

use crate::context::EditorContext;
use crate::errors::EditorError;
use crate::job::Job;
use tracing::{debug, warn};

pub const DEFAULT_MAX_UNDO_LEVELS: usize = 100;

#[derive(Debug)]
pub struct UndoStack {
    /// Executed jobs (most recent last)
    undo_stack: Vec<Job>,

    /// Undone jobs (most recent last)
    redo_stack: Vec<Job>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_UNDO_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Execute a job and record it for undo
    pub fn push(&mut self, mut job: Job, ctx: &mut EditorContext) -> Result<(), EditorError> {
        if !job.is_executable(ctx) {
            warn!(job = job.name(), "refusing non-executable job");
            return Err(EditorError::NotExecutable(job.description()));
        }
        job.execute(ctx);
        debug!(job = job.name(), levels = self.undo_stack.len() + 1, "pushed");

        self.undo_stack.push(job);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent job; false when there is nothing to undo
    pub fn undo(&mut self, ctx: &mut EditorContext) -> bool {
        match self.undo_stack.pop() {
            Some(mut job) => {
                job.undo(ctx);
                self.redo_stack.push(job);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone job; false when there is nothing to redo
    pub fn redo(&mut self, ctx: &mut EditorContext) -> bool {
        match self.redo_stack.pop() {
            Some(mut job) => {
                job.redo(ctx);
                self.undo_stack.push(job);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history. The document keeps its current state.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(Job::description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(Job::description)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ExtensionRegistry;
    use crate::jobs::ModifyObjectPropertyJob;
    use crate::metadata::BuiltinMetadata;
    use docgraph_model::{Document, PropertyName, TreeNode};
    use std::rc::Rc;

    fn context() -> EditorContext {
        EditorContext::new(
            Document::from_tree(
                Some(TreeNode::element("Button").with_text("text", "Hello")),
                None,
            )
            .unwrap(),
            Rc::new(BuiltinMetadata::new()),
            Rc::new(ExtensionRegistry::new()),
        )
    }

    fn set_text(ctx: &EditorContext, value: &str) -> Job {
        let root = ctx.document.root().unwrap();
        ctx.job(ModifyObjectPropertyJob::new(
            root,
            PropertyName::new("text"),
            Some(value.to_string()),
        ))
    }

    fn text(ctx: &EditorContext) -> Option<&str> {
        let root = ctx.document.root().unwrap();
        ctx.document.text_value(root, &PropertyName::new("text"))
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), DEFAULT_MAX_UNDO_LEVELS);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_push_undo_redo() {
        let mut ctx = context();
        let mut stack = UndoStack::new();

        let job = set_text(&ctx, "World");
        stack.push(job, &mut ctx).unwrap();
        assert_eq!(text(&ctx), Some("World"));
        assert_eq!(stack.undo_description().as_deref(), Some("Set text to World"));

        assert!(stack.undo(&mut ctx));
        assert_eq!(text(&ctx), Some("Hello"));
        assert!(stack.can_redo());

        assert!(stack.redo(&mut ctx));
        assert_eq!(text(&ctx), Some("World"));
        assert!(!stack.redo(&mut ctx));
    }

    #[test]
    fn test_non_executable_job_is_refused() {
        let mut ctx = context();
        let mut stack = UndoStack::new();
        let job = set_text(&ctx, "Hello");
        let err = stack.push(job, &mut ctx).unwrap_err();
        assert!(matches!(err, EditorError::NotExecutable(_)));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_new_job_clears_redo() {
        let mut ctx = context();
        let mut stack = UndoStack::new();

        let job = set_text(&ctx, "World");
        stack.push(job, &mut ctx).unwrap();
        stack.undo(&mut ctx);
        assert_eq!(stack.redo_levels(), 1);

        let job = set_text(&ctx, "Everyone");
        stack.push(job, &mut ctx).unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut ctx = context();
        let mut stack = UndoStack::with_max_levels(2);

        for i in 0..3 {
            let job = set_text(&ctx, &format!("Text {}", i));
            stack.push(job, &mut ctx).unwrap();
        }
        assert_eq!(stack.undo_levels(), 2);

        stack.undo(&mut ctx);
        stack.undo(&mut ctx);
        assert_eq!(text(&ctx), Some("Text 0"));
        assert!(!stack.undo(&mut ctx));
    }
}
