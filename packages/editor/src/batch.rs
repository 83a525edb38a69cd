//! Composite jobs.
//!
//! Sub-jobs are executed and redone in insertion order and undone in reverse.
//! Wrapping the sequence in one document bracket and one selection bracket
//! turns any number of structural edits into a single refresh and a single
//! selection notification.

use crate::context::EditorContext;
use crate::job::{Job, JobOp, SubJobs};
use crate::selection::SelectionGroup;
use docgraph_model::NodeId;

#[derive(Debug)]
pub struct BatchJob {
    description: String,
    sub_jobs: SubJobs,
    refresh_document: bool,
    update_selection: bool,
}

impl BatchJob {
    /// Batch wrapped in both the document and the selection bracket
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            sub_jobs: SubJobs::new(),
            refresh_document: true,
            update_selection: true,
        }
    }

    /// Let each sub-job refresh the document on its own
    pub fn without_document_bracket(mut self) -> Self {
        self.refresh_document = false;
        self
    }

    pub fn without_selection_bracket(mut self) -> Self {
        self.update_selection = false;
        self
    }

    pub fn add(&mut self, job: Job) {
        self.sub_jobs.push(job);
    }

    pub fn with(mut self, job: Job) -> Self {
        self.add(job);
        self
    }

    pub fn sub_jobs(&self) -> &[Job] {
        self.sub_jobs.jobs()
    }

    pub fn len(&self) -> usize {
        self.sub_jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_jobs.is_empty()
    }

    fn open(&self, ctx: &mut EditorContext) {
        if self.update_selection {
            ctx.selection.begin_update();
        }
        if self.refresh_document {
            ctx.document.begin_update();
        }
    }

    fn close(&self, ctx: &mut EditorContext) {
        if self.refresh_document {
            ctx.document.end_update();
        }
        if self.update_selection {
            ctx.selection.end_update();
        }
    }
}

impl JobOp for BatchJob {
    fn is_executable(&self, _ctx: &EditorContext) -> bool {
        !self.sub_jobs.is_empty()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        self.open(ctx);
        self.sub_jobs.execute_all(ctx);
        self.close(ctx);
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        self.open(ctx);
        self.sub_jobs.undo_all(ctx);
        self.close(ctx);
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        self.open(ctx);
        self.sub_jobs.redo_all(ctx);
        self.close(ctx);
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn name(&self) -> &'static str {
        "BatchJob"
    }
}

/// Selection a [`SelectionBatchJob`] leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionUpdate {
    Objects(Vec<NodeId>),
    Clear,
    Unchanged,
}

/// Batch that also changes the selection.
///
/// The old selection is captured before the sub-jobs run and the new one is
/// applied after them, both inside the selection bracket.
#[derive(Debug)]
pub struct SelectionBatchJob {
    description: String,
    sub_jobs: SubJobs,
    update: SelectionUpdate,
    old_selection: Option<SelectionGroup>,
    new_selection: Option<SelectionGroup>,
}

impl SelectionBatchJob {
    pub fn new(description: impl Into<String>, update: SelectionUpdate) -> Self {
        Self {
            description: description.into(),
            sub_jobs: SubJobs::new(),
            update,
            old_selection: None,
            new_selection: None,
        }
    }

    pub fn add(&mut self, job: Job) {
        self.sub_jobs.push(job);
    }

    pub fn sub_jobs(&self) -> &[Job] {
        self.sub_jobs.jobs()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_jobs.is_empty()
    }
}

impl JobOp for SelectionBatchJob {
    fn is_executable(&self, _ctx: &EditorContext) -> bool {
        !self.sub_jobs.is_empty()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        self.old_selection = ctx.selection.group().cloned();

        ctx.selection.begin_update();
        ctx.document.begin_update();
        self.sub_jobs.execute_all(ctx);
        ctx.document.end_update();

        self.new_selection = match &self.update {
            SelectionUpdate::Objects(objects) => {
                SelectionGroup::from_objects(objects.iter().copied())
            }
            SelectionUpdate::Clear => None,
            SelectionUpdate::Unchanged => self.old_selection.clone(),
        };
        ctx.selection.select(self.new_selection.clone());
        ctx.selection.end_update();
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.selection.begin_update();
        ctx.document.begin_update();
        self.sub_jobs.undo_all(ctx);
        ctx.document.end_update();
        ctx.selection.select(self.old_selection.clone());
        ctx.selection.end_update();
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.selection.begin_update();
        ctx.document.begin_update();
        self.sub_jobs.redo_all(ctx);
        ctx.document.end_update();
        ctx.selection.select(self.new_selection.clone());
        ctx.selection.end_update();
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn name(&self) -> &'static str {
        "SelectionBatchJob"
    }
}
