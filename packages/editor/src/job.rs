//! # Jobs
//!
//! A job is one reversible edit. The edit itself is a [`JobOp`]; [`Job`]
//! wraps it with the lifecycle checks and the extension hooks:
//!
//! ```text
//! Constructed ──execute──▶ Executed ──undo──▶ Undone ──redo──▶ Redone
//!                                               ▲                │
//!                                               └──────undo──────┘
//! ```
//!
//! `execute` runs `pre_execute` / `do_execute` / `post_execute`, where the
//! hooks only fire for extensions that report themselves executable at that
//! moment. `undo` and `redo` run their hooks for every extension. No order
//! among extensions is promised.

use crate::context::EditorContext;
use std::fmt;
use tracing::debug;

/// The edit performed by a job.
///
/// Implementations cache whatever they need to reverse themselves during
/// `do_execute`; what they target never changes afterwards.
pub trait JobOp: fmt::Debug {
    /// Whether the edit can run against the current state
    fn is_executable(&self, ctx: &EditorContext) -> bool;

    fn do_execute(&mut self, ctx: &mut EditorContext);

    fn do_undo(&mut self, ctx: &mut EditorContext);

    fn do_redo(&mut self, ctx: &mut EditorContext);

    /// Human readable summary, used for undo/redo menus
    fn description(&self) -> String;

    /// Debug name of the job type
    fn name(&self) -> &'static str;
}

/// Observer plugged around every job execution.
///
/// Extensions are cooperative and must not fail.
pub trait JobExtension {
    fn is_executable(&self, _job: &dyn JobOp, _ctx: &EditorContext) -> bool {
        true
    }

    fn pre_execute(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}

    fn post_execute(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}

    fn pre_undo(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}

    fn post_undo(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}

    fn pre_redo(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}

    fn post_redo(&mut self, _job: &dyn JobOp, _ctx: &mut EditorContext) {}
}

/// Builds one extension instance per job
pub trait JobExtensionFactory {
    fn create(&self) -> Box<dyn JobExtension>;
}

impl<F> JobExtensionFactory for F
where
    F: Fn() -> Box<dyn JobExtension>,
{
    fn create(&self) -> Box<dyn JobExtension> {
        self()
    }
}

/// Extension factories shared by every job of an application
#[derive(Default)]
pub struct ExtensionRegistry {
    factories: Vec<Box<dyn JobExtensionFactory>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, factory: impl JobExtensionFactory + 'static) {
        self.factories.push(Box::new(factory));
    }

    /// Fresh extension instances for a new job
    pub fn instantiate(&self) -> Vec<Box<dyn JobExtension>> {
        self.factories.iter().map(|f| f.create()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Constructed,
    Executed,
    Undone,
    Redone,
}

pub struct Job {
    op: Box<dyn JobOp>,
    extensions: Vec<Box<dyn JobExtension>>,
    state: JobState,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("op", &self.op)
            .field("extensions", &self.extensions.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Job {
    pub fn new(op: Box<dyn JobOp>, extensions: Vec<Box<dyn JobExtension>>) -> Self {
        Self {
            op,
            extensions,
            state: JobState::Constructed,
        }
    }

    pub fn op(&self) -> &dyn JobOp {
        self.op.as_ref()
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    pub fn description(&self) -> String {
        self.op.description()
    }

    pub fn is_executable(&self, ctx: &EditorContext) -> bool {
        self.op.is_executable(ctx)
    }

    /// # Panics
    ///
    /// Panics if the job already ran or is not executable. Callers check
    /// [`Job::is_executable`] first.
    pub fn execute(&mut self, ctx: &mut EditorContext) {
        assert_eq!(
            self.state,
            JobState::Constructed,
            "{} executed twice",
            self.op.name()
        );
        assert!(
            self.op.is_executable(ctx),
            "{} executed while not executable",
            self.op.name()
        );
        debug!(job = self.op.name(), "execute");

        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            if extension.is_executable(op, ctx) {
                extension.pre_execute(op, ctx);
            }
        }
        self.op.do_execute(ctx);
        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            if extension.is_executable(op, ctx) {
                extension.post_execute(op, ctx);
            }
        }
        self.state = JobState::Executed;
    }

    /// # Panics
    ///
    /// Panics unless the job is executed or redone.
    pub fn undo(&mut self, ctx: &mut EditorContext) {
        assert!(
            matches!(self.state, JobState::Executed | JobState::Redone),
            "{} undone from state {:?}",
            self.op.name(),
            self.state
        );
        debug!(job = self.op.name(), "undo");

        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            extension.pre_undo(op, ctx);
        }
        self.op.do_undo(ctx);
        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            extension.post_undo(op, ctx);
        }
        self.state = JobState::Undone;
    }

    /// # Panics
    ///
    /// Panics unless the job is undone.
    pub fn redo(&mut self, ctx: &mut EditorContext) {
        assert_eq!(
            self.state,
            JobState::Undone,
            "{} redone without being undone",
            self.op.name()
        );
        debug!(job = self.op.name(), "redo");

        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            extension.pre_redo(op, ctx);
        }
        self.op.do_redo(ctx);
        let op = self.op.as_ref();
        for extension in self.extensions.iter_mut() {
            extension.post_redo(op, ctx);
        }
        self.state = JobState::Redone;
    }
}

/// Sub-jobs driven by a composite job: executed and redone in order,
/// undone in reverse
#[derive(Debug, Default)]
pub struct SubJobs {
    jobs: Vec<Job>,
}

impl SubJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn execute_all(&mut self, ctx: &mut EditorContext) {
        for job in self.jobs.iter_mut() {
            job.execute(ctx);
        }
    }

    pub fn undo_all(&mut self, ctx: &mut EditorContext) {
        for job in self.jobs.iter_mut().rev() {
            job.undo(ctx);
        }
    }

    pub fn redo_all(&mut self, ctx: &mut EditorContext) {
        for job in self.jobs.iter_mut() {
            job.redo(ctx);
        }
    }

    /// Push and execute immediately, for composites that build their
    /// sub-jobs against the state left by the previous ones
    pub fn run(&mut self, job: Job, ctx: &mut EditorContext) {
        self.jobs.push(job);
        if let Some(last) = self.jobs.last_mut() {
            last.execute(ctx);
        }
    }
}
