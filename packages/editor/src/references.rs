//! # Reference expansion
//!
//! A reference names an element by id without owning it. Expanding a
//! reference replaces it with a clone of its referent, in the same slot:
//!
//! ```text
//! items: [a, b, fx:reference foo, c]   ──▶   items: [a, b, <clone of foo>, c]
//! graphic="$foo"                        ──▶   graphic: [<clone of foo>]
//! ```
//!
//! Referents are looked up with first-match semantics ([`find_by_id`]).

use crate::cloner::Cloner;
use crate::context::EditorContext;
use crate::job::{Job, JobOp, SubJobs};
use crate::jobs::{
    AddPropertyJob, AddPropertyValueJob, RemoveObjectJob, RemovePropertyJob,
    RemovePropertyValueJob,
};
use docgraph_common::{all_references, collect_from, find_by_id, AllIds};
use docgraph_model::{parse_reference_expression, Document, IntrinsicKind, NodeId};
use tracing::{debug, info};

/// Element named by an intrinsic or a reference expression, if it exists
pub fn find_referent(doc: &Document, reference: NodeId) -> Option<NodeId> {
    let source = if let Some(intrinsic) = doc.intrinsic(reference) {
        intrinsic.source.as_str()
    } else {
        parse_reference_expression(&doc.text_property(reference)?.value)?
    };
    find_by_id(doc, source)
}

/// Replace an `fx:reference` / `fx:copy` intrinsic by a clone of its referent
#[derive(Debug)]
pub struct ExpandIntrinsicReferenceJob {
    reference: NodeId,
    sub_jobs: SubJobs,
}

impl ExpandIntrinsicReferenceJob {
    pub fn new(reference: NodeId) -> Self {
        Self {
            reference,
            sub_jobs: SubJobs::new(),
        }
    }
}

impl JobOp for ExpandIntrinsicReferenceJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        let doc = &ctx.document;
        let Some(intrinsic) = doc.intrinsic(self.reference) else {
            return false;
        };
        matches!(intrinsic.kind, IntrinsicKind::Reference | IntrinsicKind::Copy)
            && doc.parent_property(self.reference).is_some()
            && find_referent(doc, self.reference).is_some()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let (Some(referent), Some(collection), Some(index)) = (
            find_referent(&ctx.document, self.reference),
            ctx.document.parent_property(self.reference),
            ctx.document.index_in_parent(self.reference),
        ) else {
            return;
        };

        ctx.document.begin_update();
        let mut cloner = Cloner::new(&ctx.document);
        let clone = cloner.clone_object(&mut ctx.document, referent);
        debug!(reference = %self.reference, referent = %referent, clone = %clone, "expanding reference");

        let job = ctx.job(RemovePropertyValueJob::new(self.reference));
        self.sub_jobs.run(job, ctx);
        let job = ctx.job(AddPropertyValueJob::new(clone, collection, Some(index)));
        self.sub_jobs.run(job, ctx);
        ctx.document.end_update();
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.undo_all(ctx);
        ctx.document.end_update();
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.redo_all(ctx);
        ctx.document.end_update();
    }

    fn description(&self) -> String {
        "Expand reference".to_string()
    }

    fn name(&self) -> &'static str {
        "ExpandIntrinsicReferenceJob"
    }
}

/// Replace a `$id` text property by a collection property holding a clone
/// of the referent, at the same position on the same element
#[derive(Debug)]
pub struct ExpandExpressionReferenceJob {
    property: NodeId,
    sub_jobs: SubJobs,
}

impl ExpandExpressionReferenceJob {
    pub fn new(property: NodeId) -> Self {
        Self {
            property,
            sub_jobs: SubJobs::new(),
        }
    }
}

impl JobOp for ExpandExpressionReferenceJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        let doc = &ctx.document;
        doc.text_property(self.property)
            .is_some_and(|t| parse_reference_expression(&t.value).is_some())
            && doc.parent_element(self.property).is_some()
            && find_referent(doc, self.property).is_some()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let doc = &ctx.document;
        let (Some(referent), Some(element), Some(name)) = (
            find_referent(doc, self.property),
            doc.parent_element(self.property),
            doc.node(self.property).property_name().cloned(),
        ) else {
            return;
        };
        let index = doc.index_in_parent(self.property);

        ctx.document.begin_update();
        let mut cloner = Cloner::new(&ctx.document);
        let clone = cloner.clone_object(&mut ctx.document, referent);
        let collection = ctx.document.new_collection_property(name);
        debug!(property = %self.property, referent = %referent, clone = %clone, "expanding expression");

        let job = ctx.job(RemovePropertyJob::new(self.property));
        self.sub_jobs.run(job, ctx);
        let job = ctx.job(AddPropertyJob::new(collection, element, index));
        self.sub_jobs.run(job, ctx);
        let job = ctx.job(AddPropertyValueJob::new(clone, collection, None));
        self.sub_jobs.run(job, ctx);
        ctx.document.end_update();
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.undo_all(ctx);
        ctx.document.end_update();
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.redo_all(ctx);
        ctx.document.end_update();
    }

    fn description(&self) -> String {
        "Expand reference".to_string()
    }

    fn name(&self) -> &'static str {
        "ExpandExpressionReferenceJob"
    }
}

/// Expansion of either reference shape
#[derive(Debug)]
pub enum ExpandReferenceJob {
    Intrinsic(ExpandIntrinsicReferenceJob),
    Expression(ExpandExpressionReferenceJob),
}

impl ExpandReferenceJob {
    /// # Panics
    ///
    /// Panics if `node` is neither an intrinsic nor a text property.
    pub fn for_node(doc: &Document, node: NodeId) -> Self {
        if doc.intrinsic(node).is_some() {
            ExpandReferenceJob::Intrinsic(ExpandIntrinsicReferenceJob::new(node))
        } else if doc.text_property(node).is_some() {
            ExpandReferenceJob::Expression(ExpandExpressionReferenceJob::new(node))
        } else {
            panic!("{} is neither an intrinsic nor a text property", node)
        }
    }

    fn inner(&self) -> &dyn JobOp {
        match self {
            ExpandReferenceJob::Intrinsic(job) => job,
            ExpandReferenceJob::Expression(job) => job,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn JobOp {
        match self {
            ExpandReferenceJob::Intrinsic(job) => job,
            ExpandReferenceJob::Expression(job) => job,
        }
    }
}

impl JobOp for ExpandReferenceJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        self.inner().is_executable(ctx)
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        self.inner_mut().do_execute(ctx);
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        self.inner_mut().do_undo(ctx);
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        self.inner_mut().do_redo(ctx);
    }

    fn description(&self) -> String {
        self.inner().description()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

/// Expansion job for `node`, or `None` when it cannot run (dangling id,
/// detached reference, unsupported kind).
///
/// # Panics
///
/// Panics if `node` is neither an intrinsic nor a text property.
pub fn expand_reference_job(ctx: &EditorContext, node: NodeId) -> Option<Job> {
    let job = ctx.job(ExpandReferenceJob::for_node(&ctx.document, node));
    if job.is_executable(ctx) {
        Some(job)
    } else {
        None
    }
}

/// Expand every reference of the document.
///
/// References are collected once, before anything is expanded, so
/// references brought in by clones stay as they are and cyclic references
/// cannot loop.
#[derive(Debug, Default)]
pub struct ExpandAllReferencesJob {
    sub_jobs: SubJobs,
}

impl ExpandAllReferencesJob {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobOp for ExpandAllReferencesJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        all_references(&ctx.document, None, &[])
            .into_iter()
            .any(|r| ExpandReferenceJob::for_node(&ctx.document, r).is_executable(ctx))
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let pending = all_references(&ctx.document, None, &[]);
        ctx.document.begin_update();
        for reference in pending {
            if let Some(job) = expand_reference_job(ctx, reference) {
                self.sub_jobs.run(job, ctx);
            }
        }
        ctx.document.end_update();
        info!(expanded = self.sub_jobs.len(), "expanded references");
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.undo_all(ctx);
        ctx.document.end_update();
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.redo_all(ctx);
        ctx.document.end_update();
    }

    fn description(&self) -> String {
        "Expand all references".to_string()
    }

    fn name(&self) -> &'static str {
        "ExpandAllReferencesJob"
    }
}

/// Remove an object after expanding every reference, held elsewhere in the
/// document, to an id defined inside it
#[derive(Debug)]
pub struct DeleteObjectJob {
    object: NodeId,
    sub_jobs: SubJobs,
}

impl DeleteObjectJob {
    pub fn new(object: NodeId) -> Self {
        Self {
            object,
            sub_jobs: SubJobs::new(),
        }
    }
}

impl JobOp for DeleteObjectJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        RemoveObjectJob::new(self.object).is_executable(ctx)
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let ids = collect_from(&ctx.document, self.object, AllIds::default());
        ctx.document.begin_update();
        for id in ids {
            for reference in all_references(&ctx.document, Some(id.as_str()), &[self.object]) {
                if let Some(job) = expand_reference_job(ctx, reference) {
                    self.sub_jobs.run(job, ctx);
                }
            }
        }
        let job = ctx.job(RemoveObjectJob::new(self.object));
        self.sub_jobs.run(job, ctx);
        ctx.document.end_update();
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.undo_all(ctx);
        ctx.document.end_update();
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        self.sub_jobs.redo_all(ctx);
        ctx.document.end_update();
    }

    fn description(&self) -> String {
        "Delete".to_string()
    }

    fn name(&self) -> &'static str {
        "DeleteObjectJob"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ExtensionRegistry;
    use crate::metadata::BuiltinMetadata;
    use docgraph_model::{PropertyName, TreeNode};
    use std::rc::Rc;

    fn context(tree: TreeNode) -> EditorContext {
        EditorContext::new(
            Document::from_tree(Some(tree), None).unwrap(),
            Rc::new(BuiltinMetadata::new()),
            Rc::new(ExtensionRegistry::new()),
        )
    }

    fn labeled_form() -> EditorContext {
        context(TreeNode::element("VBox").with_values(
            "children",
            vec![
                TreeNode::element("Label")
                    .with_text("text", "Name")
                    .with_text("labelFor", "$field"),
                TreeNode::element("TextField").with_id("field"),
            ],
        ))
    }

    #[test]
    fn test_expression_expands_in_place() {
        let mut ctx = labeled_form();
        let root = ctx.document.root().unwrap();
        let label = ctx.document.children(root, &PropertyName::new("children"))[0];
        let label_for = PropertyName::new("labelFor");
        let property = ctx.document.property(label, &label_for).unwrap();
        let before = ctx.document.to_tree();

        let mut job = expand_reference_job(&ctx, property).unwrap();
        job.execute(&mut ctx);

        let expanded = ctx.document.property(label, &label_for).unwrap();
        assert_eq!(ctx.document.index_in_parent(expanded), Some(1));
        let clone = ctx.document.values(expanded)[0];
        assert_eq!(ctx.document.type_name(clone), Some("TextField"));
        assert_eq!(ctx.document.element_id(clone), Some("field1"));

        job.undo(&mut ctx);
        assert_eq!(ctx.document.to_tree(), before);
    }

    #[test]
    fn test_dangling_reference_builds_no_job() {
        let ctx = context(
            TreeNode::element("VBox").with_values(
                "children",
                vec![TreeNode::intrinsic(IntrinsicKind::Reference, "missing")],
            ),
        );
        let root = ctx.document.root().unwrap();
        let reference = ctx.document.children(root, &PropertyName::new("children"))[0];
        assert!(expand_reference_job(&ctx, reference).is_none());
    }

    #[test]
    fn test_include_is_not_expandable() {
        let ctx = context(TreeNode::element("VBox").with_id("box").with_values(
            "children",
            vec![TreeNode::intrinsic(IntrinsicKind::Include, "box")],
        ));
        let root = ctx.document.root().unwrap();
        let include = ctx.document.children(root, &PropertyName::new("children"))[0];
        assert!(expand_reference_job(&ctx, include).is_none());
    }

    #[test]
    #[should_panic(expected = "neither an intrinsic nor a text property")]
    fn test_dispatch_on_element_panics() {
        let ctx = labeled_form();
        let root = ctx.document.root().unwrap();
        ExpandReferenceJob::for_node(&ctx.document, root);
    }

    #[test]
    fn test_expand_all_handles_self_reference() {
        let mut ctx = context(TreeNode::element("VBox").with_id("box").with_values(
            "children",
            vec![TreeNode::intrinsic(IntrinsicKind::Reference, "box")],
        ));
        let mut job = ctx.job(ExpandAllReferencesJob::new());
        assert!(job.is_executable(&ctx));
        job.execute(&mut ctx);

        // the copied reference follows the renamed id
        let root = ctx.document.root().unwrap();
        let clone = ctx.document.children(root, &PropertyName::new("children"))[0];
        assert_eq!(ctx.document.element_id(clone), Some("box1"));
        let inner = ctx.document.children(clone, &PropertyName::new("children"))[0];
        assert_eq!(ctx.document.intrinsic(inner).unwrap().source, "box1");
    }

    #[test]
    fn test_delete_expands_outside_references() {
        let mut ctx = labeled_form();
        let root = ctx.document.root().unwrap();
        let kids = ctx.document.children(root, &PropertyName::new("children")).to_vec();
        let (label, field) = (kids[0], kids[1]);
        let before = ctx.document.to_tree();

        let mut job = ctx.job(DeleteObjectJob::new(field));
        job.execute(&mut ctx);

        assert_eq!(ctx.document.children(root, &PropertyName::new("children")), &[label]);
        let label_for = ctx.document.children(label, &PropertyName::new("labelFor"));
        assert_eq!(label_for.len(), 1);
        assert_eq!(ctx.document.type_name(label_for[0]), Some("TextField"));

        job.undo(&mut ctx);
        assert_eq!(ctx.document.to_tree(), before);
    }
}
