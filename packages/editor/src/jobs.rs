//! # Editing jobs
//!
//! Primitive jobs each perform one structural mutation of the document inside
//! their own update bracket. Composite jobs (`RemoveObjectJob`,
//! `InsertAsAccessoryJob`) build their sub-jobs when they execute, against
//! the state left by the previous sub-job.
//!
//! ## Undo data
//!
//! Every job records what it needs to reverse itself while executing:
//!
//! - removals remember the owner and the position they detached from
//! - text edits remember the previous value
//! - the targeted nodes never change across execute/undo/redo

use crate::context::EditorContext;
use crate::job::{JobOp, SubJobs};
use crate::mask::Accessory;
use docgraph_model::{NodeId, PropertyName};

fn is_detached_object(ctx: &EditorContext, object: NodeId) -> bool {
    ctx.document
        .get(object)
        .is_some_and(|n| n.is_object() && n.parent().is_none())
        && ctx.document.root() != Some(object)
}

/// Attach a detached property to an element
#[derive(Debug)]
pub struct AddPropertyJob {
    property: NodeId,
    element: NodeId,
    index: Option<usize>,
}

impl AddPropertyJob {
    /// `index` of `None` appends
    pub fn new(property: NodeId, element: NodeId, index: Option<usize>) -> Self {
        Self {
            property,
            element,
            index,
        }
    }
}

impl JobOp for AddPropertyJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        let doc = &ctx.document;
        let Some(name) = doc.get(self.property).and_then(|n| n.property_name()) else {
            return false;
        };
        doc.parent(self.property).is_none()
            && doc.element(self.element).is_some()
            && doc.property(self.element, name).is_none()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let (property, element, index) = (self.property, self.element, self.index);
        ctx.document
            .update(|doc| doc.add_property(element, property, index));
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        let property = self.property;
        ctx.document.update(|doc| doc.remove_property(property));
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        self.do_execute(ctx);
    }

    fn description(&self) -> String {
        "Add property".to_string()
    }

    fn name(&self) -> &'static str {
        "AddPropertyJob"
    }
}

/// Detach a property from its element
#[derive(Debug)]
pub struct RemovePropertyJob {
    property: NodeId,
    removed_from: Option<(NodeId, usize)>,
}

impl RemovePropertyJob {
    pub fn new(property: NodeId) -> Self {
        Self {
            property,
            removed_from: None,
        }
    }
}

impl JobOp for RemovePropertyJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        ctx.document
            .get(self.property)
            .is_some_and(|n| n.is_property() && n.parent().is_some())
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let property = self.property;
        self.removed_from = Some(ctx.document.update(|doc| doc.remove_property(property)));
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        if let Some((element, index)) = self.removed_from {
            let property = self.property;
            ctx.document
                .update(|doc| doc.add_property(element, property, Some(index)));
        }
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        let property = self.property;
        ctx.document.update(|doc| doc.remove_property(property));
    }

    fn description(&self) -> String {
        "Remove property".to_string()
    }

    fn name(&self) -> &'static str {
        "RemovePropertyJob"
    }
}

/// Insert a detached object into a collection property
#[derive(Debug)]
pub struct AddPropertyValueJob {
    value: NodeId,
    collection: NodeId,
    index: Option<usize>,
}

impl AddPropertyValueJob {
    /// `index` of `None` appends
    pub fn new(value: NodeId, collection: NodeId, index: Option<usize>) -> Self {
        Self {
            value,
            collection,
            index,
        }
    }
}

impl JobOp for AddPropertyValueJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        is_detached_object(ctx, self.value)
            && ctx.document.collection_property(self.collection).is_some()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let (value, collection, index) = (self.value, self.collection, self.index);
        ctx.document
            .update(|doc| doc.add_value(collection, value, index));
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        let value = self.value;
        ctx.document.update(|doc| doc.remove_value(value));
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        self.do_execute(ctx);
    }

    fn description(&self) -> String {
        "Add value".to_string()
    }

    fn name(&self) -> &'static str {
        "AddPropertyValueJob"
    }
}

/// Detach an object from the collection property holding it
#[derive(Debug)]
pub struct RemovePropertyValueJob {
    value: NodeId,
    removed_from: Option<(NodeId, usize)>,
}

impl RemovePropertyValueJob {
    pub fn new(value: NodeId) -> Self {
        Self {
            value,
            removed_from: None,
        }
    }
}

impl JobOp for RemovePropertyValueJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        ctx.document.get(self.value).is_some()
            && ctx.document.parent_property(self.value).is_some()
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let value = self.value;
        self.removed_from = Some(ctx.document.update(|doc| doc.remove_value(value)));
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        if let Some((collection, index)) = self.removed_from {
            let value = self.value;
            ctx.document
                .update(|doc| doc.add_value(collection, value, Some(index)));
        }
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        let value = self.value;
        ctx.document.update(|doc| doc.remove_value(value));
    }

    fn description(&self) -> String {
        "Remove value".to_string()
    }

    fn name(&self) -> &'static str {
        "RemovePropertyValueJob"
    }
}

/// Move an object before one of its siblings, or to the end
#[derive(Debug)]
pub struct ReIndexObjectJob {
    object: NodeId,
    before: Option<NodeId>,
    old_index: usize,
    new_index: usize,
}

impl ReIndexObjectJob {
    pub fn new(object: NodeId, before: Option<NodeId>) -> Self {
        Self {
            object,
            before,
            old_index: 0,
            new_index: 0,
        }
    }

    fn move_to(ctx: &mut EditorContext, object: NodeId, index: usize) {
        ctx.document.update(|doc| {
            let (collection, _) = doc.remove_value(object);
            doc.add_value(collection, object, Some(index));
        });
    }
}

impl JobOp for ReIndexObjectJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        if ctx.document.get(self.object).is_none() {
            return false;
        }
        let Some(collection) = ctx.document.parent_property(self.object) else {
            return false;
        };
        match self.before {
            Some(before) => {
                before != self.object
                    && ctx.document.get(before).is_some()
                    && ctx.document.parent_property(before) == Some(collection)
            }
            None => true,
        }
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let (object, before) = (self.object, self.before);
        let (old_index, new_index) = ctx.document.update(|doc| {
            let (collection, old_index) = doc.remove_value(object);
            let new_index = match before {
                Some(before) => doc.index_in_parent(before).unwrap_or(0),
                None => doc.values(collection).len(),
            };
            doc.add_value(collection, object, Some(new_index));
            (old_index, new_index)
        });
        self.old_index = old_index;
        self.new_index = new_index;
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        Self::move_to(ctx, self.object, self.old_index);
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        Self::move_to(ctx, self.object, self.new_index);
    }

    fn description(&self) -> String {
        "Reorder".to_string()
    }

    fn name(&self) -> &'static str {
        "ReIndexObjectJob"
    }
}

#[derive(Debug)]
enum TextChange {
    Set { property: NodeId, old: String },
    Added { property: NodeId },
    Removed { property: NodeId, index: usize },
}

/// Set, create or remove a text property of an element.
///
/// A value of `None` removes the property.
#[derive(Debug)]
pub struct ModifyObjectPropertyJob {
    element: NodeId,
    name: PropertyName,
    value: Option<String>,
    change: Option<TextChange>,
}

impl ModifyObjectPropertyJob {
    pub fn new(element: NodeId, name: PropertyName, value: Option<String>) -> Self {
        Self {
            element,
            name,
            value,
            change: None,
        }
    }
}

impl JobOp for ModifyObjectPropertyJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        let doc = &ctx.document;
        if doc.element(self.element).is_none() {
            return false;
        }
        match doc.property(self.element, &self.name) {
            Some(property) => match doc.text_property(property) {
                Some(text) => self.value.as_deref() != Some(text.value.as_str()),
                None => false,
            },
            None => self.value.is_some(),
        }
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        let element = self.element;
        let name = self.name.clone();
        let value = self.value.clone();
        self.change = ctx.document.update(|doc| {
            match (doc.property(element, &name), value) {
                (Some(property), Some(value)) => {
                    let old = doc.set_text_value(property, value);
                    Some(TextChange::Set { property, old })
                }
                (Some(property), None) => {
                    let (_, index) = doc.remove_property(property);
                    Some(TextChange::Removed { property, index })
                }
                (None, Some(value)) => {
                    let property = doc.new_text_property(name, value);
                    doc.add_property(element, property, None);
                    Some(TextChange::Added { property })
                }
                (None, None) => None,
            }
        });
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        let element = self.element;
        match &self.change {
            Some(TextChange::Set { property, old }) => {
                let (property, old) = (*property, old.clone());
                ctx.document.update(|doc| doc.set_text_value(property, old));
            }
            Some(TextChange::Added { property }) => {
                let property = *property;
                ctx.document.update(|doc| doc.remove_property(property));
            }
            Some(TextChange::Removed { property, index }) => {
                let (property, index) = (*property, *index);
                ctx.document
                    .update(|doc| doc.add_property(element, property, Some(index)));
            }
            None => {}
        }
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        let element = self.element;
        match &self.change {
            Some(TextChange::Set { property, .. }) => {
                let property = *property;
                let value = self.value.clone().unwrap_or_default();
                ctx.document.update(|doc| doc.set_text_value(property, value));
            }
            Some(TextChange::Added { property }) => {
                let property = *property;
                ctx.document
                    .update(|doc| doc.add_property(element, property, None));
            }
            Some(TextChange::Removed { property, .. }) => {
                let property = *property;
                ctx.document.update(|doc| doc.remove_property(property));
            }
            None => {}
        }
    }

    fn description(&self) -> String {
        match &self.value {
            Some(value) => format!("Set {} to {}", self.name, value),
            None => format!("Clear {}", self.name),
        }
    }

    fn name(&self) -> &'static str {
        "ModifyObjectPropertyJob"
    }
}

/// Replace the document root
#[derive(Debug)]
pub struct SetRootJob {
    root: Option<NodeId>,
    old_root: Option<NodeId>,
}

impl SetRootJob {
    pub fn new(root: Option<NodeId>) -> Self {
        Self {
            root,
            old_root: None,
        }
    }
}

impl JobOp for SetRootJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        if ctx.document.root() == self.root {
            return false;
        }
        match self.root {
            Some(root) => ctx
                .document
                .get(root)
                .is_some_and(|n| n.is_object() && n.parent().is_none()),
            None => true,
        }
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        self.old_root = ctx.document.root();
        ctx.document.set_root(self.root);
    }

    fn do_undo(&mut self, ctx: &mut EditorContext) {
        ctx.document.set_root(self.old_root);
    }

    fn do_redo(&mut self, ctx: &mut EditorContext) {
        ctx.document.set_root(self.root);
    }

    fn description(&self) -> String {
        "Set root".to_string()
    }

    fn name(&self) -> &'static str {
        "SetRootJob"
    }
}

/// Detach an object from wherever it lives.
///
/// Removing the root clears it; removing the last value of a property also
/// removes the property.
#[derive(Debug)]
pub struct RemoveObjectJob {
    object: NodeId,
    sub_jobs: SubJobs,
}

impl RemoveObjectJob {
    pub fn new(object: NodeId) -> Self {
        Self {
            object,
            sub_jobs: SubJobs::new(),
        }
    }
}

impl JobOp for RemoveObjectJob {
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        ctx.document.get(self.object).is_some_and(|n| n.is_object())
            && (ctx.document.root() == Some(self.object)
                || ctx.document.parent_property(self.object).is_some())
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();
        if ctx.document.root() == Some(self.object) {
            let job = ctx.job(SetRootJob::new(None));
            self.sub_jobs.run(job, ctx);
        } else if let Some(collection) = ctx.document.parent_property(self.object) {
            let job = ctx.job(RemovePropertyValueJob::new(self.object));
            self.sub_jobs.run(job, ctx);
            if ctx.document.values(collection).is_empty() {
                let job = ctx.job(RemovePropertyJob::new(collection));
                self.sub_jobs.run(job, ctx);
            }
        }
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
        "Remove".to_string()
    }

    fn name(&self) -> &'static str {
        "RemoveObjectJob"
    }
}

/// Place a detached object into an accessory of `target`.
///
/// The accessory property is created when missing. A singleton accessory
/// that is already occupied gets its occupant removed first.
#[derive(Debug)]
pub struct InsertAsAccessoryJob {
    object: NodeId,
    target: NodeId,
    accessory: Accessory,
    index: Option<usize>,
    sub_jobs: SubJobs,
}

impl InsertAsAccessoryJob {
    pub fn new(object: NodeId, target: NodeId, accessory: Accessory) -> Self {
        Self {
            object,
            target,
            accessory,
            index: None,
            sub_jobs: SubJobs::new(),
        }
    }

    /// Insert position inside a collection accessory (append by default)
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl JobOp for InsertAsAccessoryJob {
    /// Only type compatibility is checked: the object may still be parented
    /// when the job is built, as long as an earlier job detaches it.
    fn is_executable(&self, ctx: &EditorContext) -> bool {
        ctx.document.get(self.object).is_some()
            && ctx.document.element(self.target).is_some()
            && ctx
                .mask(self.target)
                .is_accepting_accessory(self.accessory, self.object)
    }

    fn do_execute(&mut self, ctx: &mut EditorContext) {
        ctx.document.begin_update();

        if !self.accessory.is_collection() {
            let occupants: Vec<NodeId> = ctx
                .mask(self.target)
                .accessory_values(self.accessory)
                .to_vec();
            for occupant in occupants {
                let job = ctx.job(RemoveObjectJob::new(occupant));
                self.sub_jobs.run(job, ctx);
            }
        }

        let property = match ctx.mask(self.target).accessory_property(self.accessory) {
            Some(property) => property,
            None => {
                let property = ctx
                    .document
                    .new_collection_property(self.accessory.property_name());
                let job = ctx.job(AddPropertyJob::new(property, self.target, None));
                self.sub_jobs.run(job, ctx);
                property
            }
        };
        let job = ctx.job(AddPropertyValueJob::new(self.object, property, self.index));
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
        format!("Insert as {}", self.accessory)
    }

    fn name(&self) -> &'static str {
        "InsertAsAccessoryJob"
    }
}
