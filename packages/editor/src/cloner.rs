//! Deep copies that keep element ids unique.
//!
//! A copied id that is already used in the document gets a numeric suffix:
//! trailing digits are stripped and a counter starting at 1 is appended
//! (`foo` → `foo1`, `foo1` → `foo2` when `foo1` is taken). References inside
//! the copy that named a renamed element are rewritten to the new id.

use docgraph_common::{all_ids, collect_from, Collector, Strategy};
use docgraph_model::{parse_reference_expression, reference_expression, Document, NodeId};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Every element carrying an id, and every node that names one
#[derive(Debug, Default)]
struct IdUsage {
    identified: Vec<NodeId>,
    intrinsics: Vec<NodeId>,
    expressions: Vec<NodeId>,
}

impl Collector for IdUsage {
    type Output = IdUsage;

    fn strategy(&self) -> Strategy {
        Strategy::ObjectsAndProperties
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if doc.element_id(object).is_some() {
            self.identified.push(object);
        } else if doc.intrinsic(object).is_some() {
            self.intrinsics.push(object);
        }
    }

    fn collect_property(&mut self, doc: &Document, property: NodeId) {
        if doc
            .text_property(property)
            .is_some_and(|t| parse_reference_expression(&t.value).is_some())
        {
            self.expressions.push(property);
        }
    }

    fn collected(self) -> IdUsage {
        self
    }
}

#[derive(Debug, Clone)]
pub struct Cloner {
    used_ids: BTreeSet<String>,
}

impl Cloner {
    /// Cloner aware of every id currently reachable from the root
    pub fn new(doc: &Document) -> Self {
        Self {
            used_ids: all_ids(doc),
        }
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used_ids.contains(id)
    }

    /// Reserve and return a fresh id derived from `id`
    pub fn next_id(&mut self, id: &str) -> String {
        let stripped = id.trim_end_matches(|c: char| c.is_ascii_digit());
        let base = if stripped.is_empty() { id } else { stripped };
        let mut counter = 1usize;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !self.used_ids.contains(&candidate) {
                self.used_ids.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    /// Detached deep copy of `object` with colliding ids renamed.
    ///
    /// # Panics
    ///
    /// Panics outside a document update bracket when a rename is needed.
    pub fn clone_object(&mut self, doc: &mut Document, object: NodeId) -> NodeId {
        let copy = doc.deep_copy(object);
        let usage = collect_from(doc, copy, IdUsage::default());

        let mut renamed: HashMap<String, String> = HashMap::new();
        for element in usage.identified {
            let Some(id) = doc.element_id(element).map(str::to_string) else {
                continue;
            };
            if self.used_ids.contains(&id) {
                let fresh = self.next_id(&id);
                debug!(from = %id, to = %fresh, "renamed cloned id");
                doc.set_element_id(element, Some(fresh.clone()));
                renamed.insert(id, fresh);
            } else {
                self.used_ids.insert(id);
            }
        }
        if renamed.is_empty() {
            return copy;
        }

        for intrinsic in usage.intrinsics {
            let fresh = doc
                .intrinsic(intrinsic)
                .and_then(|i| renamed.get(&i.source))
                .cloned();
            if let Some(fresh) = fresh {
                doc.set_intrinsic_source(intrinsic, fresh);
            }
        }
        for property in usage.expressions {
            let fresh = doc
                .text_property(property)
                .and_then(|t| parse_reference_expression(&t.value))
                .and_then(|source| renamed.get(source))
                .map(|fresh| reference_expression(fresh));
            if let Some(fresh) = fresh {
                doc.set_text_value(property, fresh);
            }
        }
        copy
    }
}
