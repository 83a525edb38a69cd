//! Concrete collectors used by the editor.

use crate::collector::{collect, Collector, Strategy};
use docgraph_model::{parse_reference_expression, Document, IntrinsicKind, NodeId, PropertyName};
use std::collections::{BTreeSet, HashMap, HashSet};

/// First element, in pre-order, whose id equals the target.
///
/// Stops descending once a match is found.
#[derive(Debug)]
pub struct FindById {
    id: String,
    found: Option<NodeId>,
}

impl FindById {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            found: None,
        }
    }
}

impl Collector for FindById {
    type Output = Option<NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Objects
    }

    fn accept_object(&self, _doc: &Document, _object: NodeId) -> bool {
        self.found.is_none()
    }

    fn accept_property(&self, _doc: &Document, _property: NodeId) -> bool {
        self.found.is_none()
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if doc.element_id(object) == Some(self.id.as_str()) {
            self.found = Some(object);
        }
    }

    fn collected(self) -> Option<NodeId> {
        self.found
    }
}

/// Map from id to element.
///
/// When two elements share an id the one visited later overwrites the
/// earlier entry, so this can disagree with [`FindById`].
#[derive(Debug, Default)]
pub struct IdMap {
    map: HashMap<String, NodeId>,
}

impl Collector for IdMap {
    type Output = HashMap<String, NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Objects
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if let Some(id) = doc.element_id(object) {
            self.map.insert(id.to_string(), object);
        }
    }

    fn collected(self) -> HashMap<String, NodeId> {
        self.map
    }
}

/// Every id in use
#[derive(Debug, Default)]
pub struct AllIds {
    ids: BTreeSet<String>,
}

impl Collector for AllIds {
    type Output = BTreeSet<String>;

    fn strategy(&self) -> Strategy {
        Strategy::Objects
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if let Some(id) = doc.element_id(object) {
            self.ids.insert(id.to_string());
        }
    }

    fn collected(self) -> BTreeSet<String> {
        self.ids
    }
}

/// Intrinsics of kind `reference` naming `source` (all of them when no
/// source is given), skipping excluded subtrees.
#[derive(Debug, Default)]
pub struct ReferencesBySource {
    source: Option<String>,
    excluded: HashSet<NodeId>,
    found: Vec<NodeId>,
}

impl ReferencesBySource {
    pub fn new(source: Option<&str>) -> Self {
        Self {
            source: source.map(str::to_string),
            ..Self::default()
        }
    }

    /// Do not search below these objects
    pub fn excluding(mut self, subtrees: impl IntoIterator<Item = NodeId>) -> Self {
        self.excluded.extend(subtrees);
        self
    }
}

impl Collector for ReferencesBySource {
    type Output = Vec<NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Objects
    }

    fn accept_object(&self, _doc: &Document, object: NodeId) -> bool {
        !self.excluded.contains(&object)
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if let Some(intrinsic) = doc.intrinsic(object) {
            let matches_source = self
                .source
                .as_deref()
                .map_or(true, |source| intrinsic.source == source);
            if intrinsic.kind == IntrinsicKind::Reference && matches_source {
                self.found.push(object);
            }
        }
    }

    fn collected(self) -> Vec<NodeId> {
        self.found
    }
}

/// Text properties whose value is a reference expression naming `source`
/// (any source when none is given), skipping excluded subtrees.
#[derive(Debug, Default)]
pub struct ExpressionReferences {
    source: Option<String>,
    excluded: HashSet<NodeId>,
    found: Vec<NodeId>,
}

impl ExpressionReferences {
    pub fn new(source: Option<&str>) -> Self {
        Self {
            source: source.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, subtrees: impl IntoIterator<Item = NodeId>) -> Self {
        self.excluded.extend(subtrees);
        self
    }
}

impl Collector for ExpressionReferences {
    type Output = Vec<NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Properties
    }

    fn accept_object(&self, _doc: &Document, object: NodeId) -> bool {
        !self.excluded.contains(&object)
    }

    fn collect_property(&mut self, doc: &Document, property: NodeId) {
        let Some(text) = doc.text_property(property) else {
            return;
        };
        if let Some(target) = parse_reference_expression(&text.value) {
            if self.source.as_deref().map_or(true, |source| source == target) {
                self.found.push(property);
            }
        }
    }

    fn collected(self) -> Vec<NodeId> {
        self.found
    }
}

/// Every property with the given name
#[derive(Debug)]
pub struct PropertiesByName {
    name: PropertyName,
    found: Vec<NodeId>,
}

impl PropertiesByName {
    pub fn new(name: PropertyName) -> Self {
        Self {
            name,
            found: Vec::new(),
        }
    }
}

impl Collector for PropertiesByName {
    type Output = Vec<NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Properties
    }

    fn collect_property(&mut self, doc: &Document, property: NodeId) {
        if doc.node(property).property_name() == Some(&self.name) {
            self.found.push(property);
        }
    }

    fn collected(self) -> Vec<NodeId> {
        self.found
    }
}

#[derive(Debug)]
pub struct ElementsByType {
    type_name: String,
    found: Vec<NodeId>,
}

impl ElementsByType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            found: Vec::new(),
        }
    }
}

impl Collector for ElementsByType {
    type Output = Vec<NodeId>;

    fn strategy(&self) -> Strategy {
        Strategy::Objects
    }

    fn collect_object(&mut self, doc: &Document, object: NodeId) {
        if doc.type_name(object) == Some(self.type_name.as_str()) {
            self.found.push(object);
        }
    }

    fn collected(self) -> Vec<NodeId> {
        self.found
    }
}

pub fn find_by_id(doc: &Document, id: &str) -> Option<NodeId> {
    collect(doc, FindById::new(id))
}

pub fn id_map(doc: &Document) -> HashMap<String, NodeId> {
    collect(doc, IdMap::default())
}

pub fn all_ids(doc: &Document) -> BTreeSet<String> {
    collect(doc, AllIds::default())
}

pub fn references(doc: &Document, source: Option<&str>) -> Vec<NodeId> {
    collect(doc, ReferencesBySource::new(source))
}

pub fn expression_references(doc: &Document, source: Option<&str>) -> Vec<NodeId> {
    collect(doc, ExpressionReferences::new(source))
}

/// Intrinsic references followed by expression references to `source`,
/// ignoring anything inside `excluded`
pub fn all_references(doc: &Document, source: Option<&str>, excluded: &[NodeId]) -> Vec<NodeId> {
    let mut result = collect(
        doc,
        ReferencesBySource::new(source).excluding(excluded.iter().copied()),
    );
    result.extend(collect(
        doc,
        ExpressionReferences::new(source).excluding(excluded.iter().copied()),
    ));
    result
}

pub fn properties_by_name(doc: &Document, name: &PropertyName) -> Vec<NodeId> {
    collect(doc, PropertiesByName::new(name.clone()))
}

pub fn elements_by_type(doc: &Document, type_name: &str) -> Vec<NodeId> {
    collect(doc, ElementsByType::new(type_name))
}
