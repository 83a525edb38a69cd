pub mod expand;
pub mod find;
pub mod inspect;
pub mod refs;

pub use expand::{expand, ExpandArgs};
pub use find::{find, FindArgs};
pub use inspect::{inspect, InspectArgs};
pub use refs::{refs, RefsArgs};

use anyhow::{Context, Result};
use docgraph_model::{Document, NodeId};
use std::fs;
use std::path::Path;

/// Read a JSON document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let document = Document::from_bytes(&bytes, Some(path.to_path_buf()))
        .with_context(|| format!("decoding {}", path.display()))?;
    tracing::info!(path = %path.display(), nodes = document.node_count(), "loaded document");
    Ok(document)
}

/// `Type #id` of the element owning a node, followed by the node itself
pub fn describe(doc: &Document, node: NodeId) -> String {
    match doc.parent_element(node) {
        Some(owner) => format!("{} › {}", doc.node(owner).label(), doc.node(node).label()),
        None => doc.node(node).label(),
    }
}
