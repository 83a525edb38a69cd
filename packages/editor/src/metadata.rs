//! Per-type metadata lookup used by masks and drop targets.

use docgraph_model::PropertyName;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How an element type holds other objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Not a scene node (constraints, menus, tooltips): no accessories
    Plain,
    /// Scene node without sub-components
    Leaf,
    /// Ordered `children` collection
    Pane,
    /// `children` collection laid out by row/column indices
    Grid,
    /// Four regions plus a center
    Border,
    /// Single `content` slot
    Content,
}

pub trait Metadata {
    fn container_kind(&self, type_name: &str) -> ContainerKind;

    /// Virtual types are attached through dedicated accessories
    /// (context menu, tooltip) rather than as sub-components.
    fn is_virtual(&self, type_name: &str) -> bool;

    /// Value a property takes when it is not stored on the element
    fn default_value(&self, type_name: &str, property: &PropertyName) -> Option<String>;
}

/// Metadata table covering the stock layout containers
#[derive(Debug, Clone)]
pub struct BuiltinMetadata {
    kinds: HashMap<String, ContainerKind>,
    virtual_types: HashSet<String>,
    defaults: HashMap<PropertyName, String>,
}

impl BuiltinMetadata {
    pub fn new() -> Self {
        let mut metadata = Self {
            kinds: HashMap::new(),
            virtual_types: HashSet::new(),
            defaults: HashMap::new(),
        };

        for pane in [
            "Pane",
            "AnchorPane",
            "VBox",
            "HBox",
            "FlowPane",
            "StackPane",
            "TilePane",
            "Group",
        ] {
            metadata.register_container(pane, ContainerKind::Pane);
        }
        metadata.register_container("GridPane", ContainerKind::Grid);
        metadata.register_container("BorderPane", ContainerKind::Border);
        for content in ["ScrollPane", "TitledPane", "Tab"] {
            metadata.register_container(content, ContainerKind::Content);
        }
        for plain in ["ColumnConstraints", "RowConstraints", "MenuItem"] {
            metadata.register_container(plain, ContainerKind::Plain);
        }
        for virtual_type in ["ContextMenu", "Tooltip"] {
            metadata.register_virtual(virtual_type);
        }

        metadata.register_default(PropertyName::attached("GridPane", "columnIndex"), "0");
        metadata.register_default(PropertyName::attached("GridPane", "rowIndex"), "0");
        metadata
    }

    pub fn register_container(&mut self, type_name: impl Into<String>, kind: ContainerKind) {
        self.kinds.insert(type_name.into(), kind);
    }

    /// Mark a type as virtual; virtual types never hold sub-components
    pub fn register_virtual(&mut self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        self.kinds.insert(type_name.clone(), ContainerKind::Plain);
        self.virtual_types.insert(type_name);
    }

    pub fn register_default(&mut self, property: PropertyName, value: impl Into<String>) {
        self.defaults.insert(property, value.into());
    }
}

impl Default for BuiltinMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata for BuiltinMetadata {
    fn container_kind(&self, type_name: &str) -> ContainerKind {
        self.kinds.get(type_name).copied().unwrap_or(ContainerKind::Leaf)
    }

    fn is_virtual(&self, type_name: &str) -> bool {
        self.virtual_types.contains(type_name)
    }

    fn default_value(&self, _type_name: &str, property: &PropertyName) -> Option<String> {
        self.defaults.get(property).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        let metadata = BuiltinMetadata::new();
        assert_eq!(metadata.container_kind("VBox"), ContainerKind::Pane);
        assert_eq!(metadata.container_kind("GridPane"), ContainerKind::Grid);
        assert_eq!(metadata.container_kind("BorderPane"), ContainerKind::Border);
        assert_eq!(metadata.container_kind("Button"), ContainerKind::Leaf);
        assert_eq!(metadata.container_kind("Tooltip"), ContainerKind::Plain);
        assert!(metadata.is_virtual("ContextMenu"));
        assert!(!metadata.is_virtual("Button"));
    }

    #[test]
    fn test_grid_index_defaults() {
        let metadata = BuiltinMetadata::new();
        let column = PropertyName::attached("GridPane", "columnIndex");
        assert_eq!(metadata.default_value("Button", &column).as_deref(), Some("0"));
        let alignment = PropertyName::attached("BorderPane", "alignment");
        assert!(metadata.default_value("Button", &alignment).is_none());
    }

    #[test]
    fn test_container_kind_from_config_string() {
        let kind: ContainerKind = serde_json::from_str("\"border\"").unwrap();
        assert_eq!(kind, ContainerKind::Border);
    }
}
