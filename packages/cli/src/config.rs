use anyhow::Context;
use docgraph_editor::{BuiltinMetadata, ContainerKind, DEFAULT_MAX_UNDO_LEVELS};
use docgraph_model::PropertyName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "docgraph.config.json";

/// Docgraph configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Undo history bound (0 = unlimited)
    #[serde(default = "default_max_undo_levels")]
    pub max_undo_levels: usize,

    /// Log filter used when RUST_LOG is unset and no -v flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Extra container types (type name → kind)
    #[serde(default)]
    pub containers: BTreeMap<String, ContainerKind>,

    /// Extra virtual types
    #[serde(default)]
    pub virtual_types: Vec<String>,

    /// Extra property defaults (`Residence.name` → value)
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

fn default_max_undo_levels() -> usize {
    DEFAULT_MAX_UNDO_LEVELS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load an explicit config file, or `docgraph.config.json` from `cwd`
    /// when it exists
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        let (config_path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME), false),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            Ok(config)
        } else if required {
            anyhow::bail!("config file not found: {}", config_path.display())
        } else {
            Ok(Config::default())
        }
    }

    /// Builtin metadata extended with the configured types and defaults
    pub fn metadata(&self) -> BuiltinMetadata {
        let mut metadata = BuiltinMetadata::new();
        for (type_name, kind) in &self.containers {
            metadata.register_container(type_name.clone(), *kind);
        }
        for type_name in &self.virtual_types {
            metadata.register_virtual(type_name.clone());
        }
        for (property, value) in &self.defaults {
            metadata.register_default(PropertyName::parse(property), value.clone());
        }
        metadata
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_undo_levels: default_max_undo_levels(),
            log_level: default_log_level(),
            containers: BTreeMap::new(),
            virtual_types: vec![],
            defaults: BTreeMap::new(),
        }
    }
}
