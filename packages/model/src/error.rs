//! Error types for the model

use crate::node::PropertyName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed document: {type_name} declares property {name} more than once")]
    DuplicateProperty { type_name: String, name: PropertyName },
}
