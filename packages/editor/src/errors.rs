//! Error types for the editor

use docgraph_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Job is not executable: {0}")]
    NotExecutable(String),
}
