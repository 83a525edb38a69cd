//! Collector engine: generic queries over a [`docgraph_model::Document`].
//!
//! ```rust,ignore
//! use docgraph_common::{collect, FindById};
//!
//! let button = collect(&doc, FindById::new("okButton"));
//! ```

pub mod collector;
pub mod collectors;

pub use collector::*;
pub use collectors::*;
