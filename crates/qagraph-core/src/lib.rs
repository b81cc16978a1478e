//! qagraph-core: Shared types, configuration, and error handling for qagraph.
//!
//! This crate provides the foundational pieces used by the graph client and
//! the ingestion tool:
//! - `QaPair`, the validated row that becomes a Question/Answer pair
//! - Node labels and relationship types of the graph schema
//! - Layered configuration loading and Neo4j connection settings
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Neo4jSettings;
pub use error::QaGraphError;
pub use types::{EdgeType, NodeLabel, QaPair};
