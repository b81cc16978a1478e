//! qagraph-graph: Neo4j client for the question/answer knowledge graph.
//!
//! This crate is the single access point to Neo4j. Writes go through the
//! MERGE-based upserts in [`mutations`]; [`queries`] holds the read side used
//! to verify what an ingestion run produced.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use queries::GraphStats;
