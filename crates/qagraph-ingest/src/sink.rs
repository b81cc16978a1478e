//! Write targets for ingested pairs.
//!
//! [`QaSink`] is the seam between the pipeline and the store. Neo4j is the
//! production sink; [`MemorySink`] applies the same merge-by-key rules in
//! memory and backs `--dry-run`.

use std::collections::BTreeSet;

use qagraph_core::QaPair;
use qagraph_graph::{GraphClient, GraphError, GraphStats};

/// Something that can merge a question/answer pair idempotently.
#[allow(async_fn_in_trait)]
pub trait QaSink {
    /// Merge the Question node, the Answer node and the HAS_ANSWER edge.
    /// Merging the same pair again must leave the sink unchanged.
    async fn merge_pair(&mut self, pair: &QaPair) -> Result<(), GraphError>;
}

impl QaSink for GraphClient {
    async fn merge_pair(&mut self, pair: &QaPair) -> Result<(), GraphError> {
        self.merge_qa_pair(pair).await
    }
}

/// In-memory graph with the same identity rules as the Neo4j schema:
/// nodes keyed by exact text, edges keyed by their endpoints.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    questions: BTreeSet<String>,
    answers: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            questions: self.questions.len() as i64,
            answers: self.answers.len() as i64,
            has_answer: self.edges.len() as i64,
        }
    }

    /// Answers linked to a question, sorted.
    pub fn answers_for(&self, question: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|(q, _)| q == question)
            .map(|(_, a)| a.clone())
            .collect()
    }
}

impl QaSink for MemorySink {
    async fn merge_pair(&mut self, pair: &QaPair) -> Result<(), GraphError> {
        self.questions.insert(pair.question().to_string());
        self.answers.insert(pair.answer().to_string());
        self.edges
            .insert((pair.question().to_string(), pair.answer().to_string()));
        Ok(())
    }
}
