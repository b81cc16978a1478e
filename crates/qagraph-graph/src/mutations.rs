//! Write operations for the knowledge graph.
//!
//! All mutations use MERGE (upsert) semantics so re-ingesting the same rows
//! is idempotent. Question and Answer nodes are identified by their exact
//! `text`; the HAS_ANSWER edge is merged by pattern between them.

use neo4rs::query;

use qagraph_core::{NodeLabel, QaPair};

use crate::client::{GraphClient, GraphError};

/// Upsert of one question/answer pair.
pub const MERGE_QA_PAIR: &str = "MERGE (q:Question {text: $question})
     MERGE (a:Answer {text: $answer})
     MERGE (q)-[:HAS_ANSWER]->(a)";

impl GraphClient {
    // ── Pair Upserts ─────────────────────────────────────────────

    /// Merge a Question node, an Answer node and the edge between them.
    ///
    /// Runs in its own transaction. A failed statement rolls the transaction
    /// back before the error is returned; nothing spans rows.
    pub async fn merge_qa_pair(&self, pair: &QaPair) -> Result<(), GraphError> {
        let q = query(MERGE_QA_PAIR)
            .param("question", pair.question().to_string())
            .param("answer", pair.answer().to_string());

        let mut txn = self.start_txn().await?;
        if let Err(e) = txn.run(q).await {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback after failed merge also failed");
            }
            return Err(e.into());
        }
        txn.commit().await?;
        Ok(())
    }

    // ── Schema ───────────────────────────────────────────────────

    /// Create uniqueness constraints on the `text` key of each node label.
    ///
    /// With these in place the store enforces one node per text even if two
    /// writers race on the same MERGE. The backing index limits key size, so
    /// afterwards any text over roughly 8 KB is rejected on write.
    pub async fn ensure_constraints(&self) -> Result<(), GraphError> {
        for label in NodeLabel::ALL {
            let cypher = constraint_cypher(label);
            self.run(query(&cypher)).await?;
            tracing::debug!(label = %label, "Uniqueness constraint ensured");
        }
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// `CREATE CONSTRAINT` statement for a label's key property.
fn constraint_cypher(label: NodeLabel) -> String {
    let name = format!("{}_{}_unique", label.as_str().to_lowercase(), label.key_property());
    format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS
         FOR (n:{label}) REQUIRE n.{key} IS UNIQUE",
        label = label.as_str(),
        key = label.key_property(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_statement_shape() {
        assert!(MERGE_QA_PAIR.contains("MERGE (q:Question {text: $question})"));
        assert!(MERGE_QA_PAIR.contains("MERGE (a:Answer {text: $answer})"));
        assert!(MERGE_QA_PAIR.contains("MERGE (q)-[:HAS_ANSWER]->(a)"));
        assert!(!MERGE_QA_PAIR.contains("CREATE"));
    }

    #[test]
    fn test_constraint_cypher() {
        let cypher = constraint_cypher(NodeLabel::Question);
        assert!(cypher.starts_with("CREATE CONSTRAINT question_text_unique IF NOT EXISTS"));
        assert!(cypher.contains("FOR (n:Question) REQUIRE n.text IS UNIQUE"));

        let cypher = constraint_cypher(NodeLabel::Answer);
        assert!(cypher.contains("answer_text_unique"));
        assert!(cypher.contains("(n:Answer)"));
    }
}
