//! Read operations for verifying ingested data.

use neo4rs::query;

use qagraph_core::{EdgeType, NodeLabel};

use crate::client::{GraphClient, GraphError};

/// Node and relationship counts for the question/answer graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphStats {
    pub questions: i64,
    pub answers: i64,
    pub has_answer: i64,
}

impl GraphClient {
    /// Count nodes with the given label.
    pub async fn count_nodes(&self, label: NodeLabel) -> Result<i64, GraphError> {
        let q = query(&count_nodes_cypher(label));

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count relationships of the given type between their schema labels.
    pub async fn count_relationships(&self, edge_type: EdgeType) -> Result<i64, GraphError> {
        let q = query(&count_relationships_cypher(edge_type));

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// All counts in one call.
    pub async fn stats(&self) -> Result<GraphStats, GraphError> {
        Ok(GraphStats {
            questions: self.count_nodes(NodeLabel::Question).await?,
            answers: self.count_nodes(NodeLabel::Answer).await?,
            has_answer: self.count_relationships(EdgeType::HasAnswer).await?,
        })
    }

    /// Answers linked to the question with exactly this text, sorted.
    pub async fn answers_for(&self, question: &str) -> Result<Vec<String>, GraphError> {
        let q = query(
            "MATCH (:Question {text: $question})-[:HAS_ANSWER]->(a:Answer)
             RETURN a.text AS text
             ORDER BY text",
        )
        .param("question", question.to_string());

        let rows = self.query_rows(q).await?;
        let mut answers = Vec::with_capacity(rows.len());
        for row in rows {
            let text: String = row.get("text").map_err(|e| {
                GraphError::Serialization(format!("Failed to read answer text: {e}"))
            })?;
            answers.push(text);
        }
        Ok(answers)
    }
}

fn count_nodes_cypher(label: NodeLabel) -> String {
    format!("MATCH (n:{label}) RETURN count(n) AS cnt", label = label.as_str())
}

fn count_relationships_cypher(edge_type: EdgeType) -> String {
    format!(
        "MATCH (:{source})-[r:{rel}]->(:{target}) RETURN count(r) AS cnt",
        source = edge_type.source().as_str(),
        rel = edge_type.as_str(),
        target = edge_type.target().as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_cypher() {
        assert_eq!(
            count_nodes_cypher(NodeLabel::Question),
            "MATCH (n:Question) RETURN count(n) AS cnt"
        );
        assert_eq!(
            count_relationships_cypher(EdgeType::HasAnswer),
            "MATCH (:Question)-[r:HAS_ANSWER]->(:Answer) RETURN count(r) AS cnt"
        );
    }

    #[test]
    fn test_stats_serialize() {
        let stats = GraphStats {
            questions: 3,
            answers: 2,
            has_answer: 3,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["questions"], 3);
        assert_eq!(json["has_answer"], 3);
    }
}
