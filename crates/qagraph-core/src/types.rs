//! Core domain types for the question/answer knowledge graph.
//!
//! A spreadsheet row becomes a [`QaPair`], which is written to the graph as a
//! `Question` node, an `Answer` node and a `HAS_ANSWER` edge between them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Rows ──────────────────────────────────────────────────────────

/// A validated question/answer pair.
///
/// Both fields are trimmed and guaranteed non-empty. The only way to build
/// one is [`QaPair::new`], so every pair that reaches the graph writer
/// satisfies that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QaPair {
    question: String,
    answer: String,
}

impl QaPair {
    /// Trim both fields and build a pair, or `None` if either is empty.
    pub fn new(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

// ── Graph Schema ──────────────────────────────────────────────────

/// Node labels used in the graph. Both are keyed by their `text` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Question,
    Answer,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 2] = [NodeLabel::Question, NodeLabel::Answer];

    /// The Cypher label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "Question",
            Self::Answer => "Answer",
        }
    }

    /// The property that uniquely identifies a node of this label.
    pub fn key_property(&self) -> &'static str {
        "text"
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types used in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Question → Answer.
    HasAnswer,
}

impl EdgeType {
    /// The Cypher relationship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasAnswer => "HAS_ANSWER",
        }
    }

    pub fn source(&self) -> NodeLabel {
        match self {
            Self::HasAnswer => NodeLabel::Question,
        }
    }

    pub fn target(&self) -> NodeLabel {
        match self {
            Self::HasAnswer => NodeLabel::Answer,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_trims_fields() {
        let pair = QaPair::new("  What is X? ", "\tX is Y.\n").unwrap();
        assert_eq!(pair.question(), "What is X?");
        assert_eq!(pair.answer(), "X is Y.");
    }

    #[test]
    fn pair_rejects_blank_fields() {
        assert!(QaPair::new("   ", "answer").is_none());
        assert!(QaPair::new("question", "").is_none());
        assert!(QaPair::new("", " \n ").is_none());
    }

    #[test]
    fn identical_text_gives_equal_pairs() {
        let a = QaPair::new("What is X?", "X is Y.").unwrap();
        let b = QaPair::new(" What is X?", "X is Y. ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn schema_identifiers() {
        assert_eq!(NodeLabel::Question.as_str(), "Question");
        assert_eq!(NodeLabel::Answer.to_string(), "Answer");
        assert_eq!(EdgeType::HasAnswer.as_str(), "HAS_ANSWER");
        assert_eq!(EdgeType::HasAnswer.source(), NodeLabel::Question);
        assert_eq!(EdgeType::HasAnswer.target(), NodeLabel::Answer);
    }
}
