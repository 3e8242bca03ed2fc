use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotation::RawAnnotation;
use crate::schema::{AMBIGUOUS, Schema};
use crate::tally::{QuestionTally, tally_image};

/// Consensus outcome for one question.
///
/// Serialized as the winning option, the string `"ambiguous"`, or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Resolution {
    /// No votes were cast.
    Unresolved,
    /// Two or more options share the top count.
    Ambiguous,
    /// A single option holds the top count.
    Resolved(String),
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous)
    }

    /// The winning option, if one exists.
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::Resolved(option) => Some(option),
            _ => None,
        }
    }

    /// Exported string value; `None` for an unresolved question.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unresolved => None,
            Self::Ambiguous => Some(AMBIGUOUS),
            Self::Resolved(option) => Some(option),
        }
    }
}

impl From<Option<String>> for Resolution {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::Unresolved,
            Some(v) if v == AMBIGUOUS => Self::Ambiguous,
            Some(v) => Self::Resolved(v),
        }
    }
}

impl From<Resolution> for Option<String> {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Unresolved => None,
            Resolution::Ambiguous => Some(AMBIGUOUS.to_string()),
            Resolution::Resolved(option) => Some(option),
        }
    }
}

/// Marker recorded for a question whose consensus is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Tie,
}

/// Per-image consensus across all admitted annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub annotator_count: usize,
    /// Question id -> outcome, in schema order.
    pub consensus: IndexMap<String, Resolution>,
    /// Question id -> flag, only for ambiguous questions.
    #[serde(default)]
    pub flags: IndexMap<String, Flag>,
}

impl ConsensusResult {
    /// Build a result from per-question tallies.
    pub fn from_tallies<'a>(
        tallies: impl IntoIterator<Item = &'a QuestionTally>,
        annotator_count: usize,
    ) -> Self {
        let mut consensus = IndexMap::new();
        let mut flags = IndexMap::new();
        for tally in tallies {
            let resolution = tally.resolve();
            if resolution.is_ambiguous() {
                flags.insert(tally.question().to_string(), Flag::Tie);
            }
            consensus.insert(tally.question().to_string(), resolution);
        }
        Self {
            annotator_count,
            consensus,
            flags,
        }
    }

    pub fn resolution(&self, question: &str) -> Option<&Resolution> {
        self.consensus.get(question)
    }

    pub fn is_tied(&self, question: &str) -> bool {
        self.flags.contains_key(question)
    }

    pub fn has_ties(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Majority consensus for one image.
///
/// Pure and order independent: the same annotations in any order give an
/// identical result. No annotations gives every question
/// [`Resolution::Unresolved`] and no flags.
pub fn compute_consensus(schema: &Schema, annotations: &[RawAnnotation]) -> ConsensusResult {
    let tallies = tally_image(schema, annotations);
    ConsensusResult::from_tallies(tallies.values(), annotations.len())
}

#[cfg(test)]
#[path = "consensus_tests.rs"]
mod tests;
