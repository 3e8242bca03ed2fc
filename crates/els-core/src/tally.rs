//! Integer vote counting per question.
//!
//! Counts depend only on the multiset of submitted answers, never on their
//! order, so every result derived from a tally is order independent.

use indexmap::IndexMap;
use serde::Serialize;

use crate::annotation::RawAnnotation;
use crate::consensus::Resolution;
use crate::schema::{QuestionSpec, Schema};

/// Vote counts for one question, one entry per option in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionTally {
    question: String,
    counts: IndexMap<String, u32>,
}

impl QuestionTally {
    /// Count votes for `spec` across `annotations`.
    ///
    /// Single-select and boolean answers cast one vote; a multi-select set
    /// casts one vote per selected option. Values outside the option list
    /// are skipped; admitted annotations never contain them.
    pub fn count(spec: &QuestionSpec, annotations: &[RawAnnotation]) -> Self {
        let mut counts: IndexMap<String, u32> =
            spec.options().iter().map(|o| (o.clone(), 0)).collect();

        for annotation in annotations {
            let Some(value) = annotation.answers.get(spec.id()) else {
                continue;
            };
            for vote in value.votes() {
                match counts.get_mut(vote) {
                    Some(count) => *count += 1,
                    None => tracing::warn!(
                        question = %spec.id(),
                        annotator = %annotation.annotator_id,
                        value = %vote,
                        "Ignoring vote for an option outside the schema"
                    ),
                }
            }
        }

        Self {
            question: spec.id().to_string(),
            counts,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn counts(&self) -> &IndexMap<String, u32> {
        &self.counts
    }

    pub fn votes_for(&self, option: &str) -> u32 {
        self.counts.get(option).copied().unwrap_or(0)
    }

    /// True when at least one annotator chose `option`.
    pub fn selected(&self, option: &str) -> bool {
        self.votes_for(option) > 0
    }

    pub fn max_votes(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Options sharing the highest non-zero count, in schema order.
    pub fn leaders(&self) -> Vec<&str> {
        let max = self.max_votes();
        if max == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .filter(|(_, count)| **count == max)
            .map(|(option, _)| option.as_str())
            .collect()
    }

    /// Plurality outcome: a unique leader resolves, a shared lead is
    /// ambiguous, no votes at all leaves the question unresolved.
    pub fn resolve(&self) -> Resolution {
        match self.leaders().as_slice() {
            [] => Resolution::Unresolved,
            [winner] => Resolution::Resolved((*winner).to_string()),
            _ => Resolution::Ambiguous,
        }
    }
}

/// Tallies for every schema question of one image, in schema order.
pub fn tally_image(
    schema: &Schema,
    annotations: &[RawAnnotation],
) -> IndexMap<String, QuestionTally> {
    schema
        .questions()
        .map(|spec| {
            (
                spec.id().to_string(),
                QuestionTally::count(spec, annotations),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tally_tests.rs"]
mod tests;
