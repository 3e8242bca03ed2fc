use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotation::RawAnnotation;
use crate::consensus::{ConsensusResult, Resolution};
use crate::schema::{QuestionKind, QuestionSpec, Schema, VectorPolicy, feature_key};
use crate::tally::QuestionTally;

/// Feature-vector policy for each question kind, used when a question does
/// not pin its own [`VectorPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefaults {
    pub single: VectorPolicy,
    pub multi: VectorPolicy,
    pub boolean: VectorPolicy,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            single: VectorPolicy::Majority,
            multi: VectorPolicy::Union,
            boolean: VectorPolicy::Majority,
        }
    }
}

impl PolicyDefaults {
    pub fn for_kind(&self, kind: QuestionKind) -> VectorPolicy {
        match kind {
            QuestionKind::Single => self.single,
            QuestionKind::Multi => self.multi,
            QuestionKind::Boolean => self.boolean,
        }
    }

    /// The policy that applies to `spec`.
    pub fn effective(&self, spec: &QuestionSpec) -> VectorPolicy {
        spec.vector_policy().unwrap_or_else(|| self.for_kind(spec.kind()))
    }
}

/// Fixed-width 0/1 encoding of one image, keyed `"<question>:<option>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(IndexMap<String, u8>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<u8> {
        self.0.get(key).copied()
    }

    pub fn slot(&self, question: &str, option: &str) -> Option<u8> {
        self.get(&feature_key(question, option))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, u8> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = u8> {
        self.0.values().copied()
    }

    /// Number of slots set to 1.
    pub fn ones(&self) -> usize {
        self.0.values().filter(|v| **v == 1).count()
    }
}

/// Encode one image's annotation state as a feature vector.
///
/// Width is always [`Schema::vector_width`]. Majority-policy questions set
/// the resolved option only, so ambiguous and unresolved questions are all
/// zeros. Union-policy questions set every option with at least one vote.
pub fn compute_feature_vector(
    schema: &Schema,
    annotations: &[RawAnnotation],
    consensus: &ConsensusResult,
    policies: &PolicyDefaults,
) -> FeatureVector {
    let mut slots = IndexMap::with_capacity(schema.vector_width());

    for spec in schema.questions() {
        match policies.effective(spec) {
            VectorPolicy::Majority => {
                let winner = consensus.resolution(spec.id()).and_then(Resolution::option);
                for option in spec.options() {
                    let hit = winner == Some(option.as_str());
                    slots.insert(feature_key(spec.id(), option), u8::from(hit));
                }
            }
            VectorPolicy::Union => {
                let tally = QuestionTally::count(spec, annotations);
                for option in spec.options() {
                    slots.insert(
                        feature_key(spec.id(), option),
                        u8::from(tally.selected(option)),
                    );
                }
            }
        }
    }

    FeatureVector(slots)
}

#[cfg(test)]
#[path = "vector_tests.rs"]
mod tests;
