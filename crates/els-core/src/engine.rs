use serde::Serialize;

use crate::annotation::{Answers, ImageAnnotations, RawAnnotation};
use crate::consensus::{ConsensusResult, compute_consensus};
use crate::error::{AnnotationError, ValidationErrors};
use crate::schema::Schema;
use crate::tally::{QuestionTally, tally_image};
use crate::validate::{ValidationMode, validate_answers};
use crate::vector::{FeatureVector, PolicyDefaults, compute_feature_vector};

/// Tunables injected into a [`ConsensusEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub policies: PolicyDefaults,
    pub validation: ValidationMode,
}

/// Consensus and feature vector for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub image_id: String,
    #[serde(flatten)]
    pub consensus: ConsensusResult,
    pub vector: FeatureVector,
}

/// Stateless facade over a schema and its options.
///
/// Every method is a pure function of its arguments and the injected
/// schema; results can be recomputed at any time.
#[derive(Debug, Clone)]
pub struct ConsensusEngine {
    schema: Schema,
    options: EngineOptions,
}

impl ConsensusEngine {
    pub fn new(schema: Schema, options: EngineOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn validate(&self, answers: &Answers) -> Result<(), ValidationErrors> {
        validate_answers(&self.schema, answers, self.options.validation)
    }

    /// Validate and append `annotation` to its image's collection.
    pub fn admit(
        &self,
        image: &mut ImageAnnotations,
        annotation: RawAnnotation,
    ) -> Result<(), AnnotationError> {
        image.insert(&self.schema, self.options.validation, annotation)
    }

    pub fn tally(&self, annotations: &[RawAnnotation]) -> Vec<QuestionTally> {
        tally_image(&self.schema, annotations).into_values().collect()
    }

    pub fn consensus(&self, annotations: &[RawAnnotation]) -> ConsensusResult {
        compute_consensus(&self.schema, annotations)
    }

    pub fn feature_vector(
        &self,
        annotations: &[RawAnnotation],
        consensus: &ConsensusResult,
    ) -> FeatureVector {
        compute_feature_vector(&self.schema, annotations, consensus, &self.options.policies)
    }

    pub fn evaluate(&self, image: &ImageAnnotations) -> ImageReport {
        let consensus = self.consensus(image.annotations());
        let vector = self.feature_vector(image.annotations(), &consensus);

        tracing::debug!(
            image = %image.image_id(),
            annotators = consensus.annotator_count,
            ties = consensus.flags.len(),
            "Computed consensus"
        );
        for question in consensus.flags.keys() {
            tracing::debug!(image = %image.image_id(), question = %question, "Tie");
        }

        ImageReport {
            image_id: image.image_id().to_string(),
            consensus,
            vector,
        }
    }

    /// Reports for many images, ordered by image id.
    pub fn evaluate_all<'a>(
        &self,
        images: impl IntoIterator<Item = &'a ImageAnnotations>,
    ) -> Vec<ImageReport> {
        let mut reports: Vec<ImageReport> =
            images.into_iter().map(|image| self.evaluate(image)).collect();
        reports.sort_by(|a, b| a.image_id.cmp(&b.image_id));
        reports
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
