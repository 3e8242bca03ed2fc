//! Consensus aggregation for multi-annotator ELS image labeling.
//!
//! Annotators answer a fixed questionnaire ([`Schema`]) per image. For one
//! image this crate turns the admitted [`RawAnnotation`]s into:
//!
//! - a plurality [`ConsensusResult`] per question, surfacing ties as
//!   `ambiguous` with a `tie` flag instead of breaking them;
//! - a fixed-width 0/1 [`FeatureVector`] keyed `"<question>:<option>"`,
//!   encoded per question with a [`VectorPolicy`].
//!
//! Every computation is a pure function of the schema and the annotation
//! set: order independent, idempotent, and safe to recompute at any time.
//! Storage, transport, and export formatting live outside this crate.
//!
//! ```
//! use els_core::{
//!     AnswerValue, Answers, ConsensusEngine, EngineOptions, ImageAnnotations, QuestionSpec,
//!     RawAnnotation, Resolution, Schema,
//! };
//!
//! let schema = Schema::new([QuestionSpec::single("density", ["high", "low"]).unwrap()]).unwrap();
//! let engine = ConsensusEngine::new(schema, EngineOptions::default());
//!
//! let mut image = ImageAnnotations::new("els_001.png");
//! for (annotator, density) in [("a", "high"), ("b", "high"), ("c", "low")] {
//!     let mut answers = Answers::new();
//!     answers.insert("density".into(), AnswerValue::from(density));
//!     engine
//!         .admit(&mut image, RawAnnotation::new(annotator, "els_001.png", answers))
//!         .unwrap();
//! }
//!
//! let report = engine.evaluate(&image);
//! assert_eq!(
//!     report.consensus.resolution("density"),
//!     Some(&Resolution::Resolved("high".into()))
//! );
//! assert_eq!(report.vector.slot("density", "high"), Some(1));
//! ```

pub mod annotation;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod progress;
pub mod questionnaire;
pub mod schema;
pub mod tally;
pub mod validate;
pub mod vector;

#[cfg(test)]
mod test_fixtures;

pub use annotation::{AnswerValue, Answers, ImageAnnotations, RawAnnotation};
pub use consensus::{ConsensusResult, Flag, Resolution, compute_consensus};
pub use engine::{ConsensusEngine, EngineOptions, ImageReport};
pub use error::{AnnotationError, SchemaError, ValidationError, ValidationErrors};
pub use progress::{completed_images, is_image_file, pending_images};
pub use questionnaire::els_questionnaire;
pub use schema::{AMBIGUOUS, QuestionKind, QuestionSpec, Schema, VectorPolicy, feature_key};
pub use tally::{QuestionTally, tally_image};
pub use validate::{ValidationMode, validate_answers};
pub use vector::{FeatureVector, PolicyDefaults, compute_feature_vector};
