//! Shared fixtures for unit tests.

use crate::annotation::{AnswerValue, Answers, RawAnnotation};
use crate::schema::{QuestionSpec, Schema};

pub(crate) const IMAGE: &str = "els_001.png";

/// A trimmed ELS questionnaire: one question of each kind.
pub(crate) fn schema() -> Schema {
    Schema::new([
        QuestionSpec::multi("cell_types", ["B", "T", "Ki67"]).unwrap(),
        QuestionSpec::single("density", ["high", "moderate", "low", "very_low"]).unwrap(),
        QuestionSpec::boolean("gc_like").unwrap(),
    ])
    .unwrap()
}

pub(crate) fn answers(cell_types: &[&str], density: &str, gc_like: bool) -> Answers {
    let mut answers = Answers::new();
    answers.insert(
        "cell_types".to_string(),
        AnswerValue::many(cell_types.iter().copied()),
    );
    answers.insert("density".to_string(), AnswerValue::from(density));
    answers.insert("gc_like".to_string(), AnswerValue::from(gc_like));
    answers
}

pub(crate) fn annotation(
    annotator: &str,
    cell_types: &[&str],
    density: &str,
    gc_like: bool,
) -> RawAnnotation {
    RawAnnotation::new(annotator, IMAGE, answers(cell_types, density, gc_like))
}
