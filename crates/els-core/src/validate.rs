use serde::{Deserialize, Serialize};

use crate::annotation::{AnswerValue, Answers};
use crate::error::{ValidationError, ValidationErrors};
use crate::schema::{QuestionKind, QuestionSpec, Schema};

/// How many violations the validator reports per submission.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Report every violation.
    #[default]
    CollectAll,
    /// Stop at the first violation.
    FailFast,
}

/// Check a submission against the schema.
///
/// Questions are checked in schema order, then answers keyed by unknown
/// question ids are reported in key order.
pub fn validate_answers(
    schema: &Schema,
    answers: &Answers,
    mode: ValidationMode,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for spec in schema.questions() {
        match answers.get(spec.id()) {
            None => errors.push(ValidationError::MissingAnswer {
                question: spec.id().to_string(),
            }),
            Some(value) => check_answer(spec, value, &mut errors),
        }
        if mode == ValidationMode::FailFast && !errors.is_empty() {
            break;
        }
    }

    if errors.is_empty() || mode == ValidationMode::CollectAll {
        errors.extend(
            answers
                .keys()
                .filter(|question| !schema.contains(question))
                .map(|question| ValidationError::UnknownQuestion {
                    question: question.clone(),
                }),
        );
    }

    if mode == ValidationMode::FailFast {
        errors.truncate(1);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}

fn check_answer(spec: &QuestionSpec, value: &AnswerValue, errors: &mut Vec<ValidationError>) {
    match (spec.kind(), value) {
        (QuestionKind::Single, AnswerValue::One(option)) => {
            check_option(spec, option, errors);
        }
        (QuestionKind::Multi, AnswerValue::Many(options)) => {
            for option in options {
                check_option(spec, option, errors);
            }
        }
        (QuestionKind::Boolean, AnswerValue::Flag(_)) => {}
        (expected, found) => errors.push(ValidationError::TypeMismatch {
            question: spec.id().to_string(),
            expected,
            found: found.shape(),
        }),
    }
}

fn check_option(spec: &QuestionSpec, option: &str, errors: &mut Vec<ValidationError>) {
    if !spec.allows(option) {
        errors.push(ValidationError::InvalidOptionValue {
            question: spec.id().to_string(),
            value: option.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
