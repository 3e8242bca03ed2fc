use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::AnnotationError;
use crate::schema::{BOOLEAN_OPTIONS, Schema};
use crate::validate::{ValidationMode, validate_answers};

/// One submitted answer.
///
/// Untagged on the wire: a JSON bool, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    One(String),
    Many(BTreeSet<String>),
}

impl AnswerValue {
    pub fn many<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(options.into_iter().map(Into::into).collect())
    }

    /// Short name of the JSON shape, used in type-mismatch reports.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::One(_) => "string",
            Self::Many(_) => "list",
        }
    }

    /// Option strings this answer votes for. A set votes once per member.
    pub fn votes(&self) -> Vec<&str> {
        match self {
            Self::Flag(flag) => vec![boolean_option(*flag)],
            Self::One(option) => vec![option.as_str()],
            Self::Many(options) => options.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(option: &str) -> Self {
        Self::One(option.to_string())
    }
}

impl From<bool> for AnswerValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// Option string a boolean answer is tallied under.
pub fn boolean_option(flag: bool) -> &'static str {
    if flag {
        BOOLEAN_OPTIONS[0]
    } else {
        BOOLEAN_OPTIONS[1]
    }
}

/// Answers keyed by question id.
pub type Answers = BTreeMap<String, AnswerValue>;

/// Deserialize an answers map, dropping `null` entries.
///
/// Clients send `null` for a question left unanswered; dropping it lets the
/// validator report a missing answer instead of a type error.
pub fn deserialize_answers<'de, D>(deserializer: D) -> Result<Answers, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<AnswerValue>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(question, value)| value.map(|v| (question, v)))
        .collect())
}

/// One annotator's submission for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub annotator_id: String,
    pub image_id: String,
    #[serde(deserialize_with = "deserialize_answers")]
    pub answers: Answers,
}

impl RawAnnotation {
    pub fn new(
        annotator_id: impl Into<String>,
        image_id: impl Into<String>,
        answers: Answers,
    ) -> Self {
        Self {
            annotator_id: annotator_id.into(),
            image_id: image_id.into(),
            answers,
        }
    }
}

/// Admitted annotations for one image, at most one per annotator.
///
/// Admission goes through [`ImageAnnotations::insert`], which takes
/// `&mut self`: appending and recomputing for one image cannot interleave
/// while consensus is computed from a shared borrow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageAnnotations {
    image_id: String,
    annotations: Vec<RawAnnotation>,
}

impl ImageAnnotations {
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            annotations: Vec::new(),
        }
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn annotations(&self) -> &[RawAnnotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn contains_annotator(&self, annotator_id: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.annotator_id == annotator_id)
    }

    pub fn annotators(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|a| a.annotator_id.as_str())
    }

    /// Validate `annotation` against `schema` and append it.
    ///
    /// A rejected submission leaves the collection untouched.
    pub fn insert(
        &mut self,
        schema: &Schema,
        mode: ValidationMode,
        annotation: RawAnnotation,
    ) -> Result<(), AnnotationError> {
        if annotation.image_id != self.image_id {
            return Err(AnnotationError::ImageMismatch {
                expected: self.image_id.clone(),
                found: annotation.image_id,
            });
        }
        if self.contains_annotator(&annotation.annotator_id) {
            return Err(AnnotationError::DuplicateAnnotator {
                annotator: annotation.annotator_id,
                image: self.image_id.clone(),
            });
        }
        if let Err(errors) = validate_answers(schema, &annotation.answers, mode) {
            return Err(AnnotationError::Invalid {
                annotator: annotation.annotator_id,
                image: self.image_id.clone(),
                errors,
            });
        }

        tracing::debug!(
            image = %self.image_id,
            annotator = %annotation.annotator_id,
            "Annotation admitted"
        );
        self.annotations.push(annotation);
        Ok(())
    }
}

#[cfg(test)]
#[path = "annotation_tests.rs"]
mod tests;
