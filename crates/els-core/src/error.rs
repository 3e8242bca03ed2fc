use crate::schema::QuestionKind;

/// A single rejected answer inside a submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing answer for question '{question}'")]
    MissingAnswer { question: String },

    #[error("Invalid value '{value}' for question '{question}': not an allowed option")]
    InvalidOptionValue { question: String, value: String },

    #[error("Type mismatch for question '{question}': expected {expected} answer, got {found}")]
    TypeMismatch {
        question: String,
        expected: QuestionKind,
        found: &'static str,
    },

    #[error("Unknown question '{question}': not defined in schema")]
    UnknownQuestion { question: String },
}

impl ValidationError {
    /// Identifier of the question this violation refers to.
    pub fn question(&self) -> &str {
        match self {
            Self::MissingAnswer { question }
            | Self::InvalidOptionValue { question, .. }
            | Self::TypeMismatch { question, .. }
            | Self::UnknownQuestion { question } => question,
        }
    }
}

/// Every violation found in one submission, in schema order.
///
/// Never empty: the validator only builds one when at least one answer was
/// rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_violations(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn join_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Schema construction failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema defines no questions")]
    Empty,

    #[error("Question identifier cannot be empty")]
    EmptyQuestionId,

    #[error("Duplicate question '{0}'")]
    DuplicateQuestion(String),

    #[error("Question '{0}' is not defined in schema")]
    UnknownQuestion(String),

    #[error("Question '{0}' has no options")]
    NoOptions(String),

    #[error("Question '{question}' has an empty option")]
    EmptyOption { question: String },

    #[error("Question '{question}' lists option '{option}' more than once")]
    DuplicateOption { question: String, option: String },

    #[error("Question '{question}' uses reserved option '{option}'")]
    ReservedOption { question: String, option: String },

    #[error("Boolean question '{question}' cannot declare option '{option}' (only 'true' and 'false')")]
    BooleanOption { question: String, option: String },

    #[error("Feature key '{0}' is produced by more than one (question, option) pair")]
    FeatureKeyCollision(String),
}

/// Reasons an annotation is refused by a per-image collection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation by '{annotator}' for image '{image}' rejected: {errors}")]
    Invalid {
        annotator: String,
        image: String,
        errors: ValidationErrors,
    },

    #[error("Annotator '{annotator}' already annotated image '{image}'")]
    DuplicateAnnotator { annotator: String, image: String },

    #[error("Annotation for image '{found}' cannot be added to image '{expected}'")]
    ImageMismatch { expected: String, found: String },
}
