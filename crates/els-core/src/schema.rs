use clap::ValueEnum;
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::error::SchemaError;

/// Sentinel reported for a question whose top vote count is shared.
///
/// Reserved: no schema may declare it as an option.
pub const AMBIGUOUS: &str = "ambiguous";

/// Fixed option list of every `boolean` question.
pub const BOOLEAN_OPTIONS: [&str; 2] = ["true", "false"];

/// Answer shape accepted by a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option.
    Single,
    /// Zero or more options.
    Multi,
    /// `true` or `false`; tallied like a single-select over [`BOOLEAN_OPTIONS`].
    Boolean,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a question's options are encoded in the feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorPolicy {
    /// 1 only for the resolved consensus option; ties encode as all zeros.
    Majority,
    /// 1 for every option chosen by at least one annotator.
    Union,
}

impl VectorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Majority => "majority",
            Self::Union => "union",
        }
    }
}

impl std::fmt::Display for VectorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One questionnaire entry. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSpec {
    #[serde(skip)]
    id: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vector_policy: Option<VectorPolicy>,
}

impl QuestionSpec {
    /// Build a question, checking option invariants.
    ///
    /// `boolean` questions always carry [`BOOLEAN_OPTIONS`]; any declared
    /// option must be one of them.
    pub fn new<I, S>(
        id: impl Into<String>,
        kind: QuestionKind,
        options: I,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SchemaError::EmptyQuestionId);
        }
        let declared: Vec<String> = options.into_iter().map(Into::into).collect();

        let options = if kind == QuestionKind::Boolean {
            if let Some(bad) = declared
                .iter()
                .find(|o| !BOOLEAN_OPTIONS.contains(&o.as_str()))
            {
                return Err(SchemaError::BooleanOption {
                    question: id,
                    option: bad.clone(),
                });
            }
            BOOLEAN_OPTIONS.iter().map(|o| (*o).to_string()).collect()
        } else {
            check_options(&id, &declared)?;
            declared
        };

        Ok(Self {
            id,
            kind,
            options,
            description: None,
            vector_policy: None,
        })
    }

    pub fn single<I, S>(id: impl Into<String>, options: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, QuestionKind::Single, options)
    }

    pub fn multi<I, S>(id: impl Into<String>, options: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, QuestionKind::Multi, options)
    }

    pub fn boolean(id: impl Into<String>) -> Result<Self, SchemaError> {
        Self::new(id, QuestionKind::Boolean, Vec::<String>::new())
    }

    /// Attach display text shown to annotators. Never used for matching.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Pin this question's feature-vector policy, overriding the per-kind default.
    pub fn with_vector_policy(mut self, policy: VectorPolicy) -> Self {
        self.vector_policy = Some(policy);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn vector_policy(&self) -> Option<VectorPolicy> {
        self.vector_policy
    }

    pub fn allows(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

fn check_options(question: &str, options: &[String]) -> Result<(), SchemaError> {
    if options.is_empty() {
        return Err(SchemaError::NoOptions(question.to_string()));
    }
    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if option.is_empty() {
            return Err(SchemaError::EmptyOption {
                question: question.to_string(),
            });
        }
        if option == AMBIGUOUS {
            return Err(SchemaError::ReservedOption {
                question: question.to_string(),
                option: option.clone(),
            });
        }
        if !seen.insert(option.as_str()) {
            return Err(SchemaError::DuplicateOption {
                question: question.to_string(),
                option: option.clone(),
            });
        }
    }
    Ok(())
}

/// One question as written in a schema file, keyed by its id in the
/// enclosing map.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDef {
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    vector_policy: Option<VectorPolicy>,
}

/// Ordered questionnaire: question id -> [`QuestionSpec`].
///
/// Question order drives consensus output order and feature-vector column
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionDefs")]
pub struct Schema {
    questions: IndexMap<String, QuestionSpec>,
}

impl Schema {
    pub fn new(questions: impl IntoIterator<Item = QuestionSpec>) -> Result<Self, SchemaError> {
        let mut map = IndexMap::new();
        for spec in questions {
            if map.contains_key(spec.id()) {
                return Err(SchemaError::DuplicateQuestion(spec.id().to_string()));
            }
            map.insert(spec.id().to_string(), spec);
        }
        if map.is_empty() {
            return Err(SchemaError::Empty);
        }
        let schema = Self { questions: map };

        // Ids and options may contain ':', so distinct slots can still spell
        // the same key.
        let mut keys = HashSet::with_capacity(schema.vector_width());
        if let Some(key) = schema
            .feature_keys()
            .into_iter()
            .find(|key| !keys.insert(key.clone()))
        {
            return Err(SchemaError::FeatureKeyCollision(key));
        }
        Ok(schema)
    }

    pub fn get(&self, question: &str) -> Option<&QuestionSpec> {
        self.questions.get(question)
    }

    pub fn contains(&self, question: &str) -> bool {
        self.questions.contains_key(question)
    }

    /// Questions in schema order.
    pub fn questions(&self) -> indexmap::map::Values<'_, String, QuestionSpec> {
        self.questions.values()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of feature-vector slots: one per (question, option) pair.
    pub fn vector_width(&self) -> usize {
        self.questions.values().map(|q| q.options.len()).sum()
    }

    /// Pin `question`'s vector policy, keeping every other definition.
    pub fn with_vector_policy(
        mut self,
        question: &str,
        policy: VectorPolicy,
    ) -> Result<Self, SchemaError> {
        match self.questions.get_mut(question) {
            Some(spec) => {
                spec.vector_policy = Some(policy);
                Ok(self)
            }
            None => Err(SchemaError::UnknownQuestion(question.to_string())),
        }
    }

    /// Feature-vector column names in stable order.
    pub fn feature_keys(&self) -> Vec<String> {
        self.questions
            .values()
            .flat_map(|q| q.options.iter().map(move |o| feature_key(&q.id, o)))
            .collect()
    }
}

/// Question definitions in file order, repeated keys included so that
/// [`Schema::new`] reports them as [`SchemaError::DuplicateQuestion`].
#[derive(Debug, Clone, Default)]
pub struct QuestionDefs(Vec<(String, QuestionDef)>);

impl<'de> Deserialize<'de> for QuestionDefs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefsVisitor;

        impl<'de> Visitor<'de> for DefsVisitor {
            type Value = QuestionDefs;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of question id to question definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut defs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, QuestionDef>()? {
                    defs.push(entry);
                }
                Ok(QuestionDefs(defs))
            }
        }

        deserializer.deserialize_map(DefsVisitor)
    }
}

impl TryFrom<QuestionDefs> for Schema {
    type Error = SchemaError;

    fn try_from(defs: QuestionDefs) -> Result<Self, Self::Error> {
        let specs = defs
            .0
            .into_iter()
            .map(|(id, def)| {
                let mut spec = QuestionSpec::new(id, def.kind, def.options)?;
                spec.description = def.description;
                spec.vector_policy = def.vector_policy;
                Ok(spec)
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Self::new(specs)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.questions.iter())
    }
}

/// Feature-vector key for one (question, option) slot.
pub fn feature_key(question: &str, option: &str) -> String {
    format!("{question}:{option}")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
