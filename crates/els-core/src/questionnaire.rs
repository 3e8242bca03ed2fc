//! Built-in ELS questionnaire used when no schema file is supplied.

use crate::error::SchemaError;
use crate::schema::{QuestionSpec, Schema};

/// The ectopic lymphoid structure questionnaire annotators answer per image.
pub fn els_questionnaire() -> Result<Schema, SchemaError> {
    Schema::new([
        QuestionSpec::multi("cell_types", ["B", "T", "Ki67"])?
            .with_description("Which cell populations are visible?"),
        QuestionSpec::single(
            "dominant_population",
            ["B", "T", "Ki67", "mixed", "few_cells"],
        )?
        .with_description("Which population dominates the structure?"),
        QuestionSpec::single("density", ["high", "moderate", "low", "very_low"])?
            .with_description("Overall cell density"),
        QuestionSpec::single("b_t_separation", ["na", "none", "low", "moderate", "high"])?
            .with_description("Degree of B/T zone separation"),
        QuestionSpec::single("t_ring", ["na", "none", "weak", "moderate", "clear"])?
            .with_description("T cells forming a ring around the B follicle"),
        QuestionSpec::boolean("gc_like")?
            .with_description("Germinal-center-like proliferating core present"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QuestionKind;

    #[test]
    fn test_questionnaire_shape() {
        let schema = els_questionnaire().unwrap();
        assert_eq!(schema.len(), 6);
        assert_eq!(schema.vector_width(), 3 + 5 + 4 + 5 + 5 + 2);
        assert_eq!(schema.get("cell_types").unwrap().kind(), QuestionKind::Multi);
        assert_eq!(schema.get("gc_like").unwrap().kind(), QuestionKind::Boolean);
    }
}
