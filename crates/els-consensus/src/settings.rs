//! Resolves config + schema into a ready [`ConsensusEngine`].

use std::path::Path;

use anyhow::{Context, Result};
use els_config::{ConsensusConfig, validate_against_schema};
use els_core::{ConsensusEngine, Schema};

use crate::store;

/// Load the explicit config file, or `.els/config.toml` under the current
/// directory when none is given.
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<ConsensusConfig> {
    match config_path {
        Some(path) => ConsensusConfig::load_from_file(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
            ConsensusConfig::load(&cwd)
        }
    }
}

pub(crate) fn build_engine(
    config_path: Option<&Path>,
    schema_path: Option<&Path>,
) -> Result<ConsensusEngine> {
    let config = load_config(config_path)?;
    let schema = store::load_schema(schema_path)?;
    engine_from(&config, schema)
}

pub(crate) fn engine_from(config: &ConsensusConfig, schema: Schema) -> Result<ConsensusEngine> {
    validate_against_schema(config, &schema)?;
    let schema = config.apply_overrides(schema)?;
    let options = config.engine_options();
    tracing::debug!(
        questions = schema.len(),
        width = schema.vector_width(),
        validation = ?options.validation,
        "Consensus engine ready"
    );
    Ok(ConsensusEngine::new(schema, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use els_core::{VectorPolicy, els_questionnaire};

    #[test]
    fn test_engine_from_applies_overrides_and_mode() {
        let config = ConsensusConfig::from_toml_str(
            r#"
            [vector.questions]
            cell_types = "majority"

            [validation]
            fail_fast = true
            "#,
        )
        .unwrap();
        let engine = engine_from(&config, els_questionnaire().unwrap()).unwrap();
        assert_eq!(
            engine.schema().get("cell_types").unwrap().vector_policy(),
            Some(VectorPolicy::Majority)
        );
        assert_eq!(
            engine.options().validation,
            els_core::ValidationMode::FailFast
        );
    }

    #[test]
    fn test_engine_from_rejects_unknown_override() {
        let config = ConsensusConfig::from_toml_str(
            r#"
            [vector.questions]
            colour = "union"
            "#,
        )
        .unwrap();
        let err = engine_from(&config, els_questionnaire().unwrap()).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
