use anyhow::{Result, bail};
use els_core::Schema;

use crate::config::{CURRENT_SCHEMA_VERSION, ConsensusConfig};

/// Validate a loaded configuration on its own.
/// Returns Ok(()) if valid, or Err with a descriptive message.
pub fn validate_config(config: &ConsensusConfig) -> Result<()> {
    if config.schema_version == 0 {
        bail!("schema_version must be >= 1 (got 0)");
    }
    if config.schema_version > CURRENT_SCHEMA_VERSION {
        bail!(
            "schema_version {} is newer than supported version {}; upgrade els",
            config.schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }
    for question in config.vector.questions.keys() {
        if question.trim().is_empty() {
            bail!("vector.questions cannot contain an empty question id");
        }
    }
    Ok(())
}

/// Validate a configuration against the schema it will be applied to.
pub fn validate_against_schema(config: &ConsensusConfig, schema: &Schema) -> Result<()> {
    validate_config(config)?;

    let unknown: Vec<&str> = config
        .vector
        .questions
        .keys()
        .filter(|q| !schema.contains(q))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!(
            "vector.questions references questions not in schema: {}",
            unknown.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
