use anyhow::{Context, Result};
use els_core::{EngineOptions, PolicyDefaults, Schema, ValidationMode, VectorPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project-level configuration.
pub const CONFIG_DIR: &str = ".els";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Current schema version for config.toml
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// Feature-vector encoding policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub single: VectorPolicy,
    pub multi: VectorPolicy,
    pub boolean: VectorPolicy,
    /// Question id -> policy, taking priority over the per-kind defaults.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub questions: BTreeMap<String, VectorPolicy>,
}

impl Default for VectorConfig {
    fn default() -> Self {
        let defaults = PolicyDefaults::default();
        Self {
            single: defaults.single,
            multi: defaults.multi,
            boolean: defaults.boolean,
            questions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report only the first rejected answer instead of all of them.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            vector: VectorConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ConsensusConfig {
    /// Path of the project config file under `project_root`.
    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load `.els/config.toml` under `project_root`, falling back to defaults
    /// when the file does not exist.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::config_path(project_root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Load an explicitly named config file. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid consensus config")
    }

    /// Write the config to `.els/config.toml` under `project_root`.
    pub fn save(&self, project_root: &Path) -> Result<PathBuf> {
        let path = Self::config_path(project_root);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    pub fn policy_defaults(&self) -> PolicyDefaults {
        PolicyDefaults {
            single: self.vector.single,
            multi: self.vector.multi,
            boolean: self.vector.boolean,
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        if self.validation.fail_fast {
            ValidationMode::FailFast
        } else {
            ValidationMode::CollectAll
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            policies: self.policy_defaults(),
            validation: self.validation_mode(),
        }
    }

    /// Pin the per-question overrides onto `schema`.
    pub fn apply_overrides(&self, schema: Schema) -> Result<Schema> {
        self.vector
            .questions
            .iter()
            .try_fold(schema, |schema, (question, policy)| {
                schema
                    .with_vector_policy(question, *policy)
                    .with_context(|| format!("vector.questions.{question}"))
            })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
