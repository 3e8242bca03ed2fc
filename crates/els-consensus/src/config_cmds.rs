use std::path::Path;

use anyhow::{Context, Result, bail};
use els_config::{ConsensusConfig, validate_config};
use els_core::{PolicyDefaults, Schema};

use crate::cli::OutputFormat;
use crate::settings;

pub(crate) fn handle_config_show(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = settings::load_config(config_path)?;
    validate_config(&config)?;

    match format {
        OutputFormat::Json => {
            let json_str = serde_json::to_string_pretty(&config)?;
            println!("{}", json_str);
        }
        OutputFormat::Text => {
            let toml_str = toml::to_string_pretty(&config)?;
            print!("{}", toml_str);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_init(force: bool) -> Result<()> {
    let project_root = std::env::current_dir().context("Failed to resolve current directory")?;
    let config_path = ConsensusConfig::config_path(&project_root);
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let path = ConsensusConfig::default().save(&project_root)?;
    eprintln!("Initialized configuration at: {}", path.display());
    Ok(())
}

pub(crate) fn handle_config_validate(
    config_path: Option<&Path>,
    schema_path: Option<&Path>,
) -> Result<()> {
    settings::build_engine(config_path, schema_path)?;
    eprintln!("Configuration is valid");
    Ok(())
}

/// Print the schema with config overrides applied.
pub(crate) fn handle_schema_show(
    config_path: Option<&Path>,
    schema_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let engine = settings::build_engine(config_path, schema_path)?;
    let schema = engine.schema();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(schema)?),
        OutputFormat::Text => {
            print!("{}", render_schema_text(schema, &engine.options().policies));
        }
    }
    Ok(())
}

fn render_schema_text(schema: &Schema, policies: &PolicyDefaults) -> String {
    let mut out = String::new();
    for question in schema.questions() {
        out.push_str(&format!(
            "{} ({}, {})\n",
            question.id(),
            question.kind(),
            policies.effective(question)
        ));
        if let Some(description) = question.description() {
            out.push_str(&format!("  {description}\n"));
        }
        out.push_str(&format!("  options: {}\n", question.options().join(", ")));
    }
    out.push_str(&format!("vector width: {}\n", schema.vector_width()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use els_core::{QuestionSpec, VectorPolicy};

    #[test]
    fn test_render_schema_text() {
        let schema = Schema::new([
            QuestionSpec::multi("cell_types", ["B", "T"])
                .unwrap()
                .with_description("Cell types present"),
            QuestionSpec::boolean("gc_like")
                .unwrap()
                .with_vector_policy(VectorPolicy::Union),
        ])
        .unwrap();

        let text = render_schema_text(&schema, &PolicyDefaults::default());
        assert_eq!(
            text,
            "cell_types (multi, union)\n  Cell types present\n  options: B, T\n\
             gc_like (boolean, union)\n  options: true, false\n\
             vector width: 4\n"
        );
    }
}
