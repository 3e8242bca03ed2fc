use std::path::Path;

use anyhow::{Result, bail};
use els_core::ValidationError;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::{settings, store};

#[derive(Debug, Serialize)]
struct Violation<'a> {
    question: &'a str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    violations: Vec<Violation<'a>>,
}

impl<'a> ValidationReport<'a> {
    fn new(errors: &'a [ValidationError]) -> Self {
        Self {
            valid: errors.is_empty(),
            violations: errors
                .iter()
                .map(|e| Violation {
                    question: e.question(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

pub(crate) fn handle_validate(
    config_path: Option<&Path>,
    schema_path: Option<&Path>,
    answers_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let engine = settings::build_engine(config_path, schema_path)?;
    let answers = store::load_answers(answers_path)?;

    let errors = match engine.validate(&answers) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.into_vec(),
    };
    let report = ValidationReport::new(&errors);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if report.valid {
                println!("OK: {} answers valid", answers.len());
            }
            for violation in &report.violations {
                println!("- {}", violation.message);
            }
        }
    }

    if !report.valid {
        bail!(
            "{} violation(s) in {}",
            report.violations.len(),
            answers_path.display()
        );
    }
    Ok(())
}
