use std::path::Path;

use anyhow::Result;
use els_core::{completed_images, pending_images};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::{settings, store};

#[derive(Debug, Serialize)]
struct PendingReport<'a> {
    annotator_id: &'a str,
    completed: usize,
    pending: Vec<String>,
}

/// Records that fail validation never count as done, so they are skipped
/// rather than aborting the listing.
pub(crate) fn handle_pending(
    config_path: Option<&Path>,
    schema_path: Option<&Path>,
    annotations_path: &Path,
    images_dir: &Path,
    annotator: &str,
    format: OutputFormat,
) -> Result<()> {
    let engine = settings::build_engine(config_path, schema_path)?;
    let loaded = store::load_annotations(annotations_path, &engine, true)?;
    let images = store::list_images(images_dir)?;

    let report = PendingReport {
        annotator_id: annotator,
        completed: completed_images(&loaded.images, annotator).len(),
        pending: pending_images(images, &loaded.images, annotator),
    };
    tracing::debug!(
        annotator = %annotator,
        completed = report.completed,
        pending = report.pending.len(),
        "Computed pending images"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for image in &report.pending {
                println!("{image}");
            }
        }
    }
    Ok(())
}
