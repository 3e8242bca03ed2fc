//! On-disk inputs: schema, answers, annotation data and the image directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use els_core::{
    Answers, ConsensusEngine, ImageAnnotations, RawAnnotation, Schema, els_questionnaire,
    is_image_file,
};
use indexmap::IndexMap;
use serde::Deserialize;

/// One record of the annotations file; the image id is the enclosing key.
#[derive(Debug, Deserialize)]
struct StoredAnnotation {
    annotator_id: String,
    #[serde(deserialize_with = "els_core::annotation::deserialize_answers")]
    answers: Answers,
}

/// Admitted collections plus the number of records that were dropped.
#[derive(Debug, Default)]
pub(crate) struct LoadedAnnotations {
    pub images: Vec<ImageAnnotations>,
    pub skipped: usize,
}

impl LoadedAnnotations {
    pub(crate) fn image(&self, image_id: &str) -> Option<&ImageAnnotations> {
        self.images.iter().find(|image| image.image_id() == image_id)
    }
}

/// Parse a schema file, or build the ELS questionnaire when `path` is `None`.
pub(crate) fn load_schema(path: Option<&Path>) -> Result<Schema> {
    let Some(path) = path else {
        return els_questionnaire().context("Built-in questionnaire is invalid");
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema file: {}", path.display()))
}

/// Parse a single answers object. `null` values count as unanswered.
pub(crate) fn load_answers(path: &Path) -> Result<Answers> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file: {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&content);
    let answers = els_core::annotation::deserialize_answers(&mut de)
        .with_context(|| format!("Failed to parse answers file: {}", path.display()))?;
    de.end()
        .with_context(|| format!("Trailing data in answers file: {}", path.display()))?;
    Ok(answers)
}

/// Read an annotations file and admit every record through `engine`.
///
/// A rejected record aborts the load unless `skip_invalid` is set, in which
/// case it is logged and counted.
pub(crate) fn load_annotations(
    path: &Path,
    engine: &ConsensusEngine,
    skip_invalid: bool,
) -> Result<LoadedAnnotations> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations file: {}", path.display()))?;
    let stored: IndexMap<String, Vec<StoredAnnotation>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse annotations file: {}", path.display()))?;

    let mut loaded = LoadedAnnotations::default();
    for (image_id, records) in stored {
        let mut image = ImageAnnotations::new(image_id.clone());
        for record in records {
            let annotation =
                RawAnnotation::new(record.annotator_id, image_id.clone(), record.answers);
            match engine.admit(&mut image, annotation) {
                Ok(()) => {}
                Err(e) if skip_invalid => {
                    tracing::warn!(image = %image_id, "Skipping annotation: {e}");
                    loaded.skipped += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Invalid annotation data in {}", path.display())
                    });
                }
            }
        }
        loaded.images.push(image);
    }

    tracing::debug!(
        path = %path.display(),
        images = loaded.images.len(),
        skipped = loaded.skipped,
        "Loaded annotations"
    );
    Ok(loaded)
}

/// Image file names directly under `dir`, sorted. A missing directory has
/// no images.
pub(crate) fn list_images(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %dir.display(), "Images directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read images directory: {}", dir.display())
            });
        }
    };

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str().filter(|n| is_image_file(n)) {
            images.push(name.to_string());
        }
    }
    images.sort();
    Ok(images)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
