//! Per-annotator progress over the image set.

use std::collections::BTreeSet;

use crate::annotation::ImageAnnotations;

/// File extensions served as annotatable images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

pub fn is_image_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}

/// Images `annotator_id` has already submitted an annotation for.
pub fn completed_images<'a>(
    collections: impl IntoIterator<Item = &'a ImageAnnotations>,
    annotator_id: &str,
) -> BTreeSet<String> {
    collections
        .into_iter()
        .filter(|image| image.contains_annotator(annotator_id))
        .map(|image| image.image_id().to_string())
        .collect()
}

/// Images still waiting for `annotator_id`, sorted and de-duplicated.
pub fn pending_images<'a, I, S>(
    images: I,
    collections: impl IntoIterator<Item = &'a ImageAnnotations>,
    annotator_id: &str,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let done = completed_images(collections, annotator_id);
    let all: BTreeSet<String> = images.into_iter().map(Into::into).collect();
    all.into_iter().filter(|image| !done.contains(image)).collect()
}
