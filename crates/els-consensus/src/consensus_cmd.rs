use std::borrow::Cow;
use std::path::Path;

use anyhow::Result;
use els_core::{ConsensusEngine, ConsensusResult, ImageAnnotations, ImageReport, QuestionTally};
use indexmap::IndexMap;
use serde::Serialize;

use crate::cli::{AnnotationSource, OutputFormat};
use crate::{settings, store};

#[derive(Debug, Serialize)]
struct ConsensusRow<'a> {
    image_id: &'a str,
    #[serde(flatten)]
    consensus: ConsensusResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<IndexMap<String, IndexMap<String, u32>>>,
}

/// Admitted collections for the requested images, sorted by image id.
///
/// An image that has no annotations yet is reported with an empty
/// collection instead of failing.
fn select_images(
    engine: &ConsensusEngine,
    source: &AnnotationSource,
) -> Result<Vec<ImageAnnotations>> {
    let loaded = store::load_annotations(&source.annotations, engine, source.skip_invalid)?;
    if loaded.skipped > 0 {
        eprintln!("Skipped {} invalid annotation(s)", loaded.skipped);
    }

    let mut images = match source.image.as_deref() {
        Some(image_id) => {
            let image = loaded.image(image_id).cloned().unwrap_or_else(|| {
                tracing::warn!(image = %image_id, "Image has no annotations");
                ImageAnnotations::new(image_id)
            });
            vec![image]
        }
        None => loaded.images,
    };
    images.sort_by(|a, b| a.image_id().cmp(b.image_id()));
    Ok(images)
}

fn counts_by_question(tallies: Vec<QuestionTally>) -> IndexMap<String, IndexMap<String, u32>> {
    tallies
        .into_iter()
        .map(|tally| (tally.question().to_string(), tally.counts().clone()))
        .collect()
}

pub(crate) fn handle_consensus(
    config_path: Option<&Path>,
    source: &AnnotationSource,
    counts: bool,
    format: OutputFormat,
) -> Result<()> {
    let engine = settings::build_engine(config_path, source.schema.as_deref())?;
    let images = select_images(&engine, source)?;

    let rows: Vec<ConsensusRow<'_>> = images
        .iter()
        .map(|image| ConsensusRow {
            image_id: image.image_id(),
            consensus: engine.consensus(image.annotations()),
            counts: counts.then(|| counts_by_question(engine.tally(image.annotations()))),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            for row in &rows {
                print!("{}", render_consensus_text(row));
            }
        }
    }
    Ok(())
}

fn render_consensus_text(row: &ConsensusRow<'_>) -> String {
    let result = &row.consensus;
    let mut out = format!(
        "{}  annotators={}  ties={}\n",
        row.image_id,
        result.annotator_count,
        result.flags.len()
    );
    let width = result.consensus.keys().map(String::len).max().unwrap_or(0);

    for (question, resolution) in &result.consensus {
        let value = resolution.as_str().unwrap_or("-");
        let mut line = format!("  {question:<width$}  {value}");
        if result.is_tied(question) {
            line.push_str("  [tie]");
        }
        if let Some(counts) = row.counts.as_ref().and_then(|c| c.get(question)) {
            let votes: Vec<String> = counts.iter().map(|(o, n)| format!("{o}={n}")).collect();
            line.push_str(&format!("  ({})", votes.join(" ")));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub(crate) fn handle_vector(
    config_path: Option<&Path>,
    source: &AnnotationSource,
    format: OutputFormat,
) -> Result<()> {
    let engine = settings::build_engine(config_path, source.schema.as_deref())?;
    let images = select_images(&engine, source)?;
    let reports = engine.evaluate_all(&images);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            print!("{}", render_vector_csv(&engine.schema().feature_keys(), &reports));
        }
    }
    Ok(())
}

/// Quote a CSV field when it contains a separator, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn render_vector_csv(keys: &[String], reports: &[ImageReport]) -> String {
    let mut header = vec![Cow::Borrowed("image_id")];
    header.extend(keys.iter().map(|key| csv_field(key)));
    let mut out = header.join(",");
    out.push('\n');

    for report in reports {
        out.push_str(&csv_field(&report.image_id));
        for slot in report.vector.values() {
            out.push(',');
            out.push_str(&slot.to_string());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use els_core::{AnswerValue, Answers, EngineOptions, QuestionSpec, RawAnnotation, Schema};

    fn engine() -> ConsensusEngine {
        let schema = Schema::new([
            QuestionSpec::single("density", ["high", "low"]).unwrap(),
            QuestionSpec::boolean("gc_like").unwrap(),
        ])
        .unwrap();
        ConsensusEngine::new(schema, EngineOptions::default())
    }

    fn image(votes: &[(&str, &str, bool)]) -> ImageAnnotations {
        let engine = engine();
        let mut image = ImageAnnotations::new("img_001.png");
        for (annotator, density, gc) in votes {
            let mut answers = Answers::new();
            answers.insert("density".into(), AnswerValue::from(*density));
            answers.insert("gc_like".into(), AnswerValue::from(*gc));
            engine
                .admit(&mut image, RawAnnotation::new(*annotator, "img_001.png", answers))
                .unwrap();
        }
        image
    }

    #[test]
    fn test_render_marks_ties_and_counts() {
        let engine = engine();
        let image = image(&[("a", "high", true), ("b", "low", true)]);
        let row = ConsensusRow {
            image_id: image.image_id(),
            consensus: engine.consensus(image.annotations()),
            counts: Some(counts_by_question(engine.tally(image.annotations()))),
        };

        let text = render_consensus_text(&row);
        assert_eq!(
            text,
            "img_001.png  annotators=2  ties=1\n\
             \x20 density  ambiguous  [tie]  (high=1 low=1)\n\
             \x20 gc_like  true  (true=2 false=0)\n"
        );
    }

    #[test]
    fn test_render_unresolved_as_dash() {
        let engine = engine();
        let image = ImageAnnotations::new("img_009.png");
        let row = ConsensusRow {
            image_id: image.image_id(),
            consensus: engine.consensus(image.annotations()),
            counts: None,
        };

        let text = render_consensus_text(&row);
        assert!(text.starts_with("img_009.png  annotators=0  ties=0\n"));
        assert!(text.contains("  density  -\n"));
    }

    #[test]
    fn test_csv_field_quotes_only_when_needed() {
        assert_eq!(csv_field("els_001.png"), "els_001.png");
        assert_eq!(csv_field("a,b.png"), "\"a,b.png\"");
        assert_eq!(csv_field("say \"hi\".png"), "\"say \"\"hi\"\".png\"");
    }

    #[test]
    fn test_vector_csv_keeps_columns_aligned() {
        let engine = engine();
        let mut image = ImageAnnotations::new("scan,left.png");
        let mut answers = Answers::new();
        answers.insert("density".into(), AnswerValue::from("low"));
        answers.insert("gc_like".into(), AnswerValue::from(true));
        engine
            .admit(&mut image, RawAnnotation::new("a", "scan,left.png", answers))
            .unwrap();
        let reports = engine.evaluate_all([&image]);

        let csv = render_vector_csv(&engine.schema().feature_keys(), &reports);
        assert_eq!(
            csv,
            "image_id,density:high,density:low,gc_like:true,gc_like:false\n\
             \"scan,left.png\",0,1,1,0\n"
        );
    }

    #[test]
    fn test_consensus_row_json_shape() {
        let engine = engine();
        let image = image(&[("a", "high", false), ("b", "high", true)]);
        let row = ConsensusRow {
            image_id: image.image_id(),
            consensus: engine.consensus(image.annotations()),
            counts: None,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["image_id"], "img_001.png");
        assert_eq!(json["annotator_count"], 2);
        assert_eq!(json["consensus"]["density"], "high");
        assert_eq!(json["consensus"]["gc_like"], "ambiguous");
        assert_eq!(json["flags"]["gc_like"], "tie");
        assert!(json.get("counts").is_none());
    }
}
