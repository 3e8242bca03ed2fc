use super::*;
use crate::error::ValidationError;
use crate::test_fixtures::{IMAGE, annotation, schema};

#[test]
fn test_answer_value_deserializes_each_shape() {
    let answers: Answers = serde_json::from_str(
        r#"{ "cell_types": ["T", "B", "T"], "density": "low", "gc_like": false }"#,
    )
    .unwrap();
    assert_eq!(answers["cell_types"], AnswerValue::many(["B", "T"]));
    assert_eq!(answers["density"], AnswerValue::One("low".into()));
    assert_eq!(answers["gc_like"], AnswerValue::Flag(false));
}

#[test]
fn test_null_answers_are_dropped() {
    let raw: RawAnnotation = serde_json::from_str(
        r#"{
            "annotator_id": "ann-1",
            "image_id": "els_001.png",
            "answers": { "density": null, "gc_like": true }
        }"#,
    )
    .unwrap();
    assert!(!raw.answers.contains_key("density"));
    assert_eq!(raw.answers["gc_like"], AnswerValue::Flag(true));
}

#[test]
fn test_votes_per_shape() {
    assert_eq!(AnswerValue::Flag(true).votes(), vec!["true"]);
    assert_eq!(AnswerValue::Flag(false).votes(), vec!["false"]);
    assert_eq!(AnswerValue::from("low").votes(), vec!["low"]);
    assert_eq!(AnswerValue::many(["T", "B"]).votes(), vec!["B", "T"]);
    assert!(AnswerValue::many(Vec::<String>::new()).votes().is_empty());
}

#[test]
fn test_insert_admits_valid_annotation() {
    let schema = schema();
    let mut image = ImageAnnotations::new(IMAGE);
    image
        .insert(
            &schema,
            ValidationMode::CollectAll,
            annotation("ann-1", &["B"], "high", true),
        )
        .unwrap();

    assert_eq!(image.len(), 1);
    assert!(image.contains_annotator("ann-1"));
    assert_eq!(image.annotators().collect::<Vec<_>>(), vec!["ann-1"]);
}

#[test]
fn test_insert_rejects_second_submission_from_same_annotator() {
    let schema = schema();
    let mut image = ImageAnnotations::new(IMAGE);
    image
        .insert(
            &schema,
            ValidationMode::CollectAll,
            annotation("ann-1", &["B"], "high", true),
        )
        .unwrap();

    let err = image
        .insert(
            &schema,
            ValidationMode::CollectAll,
            annotation("ann-1", &["T"], "low", false),
        )
        .unwrap_err();
    assert_eq!(
        err,
        AnnotationError::DuplicateAnnotator {
            annotator: "ann-1".into(),
            image: IMAGE.into(),
        }
    );
    assert_eq!(image.len(), 1);
}

#[test]
fn test_insert_rejects_other_image() {
    let schema = schema();
    let mut image = ImageAnnotations::new("els_002.png");
    let err = image
        .insert(
            &schema,
            ValidationMode::CollectAll,
            annotation("ann-1", &["B"], "high", true),
        )
        .unwrap_err();
    assert!(matches!(err, AnnotationError::ImageMismatch { .. }));
    assert!(image.is_empty());
}

#[test]
fn test_insert_rejects_invalid_answers_without_partial_write() {
    let schema = schema();
    let mut image = ImageAnnotations::new(IMAGE);
    let err = image
        .insert(
            &schema,
            ValidationMode::CollectAll,
            annotation("ann-1", &["NK"], "extreme", true),
        )
        .unwrap_err();

    match err {
        AnnotationError::Invalid { errors, .. } => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(
                errors.first(),
                Some(ValidationError::InvalidOptionValue { .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(image.is_empty());
}
