//! Property tests for the consensus engine: order independence, idempotence,
//! and the fixed vector width.

use els_core::{
    AnswerValue, Answers, ConsensusEngine, EngineOptions, PolicyDefaults, RawAnnotation,
    Resolution, VectorPolicy, compute_consensus, compute_feature_vector, els_questionnaire,
};
use proptest::prelude::*;

const CELL_TYPES: [&str; 3] = ["B", "T", "Ki67"];
const DOMINANT: [&str; 5] = ["B", "T", "Ki67", "mixed", "few_cells"];
const DENSITY: [&str; 4] = ["high", "moderate", "low", "very_low"];
const SEPARATION: [&str; 5] = ["na", "none", "low", "moderate", "high"];
const T_RING: [&str; 5] = ["na", "none", "weak", "moderate", "clear"];

type Draw = (u8, usize, usize, usize, usize, bool);

fn draw() -> impl Strategy<Value = Draw> {
    (
        0u8..8,
        0..DOMINANT.len(),
        0..DENSITY.len(),
        0..SEPARATION.len(),
        0..T_RING.len(),
        any::<bool>(),
    )
}

fn to_annotation(index: usize, draw: &Draw) -> RawAnnotation {
    let (cells, dominant, density, separation, ring, gc_like) = *draw;
    let mut answers = Answers::new();
    answers.insert(
        "cell_types".into(),
        AnswerValue::many(
            CELL_TYPES
                .iter()
                .enumerate()
                .filter(|(bit, _)| cells & (1 << bit) != 0)
                .map(|(_, option)| *option),
        ),
    );
    answers.insert("dominant_population".into(), DOMINANT[dominant].into());
    answers.insert("density".into(), DENSITY[density].into());
    answers.insert("b_t_separation".into(), SEPARATION[separation].into());
    answers.insert("t_ring".into(), T_RING[ring].into());
    answers.insert("gc_like".into(), gc_like.into());
    RawAnnotation::new(format!("annotator-{index}"), "els_001.png", answers)
}

fn annotations_and_shuffle() -> impl Strategy<Value = (Vec<RawAnnotation>, Vec<RawAnnotation>)> {
    prop::collection::vec(draw(), 0..9).prop_flat_map(|draws| {
        let annotations: Vec<RawAnnotation> = draws
            .iter()
            .enumerate()
            .map(|(i, d)| to_annotation(i, d))
            .collect();
        (Just(annotations.clone()), Just(annotations).prop_shuffle())
    })
}

fn all_majority() -> PolicyDefaults {
    PolicyDefaults {
        single: VectorPolicy::Majority,
        multi: VectorPolicy::Majority,
        boolean: VectorPolicy::Majority,
    }
}

proptest! {
    #[test]
    fn consensus_ignores_annotation_order((original, shuffled) in annotations_and_shuffle()) {
        let schema = els_questionnaire().unwrap();
        let a = compute_consensus(&schema, &original);
        let b = compute_consensus(&schema, &shuffled);
        prop_assert_eq!(&a, &b);

        for policies in [PolicyDefaults::default(), all_majority()] {
            let va = compute_feature_vector(&schema, &original, &a, &policies);
            let vb = compute_feature_vector(&schema, &shuffled, &b, &policies);
            prop_assert_eq!(va, vb);
        }
    }

    #[test]
    fn vector_width_is_fixed((original, _) in annotations_and_shuffle()) {
        let engine = ConsensusEngine::new(els_questionnaire().unwrap(), EngineOptions::default());
        let consensus = engine.consensus(&original);
        let vector = engine.feature_vector(&original, &consensus);
        prop_assert_eq!(vector.len(), engine.schema().vector_width());
        prop_assert!(vector.values().all(|v| v <= 1));
    }

    #[test]
    fn consensus_is_idempotent((original, _) in annotations_and_shuffle()) {
        let schema = els_questionnaire().unwrap();
        let first = serde_json::to_string(&compute_consensus(&schema, &original)).unwrap();
        let second = serde_json::to_string(&compute_consensus(&schema, &original)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn flags_mark_exactly_the_ambiguous_questions((original, _) in annotations_and_shuffle()) {
        let schema = els_questionnaire().unwrap();
        let result = compute_consensus(&schema, &original);
        for (question, resolution) in &result.consensus {
            prop_assert_eq!(resolution.is_ambiguous(), result.is_tied(question));
        }
    }

    #[test]
    fn lone_annotator_decides_single_select(d in draw()) {
        let schema = els_questionnaire().unwrap();
        let annotation = to_annotation(0, &d);
        let result = compute_consensus(&schema, std::slice::from_ref(&annotation));

        for question in ["dominant_population", "density", "b_t_separation", "t_ring", "gc_like"] {
            let expected = annotation.answers[question].votes()[0].to_string();
            prop_assert_eq!(
                result.resolution(question),
                Some(&Resolution::Resolved(expected))
            );
            prop_assert!(!result.is_tied(question));
        }
    }
}

#[test]
fn zero_annotations_have_no_consensus_and_zero_vector() {
    let engine = ConsensusEngine::new(els_questionnaire().unwrap(), EngineOptions::default());
    let consensus = engine.consensus(&[]);
    assert!(
        consensus
            .consensus
            .values()
            .all(|r| *r == Resolution::Unresolved)
    );
    assert!(consensus.flags.is_empty());

    let vector = engine.feature_vector(&[], &consensus);
    assert_eq!(vector.len(), 24);
    assert_eq!(vector.ones(), 0);
}
