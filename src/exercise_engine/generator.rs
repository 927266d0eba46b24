use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ExerciseError;
use crate::exercise_engine::{
    config::DifficultyConfig,
    exercise::Exercise,
    exercises::{
        AdvancedComparison, AreaEstimation, FractionComparison, MultiplicationFact,
        MultiplicationFactChoice, NumberLine,
    },
    models::{ChoiceOption, ExerciseKind, Question, Tier},
};

/// Seeded RNG when `seed` is given, entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Construct one exercise form from the difficulty configuration.
pub fn build_exercise(kind: ExerciseKind, config: &DifficultyConfig) -> Box<dyn Exercise> {
    match kind {
        ExerciseKind::NumberLine => Box::new(NumberLine::new()),
        ExerciseKind::FractionComparison => Box::new(FractionComparison::new()),
        ExerciseKind::AdvancedComparison(tier) => Box::new(AdvancedComparison::for_tier(config, tier)),
        ExerciseKind::AreaEstimation(tier) => Box::new(AreaEstimation::for_tier(config, tier)),
        ExerciseKind::MultiplicationFact => Box::new(MultiplicationFact::new(config.max_factor())),
        ExerciseKind::MultiplicationFactChoice => {
            Box::new(MultiplicationFactChoice::new(config.max_factor()))
        }
    }
}

/// Every exercise form, in [`ExerciseKind::all`] order.
pub fn catalogue(config: &DifficultyConfig) -> Vec<Box<dyn Exercise>> {
    catalogue_of(&ExerciseKind::all(), config)
}

pub fn catalogue_of(kinds: &[ExerciseKind], config: &DifficultyConfig) -> Vec<Box<dyn Exercise>> {
    kinds.iter().map(|&k| build_exercise(k, config)).collect()
}

/// Map a type id prefix back to its form. Operand-bound suffixes on the
/// multiplication facts (`_upto_N`) are accepted.
pub fn kind_for_type_id(type_id: &str) -> Option<ExerciseKind> {
    let tiered = |prefix: &str| -> Option<Tier> {
        type_id.strip_prefix(prefix).and_then(Tier::from_label)
    };
    match type_id {
        "number_line" => Some(ExerciseKind::NumberLine),
        "fraction_comparison" => Some(ExerciseKind::FractionComparison),
        id if id.starts_with("multiplication_fact_choice") => Some(ExerciseKind::MultiplicationFactChoice),
        id if id.starts_with("multiplication_fact") => Some(ExerciseKind::MultiplicationFact),
        _ => tiered("advanced_fraction_comparison_")
            .map(ExerciseKind::AdvancedComparison)
            .or_else(|| tiered("multiplication_").map(ExerciseKind::AreaEstimation)),
    }
}

/// Uniformly pick an index into a non-empty catalogue.
pub fn pick_index(len: usize, rng: &mut dyn RngCore) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// One-off question request, e.g. for previews and scripted tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRequest {
    pub kind: ExerciseKind,
    pub rng_seed: Option<u64>,
}

impl SampleRequest {
    /// Entropy-seeded request for `kind`.
    pub fn new(kind: ExerciseKind) -> Self {
        SampleRequest { kind, rng_seed: None }
    }

    pub fn seeded(kind: ExerciseKind, seed: u64) -> Self {
        SampleRequest { kind, rng_seed: Some(seed) }
    }
}

/// A generated question together with what a front end needs to show it.
#[derive(Debug, Clone, Serialize)]
pub struct SampleQuestion {
    pub exercise_type: String,
    pub kind: ExerciseKind,
    pub question: Question,
    /// Lettered options for choice-based forms; empty otherwise.
    pub options: Vec<ChoiceOption>,
    pub rendered: String,
}

/// Generate a single question. The same seed always yields the same
/// question.
pub fn generate_sample(
    request: &SampleRequest,
    config: &DifficultyConfig,
) -> Result<SampleQuestion, ExerciseError> {
    let mut rng = make_rng(request.rng_seed);
    let exercise = build_exercise(request.kind, config);
    let question = exercise.generate_question(&mut rng)?;
    let options = exercise
        .choices()
        .map(|c| c.options(&question))
        .unwrap_or_default();
    let rendered = exercise.render_question(&question);
    tracing::debug!(exercise = %exercise.exercise_type(), prompt = %question.prompt, "generated sample question");

    Ok(SampleQuestion {
        exercise_type: exercise.exercise_type(),
        kind: request.kind,
        question,
        options,
        rendered,
    })
}
