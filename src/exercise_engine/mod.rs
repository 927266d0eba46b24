//! Exercise engine: question generation, scoring and input mapping.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: fractions, values, questions, verdicts, tiers |
//! | `exercise`  | The `Exercise` trait and optional input capabilities |
//! | `config`    | Difficulty tiers and their generation parameters |
//! | `sampling`  | Bounded random draws: fraction pairs, distractors |
//! | `scoring`   | Accuracy curves |
//! | `helpers`   | Screen geometry and text rendering |
//! | `generator` | Exercise catalogue, seeded RNG, one-off samples |
//! | `exercises` | The exercise variants |

pub mod config;
pub mod exercise;
pub mod exercises;
pub mod generator;
pub mod helpers;
pub mod models;
pub mod sampling;
pub mod scoring;

pub use config::{DifficultyConfig, TierParams};
pub use exercise::{CellSelection, ChoiceBased, Exercise, GridEstimate, Locator};
pub use generator::{build_exercise, catalogue, generate_sample, make_rng, SampleQuestion, SampleRequest};
pub use models::{
    Attempt, Cell, ChoiceKey, ChoiceOption, ExerciseKind, Fraction, Polarity, PointerInput,
    Question, QuestionDetail, Tier, Value, Verdict,
};
