//! # fraction_drill
//!
//! Randomised practice drills for fractions and multiplication, with
//! partial-credit scoring, an append-only progress log and HTML reports.
//!
//! ## How it works
//!
//! 1. Pick exercises from the catalogue (or build one with
//!    [`build_exercise`]). Every exercise implements [`Exercise`]: it draws a
//!    [`Question`] from an injected RNG, scores a guess against it and
//!    renders it as text.
//! 2. A [`Session`] picks an exercise at random, times the learner, scores
//!    the guess and hands the [`Attempt`] to an
//!    [`AttemptSink`](progress_log::AttemptSink), normally a
//!    [`ProgressLog`](progress_log::ProgressLog) file.
//! 3. [`report::generate_report`] turns the log into `report.html` and
//!    `summary.json`.
//!
//! ## Exercises
//!
//! | Type id | Guess | Scoring |
//! |---------|-------|---------|
//! | `number_line` | a point on [0,1] | distance brackets 1.0 / 0.8 / 0.6 / 0.3 / 0 |
//! | `fraction_comparison` | one of two fractions | binary |
//! | `advanced_fraction_comparison_{tier}` | option A-D | binary |
//! | `multiplication_{tier}` | shaded cell count | within 10% of the grid |
//! | `multiplication_fact` | the product | exact, or 0.7 / 0.4 for near misses |
//! | `multiplication_fact_choice` | option A-D | binary |
//!
//! Tiers are `easy`, `medium` and `hard`; an unknown tier label falls back
//! to `medium`. Tier parameters can be overridden from TOML with
//! [`DifficultyConfig::from_toml_str`].
//!
//! ## Quick start
//!
//! ```rust
//! use fraction_drill::{
//!     build_exercise, generate_sample, DifficultyConfig, ExerciseKind, SampleRequest, Session, Tier,
//! };
//! use fraction_drill::exercise_engine::Attempt;
//!
//! let config = DifficultyConfig::default();
//!
//! // One reproducible question:
//! let sample = generate_sample(
//!     &SampleRequest::seeded(ExerciseKind::AdvancedComparison(Tier::Easy), 42),
//!     &config,
//! )
//! .unwrap();
//! println!("{}", sample.rendered);
//!
//! // A multiplication-fact session recording attempts in memory:
//! let exercises = vec![build_exercise(ExerciseKind::MultiplicationFact, &config)];
//! let mut session = Session::new(exercises, Some(7), Vec::<Attempt>::new()).unwrap();
//! let correct = session.next_question().unwrap().correct;
//! let verdict = session.submit(Some(correct)).unwrap();
//! assert!(verdict.is_correct);
//! assert_eq!(session.sink().len(), 1);
//! ```

pub mod error;
pub mod exercise_engine;
pub mod progress_log;
pub mod report;
pub mod session;

// Convenience re-exports so callers can use `fraction_drill::Session`
// directly without reaching into the submodules.
pub use error::{ConfigError, ExerciseError, LogError, ReportError, SessionError};
pub use exercise_engine::{
    build_exercise, catalogue, generate_sample, DifficultyConfig, Exercise, ExerciseKind, Question,
    SampleQuestion, SampleRequest, Tier, Value, Verdict,
};
pub use session::Session;
