//! Error types, one enum per concern.
//!
//! Malformed guesses are never errors: they score `(false, 0.0)`. The
//! enums here cover configuration problems, sessions driven out of order,
//! and progress-log and report I/O.

use std::path::PathBuf;

use thiserror::Error;

/// A difficulty configuration that cannot drive generation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tier '{tier}' has no comparison denominators")]
    EmptyDenominators { tier: String },

    #[error("tier '{tier}' has denominator {denominator}; denominators must be at least 2")]
    InvalidDenominator { tier: String, denominator: u32 },

    #[error("tier '{tier}': max_value {max_value} leaves no numerator for denominator {denominator}")]
    EmptyNumeratorRange {
        tier: String,
        denominator: u32,
        max_value: f64,
    },

    #[error("tier '{tier}' cannot produce two fractions with different values")]
    DegeneratePairDomain { tier: String },

    #[error("tier '{tier}' has an empty grid ({cols}x{rows})")]
    EmptyGrid { tier: String, cols: u32, rows: u32 },

    #[error("tier '{tier}' has no multiplication fraction candidates")]
    NoFractionCandidates { tier: String },

    #[error("tier '{tier}' has invalid fraction candidate {numer}/{denom}; candidates must be proper fractions with denominator at most {max}", max = crate::exercise_engine::config::MAX_CANDIDATE_DENOMINATOR)]
    InvalidCandidate { tier: String, numer: u32, denom: u32 },

    #[error("unknown tier '{0}' in configuration file")]
    UnknownTier(String),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generation failed for a question.
#[derive(Debug, Error)]
pub enum ExerciseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sampling did not find two different values within the attempt bound.
    #[error("no distinct fraction pair found after {attempts} draws")]
    PairSamplingExhausted { attempts: usize },

    #[error("question values overflowed")]
    Overflow,
}

/// The coordinator was driven out of order.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no exercises to choose from")]
    NoExercises,

    #[error("no question is active")]
    NoActiveQuestion,

    /// A second guess for a question that was already answered.
    #[error("the current question has already been answered")]
    AlreadyAnswered,

    #[error("this exercise does not take grid input")]
    NotAGridExercise,

    #[error(transparent)]
    Generation(#[from] ExerciseError),
}

/// Reading or writing the progress log failed.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("progress log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("log file not found at {0}")]
    LogNotFound(PathBuf),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialise report summary: {0}")]
    Json(#[from] serde_json::Error),
}
