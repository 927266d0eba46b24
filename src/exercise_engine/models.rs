use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Number primitives
// ---------------------------------------------------------------------------

/// An exact rational number, always stored in lowest terms with a positive
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    numer: i64,
    denom: i64,
}

fn gcd(a: i128, b: i128) -> u128 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Fraction {
    /// Build a reduced fraction.
    ///
    /// Panics on a zero denominator, or when the reduced form does not fit
    /// (`1/i64::MIN`). Use [`Fraction::checked`] for untrusted input.
    pub fn new(numer: i64, denom: i64) -> Self {
        match Self::checked(numer, denom) {
            Some(f) => f,
            None => panic!("invalid fraction {numer}/{denom}"),
        }
    }

    /// Like [`Fraction::new`] but returns `None` instead of panicking.
    pub fn checked(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Self::reduced(i128::from(numer), i128::from(denom))
    }

    /// Reduce in `i128`; `None` when the result leaves `i64`.
    fn reduced(numer: i128, denom: i128) -> Option<Self> {
        let sign = if denom < 0 { -1 } else { 1 };
        let g = i128::try_from(gcd(numer, denom).max(1)).ok()?;
        Some(Fraction {
            numer: i64::try_from(sign * numer / g).ok()?,
            denom: i64::try_from(sign * denom / g).ok()?,
        })
    }

    pub fn numer(self) -> i64 {
        self.numer
    }

    pub fn denom(self) -> i64 {
        self.denom
    }

    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// Exact product of two fractions, or `None` if it does not fit.
    pub fn product(self, other: Fraction) -> Option<Fraction> {
        let numer = i128::from(self.numer) * i128::from(other.numer);
        let denom = i128::from(self.denom) * i128::from(other.denom);
        Self::reduced(numer, denom)
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.numer) * i128::from(other.denom);
        let rhs = i128::from(other.numer) * i128::from(self.denom);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for Fraction {
    type Err = String;

    /// Accepts `"n/d"` or a bare integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((n, d)) => {
                let n: i64 = n.trim().parse().map_err(|_| format!("bad numerator in '{s}'"))?;
                let d: i64 = d.trim().parse().map_err(|_| format!("bad denominator in '{s}'"))?;
                Fraction::checked(n, d).ok_or_else(|| format!("zero or out-of-range denominator in '{s}'"))
            }
            None => s
                .parse::<i64>()
                .map_err(|_| format!("not a fraction: '{s}'"))
                .and_then(|n| Fraction::checked(n, 1).ok_or_else(|| format!("out of range: '{s}'"))),
        }
    }
}

/// A correct answer or a guess. Which shape is valid depends on the exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Real(f64),
    Fraction(Fraction),
    Integer(i64),
}

impl Value {
    /// Numeric view of the value, used for log distances.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Real(v) => v,
            Value::Fraction(f) => f.to_f64(),
            Value::Integer(n) => n as f64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Fraction(fr) => write!(f, "{fr}"),
            Value::Integer(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty and exercise identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Parse a tier label (`easy`, `medium`, `hard`), case-insensitive.
    pub fn from_label(label: &str) -> Option<Tier> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Tier::Easy),
            "medium" => Some(Tier::Medium),
            "hard" => Some(Tier::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The selectable exercise forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    NumberLine,
    FractionComparison,
    AdvancedComparison(Tier),
    AreaEstimation(Tier),
    MultiplicationFact,
    MultiplicationFactChoice,
}

impl ExerciseKind {
    /// Every form at every tier, in catalogue order.
    pub fn all() -> Vec<ExerciseKind> {
        let mut kinds = vec![ExerciseKind::NumberLine, ExerciseKind::FractionComparison];
        kinds.extend(Tier::ALL.iter().map(|&t| ExerciseKind::AdvancedComparison(t)));
        kinds.extend(Tier::ALL.iter().map(|&t| ExerciseKind::AreaEstimation(t)));
        kinds.push(ExerciseKind::MultiplicationFact);
        kinds.push(ExerciseKind::MultiplicationFactChoice);
        kinds
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::NumberLine => write!(f, "Number Line"),
            ExerciseKind::FractionComparison => write!(f, "Fraction Comparison"),
            ExerciseKind::AdvancedComparison(t) => write!(f, "Advanced Fraction Comparison ({t})"),
            ExerciseKind::AreaEstimation(t) => write!(f, "Fraction Multiplication Grid ({t})"),
            ExerciseKind::MultiplicationFact => write!(f, "Multiplication Facts"),
            ExerciseKind::MultiplicationFactChoice => write!(f, "Multiplication Facts (choice)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Larger,
    Smaller,
}

impl Polarity {
    /// Pick the answer of a pair for this polarity.
    pub fn select(self, first: Fraction, second: Fraction) -> Fraction {
        match self {
            Polarity::Larger => first.max(second),
            Polarity::Smaller => first.min(second),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Larger => write!(f, "larger"),
            Polarity::Smaller => write!(f, "smaller"),
        }
    }
}

// ---------------------------------------------------------------------------
// Question / verdict
// ---------------------------------------------------------------------------

/// Variant-specific state behind a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum QuestionDetail {
    NumberLine {
        /// How the target is shown to the learner ("3/7", "0.42").
        display: String,
    },
    Comparison {
        first: Fraction,
        second: Fraction,
        polarity: Polarity,
    },
    MultipleChoice {
        first: Fraction,
        second: Fraction,
        polarity: Polarity,
        tier: Tier,
    },
    AreaEstimate {
        first: Fraction,
        second: Fraction,
        cols: u32,
        rows: u32,
    },
    Fact {
        a: u32,
        b: u32,
    },
    FactChoice {
        a: u32,
        b: u32,
        options: [i64; 4],
    },
}

/// One in-flight question. Owned by the caller and handed back for
/// validation and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub correct: Value,
    pub detail: QuestionDetail,
}

/// Outcome of validating one guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    /// Partial credit in `[0.0, 1.0]`.
    pub accuracy: f64,
}

impl Verdict {
    pub fn new(is_correct: bool, accuracy: f64) -> Self {
        Verdict {
            is_correct,
            accuracy: accuracy.clamp(0.0, 1.0),
        }
    }

    /// `(false, 0.0)`: wrong, absent or malformed guess.
    pub fn miss() -> Self {
        Verdict::new(false, 0.0)
    }

    pub fn binary(is_correct: bool) -> Self {
        Verdict::new(is_correct, if is_correct { 1.0 } else { 0.0 })
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
}

/// A discrete choice key, e.g. `'a'` or `'B'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceKey(pub char);

impl ChoiceKey {
    /// Zero-based slot for keys A-D.
    pub fn slot(self) -> Option<usize> {
        match self.0.to_ascii_uppercase() {
            'A' => Some(0),
            'B' => Some(1),
            'C' => Some(2),
            'D' => Some(3),
            _ => None,
        }
    }
}

/// One cell of an estimation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

/// A labelled multiple-choice option. `value` is `None` for distractor
/// slots that can never be a valid guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub key: char,
    pub text: String,
    pub value: Option<Value>,
}

// ---------------------------------------------------------------------------
// Attempt record
// ---------------------------------------------------------------------------

/// One completed guess, ready for the progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub exercise_type: String,
    pub question: String,
    pub correct: Value,
    pub guess: Option<Value>,
    /// Seconds between question display and guess, never negative.
    pub thinking_time: f64,
    pub verdict: Verdict,
}

impl Attempt {
    /// `|guess - correct|`, or 0.0 when there is no guess.
    pub fn distance(&self) -> f64 {
        match &self.guess {
            Some(g) => (g.as_f64() - self.correct.as_f64()).abs(),
            None => 0.0,
        }
    }
}
