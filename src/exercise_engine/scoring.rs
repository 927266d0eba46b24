//! Accuracy curves shared by the exercise variants.
//!
//! All functions are pure: same inputs, same [`Verdict`].

use crate::exercise_engine::models::{Fraction, Verdict};

/// Number-line placement: step function of `|guess - correct|`.
///
/// | distance | verdict |
/// |----------|---------|
/// | < 0.01   | (true, 1.0) |
/// | < 0.05   | (true, 0.8) |
/// | < 0.1    | (true, 0.6) |
/// | < 0.2    | (true, 0.3) |
/// | otherwise | (false, 0.0) |
pub fn placement(distance: f64) -> Verdict {
    if !distance.is_finite() {
        return Verdict::miss();
    }
    let d = distance.abs();
    if d < 0.01 {
        Verdict::new(true, 1.0)
    } else if d < 0.05 {
        Verdict::new(true, 0.8)
    } else if d < 0.1 {
        Verdict::new(true, 0.6)
    } else if d < 0.2 {
        Verdict::new(true, 0.3)
    } else {
        Verdict::miss()
    }
}

/// Multiplication facts, free entry: near misses earn partial credit.
pub fn fact(guess: i64, correct: i64) -> Verdict {
    match guess.abs_diff(correct) {
        0 => Verdict::new(true, 1.0),
        1 => Verdict::new(true, 0.7),
        2 => Verdict::new(true, 0.4),
        _ => Verdict::miss(),
    }
}

/// Cell-count estimation against a `total`-cell grid.
///
/// Correct within 10% of the grid. Accuracy falls linearly to a floor of
/// 0.1 at half the grid and stays at 0.1 beyond that.
pub fn area_estimate(guess: u64, correct_cells: u64, total: u64) -> Verdict {
    let total = total as f64;
    let diff = guess.abs_diff(correct_cells) as f64;
    let max_difference = total * 0.5;

    let accuracy = if diff == 0.0 {
        1.0
    } else if diff <= max_difference {
        (1.0 - diff / max_difference).max(0.1)
    } else {
        0.1
    };
    Verdict::new(diff <= total * 0.1, accuracy)
}

/// `floor(correct * total)` for the estimation grid, computed exactly.
pub fn correct_cells(correct: Fraction, total: u64) -> u64 {
    let scaled = i128::from(correct.numer()) * i128::from(total);
    let cells = scaled.div_euclid(i128::from(correct.denom()));
    u64::try_from(cells.max(0)).unwrap_or(u64::MAX)
}
