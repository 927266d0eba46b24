//! Random draws shared by the generators.
//!
//! Every loop here is bounded, so an empty or degenerate domain turns into
//! an error instead of a hang.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ConfigError, ExerciseError};
use crate::exercise_engine::config::numerator_bound;
use crate::exercise_engine::models::{Fraction, Polarity};

/// Upper bound on draws when looking for two fractions of different value.
pub const MAX_PAIR_ATTEMPTS: usize = 1_000;

/// Offsets applied to a product to build wrong choices.
pub const DISTRACTOR_OFFSETS: [i64; 7] = [-3, -2, -1, 1, 2, 3, 5];

/// Draw one fraction `n/d` with `d` from `denominators` and `n` in
/// `1..=min(d - 1, floor(max_value * d))`.
pub fn proper_fraction<R: Rng + ?Sized>(
    rng: &mut R,
    denominators: &[u32],
    max_value: f64,
) -> Result<Fraction, ExerciseError> {
    let &d = denominators.choose(rng).ok_or_else(|| ConfigError::EmptyDenominators {
        tier: "sampling".to_string(),
    })?;
    let bound = numerator_bound(d, max_value);
    if bound == 0 {
        return Err(ConfigError::EmptyNumeratorRange {
            tier: "sampling".to_string(),
            denominator: d,
            max_value,
        }
        .into());
    }
    let n = rng.gen_range(1..=bound);
    Ok(Fraction::new(i64::from(n), i64::from(d)))
}

/// Draw two fractions with different values, retrying up to
/// [`MAX_PAIR_ATTEMPTS`] times.
pub fn distinct_pair<R: Rng + ?Sized>(
    rng: &mut R,
    denominators: &[u32],
    max_value: f64,
) -> Result<(Fraction, Fraction), ExerciseError> {
    for _ in 0..MAX_PAIR_ATTEMPTS {
        let first = proper_fraction(rng, denominators, max_value)?;
        let second = proper_fraction(rng, denominators, max_value)?;
        if first != second {
            return Ok((first, second));
        }
    }
    tracing::error!(?denominators, max_value, "fraction pair sampling exhausted");
    Err(ExerciseError::PairSamplingExhausted { attempts: MAX_PAIR_ATTEMPTS })
}

pub fn polarity<R: Rng + ?Sized>(rng: &mut R) -> Polarity {
    if rng.gen_bool(0.5) {
        Polarity::Larger
    } else {
        Polarity::Smaller
    }
}

/// Four distinct positive options: `correct` plus three values
/// `correct + offset`, in random order. Offsets are drawn without
/// replacement.
pub fn choice_options<R: Rng + ?Sized>(rng: &mut R, correct: i64) -> [i64; 4] {
    let mut offsets = DISTRACTOR_OFFSETS;
    offsets.shuffle(rng);

    let mut options = vec![correct];
    for offset in offsets {
        if options.len() == 4 {
            break;
        }
        let candidate = correct + offset;
        if candidate > 0 && !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    // Offsets +1, +2, +3 and +5 are positive for any positive product.
    // This fallback only runs when `correct` is not positive.
    let mut filler = correct.max(0) + 6;
    while options.len() < 4 {
        if !options.contains(&filler) {
            options.push(filler);
        }
        filler += 1;
    }
    options.shuffle(rng);
    [options[0], options[1], options[2], options[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const COMPARISON_DENOMINATORS: [u32; 9] = [2, 3, 4, 5, 6, 8, 9, 10, 12];

    #[test]
    fn pairs_are_always_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (a, b) = distinct_pair(&mut rng, &COMPARISON_DENOMINATORS, 1.0).unwrap();
            assert_ne!(a, b);
            assert!(a.to_f64() > 0.0 && a.to_f64() < 1.0);
            assert!(b.to_f64() > 0.0 && b.to_f64() < 1.0);
        }
    }

    #[test]
    fn degenerate_domain_fails_instead_of_looping() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = distinct_pair(&mut rng, &[2], 1.0).unwrap_err();
        assert!(matches!(err, ExerciseError::PairSamplingExhausted { attempts: MAX_PAIR_ATTEMPTS }));
        assert!(matches!(
            proper_fraction(&mut rng, &[], 1.0),
            Err(ExerciseError::Config(ConfigError::EmptyDenominators { .. }))
        ));
    }

    #[test]
    fn choice_options_are_distinct_positive_and_contain_answer() {
        let mut rng = StdRng::seed_from_u64(99);
        for correct in [1i64, 2, 3, 12, 42, 144] {
            for _ in 0..50 {
                let options = choice_options(&mut rng, correct);
                assert!(options.contains(&correct));
                assert!(options.iter().all(|&o| o > 0));
                for (i, a) in options.iter().enumerate() {
                    for b in &options[i + 1..] {
                        assert_ne!(a, b, "duplicate option in {options:?}");
                    }
                }
                for &o in &options {
                    assert!(o == correct || DISTRACTOR_OFFSETS.contains(&(o - correct)));
                }
            }
        }
    }
}
