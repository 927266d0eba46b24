use rand::RngCore;

use crate::error::ExerciseError;
use crate::exercise_engine::{
    exercise::{Exercise, Locator},
    helpers::{fraction_bar, COMPARISON_PANELS},
    models::{Fraction, PointerInput, Question, QuestionDetail, Value, Verdict},
    sampling,
};

/// Denominators for the visual comparison; numerators span `1..d`.
pub const COMPARISON_DENOMINATORS: [u32; 9] = [2, 3, 4, 5, 6, 8, 9, 10, 12];

/// Pick the larger or smaller of two fractions shown side by side.
#[derive(Debug, Clone, Default)]
pub struct FractionComparison;

impl FractionComparison {
    pub fn new() -> Self {
        FractionComparison
    }
}

fn pair(question: &Question) -> Option<(Fraction, Fraction)> {
    match question.detail {
        QuestionDetail::Comparison { first, second, .. } => Some((first, second)),
        _ => None,
    }
}

impl Exercise for FractionComparison {
    fn exercise_type(&self) -> String {
        "fraction_comparison".to_string()
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let (first, second) = sampling::distinct_pair(rng, &COMPARISON_DENOMINATORS, 1.0)?;
        let polarity = sampling::polarity(rng);
        let correct = polarity.select(first, second);

        Ok(Question {
            prompt: format!("Which is {polarity}: {first} or {second}?"),
            correct: Value::Fraction(correct),
            detail: QuestionDetail::Comparison { first, second, polarity },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        if pair(question).is_none() {
            return Verdict::miss();
        }
        match guess {
            Some(Value::Fraction(g)) => Verdict::binary(Value::Fraction(*g) == question.correct),
            _ => Verdict::miss(),
        }
    }

    fn render_question(&self, question: &Question) -> String {
        let Some((first, second)) = pair(question) else {
            return question.prompt.clone();
        };
        format!(
            "{}\n\n  1) {:<6} {}\n  2) {:<6} {}",
            question.prompt,
            first.to_string(),
            fraction_bar(first),
            second.to_string(),
            fraction_bar(second)
        )
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let verdict = self.validate_guess(question, guess);
        let guess_text = guess.map_or_else(|| "none".to_string(), |g| g.to_string());
        format!(
            "{}\n\nYou picked: {guess_text}\nCorrect: {}\n{}",
            self.render_question(question),
            question.correct,
            if verdict.is_correct { "Correct!" } else { "Incorrect" }
        )
    }

    /// Accepts `1`/`2` for the panel, or the fraction itself.
    fn parse_guess(&self, question: &Question, text: &str) -> Option<Value> {
        let (first, second) = pair(question)?;
        match text.trim() {
            "1" => Some(Value::Fraction(first)),
            "2" => Some(Value::Fraction(second)),
            other if other.contains('/') => other.parse::<Fraction>().ok().map(Value::Fraction),
            _ => None,
        }
    }

    fn locator(&self) -> Option<&dyn Locator> {
        Some(self)
    }
}

impl Locator for FractionComparison {
    fn locate(&self, question: &Question, pointer: PointerInput) -> Option<Value> {
        let (first, second) = pair(question)?;
        if COMPARISON_PANELS[0].contains(pointer) {
            Some(Value::Fraction(first))
        } else if COMPARISON_PANELS[1].contains(pointer) {
            Some(Value::Fraction(second))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise_engine::models::Polarity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn half_vs_third(polarity: Polarity) -> Question {
        let (first, second) = (Fraction::new(1, 2), Fraction::new(1, 3));
        Question {
            prompt: format!("Which is {polarity}: {first} or {second}?"),
            correct: Value::Fraction(polarity.select(first, second)),
            detail: QuestionDetail::Comparison { first, second, polarity },
        }
    }

    #[test]
    fn generated_pairs_differ_and_answer_matches_polarity() {
        let ex = FractionComparison::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let q = ex.generate_question(&mut rng).unwrap();
            let QuestionDetail::Comparison { first, second, polarity } = q.detail.clone() else {
                panic!("wrong detail");
            };
            assert_ne!(first, second);
            assert!(COMPARISON_DENOMINATORS.iter().any(|&d| i64::from(d) % first.denom() == 0));
            let expected = match polarity {
                Polarity::Larger => first.max(second),
                Polarity::Smaller => first.min(second),
            };
            assert_eq!(q.correct, Value::Fraction(expected));
        }
    }

    #[test]
    fn wrong_pick_scores_zero() {
        let ex = FractionComparison::new();
        let q = half_vs_third(Polarity::Larger);
        assert_eq!(q.correct, Value::Fraction(Fraction::new(1, 2)));
        assert_eq!(ex.validate_guess(&q, Some(&Value::Fraction(Fraction::new(1, 3)))), Verdict::miss());
        assert_eq!(
            ex.validate_guess(&q, Some(&Value::Fraction(Fraction::new(2, 4)))),
            Verdict::binary(true)
        );
    }

    #[test]
    fn wrong_shape_guess_scores_zero() {
        let ex = FractionComparison::new();
        let q = half_vs_third(Polarity::Smaller);
        assert_eq!(ex.validate_guess(&q, Some(&Value::Integer(1))), Verdict::miss());
        assert_eq!(ex.validate_guess(&q, None), Verdict::miss());
    }

    #[test]
    fn accuracy_is_binary() {
        let ex = FractionComparison::new();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let q = ex.generate_question(&mut rng).unwrap();
            let QuestionDetail::Comparison { first, second, .. } = q.detail.clone() else { unreachable!() };
            for g in [first, second] {
                let acc = ex.validate_guess(&q, Some(&Value::Fraction(g))).accuracy;
                assert!(acc == 0.0 || acc == 1.0);
            }
        }
    }

    #[test]
    fn locator_panels() {
        let ex = FractionComparison::new();
        let q = half_vs_third(Polarity::Larger);
        let loc = ex.locator().unwrap();
        assert_eq!(
            loc.locate(&q, PointerInput { x: 200.0, y: 200.0 }),
            Some(Value::Fraction(Fraction::new(1, 2)))
        );
        assert_eq!(
            loc.locate(&q, PointerInput { x: 400.0, y: 299.0 }),
            Some(Value::Fraction(Fraction::new(1, 3)))
        );
        assert_eq!(loc.locate(&q, PointerInput { x: 300.0, y: 200.0 }), None);
        assert_eq!(loc.locate(&q, PointerInput { x: 200.0, y: 320.0 }), None);
    }

    #[test]
    fn panel_numbers_parse_to_fractions() {
        let ex = FractionComparison::new();
        let q = half_vs_third(Polarity::Larger);
        assert_eq!(ex.parse_guess(&q, "2"), Some(Value::Fraction(Fraction::new(1, 3))));
        assert_eq!(ex.parse_guess(&q, "1/2"), Some(Value::Fraction(Fraction::new(1, 2))));
        assert_eq!(ex.parse_guess(&q, "0.5"), None);
    }

    #[test]
    fn extreme_fraction_text_never_panics() {
        let ex = FractionComparison::new();
        let q = half_vs_third(Polarity::Smaller);
        assert_eq!(ex.parse_guess(&q, "1/-9223372036854775808"), None);
        let guess = ex.parse_guess(&q, "-9223372036854775808/1");
        assert_eq!(guess, Some(Value::Fraction(Fraction::new(i64::MIN, 1))));
        assert_eq!(ex.validate_guess(&q, guess.as_ref()), Verdict::miss());
    }
}
