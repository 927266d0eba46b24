use rand::RngCore;

use crate::error::ExerciseError;
use crate::exercise_engine::{
    config::{DifficultyConfig, TierParams},
    exercise::{ChoiceBased, Exercise, Locator},
    helpers::{option_at, option_lines},
    models::{ChoiceKey, ChoiceOption, Fraction, PointerInput, Question, QuestionDetail, Tier, Value, Verdict},
    sampling,
};

/// Distractor labels for slots C and D. They never validate as correct.
pub const EQUAL_LABEL: &str = "They are equal";
pub const UNDETERMINED_LABEL: &str = "Cannot determine";

/// Text-only comparison with four lettered options, tiered by difficulty.
#[derive(Debug, Clone)]
pub struct AdvancedComparison {
    tier: Tier,
    params: TierParams,
}

impl AdvancedComparison {
    /// Build for a tier label. Unknown labels fall back to `medium`.
    pub fn new(config: &DifficultyConfig, label: &str) -> Self {
        let (tier, params) = config.resolve(label);
        AdvancedComparison { tier, params: params.clone() }
    }

    pub fn for_tier(config: &DifficultyConfig, tier: Tier) -> Self {
        AdvancedComparison { tier, params: config.params(tier).clone() }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }
}

fn pair(question: &Question) -> Option<(Fraction, Fraction)> {
    match question.detail {
        QuestionDetail::MultipleChoice { first, second, .. } => Some((first, second)),
        _ => None,
    }
}

impl Exercise for AdvancedComparison {
    fn exercise_type(&self) -> String {
        format!("advanced_fraction_comparison_{}", self.tier)
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let (first, second) =
            sampling::distinct_pair(rng, &self.params.comparison_denominators, self.params.max_value)?;
        let polarity = sampling::polarity(rng);
        let correct = polarity.select(first, second);

        Ok(Question {
            prompt: format!("Which is {polarity}: {first} or {second}?"),
            correct: Value::Fraction(correct),
            detail: QuestionDetail::MultipleChoice { first, second, polarity, tier: self.tier },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        if pair(question).is_none() {
            return Verdict::miss();
        }
        match guess {
            Some(g @ Value::Fraction(_)) => Verdict::binary(*g == question.correct),
            _ => Verdict::miss(),
        }
    }

    fn render_question(&self, question: &Question) -> String {
        let options = self.options(question);
        format!(
            "{}\n\n{}\n\nPress A, B, C or D",
            question.prompt,
            option_lines(&options, |_| "")
        )
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let options = self.options(question);
        let correct = question.correct;
        let lines = option_lines(&options, |opt| match opt.value {
            Some(v) if v == correct => "✓",
            Some(v) if Some(&v) == guess => "→",
            _ => "",
        });
        let verdict = self.validate_guess(question, guess);
        format!(
            "{}\n\n{}\n\n{}",
            question.prompt,
            lines,
            if verdict.is_correct { "Correct! ✓" } else { "Incorrect ✗" }
        )
    }

    /// Accepts an option letter or the fraction itself.
    fn parse_guess(&self, question: &Question, text: &str) -> Option<Value> {
        let text = text.trim();
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return self.choose(question, ChoiceKey(c));
        }
        text.parse::<Fraction>().ok().map(Value::Fraction)
    }

    fn locator(&self) -> Option<&dyn Locator> {
        Some(self)
    }

    fn choices(&self) -> Option<&dyn ChoiceBased> {
        Some(self)
    }
}

impl ChoiceBased for AdvancedComparison {
    fn options(&self, question: &Question) -> Vec<ChoiceOption> {
        let Some((first, second)) = pair(question) else {
            return Vec::new();
        };
        vec![
            ChoiceOption { key: 'A', text: first.to_string(), value: Some(Value::Fraction(first)) },
            ChoiceOption { key: 'B', text: second.to_string(), value: Some(Value::Fraction(second)) },
            ChoiceOption { key: 'C', text: EQUAL_LABEL.to_string(), value: None },
            ChoiceOption { key: 'D', text: UNDETERMINED_LABEL.to_string(), value: None },
        ]
    }
}

impl Locator for AdvancedComparison {
    fn locate(&self, question: &Question, pointer: PointerInput) -> Option<Value> {
        let options = self.options(question);
        let slot = option_at(pointer, options.len())?;
        options[slot].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise_engine::models::Polarity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(ex: &AdvancedComparison, first: Fraction, second: Fraction, polarity: Polarity) -> Question {
        Question {
            prompt: format!("Which is {polarity}: {first} or {second}?"),
            correct: Value::Fraction(polarity.select(first, second)),
            detail: QuestionDetail::MultipleChoice { first, second, polarity, tier: ex.tier() },
        }
    }

    #[test]
    fn type_ids_are_distinct_per_tier() {
        let config = DifficultyConfig::default();
        let ids: Vec<String> = Tier::ALL
            .iter()
            .map(|&t| AdvancedComparison::for_tier(&config, t).exercise_type())
            .collect();
        assert_eq!(
            ids,
            [
                "advanced_fraction_comparison_easy",
                "advanced_fraction_comparison_medium",
                "advanced_fraction_comparison_hard",
            ]
        );
    }

    #[test]
    fn unknown_tier_label_falls_back_to_medium() {
        let ex = AdvancedComparison::new(&DifficultyConfig::default(), "nightmare");
        assert_eq!(ex.tier(), Tier::Medium);
        assert_eq!(ex.exercise_type(), "advanced_fraction_comparison_medium");
    }

    #[test]
    fn generation_respects_tier_denominators() {
        let config = DifficultyConfig::default();
        let mut rng = StdRng::seed_from_u64(21);
        for tier in Tier::ALL {
            let ex = AdvancedComparison::for_tier(&config, tier);
            let denoms = &config.params(tier).comparison_denominators;
            for _ in 0..300 {
                let q = ex.generate_question(&mut rng).unwrap();
                let (a, b) = pair(&q).unwrap();
                assert_ne!(a, b);
                for f in [a, b] {
                    assert!(denoms.iter().any(|&d| i64::from(d) % f.denom() == 0), "{f} at {tier}");
                    assert!(f.to_f64() < 1.0);
                }
            }
        }
    }

    #[test]
    fn keys_map_to_options_and_distractors_give_no_guess() {
        let ex = AdvancedComparison::for_tier(&DifficultyConfig::default(), Tier::Easy);
        let q = question(&ex, Fraction::new(2, 3), Fraction::new(3, 4), Polarity::Smaller);
        let choices = ex.choices().unwrap();
        assert_eq!(choices.choose(&q, ChoiceKey('a')), Some(Value::Fraction(Fraction::new(2, 3))));
        assert_eq!(choices.choose(&q, ChoiceKey('B')), Some(Value::Fraction(Fraction::new(3, 4))));
        assert_eq!(choices.choose(&q, ChoiceKey('c')), None);
        assert_eq!(choices.choose(&q, ChoiceKey('D')), None);
        assert_eq!(choices.choose(&q, ChoiceKey('z')), None);
    }

    #[test]
    fn option_rows_are_clickable() {
        let ex = AdvancedComparison::for_tier(&DifficultyConfig::default(), Tier::Hard);
        let q = question(&ex, Fraction::new(5, 7), Fraction::new(7, 10), Polarity::Larger);
        let loc = ex.locator().unwrap();
        assert_eq!(
            loc.locate(&q, PointerInput { x: 300.0, y: 170.0 }),
            Some(Value::Fraction(Fraction::new(5, 7)))
        );
        assert_eq!(
            loc.locate(&q, PointerInput { x: 300.0, y: 220.0 }),
            Some(Value::Fraction(Fraction::new(7, 10)))
        );
        assert_eq!(loc.locate(&q, PointerInput { x: 300.0, y: 270.0 }), None);
        assert_eq!(loc.locate(&q, PointerInput { x: 700.0, y: 170.0 }), None);
    }

    #[test]
    fn accuracy_is_binary_over_all_options() {
        let ex = AdvancedComparison::for_tier(&DifficultyConfig::default(), Tier::Medium);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let q = ex.generate_question(&mut rng).unwrap();
            for opt in ex.options(&q) {
                let v = ex.validate_guess(&q, opt.value.as_ref());
                assert!(v.accuracy == 0.0 || v.accuracy == 1.0);
                assert_eq!(v.is_correct, v.accuracy == 1.0);
            }
        }
    }

    #[test]
    fn letter_and_fraction_text_parse() {
        let ex = AdvancedComparison::for_tier(&DifficultyConfig::default(), Tier::Easy);
        let q = question(&ex, Fraction::new(1, 4), Fraction::new(1, 2), Polarity::Larger);
        assert_eq!(ex.parse_guess(&q, "b"), Some(Value::Fraction(Fraction::new(1, 2))));
        assert_eq!(ex.parse_guess(&q, "C"), None);
        assert_eq!(ex.parse_guess(&q, "1/4"), Some(Value::Fraction(Fraction::new(1, 4))));
        let v = ex.validate_guess(&q, ex.parse_guess(&q, "b").as_ref());
        assert_eq!(v, Verdict::binary(true));
    }
}
