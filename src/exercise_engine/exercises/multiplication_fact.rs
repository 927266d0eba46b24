//! Multiplication facts in two forms that score differently:
//! free entry with partial credit for near misses, and four-way multiple
//! choice with binary scoring.

use rand::{Rng, RngCore};

use crate::error::ExerciseError;
use crate::exercise_engine::{
    config::MAX_FACTOR_LIMIT,
    exercise::{ChoiceBased, Exercise, Locator},
    helpers::{option_at, option_lines},
    models::{ChoiceKey, ChoiceOption, PointerInput, Question, QuestionDetail, Value, Verdict},
    sampling, scoring,
};

fn clamp_factor(max_number: u32) -> u32 {
    max_number.clamp(1, MAX_FACTOR_LIMIT)
}

/// Type id suffix for a non-default operand bound.
fn type_id(base: &str, max_number: u32) -> String {
    if max_number == MAX_FACTOR_LIMIT {
        base.to_string()
    } else {
        format!("{base}_upto_{max_number}")
    }
}

fn draw_operands(rng: &mut dyn RngCore, max_number: u32) -> (u32, u32) {
    (rng.gen_range(1..=max_number), rng.gen_range(1..=max_number))
}

fn fact_prompt(a: u32, b: u32) -> String {
    format!("What is {a} × {b} ?")
}

fn parse_integer(text: &str) -> Option<Value> {
    text.trim().parse::<i64>().ok().map(Value::Integer)
}

// ---------------------------------------------------------------------------
// Form A: free entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MultiplicationFact {
    max_number: u32,
}

impl Default for MultiplicationFact {
    fn default() -> Self {
        MultiplicationFact::new(MAX_FACTOR_LIMIT)
    }
}

impl MultiplicationFact {
    /// Operands are drawn from `1..=max_number`, clamped to `1..=12`.
    pub fn new(max_number: u32) -> Self {
        MultiplicationFact { max_number: clamp_factor(max_number) }
    }

    pub fn max_number(&self) -> u32 {
        self.max_number
    }
}

impl Exercise for MultiplicationFact {
    fn exercise_type(&self) -> String {
        type_id("multiplication_fact", self.max_number)
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let (a, b) = draw_operands(rng, self.max_number);
        Ok(Question {
            prompt: fact_prompt(a, b),
            correct: Value::Integer(i64::from(a) * i64::from(b)),
            detail: QuestionDetail::Fact { a, b },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        match (&question.detail, question.correct, guess) {
            (QuestionDetail::Fact { .. }, Value::Integer(correct), Some(Value::Integer(g))) => {
                scoring::fact(*g, correct)
            }
            _ => Verdict::miss(),
        }
    }

    fn render_question(&self, question: &Question) -> String {
        match question.detail {
            QuestionDetail::Fact { a, b } => format!("{}\n({a} groups of {b})", question.prompt),
            _ => question.prompt.clone(),
        }
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let guess_text = guess.map_or_else(|| "none".to_string(), |g| g.to_string());
        let mut out = format!(
            "{}\n\nYour answer: {guess_text}\nCorrect answer: {}",
            question.prompt, question.correct
        );
        if let QuestionDetail::Fact { a, b } = question.detail {
            out.push_str(&format!("\n{a} × {b} = {}", question.correct));
        }
        out
    }

    fn parse_guess(&self, _question: &Question, text: &str) -> Option<Value> {
        parse_integer(text)
    }
}

// ---------------------------------------------------------------------------
// Form B: multiple choice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MultiplicationFactChoice {
    max_number: u32,
}

impl Default for MultiplicationFactChoice {
    fn default() -> Self {
        MultiplicationFactChoice::new(MAX_FACTOR_LIMIT)
    }
}

impl MultiplicationFactChoice {
    pub fn new(max_number: u32) -> Self {
        MultiplicationFactChoice { max_number: clamp_factor(max_number) }
    }
}

impl Exercise for MultiplicationFactChoice {
    fn exercise_type(&self) -> String {
        type_id("multiplication_fact_choice", self.max_number)
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let (a, b) = draw_operands(rng, self.max_number);
        let correct = i64::from(a) * i64::from(b);
        let options = sampling::choice_options(rng, correct);
        Ok(Question {
            prompt: fact_prompt(a, b),
            correct: Value::Integer(correct),
            detail: QuestionDetail::FactChoice { a, b, options },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        match (&question.detail, guess) {
            (QuestionDetail::FactChoice { .. }, Some(g @ Value::Integer(_))) => {
                Verdict::binary(*g == question.correct)
            }
            _ => Verdict::miss(),
        }
    }

    fn render_question(&self, question: &Question) -> String {
        format!(
            "{}\n\n{}\n\nPress A, B, C or D",
            question.prompt,
            option_lines(&self.options(question), |_| "")
        )
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let correct = question.correct;
        let lines = option_lines(&self.options(question), |opt| match opt.value {
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

    /// Accepts an option letter or the number itself.
    fn parse_guess(&self, question: &Question, text: &str) -> Option<Value> {
        let text = text.trim();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => self.choose(question, ChoiceKey(c)),
            _ => parse_integer(text),
        }
    }

    fn locator(&self) -> Option<&dyn Locator> {
        Some(self)
    }

    fn choices(&self) -> Option<&dyn ChoiceBased> {
        Some(self)
    }
}

impl ChoiceBased for MultiplicationFactChoice {
    fn options(&self, question: &Question) -> Vec<ChoiceOption> {
        let QuestionDetail::FactChoice { options, .. } = question.detail else {
            return Vec::new();
        };
        options
            .iter()
            .zip(['A', 'B', 'C', 'D'])
            .map(|(&n, key)| ChoiceOption { key, text: n.to_string(), value: Some(Value::Integer(n)) })
            .collect()
    }
}

impl Locator for MultiplicationFactChoice {
    fn locate(&self, question: &Question, pointer: PointerInput) -> Option<Value> {
        let options = self.options(question);
        let slot = option_at(pointer, options.len())?;
        options[slot].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn six_times_seven() -> Question {
        Question {
            prompt: fact_prompt(6, 7),
            correct: Value::Integer(42),
            detail: QuestionDetail::Fact { a: 6, b: 7 },
        }
    }

    #[test]
    fn free_entry_scores_near_misses() {
        let ex = MultiplicationFact::default();
        let q = six_times_seven();
        let score = |n: i64| ex.validate_guess(&q, Some(&Value::Integer(n)));
        assert_eq!(score(42), Verdict::new(true, 1.0));
        assert_eq!(score(41), Verdict::new(true, 0.7));
        assert_eq!(score(43), Verdict::new(true, 0.7));
        assert_eq!(score(40), Verdict::new(true, 0.4));
        assert_eq!(score(39), Verdict::miss());
        assert_eq!(score(45), Verdict::miss());
    }

    #[test]
    fn free_entry_rejects_non_integers() {
        let ex = MultiplicationFact::default();
        let q = six_times_seven();
        assert_eq!(ex.validate_guess(&q, Some(&Value::Real(42.0))), Verdict::miss());
        assert_eq!(ex.validate_guess(&q, None), Verdict::miss());
        assert_eq!(ex.parse_guess(&q, "4 2"), None);
    }

    #[test]
    fn operand_bound_is_clamped() {
        assert_eq!(MultiplicationFact::new(0).max_number(), 1);
        assert_eq!(MultiplicationFact::new(50).max_number(), 12);
        let ex = MultiplicationFact::new(5);
        assert_eq!(ex.exercise_type(), "multiplication_fact_upto_5");
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let q = ex.generate_question(&mut rng).unwrap();
            let QuestionDetail::Fact { a, b } = q.detail else { panic!("wrong detail") };
            assert!((1..=5).contains(&a) && (1..=5).contains(&b));
            assert_eq!(q.correct, Value::Integer(i64::from(a * b)));
        }
    }

    #[test]
    fn choice_form_has_four_distinct_options_including_answer() {
        let ex = MultiplicationFactChoice::default();
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let q = ex.generate_question(&mut rng).unwrap();
            let opts = ex.options(&q);
            assert_eq!(opts.len(), 4);
            assert_eq!(opts.iter().filter(|o| o.value == Some(q.correct)).count(), 1);
        }
    }

    #[test]
    fn choice_form_is_binary() {
        let ex = MultiplicationFactChoice::default();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let q = ex.generate_question(&mut rng).unwrap();
            let Value::Integer(correct) = q.correct else { panic!("not an integer") };
            let near = ex.validate_guess(&q, Some(&Value::Integer(correct + 1)));
            assert_eq!(near, Verdict::miss());
            for key in ['A', 'B', 'C', 'D'] {
                let v = ex.validate_guess(&q, ex.choose(&q, ChoiceKey(key)).as_ref());
                assert!(v.accuracy == 0.0 || v.accuracy == 1.0);
            }
        }
    }

    #[test]
    fn forms_have_distinct_type_ids() {
        assert_ne!(
            MultiplicationFact::default().exercise_type(),
            MultiplicationFactChoice::default().exercise_type()
        );
    }

    #[test]
    fn choice_letters_and_numbers_parse() {
        let ex = MultiplicationFactChoice::default();
        let q = Question {
            prompt: fact_prompt(3, 4),
            correct: Value::Integer(12),
            detail: QuestionDetail::FactChoice { a: 3, b: 4, options: [14, 12, 9, 11] },
        };
        assert_eq!(ex.parse_guess(&q, "b"), Some(Value::Integer(12)));
        assert_eq!(ex.parse_guess(&q, "9"), Some(Value::Integer(9)));
        assert_eq!(
            ex.locator().unwrap().locate(&q, PointerInput { x: 250.0, y: 310.0 }),
            Some(Value::Integer(11))
        );
    }
}
