use rand::{Rng, RngCore};

use crate::error::ExerciseError;
use crate::exercise_engine::{
    exercise::{Exercise, Locator},
    helpers::{line_position, ruler, LINE_END_X, LINE_START_X},
    models::{Fraction, PointerInput, Question, QuestionDetail, Value, Verdict},
    scoring,
};

/// Place a fraction or decimal on a number line from 0 to 1.
#[derive(Debug, Clone)]
pub struct NumberLine {
    start_x: f64,
    end_x: f64,
}

impl Default for NumberLine {
    fn default() -> Self {
        NumberLine { start_x: LINE_START_X, end_x: LINE_END_X }
    }
}

impl NumberLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom pixel span for the line.
    pub fn with_span(start_x: f64, end_x: f64) -> Self {
        NumberLine { start_x, end_x }
    }
}

impl Exercise for NumberLine {
    fn exercise_type(&self) -> String {
        "number_line".to_string()
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let (value, display) = if rng.gen_bool(0.5) {
            let numer = rng.gen_range(1..=14i64);
            let denom = rng.gen_range(numer + 1..=15);
            let frac = Fraction::new(numer, denom);
            (frac.to_f64(), frac.to_string())
        } else {
            let raw: f64 = rng.gen_range(0.1..=0.9);
            let value = (raw * 100.0).round() / 100.0;
            (value, value.to_string())
        };

        Ok(Question {
            prompt: format!("Click where you think {display} is"),
            correct: Value::Real(value),
            detail: QuestionDetail::NumberLine { display },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        if !matches!(question.detail, QuestionDetail::NumberLine { .. }) {
            return Verdict::miss();
        }
        match guess {
            Some(g) => scoring::placement(g.as_f64() - question.correct.as_f64()),
            None => Verdict::miss(),
        }
    }

    fn render_question(&self, question: &Question) -> String {
        format!("{}\n\n{}", question.prompt, ruler(&[]))
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let correct = question.correct.as_f64();
        let mut markers = Vec::new();
        if let Some(g) = guess {
            markers.push((g.as_f64(), 'v'));
        }
        markers.push((correct, '*'));

        let mut out = format!("{}\n\n{}\n\n", question.prompt, ruler(&markers));
        match guess {
            Some(g) => {
                let g = g.as_f64();
                out.push_str(&format!(
                    "Your guess: {}\nCorrect value: {}\nDistance: {:.3}",
                    (g * 1000.0).round() / 1000.0,
                    question.correct,
                    (g - correct).abs()
                ));
            }
            None => out.push_str(&format!("No guess\nCorrect value: {}", question.correct)),
        }
        out
    }

    fn parse_guess(&self, _question: &Question, text: &str) -> Option<Value> {
        let text = text.trim();
        if text.contains('/') {
            return text.parse::<Fraction>().ok().map(Value::Fraction);
        }
        text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Value::Real)
    }

    fn locator(&self) -> Option<&dyn Locator> {
        Some(self)
    }
}

impl Locator for NumberLine {
    fn locate(&self, _question: &Question, pointer: PointerInput) -> Option<Value> {
        line_position(pointer.x, self.start_x, self.end_x).map(Value::Real)
    }
}
