//! Game coordinator.
//!
//! A [`Session`] picks an exercise at random, generates a question, times
//! the learner, validates the guess and hands the finished [`Attempt`] to
//! an [`AttemptSink`]. Each question moves one way, from
//! [`QuestionState::Unanswered`] to [`QuestionState::Answered`].

use std::time::Instant;

use rand::rngs::StdRng;

use crate::error::SessionError;
use crate::exercise_engine::{
    exercise::{CellSelection, Exercise},
    generator::{make_rng, pick_index},
    models::{Attempt, Cell, ChoiceKey, PointerInput, Question, Value, Verdict},
};
use crate::progress_log::AttemptSink;

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionState {
    Unanswered,
    Answered { guess: Option<Value>, verdict: Verdict },
}

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// A grid cell was toggled; carries the new selection count.
    Toggled(usize),
    Submitted(Verdict),
    /// Outside every input region.
    Ignored,
}

/// Running totals for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub answered: usize,
    pub correct: usize,
    pub accuracy_sum: f64,
}

impl SessionStats {
    pub fn mean_accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.accuracy_sum / self.answered as f64
        }
    }
}

struct Round {
    exercise: usize,
    question: Question,
    shown_at: Instant,
    state: QuestionState,
    selection: CellSelection,
}

pub struct Session<S: AttemptSink> {
    exercises: Vec<Box<dyn Exercise>>,
    rng: StdRng,
    sink: S,
    round: Option<Round>,
    stats: SessionStats,
}

impl<S: AttemptSink> Session<S> {
    /// `seed` makes the question sequence reproducible.
    pub fn new(exercises: Vec<Box<dyn Exercise>>, seed: Option<u64>, sink: S) -> Result<Self, SessionError> {
        if exercises.is_empty() {
            return Err(SessionError::NoExercises);
        }
        Ok(Session { exercises, rng: make_rng(seed), sink, round: None, stats: SessionStats::default() })
    }

    /// Replace the current question with a fresh one from a random exercise.
    pub fn next_question(&mut self) -> Result<&Question, SessionError> {
        let index = pick_index(self.exercises.len(), &mut self.rng).ok_or(SessionError::NoExercises)?;
        let exercise = &self.exercises[index];
        let question = exercise.generate_question(&mut self.rng)?;
        tracing::debug!(exercise = %exercise.exercise_type(), prompt = %question.prompt, "new question");

        let round = self.round.insert(Round {
            exercise: index,
            question,
            shown_at: Instant::now(),
            state: QuestionState::Unanswered,
            selection: CellSelection::new(),
        });
        Ok(&round.question)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.round.as_ref().map(|r| &r.question)
    }

    pub fn current_exercise(&self) -> Option<&dyn Exercise> {
        self.round.as_ref().map(|r| self.exercises[r.exercise].as_ref())
    }

    pub fn state(&self) -> Option<&QuestionState> {
        self.round.as_ref().map(|r| &r.state)
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.state(), Some(QuestionState::Answered { .. }))
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn unanswered(&self) -> Result<&Round, SessionError> {
        let round = self.round.as_ref().ok_or(SessionError::NoActiveQuestion)?;
        match round.state {
            QuestionState::Unanswered => Ok(round),
            QuestionState::Answered { .. } => Err(SessionError::AlreadyAnswered),
        }
    }

    /// Validate `guess`, record the attempt and close the question.
    ///
    /// A sink failure is logged and does not fail the submission.
    pub fn submit(&mut self, guess: Option<Value>) -> Result<Verdict, SessionError> {
        let round = self.unanswered()?;
        let exercise = &self.exercises[round.exercise];
        let verdict = exercise.validate_guess(&round.question, guess.as_ref());
        let attempt = Attempt {
            exercise_type: exercise.exercise_type(),
            question: round.question.prompt.clone(),
            correct: round.question.correct,
            guess,
            thinking_time: round.shown_at.elapsed().as_secs_f64(),
            verdict,
        };

        if let Err(e) = self.sink.record(&attempt) {
            tracing::error!(error = %e, exercise = %attempt.exercise_type, "failed to record attempt");
        }
        tracing::info!(
            exercise = %attempt.exercise_type,
            correct = verdict.is_correct,
            accuracy = verdict.accuracy,
            thinking_time = attempt.thinking_time,
            "question answered"
        );

        self.stats.answered += 1;
        self.stats.accuracy_sum += verdict.accuracy;
        if verdict.is_correct {
            self.stats.correct += 1;
        }
        if let Some(round) = self.round.as_mut() {
            round.state = QuestionState::Answered { guess, verdict };
        }
        Ok(verdict)
    }

    /// Parse typed text and submit it. Text that is not a guess for the
    /// current question submits nothing and returns `Ok(None)`.
    pub fn submit_text(&mut self, text: &str) -> Result<Option<Verdict>, SessionError> {
        let round = self.unanswered()?;
        let guess = self.exercises[round.exercise].parse_guess(&round.question, text);
        match guess {
            Some(g) => self.submit(Some(g)).map(Some),
            None => Ok(None),
        }
    }

    /// Route a pointer event: grid exercises toggle the cell under the
    /// pointer, locator exercises submit the located guess.
    pub fn handle_pointer(&mut self, x: f64, y: f64) -> Result<PointerOutcome, SessionError> {
        let pointer = PointerInput { x, y };
        let round = self.unanswered()?;
        let exercise = self.exercises[round.exercise].as_ref();

        if let Some(grid) = exercise.grid_estimate() {
            return match grid.cell_at(&round.question, pointer) {
                Some(cell) => self.toggle_cell(cell).map(PointerOutcome::Toggled),
                None => Ok(PointerOutcome::Ignored),
            };
        }
        let located = exercise.locator().and_then(|l| l.locate(&round.question, pointer));
        match located {
            Some(guess) => self.submit(Some(guess)).map(PointerOutcome::Submitted),
            None => Ok(PointerOutcome::Ignored),
        }
    }

    /// Route a key press to a choice-based exercise. Keys without a value
    /// behind them submit nothing.
    pub fn handle_key(&mut self, key: char) -> Result<Option<Verdict>, SessionError> {
        let round = self.unanswered()?;
        let chosen = self.exercises[round.exercise]
            .choices()
            .and_then(|c| c.choose(&round.question, ChoiceKey(key)));
        match chosen {
            Some(guess) => self.submit(Some(guess)).map(Some),
            None => Ok(None),
        }
    }

    /// Flip one grid cell and return the running count. Cells outside the
    /// grid leave the selection unchanged.
    pub fn toggle_cell(&mut self, cell: Cell) -> Result<usize, SessionError> {
        let round = self.unanswered()?;
        let grid = self.exercises[round.exercise]
            .grid_estimate()
            .ok_or(SessionError::NotAGridExercise)?;
        let in_bounds = grid
            .dimensions(&round.question)
            .is_some_and(|(cols, rows)| cell.col < cols && cell.row < rows);

        let round = self.round.as_mut().ok_or(SessionError::NoActiveQuestion)?;
        if !in_bounds {
            tracing::debug!(?cell, "cell outside grid ignored");
            return Ok(round.selection.count());
        }
        Ok(round.selection.toggle(cell))
    }

    /// Submit the current cell selection as the guess.
    pub fn submit_selection(&mut self) -> Result<Verdict, SessionError> {
        let round = self.unanswered()?;
        if self.exercises[round.exercise].grid_estimate().is_none() {
            return Err(SessionError::NotAGridExercise);
        }
        let guess = round.selection.as_guess();
        self.submit(Some(guess))
    }

    /// Text view of the current question, or of its feedback once answered.
    pub fn render(&self) -> Option<String> {
        let round = self.round.as_ref()?;
        let exercise = self.exercises[round.exercise].as_ref();
        Some(match &round.state {
            QuestionState::Unanswered => match exercise.grid_estimate() {
                Some(grid) => grid.render_selection(&round.question, &round.selection),
                None => exercise.render_question(&round.question),
            },
            QuestionState::Answered { guess, .. } => exercise.render_feedback(&round.question, guess.as_ref()),
        })
    }
}
