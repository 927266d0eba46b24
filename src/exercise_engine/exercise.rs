//! The contract every exercise variant satisfies, plus optional capabilities
//! a coordinator can detect at run time.

use std::collections::BTreeSet;

use rand::RngCore;

use crate::error::ExerciseError;
use crate::exercise_engine::models::{Cell, ChoiceKey, ChoiceOption, PointerInput, Question, Value, Verdict};

/// Core exercise contract.
///
/// An exercise holds only immutable configuration. All per-question state
/// lives in the [`Question`] returned by [`Exercise::generate_question`]
/// and is passed back in for validation and rendering.
pub trait Exercise {
    /// Stable identifier for logging and reports. Distinct for every
    /// variant and configuration (tiered variants embed the tier).
    fn exercise_type(&self) -> String;

    /// Draw a fresh question. Nothing from earlier questions carries over.
    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError>;

    /// Score `guess` against `question`. Never fails: absent or wrongly
    /// shaped guesses, and questions from another variant, score
    /// `(false, 0.0)`.
    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict;

    /// Plain-text view of an unanswered question.
    fn render_question(&self, question: &Question) -> String;

    /// Plain-text view after a guess, showing the correct answer.
    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String;

    /// Turn typed text into a guess of the right shape, or `None`.
    fn parse_guess(&self, question: &Question, text: &str) -> Option<Value>;

    /// Pointer-based input, if supported.
    fn locator(&self) -> Option<&dyn Locator> {
        None
    }

    /// Lettered multiple-choice input, if supported.
    fn choices(&self) -> Option<&dyn ChoiceBased> {
        None
    }

    /// Grid toggling that builds up a cell count, if supported.
    fn grid_estimate(&self) -> Option<&dyn GridEstimate> {
        None
    }
}

/// Maps a raw pointer position to a typed guess.
pub trait Locator {
    /// `None` when the pointer is outside every guess region.
    fn locate(&self, question: &Question, pointer: PointerInput) -> Option<Value>;
}

/// Multiple-choice questions answered with keys A-D.
pub trait ChoiceBased {
    fn options(&self, question: &Question) -> Vec<ChoiceOption>;

    /// Value behind `key`. `None` for unknown keys and for distractor slots.
    fn choose(&self, question: &Question, key: ChoiceKey) -> Option<Value> {
        let slot = key.slot()?;
        self.options(question).get(slot).and_then(|opt| opt.value)
    }
}

/// Grid exercises where the guess is a count of toggled cells.
pub trait GridEstimate {
    /// `(cols, rows)` of the question's grid.
    fn dimensions(&self, question: &Question) -> Option<(u32, u32)>;

    /// The cell under a pointer, or `None` outside the grid.
    fn cell_at(&self, question: &Question, pointer: PointerInput) -> Option<Cell>;

    /// Text view of the grid with the current selection marked.
    fn render_selection(&self, question: &Question, selection: &CellSelection) -> String;
}

/// Cells toggled so far for a grid question. The guess is the count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSelection {
    cells: BTreeSet<Cell>,
}

impl CellSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one cell and return the new running count.
    pub fn toggle(&mut self, cell: Cell) -> usize {
        if !self.cells.remove(&cell) {
            self.cells.insert(cell);
        }
        self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// The selection as a guess value.
    pub fn as_guess(&self) -> Value {
        Value::Integer(self.cells.len() as i64)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
