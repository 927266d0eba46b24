use rand::seq::SliceRandom;
use rand::RngCore;

use crate::error::{ConfigError, ExerciseError};
use crate::exercise_engine::{
    config::{DifficultyConfig, TierParams, MAX_CANDIDATE_DENOMINATOR},
    exercise::{CellSelection, Exercise, GridEstimate},
    helpers::{grid_cell_at, grid_picture},
    models::{Cell, Fraction, PointerInput, Question, QuestionDetail, Tier, Value, Verdict},
    scoring,
};

/// Estimate "a/b of c/d" by shading cells of a grid.
///
/// The first fraction spans the width, the second the height; their
/// overlap is the product. The guess is a cell count.
#[derive(Debug, Clone)]
pub struct AreaEstimation {
    tier: Tier,
    params: TierParams,
}

/// Geometry of one generated question.
struct Grid {
    first: Fraction,
    second: Fraction,
    cols: u32,
    rows: u32,
}

impl Grid {
    fn of(question: &Question) -> Option<Grid> {
        match question.detail {
            QuestionDetail::AreaEstimate { first, second, cols, rows } => {
                Some(Grid { first, second, cols, rows })
            }
            _ => None,
        }
    }

    fn total(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// `col < first * cols && row < second * rows`, compared exactly.
    fn in_product(&self, col: u32, row: u32) -> bool {
        let across = i128::from(col) * i128::from(self.first.denom())
            < i128::from(self.first.numer()) * i128::from(self.cols);
        let down = i128::from(row) * i128::from(self.second.denom())
            < i128::from(self.second.numer()) * i128::from(self.rows);
        across && down
    }
}

impl AreaEstimation {
    /// Build for a tier label. Unknown labels fall back to `medium`.
    pub fn new(config: &DifficultyConfig, label: &str) -> Self {
        let (tier, params) = config.resolve(label);
        AreaEstimation { tier, params: params.clone() }
    }

    pub fn for_tier(config: &DifficultyConfig, tier: Tier) -> Self {
        AreaEstimation { tier, params: config.params(tier).clone() }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Cells inside the product region of `question`.
    pub fn correct_region(&self, question: &Question) -> Vec<Cell> {
        let Some(grid) = Grid::of(question) else {
            return Vec::new();
        };
        (0..grid.rows)
            .flat_map(|row| (0..grid.cols).map(move |col| Cell { col, row }))
            .filter(|c| grid.in_product(c.col, c.row))
            .collect()
    }

    fn draw_candidate(&self, rng: &mut dyn RngCore) -> Result<Fraction, ExerciseError> {
        let &(numer, denom) = self.params.fraction_candidates.choose(rng).ok_or_else(|| {
            ConfigError::NoFractionCandidates { tier: self.tier.to_string() }
        })?;
        if numer == 0 || numer >= denom || denom > MAX_CANDIDATE_DENOMINATOR {
            return Err(ConfigError::InvalidCandidate { tier: self.tier.to_string(), numer, denom }.into());
        }
        Ok(Fraction::new(i64::from(numer), i64::from(denom)))
    }
}

impl Exercise for AreaEstimation {
    fn exercise_type(&self) -> String {
        format!("multiplication_{}", self.tier)
    }

    fn generate_question(&self, rng: &mut dyn RngCore) -> Result<Question, ExerciseError> {
        let first = self.draw_candidate(rng)?;
        let second = self.draw_candidate(rng)?;
        let (cols, rows) = (self.params.cols(), self.params.rows());
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { tier: self.tier.to_string(), cols, rows }.into());
        }

        let product = first.product(second).ok_or(ExerciseError::Overflow)?;

        Ok(Question {
            prompt: format!("What is {first} of {second}?"),
            correct: Value::Fraction(product),
            detail: QuestionDetail::AreaEstimate { first, second, cols, rows },
        })
    }

    fn validate_guess(&self, question: &Question, guess: Option<&Value>) -> Verdict {
        let (Some(grid), Value::Fraction(product)) = (Grid::of(question), question.correct) else {
            return Verdict::miss();
        };
        let count = match guess {
            Some(Value::Integer(n)) if *n >= 0 => *n as u64,
            _ => return Verdict::miss(),
        };
        let total = grid.total();
        scoring::area_estimate(count, scoring::correct_cells(product, total), total)
    }

    fn render_question(&self, question: &Question) -> String {
        self.render_selection(question, &CellSelection::new())
    }

    fn render_feedback(&self, question: &Question, guess: Option<&Value>) -> String {
        let (Some(grid), Value::Fraction(product)) = (Grid::of(question), question.correct) else {
            return question.prompt.clone();
        };
        let total = grid.total();
        let correct_cells = scoring::correct_cells(product, total);
        let picture = grid_picture(grid.cols, grid.rows, |col, row| {
            if grid.in_product(col, row) { '#' } else { '.' }
        });

        let mut out = format!("{}\n\n{}\n\n", question.prompt, picture);
        match guess {
            Some(g) => out.push_str(&format!(
                "Your estimate: {g} cells\nCorrect answer: {correct_cells} cells\n\
                 Estimated fraction: {:.3}\nActual fraction: {:.3}",
                g.as_f64() / total as f64,
                product.to_f64()
            )),
            None => out.push_str(&format!(
                "No estimate\nCorrect answer: {correct_cells} cells\nActual fraction: {:.3}",
                product.to_f64()
            )),
        }
        out
    }

    fn parse_guess(&self, _question: &Question, text: &str) -> Option<Value> {
        text.trim().parse::<u32>().ok().map(|n| Value::Integer(i64::from(n)))
    }

    fn grid_estimate(&self) -> Option<&dyn GridEstimate> {
        Some(self)
    }
}

impl GridEstimate for AreaEstimation {
    fn dimensions(&self, question: &Question) -> Option<(u32, u32)> {
        Grid::of(question).map(|g| (g.cols, g.rows))
    }

    fn cell_at(&self, question: &Question, pointer: PointerInput) -> Option<Cell> {
        let grid = Grid::of(question)?;
        grid_cell_at(pointer, grid.cols, grid.rows).map(|(col, row)| Cell { col, row })
    }

    fn render_selection(&self, question: &Question, selection: &CellSelection) -> String {
        let Some(grid) = Grid::of(question) else {
            return question.prompt.clone();
        };
        let picture = grid_picture(grid.cols, grid.rows, |col, row| {
            if selection.contains(Cell { col, row }) { 'o' } else { '.' }
        });
        format!(
            "{}\n{} of the width, {} of the height\n\n{}\n\nCells selected: {}",
            question.prompt,
            grid.first,
            grid.second,
            picture,
            selection.count()
        )
    }
}
