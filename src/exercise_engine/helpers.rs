//! Screen geometry and text-rendering helpers shared by the variants.
//!
//! Pointer geometry follows an 800x400 canvas. Exercises that accept
//! pointer input hit-test against the rectangles defined here, so every
//! front end agrees on where each guess region is. The text helpers draw
//! the same layouts as plain text for the terminal shell.

use crate::exercise_engine::models::{ChoiceOption, Fraction, PointerInput};

/// Axis-aligned rectangle. Left/top edges are inclusive, right/bottom
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn contains(&self, p: PointerInput) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Horizontal span of the number line.
pub const LINE_START_X: f64 = 100.0;
pub const LINE_END_X: f64 = 700.0;

/// The two fraction panels of the visual comparison.
pub const COMPARISON_PANELS: [Rect; 2] = [
    Rect::new(125.0, 150.0, 150.0, 150.0),
    Rect::new(325.0, 150.0, 150.0, 150.0),
];

/// Multiple-choice rows, top to bottom.
pub const OPTION_START_X: f64 = 200.0;
pub const OPTION_START_Y: f64 = 150.0;
pub const OPTION_WIDTH: f64 = 400.0;
pub const OPTION_HEIGHT: f64 = 40.0;
pub const OPTION_SPACING: f64 = 10.0;

/// Estimation grid area.
pub const GRID_AREA: Rect = Rect::new(50.0, 150.0, 400.0, 400.0);

/// Width of the text number line in columns.
pub const RULER_WIDTH: usize = 61;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Map a pointer x coordinate onto `[0, 1]` along a line spanning
/// `start..=end`. Positions outside the span clamp to the nearest end;
/// a non-finite `x` maps nowhere.
pub fn line_position(x: f64, start: f64, end: f64) -> Option<f64> {
    if !x.is_finite() {
        None
    } else if x <= start {
        Some(0.0)
    } else if x >= end {
        Some(1.0)
    } else {
        Some((x - start) / (end - start))
    }
}

/// Rectangle of multiple-choice row `index`.
pub fn option_rect(index: usize) -> Rect {
    let y = OPTION_START_Y + index as f64 * (OPTION_HEIGHT + OPTION_SPACING);
    Rect::new(OPTION_START_X, y, OPTION_WIDTH, OPTION_HEIGHT)
}

/// Index of the option row under the pointer, if any.
pub fn option_at(pointer: PointerInput, count: usize) -> Option<usize> {
    (0..count).find(|&i| option_rect(i).contains(pointer))
}

/// `(col, row)` of the grid cell under the pointer. Cell sizes use
/// integer division, so a thin strip at the right and bottom edges can
/// fall outside every cell.
pub fn grid_cell_at(pointer: PointerInput, cols: u32, rows: u32) -> Option<(u32, u32)> {
    if cols == 0 || rows == 0 || !GRID_AREA.contains(pointer) {
        return None;
    }
    let cell_w = (GRID_AREA.width as u32 / cols).max(1);
    let cell_h = (GRID_AREA.height as u32 / rows).max(1);
    let col = ((pointer.x - GRID_AREA.x) as u32) / cell_w;
    let row = ((pointer.y - GRID_AREA.y) as u32) / cell_h;
    (col < cols && row < rows).then_some((col, row))
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Column of `value` on the text ruler.
fn ruler_column(value: f64) -> usize {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * (RULER_WIDTH - 1) as f64).round() as usize
}

/// Three-line text number line from 0 to 1 with tick marks every tenth.
/// `markers` are drawn above the line; later markers win on collisions.
pub fn ruler(markers: &[(f64, char)]) -> String {
    let mut marks = vec![' '; RULER_WIDTH];
    for &(value, symbol) in markers {
        marks[ruler_column(value)] = symbol;
    }

    let line: String = (0..RULER_WIDTH)
        .map(|i| if i % 6 == 0 { '|' } else { '-' })
        .collect();

    let mut labels = vec![' '; RULER_WIDTH + 2];
    for tick in 0..=10 {
        let label = format!("{:.1}", tick as f64 / 10.0);
        let start = (tick * 6).min(RULER_WIDTH - 1);
        for (offset, ch) in label.chars().enumerate() {
            if let Some(slot) = labels.get_mut(start + offset) {
                *slot = ch;
            }
        }
    }

    let marks: String = marks.into_iter().collect();
    let labels: String = labels.into_iter().collect();
    format!(
        "{}\n{}\n{}",
        marks.trim_end(),
        line,
        labels.trim_end()
    )
}

/// A fraction drawn as `d` segments with `n` filled, e.g. `[##..]`.
pub fn fraction_bar(fraction: Fraction) -> String {
    let denom = fraction.denom().clamp(1, 24);
    let numer = fraction.numer().clamp(0, denom);
    let body: String = (0..denom).map(|i| if i < numer { '#' } else { '.' }).collect();
    format!("[{body}]")
}

/// One option per line, prefixed with an optional marker column.
pub fn option_lines(options: &[ChoiceOption], marker: impl Fn(&ChoiceOption) -> &'static str) -> String {
    options
        .iter()
        .map(|opt| format!("{:>2} {}) {}", marker(opt), opt.key, opt.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text grid, one character per cell chosen by `symbol(col, row)`.
pub fn grid_picture(cols: u32, rows: u32, symbol: impl Fn(u32, u32) -> char) -> String {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| symbol(col, row).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
