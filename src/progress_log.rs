//! Append-only progress log, one line per attempt:
//!
//! ```text
//! timestamp, exercise_type, thinking_time, distance, accuracy, question, correct, guess
//! 2025-03-01T16:04:11.201934, number_line, 3.52, 0.010, 0.80, Click where you think 0.42 is, 0.42, 0.43
//! ```
//!
//! Field order matters to the report reader. The question may itself
//! contain `", "`, so the reader takes the first five fields from the left
//! and the last two from the right.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::exercise_engine::models::Attempt;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "progress.log";

const SEPARATOR: &str = ", ";

/// Receives completed attempts from a session.
pub trait AttemptSink {
    fn record(&mut self, attempt: &Attempt) -> Result<(), LogError>;
}

/// In-memory sink, handy for tests and dry runs.
impl AttemptSink for Vec<Attempt> {
    fn record(&mut self, attempt: &Attempt) -> Result<(), LogError> {
        self.push(attempt.clone());
        Ok(())
    }
}

/// File-backed log writer.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProgressLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one attempt, stamped with the current local time.
    pub fn append(&self, attempt: &Attempt) -> Result<(), LogError> {
        let line = format_line(attempt, Local::now().naive_local());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        tracing::debug!(path = %self.path.display(), exercise = %attempt.exercise_type, "attempt logged");
        Ok(())
    }
}

impl AttemptSink for ProgressLog {
    fn record(&mut self, attempt: &Attempt) -> Result<(), LogError> {
        self.append(attempt)
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Render one log line, including the trailing newline.
pub fn format_line(attempt: &Attempt, timestamp: NaiveDateTime) -> String {
    let guess = attempt
        .guess
        .map_or_else(|| "None".to_string(), |g| g.to_string());
    format!(
        "{}, {}, {:.2}, {:.3}, {:.2}, {}, {}, {}\n",
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f"),
        attempt.exercise_type,
        attempt.thinking_time.max(0.0),
        attempt.distance(),
        attempt.verdict.accuracy,
        single_line(&attempt.question),
        attempt.correct,
        guess
    )
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub exercise_type: String,
    pub thinking_time: f64,
    pub distance: f64,
    pub accuracy: f64,
    pub question: String,
    pub correct: String,
    pub guess: String,
}

impl LogEntry {
    /// Full credit counts as correct in reports.
    pub fn is_correct(&self) -> bool {
        self.accuracy == 1.0
    }
}

fn number(field: &str, name: &str, line: usize) -> Result<f64, LogError> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LogError::Malformed { line, reason: format!("{name} is not a number: '{field}'") })
}

/// Parse one line. `line` is the 1-based line number used in errors.
pub fn parse_line(text: &str, line: usize) -> Result<LogEntry, LogError> {
    let malformed = |reason: &str| LogError::Malformed { line, reason: reason.to_string() };

    let head: Vec<&str> = text.trim_end().splitn(6, SEPARATOR).collect();
    let [timestamp, exercise_type, thinking_time, distance, accuracy, rest] = head[..] else {
        return Err(malformed("expected 8 comma-separated fields"));
    };
    let tail: Vec<&str> = rest.rsplitn(3, SEPARATOR).collect();
    let [guess, correct, question] = tail[..] else {
        return Err(malformed("expected 8 comma-separated fields"));
    };

    let timestamp = timestamp
        .trim()
        .parse::<NaiveDateTime>()
        .map_err(|e| malformed(&format!("bad timestamp '{timestamp}': {e}")))?;

    Ok(LogEntry {
        timestamp,
        exercise_type: exercise_type.trim().to_string(),
        thinking_time: number(thinking_time, "thinking_time", line)?,
        distance: number(distance, "distance", line)?,
        accuracy: number(accuracy, "accuracy", line)?,
        question: question.trim().to_string(),
        correct: correct.trim().to_string(),
        guess: guess.trim().to_string(),
    })
}

/// Read every well-formed line of a log. Malformed lines are skipped with
/// a warning.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>, LogError> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line, idx + 1) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                skipped += 1;
                tracing::warn!(path = %path.display(), error = %e, "skipping log line");
            }
        }
    }
    tracing::info!(path = %path.display(), entries = entries.len(), skipped, "progress log read");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise_engine::models::{Value, Verdict};
    use chrono::NaiveDate;

    fn attempt(question: &str, guess: Option<Value>, accuracy: f64) -> Attempt {
        Attempt {
            exercise_type: "number_line".into(),
            question: question.into(),
            correct: Value::Real(0.42),
            guess,
            thinking_time: 3.519,
            verdict: Verdict::new(accuracy > 0.0, accuracy),
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_micro_opt(12, 0, 5, 250).unwrap()
    }

    #[test]
    fn line_has_fields_in_order() {
        let line = format_line(&attempt("Click where you think 0.42 is", Some(Value::Real(0.43)), 0.8), noon());
        assert_eq!(
            line,
            "2025-03-01T12:00:05.000250, number_line, 3.52, 0.010, 0.80, \
             Click where you think 0.42 is, 0.42, 0.43\n"
        );
    }

    #[test]
    fn absent_guess_logs_none_and_zero_distance() {
        let line = format_line(&attempt("q", None, 0.0), noon());
        assert!(line.ends_with(", 0.000, 0.00, q, 0.42, None\n"), "{line}");
    }

    #[test]
    fn parse_reads_back_what_format_writes() {
        let line = format_line(&attempt("Pick one, or the other", Some(Value::Real(0.5)), 0.6), noon());
        let entry = parse_line(&line, 1).unwrap();
        assert_eq!(entry.timestamp, noon());
        assert_eq!(entry.exercise_type, "number_line");
        assert_eq!(entry.thinking_time, 3.52);
        assert_eq!(entry.accuracy, 0.6);
        assert_eq!(entry.question, "Pick one, or the other");
        assert_eq!(entry.correct, "0.42");
        assert_eq!(entry.guess, "0.5");
        assert!(!entry.is_correct());
    }

    #[test]
    fn parse_accepts_timestamps_without_fraction() {
        let entry = parse_line("2025-03-01T12:00:05, fraction_comparison, 1.00, 0.000, 1.00, q, 1/2, 1/2", 1).unwrap();
        assert!(entry.is_correct());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_line("hello", 4), Err(LogError::Malformed { line: 4, .. })));
        assert!(parse_line("yesterday, t, 1, 0, 1, q, c, g", 1).is_err());
        assert!(parse_line("2025-03-01T12:00:05, t, fast, 0, 1, q, c, g", 1).is_err());
    }

    #[test]
    fn append_and_read_skip_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.log");
        let mut log = ProgressLog::new(&path);
        log.record(&attempt("first", Some(Value::Real(0.42)), 1.0)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"not a log line\n\n")
            .unwrap();
        log.record(&attempt("second", None, 0.0)).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "first");
        assert_eq!(entries[1].guess, "None");
    }

    #[test]
    fn append_to_missing_directory_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProgressLog::new(dir.path().join("missing").join("progress.log"));
        assert!(matches!(log.append(&attempt("q", None, 0.0)), Err(LogError::Io(_))));
    }
}
