//! The `fraction-drill play` command: a line-oriented terminal session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use fraction_drill::exercise_engine::{generator::catalogue_of, Cell, ChoiceKey, ExerciseKind, Verdict};
use fraction_drill::progress_log::{AttemptSink, ProgressLog};
use fraction_drill::session::{PointerOutcome, Session, SessionStats};

use super::{load_config, parse_kind};

const HELP: &str = "\
Type your answer and press Enter. Other commands:
  a-d        pick an option on multiple-choice questions
  click X Y  point at screen position X,Y
  t COL ROW  toggle a grid cell (grid questions)
  done       submit the toggled cells
  next       skip to another question
  help       show this help
  quit       end the session";

#[derive(Debug, PartialEq)]
enum Command {
    Quit,
    Next,
    Help,
    Done,
    Toggle(u32, u32),
    Click(f64, f64),
    Guess(String),
    Empty,
}

impl Command {
    fn parse(line: &str) -> Command {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Command::Empty,
            ["q" | "quit" | "exit"] => Command::Quit,
            ["n" | "next"] => Command::Next,
            ["h" | "help" | "?"] => Command::Help,
            ["done"] => Command::Done,
            ["t" | "toggle", col, row] => match (col.parse(), row.parse()) {
                (Ok(col), Ok(row)) => Command::Toggle(col, row),
                _ => Command::Guess(line.to_string()),
            },
            ["click", x, y] => match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => Command::Click(x, y),
                _ => Command::Guess(line.to_string()),
            },
            _ => Command::Guess(line.to_string()),
        }
    }
}

pub fn execute(
    seed: Option<u64>,
    log_file: PathBuf,
    config: Option<PathBuf>,
    rounds: Option<usize>,
    exercises: Vec<String>,
) -> Result<()> {
    let config = load_config(config)?;
    let kinds = if exercises.is_empty() {
        ExerciseKind::all()
    } else {
        exercises.iter().map(|id| parse_kind(id)).collect::<Result<Vec<_>>>()?
    };
    let session = Session::new(catalogue_of(&kinds, &config), seed, ProgressLog::new(log_file))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(session, rounds, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn show_question<S: AttemptSink>(session: &mut Session<S>, out: &mut impl Write) -> Result<()> {
    session.next_question()?;
    let title = session.current_exercise().map(|e| e.exercise_type()).unwrap_or_default();
    writeln!(out, "\n=== {title} ===")?;
    writeln!(out, "{}", session.render().unwrap_or_default())?;
    Ok(())
}

fn show_verdict<S: AttemptSink>(session: &Session<S>, verdict: Verdict, out: &mut impl Write) -> Result<()> {
    let headline = if verdict.is_correct { "Correct!" } else { "Not quite." };
    writeln!(out, "\n{headline} (accuracy {:.0}%)", verdict.accuracy * 100.0)?;
    writeln!(out, "{}", session.render().unwrap_or_default())?;
    Ok(())
}

/// A single letter typed on a multiple-choice question picks an option.
fn choice_key<S: AttemptSink>(session: &Session<S>, text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            session.current_exercise().is_some_and(|e| e.choices().is_some()).then_some(c)
        }
        _ => None,
    }
}

/// Drive `session` from `input` until quit, end of input, or `rounds`
/// answered questions.
pub fn run<S: AttemptSink, R: BufRead, W: Write>(
    mut session: Session<S>,
    rounds: Option<usize>,
    input: R,
    mut out: W,
) -> Result<SessionStats> {
    writeln!(out, "{HELP}")?;
    if rounds != Some(0) {
        show_question(&mut session, &mut out)?;

        for line in input.lines() {
            let answered: Option<Verdict> = match Command::parse(&line?) {
                Command::Quit => break,
                Command::Empty => None,
                Command::Help => {
                    writeln!(out, "{HELP}")?;
                    None
                }
                Command::Next => {
                    show_question(&mut session, &mut out)?;
                    None
                }
                Command::Toggle(col, row) => {
                    match session.toggle_cell(Cell { col, row }) {
                        Ok(_) => writeln!(out, "{}", session.render().unwrap_or_default())?,
                        Err(e) => writeln!(out, "{e}")?,
                    }
                    None
                }
                Command::Done => match session.submit_selection() {
                    Ok(verdict) => Some(verdict),
                    Err(e) => {
                        writeln!(out, "{e}")?;
                        None
                    }
                },
                Command::Click(x, y) => match session.handle_pointer(x, y) {
                    Ok(PointerOutcome::Submitted(verdict)) => Some(verdict),
                    Ok(PointerOutcome::Toggled(_)) => {
                        writeln!(out, "{}", session.render().unwrap_or_default())?;
                        None
                    }
                    Ok(PointerOutcome::Ignored) => {
                        writeln!(out, "Nothing to pick there.")?;
                        None
                    }
                    Err(e) => {
                        writeln!(out, "{e}")?;
                        None
                    }
                },
                Command::Guess(text) => {
                    let key = choice_key(&session, &text);
                    let outcome = match key {
                        Some(key) => session.handle_key(key),
                        None => session.submit_text(&text),
                    };
                    match outcome {
                        Ok(Some(verdict)) => Some(verdict),
                        Ok(None) if key.is_some_and(|k| ChoiceKey(k).slot().is_some()) => {
                            writeln!(out, "That option is not an answer. Pick one of the values.")?;
                            None
                        }
                        Ok(None) => {
                            writeln!(out, "Could not read '{text}' as an answer. Try again.")?;
                            None
                        }
                        Err(e) => {
                            writeln!(out, "{e}")?;
                            None
                        }
                    }
                }
            };

            if let Some(verdict) = answered {
                show_verdict(&session, verdict, &mut out)?;
                if rounds.is_some_and(|n| session.stats().answered >= n) {
                    break;
                }
                show_question(&mut session, &mut out)?;
            }
        }
    }

    let stats = session.stats();
    writeln!(
        out,
        "\nAnswered {} question(s), {} correct, mean accuracy {:.0}%.",
        stats.answered,
        stats.correct,
        stats.mean_accuracy() * 100.0
    )?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraction_drill::exercise_engine::{catalogue, Attempt, DifficultyConfig, Tier};

    fn session(kinds: &[ExerciseKind]) -> Session<Vec<Attempt>> {
        Session::new(catalogue_of(kinds, &DifficultyConfig::default()), Some(7), Vec::new()).unwrap()
    }

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("  quit "), Command::Quit);
        assert_eq!(Command::parse("t 2 3"), Command::Toggle(2, 3));
        assert_eq!(Command::parse("click 400 300.5"), Command::Click(400.0, 300.5));
        assert_eq!(Command::parse("t x y"), Command::Guess("t x y".into()));
        assert_eq!(Command::parse("3/4"), Command::Guess("3/4".into()));
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn rounds_limit_ends_the_session() {
        let input = "1\n2\n3\n4\n";
        let mut out = Vec::new();
        let stats = run(session(&[ExerciseKind::MultiplicationFact]), Some(2), input.as_bytes(), &mut out).unwrap();
        assert_eq!(stats.answered, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Answered 2 question(s)"));
    }

    #[test]
    fn bad_input_is_reported_not_fatal() {
        let input = "banana\ndone\nt 0 0\nquit\n";
        let mut out = Vec::new();
        let stats = run(session(&[ExerciseKind::MultiplicationFact]), None, input.as_bytes(), &mut out).unwrap();
        assert_eq!(stats.answered, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Could not read 'banana'"));
        assert!(text.contains("does not take grid input"));
    }

    #[test]
    fn digit_answers_on_choice_questions_are_values() {
        let mut s = session(&[ExerciseKind::MultiplicationFactChoice]);
        let correct = s.next_question().unwrap().correct;
        let fresh = session(&[ExerciseKind::MultiplicationFactChoice]);
        // Same seed, same first question; answer it by typing the product.
        let input = format!("{correct}\n");
        let mut out = Vec::new();
        let stats = run(fresh, Some(1), input.as_bytes(), &mut out).unwrap();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.correct, 1);
        assert!(!String::from_utf8(out).unwrap().contains("Could not read"));
    }

    #[test]
    fn distractor_options_keep_the_question_open() {
        let input = "c\nd\nquit\n";
        let mut out = Vec::new();
        let stats = run(
            session(&[ExerciseKind::AdvancedComparison(Tier::Easy)]),
            None,
            input.as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(stats.answered, 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("That option is not an answer").count(), 2);
        assert!(!text.contains("Could not read"));
    }

    #[test]
    fn full_catalogue_session_runs() {
        let s = Session::new(catalogue(&DifficultyConfig::default()), Some(3), Vec::<Attempt>::new()).unwrap();
        let input = "click 400 200\na\n1/2\n5\nt 0 0\ndone\n7\nb\n".repeat(10);
        let mut out = Vec::new();
        let stats = run(s, Some(5), input.as_bytes(), &mut out).unwrap();
        assert!(stats.answered <= 5);
    }
}
