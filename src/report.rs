//! Progress report generator.
//!
//! Reads the progress log, aggregates it per day, week and month, and
//! writes a self-contained `report.html` plus a machine-readable
//! `summary.json` into the output directory.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime};
use html_escape::encode_text;
use serde::Serialize;

use crate::error::ReportError;
use crate::progress_log::{read_entries, LogEntry};

pub const REPORT_FILE: &str = "report.html";
pub const SUMMARY_FILE: &str = "summary.json";

/// Number of most-missed questions listed.
pub const TOP_MISSED: usize = 5;
const QUESTION_DISPLAY_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sums and counts for one group of attempts. Merging is associative and
/// commutative, so groups can be built in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub attempts: u64,
    pub correct: u64,
    pub accuracy_sum: f64,
    pub time_sum: f64,
}

impl GroupStats {
    pub fn of(entry: &LogEntry) -> Self {
        GroupStats {
            attempts: 1,
            correct: u64::from(entry.is_correct()),
            accuracy_sum: entry.accuracy,
            time_sum: entry.thinking_time,
        }
    }

    pub fn add(&mut self, entry: &LogEntry) {
        *self = self.merge(&GroupStats::of(entry));
    }

    pub fn merge(&self, other: &GroupStats) -> GroupStats {
        GroupStats {
            attempts: self.attempts + other.attempts,
            correct: self.correct + other.correct,
            accuracy_sum: self.accuracy_sum + other.accuracy_sum,
            time_sum: self.time_sum + other.time_sum,
        }
    }

    /// Share of fully correct attempts, in percent.
    pub fn correct_percent(&self) -> f64 {
        ratio(self.correct as f64, self.attempts) * 100.0
    }

    pub fn mean_accuracy(&self) -> f64 {
        ratio(self.accuracy_sum, self.attempts)
    }

    pub fn mean_time(&self) -> f64 {
        ratio(self.time_sum, self.attempts)
    }
}

fn ratio(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timescale {
    Daily,
    Weekly,
    Monthly,
}

impl Timescale {
    pub const ALL: [Timescale; 3] = [Timescale::Daily, Timescale::Weekly, Timescale::Monthly];

    pub fn title(self) -> &'static str {
        match self {
            Timescale::Daily => "Daily",
            Timescale::Weekly => "Weekly",
            Timescale::Monthly => "Monthly",
        }
    }

    /// Label of the period containing `date`: the day itself, the Sunday
    /// ending its week, or the last day of its month.
    pub fn period_end(self, date: NaiveDate) -> NaiveDate {
        match self {
            Timescale::Daily => date,
            Timescale::Weekly => {
                let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(to_sunday)).unwrap_or(date)
            }
            Timescale::Monthly => {
                let (year, month) = if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|first| first.pred_opt())
                    .unwrap_or(date)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Excellent,
    GoodJob,
    KeepPracticing,
}

impl Rating {
    pub fn from_percent(percent: f64) -> Rating {
        if percent >= 90.0 {
            Rating::Excellent
        } else if percent >= 70.0 {
            Rating::GoodJob
        } else {
            Rating::KeepPracticing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent!",
            Rating::GoodJob => "Good job!",
            Rating::KeepPracticing => "Keep practicing!",
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Rating::Excellent => "good",
            Rating::GoodJob => "ok",
            Rating::KeepPracticing => "needs-improvement",
        }
    }
}

/// Mean thinking time bands: under 5s, under 15s, slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedRating {
    Fast,
    Medium,
    Slow,
}

impl SpeedRating {
    pub fn from_seconds(seconds: f64) -> SpeedRating {
        if seconds < 5.0 {
            SpeedRating::Fast
        } else if seconds < 15.0 {
            SpeedRating::Medium
        } else {
            SpeedRating::Slow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedRating::Fast => "Fast",
            SpeedRating::Medium => "Medium",
            SpeedRating::Slow => "Slow",
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            SpeedRating::Fast => "fast",
            SpeedRating::Medium => "medium",
            SpeedRating::Slow => "slow",
        }
    }
}

/// All exercise types together within one period. Rated on mean
/// accuracy (partial credit included) and mean thinking time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOverview {
    pub period: NaiveDate,
    pub stats: GroupStats,
    pub accuracy_rating: Rating,
    pub speed_rating: SpeedRating,
}

/// One table row: an exercise type within one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRow {
    pub period: NaiveDate,
    pub exercise_type: String,
    pub stats: GroupStats,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHighlight {
    pub date: NaiveDate,
    /// Percent correct for the best day, mean seconds for the fastest.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedQuestion {
    pub question: String,
    pub count: u64,
}

impl MissedQuestion {
    pub fn suggestion(&self) -> &'static str {
        match self.count {
            n if n >= 3 => "Keep working on this!",
            2 => "Almost got it!",
            _ => "Try one more time!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_attempts: u64,
    pub correct_attempts: u64,
    /// Percent of attempts with full credit.
    pub overall_accuracy: f64,
    pub mean_thinking_time: f64,
    pub days_practiced: usize,
    pub best_day: Option<DayHighlight>,
    pub fastest_day: Option<DayHighlight>,
    pub daily: Vec<PeriodRow>,
    pub weekly: Vec<PeriodRow>,
    pub monthly: Vec<PeriodRow>,
    pub daily_overview: Vec<PeriodOverview>,
    pub weekly_overview: Vec<PeriodOverview>,
    pub monthly_overview: Vec<PeriodOverview>,
    pub most_missed: Vec<MissedQuestion>,
}

impl Summary {
    pub fn rows(&self, timescale: Timescale) -> &[PeriodRow] {
        match timescale {
            Timescale::Daily => &self.daily,
            Timescale::Weekly => &self.weekly,
            Timescale::Monthly => &self.monthly,
        }
    }

    pub fn overview(&self, timescale: Timescale) -> &[PeriodOverview] {
        match timescale {
            Timescale::Daily => &self.daily_overview,
            Timescale::Weekly => &self.weekly_overview,
            Timescale::Monthly => &self.monthly_overview,
        }
    }
}

fn period_rows(entries: &[LogEntry], timescale: Timescale) -> Vec<PeriodRow> {
    let mut groups: BTreeMap<(NaiveDate, &str), GroupStats> = BTreeMap::new();
    for entry in entries {
        let key = (timescale.period_end(entry.timestamp.date()), entry.exercise_type.as_str());
        groups.entry(key).or_default().add(entry);
    }
    groups
        .into_iter()
        .map(|((period, exercise_type), stats)| PeriodRow {
            period,
            exercise_type: exercise_type.to_string(),
            stats,
            rating: Rating::from_percent(stats.correct_percent()),
        })
        .collect()
}

/// Fold the per-exercise rows of each period into one series point.
fn period_overview(rows: &[PeriodRow]) -> Vec<PeriodOverview> {
    let mut periods: BTreeMap<NaiveDate, GroupStats> = BTreeMap::new();
    for row in rows {
        let total = periods.entry(row.period).or_default();
        *total = total.merge(&row.stats);
    }
    periods
        .into_iter()
        .map(|(period, stats)| PeriodOverview {
            period,
            stats,
            accuracy_rating: Rating::from_percent(stats.mean_accuracy() * 100.0),
            speed_rating: SpeedRating::from_seconds(stats.mean_time()),
        })
        .collect()
}

fn most_missed(entries: &[LogEntry]) -> Vec<MissedQuestion> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for entry in entries.iter().filter(|e| !e.is_correct()) {
        *counts.entry(entry.question.as_str()).or_default() += 1;
    }
    let mut missed: Vec<MissedQuestion> = counts
        .into_iter()
        .map(|(question, count)| MissedQuestion { question: question.to_string(), count })
        .collect();
    missed.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.question.cmp(&b.question)));
    missed.truncate(TOP_MISSED);
    missed
}

/// Aggregate parsed log entries.
pub fn build_summary(entries: &[LogEntry]) -> Summary {
    let overall = entries.iter().fold(GroupStats::default(), |acc, e| acc.merge(&GroupStats::of(e)));

    let mut days: BTreeMap<NaiveDate, GroupStats> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.timestamp.date()).or_default().add(entry);
    }

    // Earliest day wins ties.
    let mut best_day: Option<DayHighlight> = None;
    let mut fastest_day: Option<DayHighlight> = None;
    for (&date, stats) in &days {
        let percent = stats.correct_percent();
        if best_day.as_ref().map_or(true, |b| percent > b.value) {
            best_day = Some(DayHighlight { date, value: percent });
        }
        let time = stats.mean_time();
        if fastest_day.as_ref().map_or(true, |f| time < f.value) {
            fastest_day = Some(DayHighlight { date, value: time });
        }
    }

    let (daily, weekly, monthly) = (
        period_rows(entries, Timescale::Daily),
        period_rows(entries, Timescale::Weekly),
        period_rows(entries, Timescale::Monthly),
    );

    Summary {
        total_attempts: overall.attempts,
        correct_attempts: overall.correct,
        overall_accuracy: overall.correct_percent(),
        mean_thinking_time: overall.mean_time(),
        days_practiced: days.len(),
        best_day,
        fastest_day,
        daily_overview: period_overview(&daily),
        weekly_overview: period_overview(&weekly),
        monthly_overview: period_overview(&monthly),
        daily,
        weekly,
        monthly,
        most_missed: most_missed(entries),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// `advanced_fraction_comparison_easy` -> `Advanced Fraction Comparison Easy`.
pub fn display_name(exercise_type: &str) -> String {
    exercise_type
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Questions over 50 characters are cut to 47 plus `...`.
pub fn shorten_question(question: &str) -> String {
    if question.chars().count() > QUESTION_DISPLAY_LIMIT {
        let head: String = question.chars().take(QUESTION_DISPLAY_LIMIT - 3).collect();
        format!("{head}...")
    } else {
        question.to_string()
    }
}

const CSS: &str = r#"
body { font-family: sans-serif; margin: 2em; background-color: #f9f9f9; color: #2d3436; }
h1 { color: #ff6b6b; text-align: center; }
h2 { color: #4ecdc4; border-bottom: 3px solid #ffd166; padding-bottom: 0.3em; }
.dashboard { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 30px 0; }
.metric { background: white; border-radius: 12px; padding: 16px; text-align: center; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }
.metric-value { font-size: 2em; font-weight: bold; }
.metric-label { color: #636e72; }
.highlight { background: #ffeaa7; padding: 15px; border-radius: 10px; margin: 20px 0; }
.missed { background: #fff3cd; padding: 20px; border-radius: 10px; border-left: 5px solid #ffc107; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1em; }
th, td { border: 1px solid #ddd; padding: 10px; text-align: left; }
th { background-color: #4ecdc4; color: white; }
.good { color: #2ecc71; }
.ok { color: #f39c12; }
.needs-improvement { color: #e74c3c; }
.fast { color: #2196f3; }
.medium { color: #3f51b5; }
.slow { color: #9c27b0; }
.date { font-size: 0.9em; color: #95a5a6; }
"#;

fn metric(html: &mut String, value: &str, label: &str) {
    html.push_str(&format!(
        "<div class=\"metric\"><div class=\"metric-value\">{value}</div><div class=\"metric-label\">{label}</div></div>\n"
    ));
}

fn period_section(html: &mut String, timescale: Timescale, overview: &[PeriodOverview], rows: &[PeriodRow]) {
    html.push_str(&format!("<h2>{} Progress</h2>\n", timescale.title()));
    if rows.is_empty() {
        html.push_str("<p>No data for this period.</p>\n");
        return;
    }

    html.push_str("<table class=\"overview\">\n<thead><tr><th>Period ending</th><th>Attempts</th><th>Mean Accuracy</th><th>Accuracy</th><th>Avg Time</th><th>Speed</th></tr></thead>\n<tbody>\n");
    for point in overview {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td class=\"{}\">{}</td><td>{:.1}s</td><td class=\"{}\">{}</td></tr>\n",
            point.period.format("%Y-%m-%d"),
            point.stats.attempts,
            point.stats.mean_accuracy() * 100.0,
            point.accuracy_rating.css_class(),
            point.accuracy_rating.label(),
            point.stats.mean_time(),
            point.speed_rating.css_class(),
            point.speed_rating.label()
        ));
    }
    html.push_str("</tbody></table>\n");

    html.push_str(&format!("<h3>{} Exercise Summary</h3>\n", timescale.title()));
    html.push_str("<table>\n<thead><tr><th>Period ending</th><th>Exercise Type</th><th>Attempts</th><th>Correct</th><th>Accuracy</th><th>Avg Time</th><th>Rating</th></tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}s</td><td class=\"{}\">{}</td></tr>\n",
            row.period.format("%Y-%m-%d"),
            encode_text(&display_name(&row.exercise_type)),
            row.stats.attempts,
            row.stats.correct,
            row.stats.correct_percent(),
            row.stats.mean_time(),
            row.rating.css_class(),
            row.rating.label()
        ));
    }
    html.push_str("</tbody></table>\n");
}

/// Render the summary as a standalone HTML page.
pub fn render_html(summary: &Summary, generated_at: NaiveDateTime) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Math Progress Report</title>\n<style>");
    html.push_str(CSS);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str("<h1>Math Progress Report</h1>\n");
    html.push_str(&format!(
        "<p class=\"date\">Report generated on {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str(&format!(
        "<p>Analyzed <strong>{}</strong> problems from your practice sessions.</p>\n",
        summary.total_attempts
    ));

    // Dashboard
    html.push_str("<section class=\"dashboard\">\n");
    metric(&mut html, &format!("{:.1}%", summary.overall_accuracy), "Overall Accuracy");
    metric(&mut html, &format!("{:.1}s", summary.mean_thinking_time), "Average Time per Problem");
    metric(&mut html, &summary.correct_attempts.to_string(), "Problems Solved Correctly");
    metric(&mut html, &summary.days_practiced.to_string(), "Days Practiced");
    html.push_str("</section>\n");

    html.push_str("<section class=\"highlight\">\n");
    match (&summary.best_day, &summary.fastest_day) {
        (Some(best), Some(fastest)) => {
            html.push_str(&format!("<h3>Best Day: {}</h3>\n", best.date));
            html.push_str(&format!(
                "<p>Your best accuracy was <strong>{:.1}%</strong> on {}.</p>\n",
                best.value, best.date
            ));
            html.push_str(&format!(
                "<p>Your fastest average time was <strong>{:.1} seconds</strong> on {}.</p>\n",
                fastest.value, fastest.date
            ));
        }
        _ => html.push_str("<h3>Best Day: N/A</h3>\n<p>No practice recorded yet.</p>\n"),
    }
    html.push_str("</section>\n");

    for timescale in Timescale::ALL {
        period_section(&mut html, timescale, summary.overview(timescale), summary.rows(timescale));
    }

    html.push_str("<h2>Challenging Problems to Practice</h2>\n");
    if !summary.most_missed.is_empty() {
        html.push_str("<section class=\"missed\">\n<p>These problems were a bit tricky. Try them again to improve!</p>\n");
        html.push_str("<table>\n<thead><tr><th>Problem</th><th>Times Missed</th><th>Suggestion</th></tr></thead>\n<tbody>\n");
        for missed in &summary.most_missed {
            html.push_str(&format!(
                "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td></tr>\n",
                encode_text(&shorten_question(&missed.question)),
                missed.count,
                missed.suggestion()
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    } else if summary.total_attempts > 0 {
        html.push_str("<p>You got <strong>all problems correct</strong>. Keep up the great work!</p>\n");
    } else {
        html.push_str("<p>No data yet.</p>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Files written by [`generate_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub summary: PathBuf,
}

/// Read `log_path` and write `report.html` and `summary.json` into
/// `output_dir`, creating it if needed.
pub fn generate_report(log_path: &Path, output_dir: &Path) -> Result<ReportFiles, ReportError> {
    if !log_path.exists() {
        return Err(ReportError::LogNotFound(log_path.to_path_buf()));
    }
    let entries = read_entries(log_path)?;
    let summary = build_summary(&entries);

    std::fs::create_dir_all(output_dir)?;
    let files = ReportFiles { html: output_dir.join(REPORT_FILE), summary: output_dir.join(SUMMARY_FILE) };
    std::fs::write(&files.html, render_html(&summary, Local::now().naive_local()))?;
    std::fs::write(&files.summary, serde_json::to_string_pretty(&summary)?)?;

    tracing::info!(
        attempts = summary.total_attempts,
        days = summary.days_practiced,
        report = %files.html.display(),
        "report generated"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, exercise_type: &str, accuracy: f64, time: f64, question: &str) -> LogEntry {
        LogEntry {
            timestamp: ts.parse().unwrap(),
            exercise_type: exercise_type.into(),
            thinking_time: time,
            distance: 0.0,
            accuracy,
            question: question.into(),
            correct: "1/2".into(),
            guess: "1/2".into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_entries() -> Vec<LogEntry> {
        vec![
            entry("2025-03-01T09:00:00", "number_line", 1.0, 2.0, "q1"),
            entry("2025-03-01T09:01:00", "number_line", 0.8, 4.0, "q2"),
            entry("2025-03-01T09:02:00", "fraction_comparison", 0.0, 6.0, "q3"),
            entry("2025-03-03T10:00:00", "number_line", 1.0, 1.0, "q4"),
            entry("2025-03-03T10:01:00", "fraction_comparison", 0.0, 1.0, "q3"),
        ]
    }

    #[test]
    fn merge_is_associative_and_commutative() {
        let e = sample_entries();
        let (a, b, c) = (GroupStats::of(&e[0]), GroupStats::of(&e[1]), GroupStats::of(&e[2]));
        assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        assert_eq!(a.merge(&b), b.merge(&a));
        assert_eq!(a.merge(&GroupStats::default()), a);
    }

    #[test]
    fn dashboard_counts_full_credit_only() {
        let s = build_summary(&sample_entries());
        assert_eq!(s.total_attempts, 5);
        assert_eq!(s.correct_attempts, 2);
        assert!((s.overall_accuracy - 40.0).abs() < 1e-9);
        assert!((s.mean_thinking_time - 2.8).abs() < 1e-9);
        assert_eq!(s.days_practiced, 2);
    }

    #[test]
    fn best_and_fastest_days() {
        let s = build_summary(&sample_entries());
        // Day one: 1/3 correct, 4.0s. Day two: 1/2 correct, 1.0s.
        assert_eq!(s.best_day.as_ref().map(|d| d.date), Some(date(2025, 3, 3)));
        assert_eq!(s.fastest_day.as_ref().map(|d| d.date), Some(date(2025, 3, 3)));
        assert!((s.best_day.unwrap().value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ties_go_to_the_earliest_day() {
        let entries = vec![
            entry("2025-03-01T09:00:00", "number_line", 1.0, 2.0, "a"),
            entry("2025-03-02T09:00:00", "number_line", 1.0, 2.0, "b"),
        ];
        let s = build_summary(&entries);
        assert_eq!(s.best_day.unwrap().date, date(2025, 3, 1));
        assert_eq!(s.fastest_day.unwrap().date, date(2025, 3, 1));
    }

    #[test]
    fn period_labels() {
        // 2025-03-05 is a Wednesday.
        assert_eq!(Timescale::Weekly.period_end(date(2025, 3, 5)), date(2025, 3, 9));
        assert_eq!(Timescale::Weekly.period_end(date(2025, 3, 9)), date(2025, 3, 9));
        assert_eq!(Timescale::Monthly.period_end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(Timescale::Monthly.period_end(date(2025, 12, 1)), date(2025, 12, 31));
        assert_eq!(Timescale::Daily.period_end(date(2025, 3, 5)), date(2025, 3, 5));
    }

    #[test]
    fn rows_split_by_period_and_exercise() {
        let s = build_summary(&sample_entries());
        assert_eq!(s.daily.len(), 4);
        // 03-01 (Sat) closes week ending 03-02; 03-03 (Mon) the week ending 03-09.
        assert_eq!(s.weekly.len(), 4);
        assert_eq!(s.monthly.len(), 2);
        let nl = &s.monthly.iter().find(|r| r.exercise_type == "number_line").unwrap();
        assert_eq!(nl.period, date(2025, 3, 31));
        assert_eq!(nl.stats.attempts, 3);
        assert_eq!(nl.stats.correct, 2);
        assert_eq!(nl.rating, Rating::KeepPracticing);
    }

    #[test]
    fn overview_merges_exercise_types_per_period() {
        let s = build_summary(&sample_entries());
        let days: Vec<NaiveDate> = s.daily_overview.iter().map(|p| p.period).collect();
        assert_eq!(days, [date(2025, 3, 1), date(2025, 3, 3)]);

        // Day one: accuracies 1.0, 0.8, 0.0 and times 2, 4, 6.
        let first = &s.daily_overview[0];
        assert_eq!(first.stats.attempts, 3);
        assert!((first.stats.mean_accuracy() - 0.6).abs() < 1e-9);
        assert_eq!(first.accuracy_rating, Rating::KeepPracticing);
        assert_eq!(first.speed_rating, SpeedRating::Fast);

        assert_eq!(s.monthly_overview.len(), 1);
        assert_eq!(s.monthly_overview[0].stats.attempts, 5);
        assert_eq!(s.weekly_overview.len(), 2);
    }

    #[test]
    fn speed_bands() {
        assert_eq!(SpeedRating::from_seconds(4.99), SpeedRating::Fast);
        assert_eq!(SpeedRating::from_seconds(5.0), SpeedRating::Medium);
        assert_eq!(SpeedRating::from_seconds(14.9), SpeedRating::Medium);
        assert_eq!(SpeedRating::from_seconds(15.0), SpeedRating::Slow);
    }

    #[test]
    fn overview_table_precedes_breakdown() {
        let entries = vec![
            entry("2025-03-01T09:00:00", "number_line", 1.0, 20.0, "a"),
            entry("2025-03-01T09:01:00", "number_line", 0.9, 20.0, "b"),
        ];
        let html = render_html(&build_summary(&entries), "2025-03-02T00:00:00".parse().unwrap());
        let overview = html.find("<table class=\"overview\">").unwrap();
        let breakdown = html.find("<h3>Daily Exercise Summary</h3>").unwrap();
        assert!(overview < breakdown);
        assert!(html.contains("<td>95.0%</td><td class=\"good\">Excellent!</td><td>20.0s</td><td class=\"slow\">Slow</td>"));
    }

    #[test]
    fn ratings() {
        assert_eq!(Rating::from_percent(90.0), Rating::Excellent);
        assert_eq!(Rating::from_percent(89.9), Rating::GoodJob);
        assert_eq!(Rating::from_percent(70.0), Rating::GoodJob);
        assert_eq!(Rating::from_percent(69.9), Rating::KeepPracticing);
    }

    #[test]
    fn most_missed_sorted_and_capped() {
        let mut entries = sample_entries();
        for i in 0..6 {
            entries.push(entry("2025-03-04T10:00:00", "number_line", 0.3, 1.0, &format!("m{i}")));
        }
        let s = build_summary(&entries);
        assert_eq!(s.most_missed.len(), TOP_MISSED);
        assert_eq!(s.most_missed[0], MissedQuestion { question: "q3".into(), count: 2 });
        assert_eq!(s.most_missed[0].suggestion(), "Almost got it!");
        assert_eq!(s.most_missed[1].question, "m0");
    }

    #[test]
    fn long_questions_are_shortened() {
        let long = "x".repeat(51);
        let short = shorten_question(&long);
        assert_eq!(short.chars().count(), 50);
        assert!(short.ends_with("..."));
        assert_eq!(shorten_question(&"y".repeat(50)), "y".repeat(50));
    }

    #[test]
    fn names_are_title_cased() {
        assert_eq!(display_name("advanced_fraction_comparison_easy"), "Advanced Fraction Comparison Easy");
        assert_eq!(display_name("number_line"), "Number Line");
    }

    #[test]
    fn html_escapes_question_text() {
        let entries = vec![entry("2025-03-01T09:00:00", "number_line", 0.0, 1.0, "<b>1/2</b> & more")];
        let html = render_html(&build_summary(&entries), "2025-03-02T00:00:00".parse().unwrap());
        assert!(html.contains("&lt;b&gt;1/2&lt;/b&gt; &amp; more"));
        assert!(!html.contains("<b>1/2</b>"));
    }

    #[test]
    fn empty_log_renders_placeholders() {
        let html = render_html(&build_summary(&[]), "2025-03-02T00:00:00".parse().unwrap());
        assert!(html.contains("Best Day: N/A"));
        assert!(html.contains("No data for this period."));
        assert!(html.contains("No data yet."));
    }

    #[test]
    fn generate_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("progress.log");
        std::fs::write(
            &log,
            "2025-03-01T09:00:00.000001, number_line, 2.00, 0.000, 1.00, Click where you think 1/2 is, 1/2, 0.5\n\
             garbage line\n\
             2025-03-01T09:01:00.000001, fraction_comparison, 3.00, 0.000, 0.00, Which is larger: 1/2 or 2/3?, 2/3, 1/2\n",
        )
        .unwrap();
        let out = dir.path().join("reports");
        let files = generate_report(&log, &out).unwrap();

        let html = std::fs::read_to_string(&files.html).unwrap();
        assert!(html.contains("Daily Progress"));
        assert!(html.contains("Which is larger: 1/2 or 2/3?"));

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&files.summary).unwrap()).unwrap();
        assert_eq!(json["total_attempts"], 2);
        assert_eq!(json["correct_attempts"], 1);
        assert_eq!(json["daily_overview"][0]["speed_rating"], "Fast");
    }

    #[test]
    fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_report(&dir.path().join("nope.log"), dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::LogNotFound(_)));
    }
}
