//! ASCII report rendering for statistics and advice.
//!
//! Pure string builders used by the CLI; no I/O here.

use chrono::{DateTime, Days, Local, NaiveDate};

use crate::advisor::FocusAdvice;
use crate::session::SessionRecord;
use crate::stats::HistoryStats;

const RULE_WIDTH: usize = 50;
const BAR_WIDTH: usize = 30;
/// Upper bound on chartable days; one row is allocated per day.
const MAX_CHART_DAYS: u32 = 365;

/// Render history statistics as an aligned label/value table.
pub fn render_summary(stats: &HistoryStats) -> String {
    let most_productive = if stats.most_productive_day.is_empty() {
        "-".to_string()
    } else {
        stats.most_productive_day.clone()
    };

    let rows = [
        ("Completed sessions", stats.completed_sessions.to_string()),
        ("Abandoned sessions", stats.gave_up_sessions.to_string()),
        ("Total minutes", stats.total_minutes.to_string()),
        (
            "Completion rate",
            format!("{:.0}%", stats.completion_rate * 100.0),
        ),
        ("Current streak", format_days(stats.current_streak)),
        ("Best streak", format_days(stats.best_streak)),
        ("Weekly minutes", stats.weekly_minutes.to_string()),
        ("Monthly minutes", stats.monthly_minutes.to_string()),
        ("Average session", format!("{} min", stats.average_duration)),
        (
            "Longest session",
            format!("{} min", stats.longest_session_minutes),
        ),
        ("Most productive day", most_productive),
    ];

    let mut output = String::from("\nSession Summary:\n");
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    for (label, value) in rows {
        output.push_str(&format!("{label:<24}{value}\n"));
    }
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    output
}

/// Render a focus recommendation with its rationale.
pub fn render_advice(advice: &FocusAdvice) -> String {
    let conf_indicator = if advice.confidence >= 0.6 {
        "●"
    } else if advice.confidence >= 0.3 {
        "○"
    } else {
        "·"
    };

    let mut output = String::from("\nFocus Advice:\n");
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!("{:<24}{} min\n", "Focus block", advice.focus_minutes));
    output.push_str(&format!("{:<24}{} min\n", "Break", advice.break_minutes));
    output.push_str(&format!(
        "{:<24}{} {:.0}%\n",
        "Confidence",
        conf_indicator,
        advice.confidence * 100.0
    ));
    output.push('\n');
    output.push_str(&advice.rationale);
    output.push('\n');
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    output
}

/// Render completed minutes per day over the trailing `days` days,
/// capped at [`MAX_CHART_DAYS`].
pub fn render_daily_chart(sessions: &[SessionRecord], days: u32, now: DateTime<Local>) -> String {
    let days = days.min(MAX_CHART_DAYS);
    let today = now.date_naive();
    let mut day_minutes: Vec<(NaiveDate, u64)> = Vec::with_capacity(days as usize);
    for offset in (0..days).rev() {
        if let Some(day) = today.checked_sub_days(Days::new(offset as u64)) {
            day_minutes.push((day, 0));
        }
    }

    for session in sessions.iter().filter(|s| s.completed) {
        let day = session.local_day();
        if let Some(entry) = day_minutes.iter_mut().find(|(d, _)| *d == day) {
            entry.1 += session.duration as u64;
        }
    }

    let max = day_minutes.iter().map(|(_, m)| *m).max().unwrap_or(0);

    let mut output = format!("\nDaily Minutes (last {days} days):\n");
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    for (day, minutes) in &day_minutes {
        let bar_length = if max == 0 {
            0
        } else {
            ((*minutes as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
        };
        let bar = "█".repeat(bar_length);
        let empty = " ".repeat(BAR_WIDTH - bar_length);
        output.push_str(&format!(
            "{} {}{} {} min\n",
            day.format("%m-%d"),
            bar,
            empty,
            minutes
        ));
    }
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    output
}

fn format_days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AudioSettings;
    use crate::stats::HistoryAnalyzer;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Local> {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        Local
            .from_local_datetime(&day.and_hms_opt(18, 0, 0).unwrap())
            .single()
            .unwrap()
    }

    #[test]
    fn summary_lists_all_rows() {
        let stats = HistoryAnalyzer::new().compute_at(&[], anchor());
        let report = render_summary(&stats);
        assert!(report.contains("Completed sessions"));
        assert!(report.contains("Completion rate"));
        assert!(report.contains("0%"));
        assert!(report
            .lines()
            .any(|l| l.starts_with("Most productive day") && l.ends_with('-')));
    }

    #[test]
    fn summary_pluralizes_streak_days() {
        let mut stats = HistoryAnalyzer::new().compute_at(&[], anchor());
        stats.current_streak = 1;
        stats.best_streak = 4;
        let report = render_summary(&stats);
        assert!(report.contains("1 day\n"));
        assert!(report.contains("4 days\n"));
    }

    #[test]
    fn advice_shows_minutes_and_rationale() {
        let advice = crate::advisor::FocusAdvisor::new().advise(&[]);
        let report = render_advice(&advice);
        assert!(report.contains("25 min"));
        assert!(report.contains("5 min"));
        assert!(report.contains("Default Pomodoro-friendly cadence."));
    }

    #[test]
    fn daily_chart_has_one_row_per_day() {
        let now = anchor();
        let ts = now.timestamp_millis();
        let sessions = vec![SessionRecord::completed(ts, 20, AudioSettings::default())];
        let chart = render_daily_chart(&sessions, 7, now);

        let bar_rows = chart
            .lines()
            .filter(|l| l.contains(" min"))
            .count();
        assert_eq!(bar_rows, 7);
        assert!(chart.contains("█"));
        assert!(chart.contains("20 min"));
    }

    #[test]
    fn daily_chart_without_completed_sessions_is_flat() {
        let chart = render_daily_chart(&[], 3, anchor());
        assert!(!chart.contains("█"));
        assert!(chart.contains("0 min"));
    }

    #[test]
    fn daily_chart_caps_requested_days() {
        let chart = render_daily_chart(&[], u32::MAX, anchor());
        assert!(chart.contains("(last 365 days)"));
        let bar_rows = chart.lines().filter(|l| l.contains(" min")).count();
        assert_eq!(bar_rows, 365);
    }
}
