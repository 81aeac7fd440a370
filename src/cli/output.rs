//! Console formatting. Everything returns strings so that handlers decide where it goes.

use ansi_term::Colour::{Green, Red, Yellow};
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    store::entities::{DailyPlan, StatusFlags, Task},
    tracker::{
        reminder::Reminder,
        status::{HabitStreaks, StatusReport},
        streak::Streak,
        summary::WeeklySummary,
    },
};

pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

pub fn success(message: &str) -> String {
    Green.paint(message).to_string()
}

pub fn warning(message: &str) -> String {
    Yellow.paint(message).to_string()
}

pub fn format_streak(streak: Streak) -> String {
    let mut text = format!("Current streak: {}", plural(streak.days as usize, "day"));
    if streak.missed {
        text.push('\n');
        text += &Red.paint("You missed a day! Your streak has been reset.").to_string();
    }
    text
}

pub fn format_task(task: &Task) -> String {
    let mark = if task.done { "x" } else { " " };
    match &task.tag {
        Some(tag) => format!("[{mark}] {} #{tag}", task.description),
        None => format!("[{mark}] {}", task.description),
    }
}

pub fn format_plan(plan: &DailyPlan) -> String {
    let mut text = format!("Plan for {}:", plan.date.format("%A, %d %B %Y"));
    if plan.tasks.is_empty() {
        text += "\n  (no tasks)";
    }
    for task in &plan.tasks {
        text.push_str("\n  ");
        text += &format_task(task);
    }
    text
}

pub fn format_summary(summary: &WeeklySummary) -> String {
    let mut lines = vec!["Weekly summary:".to_string()];
    for day in &summary.days {
        let weekday = day.date.format("%a");
        let line = match day.completion() {
            None => format!("{weekday}: {}", Red.paint("no plan")),
            Some(completion) => {
                let counts = format!("{}/{} ({completion})", day.done, day.total);
                if day.is_complete() {
                    format!("{weekday}: {}", Green.paint(counts))
                } else {
                    format!("{weekday}: {}", Yellow.paint(counts))
                }
            }
        };
        lines.push(line);
    }
    lines.push(format!(
        "{} this week.",
        plural(summary.active_days, "active day")
    ));
    lines.join("\n")
}

fn format_flags(date: NaiveDate, flags: Option<StatusFlags>) -> String {
    match flags {
        Some(StatusFlags { journaled, planned }) => {
            format!("{date} - Journaled: {journaled}, Planned: {planned}")
        }
        None => format!("{date} - No data"),
    }
}

pub fn format_status_report(report: &StatusReport) -> String {
    let mut lines = vec!["Weekly report (last 7 days):".to_string()];
    lines.extend(report.days.iter().map(|(date, flags)| format_flags(*date, *flags)));
    if report.tracked_days == 0 {
        lines.push(warning("No activity tracked this week."));
        return lines.join("\n");
    }
    lines.push(format!(
        "Journaled {} out of {} days",
        report.journaled_days, report.tracked_days
    ));
    lines.push(format!(
        "Planned {} out of {} days",
        report.planned_days, report.tracked_days
    ));
    lines.join("\n")
}

pub fn format_habit_streaks(streaks: HabitStreaks) -> String {
    format!(
        "Journaled {} in a row\nPlanned {} in a row",
        plural(streaks.journaled as usize, "day"),
        plural(streaks.planned as usize, "day"),
    )
}

pub fn format_reminders(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return success("No reminders or warnings. You're on track!");
    }
    let mut lines = vec!["Reminders & warnings:".to_string()];
    lines.extend(reminders.iter().map(|v| warning(&v.to_string())));
    lines.join("\n")
}

pub const COMMANDS: [(&str, &str); 11] = [
    ("start", "Set up or reset your session"),
    ("plan", "View your upcoming plans"),
    ("plan today", "Add today's top 3 priorities"),
    ("plan show", "View the plan of another day"),
    ("checkin", "Mark progress for today's tasks"),
    ("streak", "View your streak status"),
    ("summary week", "Weekly performance snapshot"),
    ("journal", "Log your mood or reflections"),
    ("reminder", "View warnings or missed activity"),
    ("review", "Record today's journal and plan status"),
    ("weekly", "Weekly journal and plan report"),
];

pub fn format_banner(streak: Streak, now: NaiveDateTime) -> String {
    let mut lines = vec![
        "Welcome to Mensa, your mission-aligned assistant.".to_string(),
        format_streak(streak),
        format!("Today: {}", now.format("%A, %d %B %Y")),
        String::new(),
        "Available commands:".to_string(),
    ];
    lines.extend(
        COMMANDS
            .iter()
            .map(|(name, about)| format!("  {name:<14}{about}")),
    );
    lines.push("  help <cmd>    Show help for a specific command".to_string());
    lines.join("\n")
}
