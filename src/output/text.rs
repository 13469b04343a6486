use chrono::NaiveDate;

use crate::calendar::{weekday_from_index, DayStatus, MonthView};
use crate::models::{DateFormat, Settings, Task};
use crate::stats::TaskStats;

fn check(completed: bool) -> &'static str {
    if completed {
        "x"
    } else {
        " "
    }
}

/// Render a date in the user's chosen style.
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

pub fn print_task(t: &Task, format: DateFormat) {
    println!("Task: {} ({})", t.title, t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    match t.due_date {
        Some(due) => println!("  Due: {}", format_date(due, format)),
        None => println!("  Due: -"),
    }
    println!("  Completed: {}", if t.completed { "yes" } else { "no" });
    if let Some(ref rule) = t.recurrence_rule {
        println!("  Repeats: {}", rule.summary());
        if let Some(end) = rule.end_date {
            println!("  Until: {}", format_date(end, format));
        }
    }
    if let Some(ref err) = t.recurrence_error {
        println!("  Repeats: (unreadable rule: {err})");
    }
    println!("  Created: {}", t.created_at);
}

pub fn print_task_list(tasks: &[Task], format: DateFormat) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let due = t
            .due_date
            .map(|d| format_date(d, format))
            .unwrap_or_else(|| "----------".into());
        let repeats = if t.is_recurring() { " (repeats)" } else { "" };
        println!("  [{}] {} {} ({}){}", check(t.completed), due, t.title, t.id, repeats);
    }
}

pub fn print_dates(heading: &str, dates: &[NaiveDate], format: DateFormat) {
    println!("{heading}:");
    for d in dates {
        println!("  {} {}", d.format("%a"), format_date(*d, format));
    }
}

pub fn print_settings(s: &Settings) {
    println!("Theme: {}", s.theme.as_str());
    println!("Language: {}", s.language);
    println!("Notifications: {}", if s.notifications { "on" } else { "off" });
    println!("Default view: {}", s.default_view.as_str());
    println!("Date format: {}", s.date_format.as_str());
    println!("Time format: {}", s.time_format.as_str());
    let day = weekday_from_index(s.start_day_of_week)
        .map(|d| d.to_string())
        .unwrap_or_else(|| s.start_day_of_week.to_string());
    println!("Week starts on: {day}");
}

/// Month grid. `*` marks days with pending tasks, `+` days whose tasks are
/// all completed; days outside the month are dimmed to `.`.
pub fn print_month(view: &MonthView) {
    println!("{}", view.month);
    if let Some(first) = view.days.first() {
        let header: Vec<String> = first
            .date
            .iter_days()
            .take(7)
            .map(|d| format!("{:>3}", &d.format("%a").to_string()[..2]))
            .collect();
        println!("{}", header.join(" "));
    }
    for week in view.days.chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return format!("{:>3}", ".");
                }
                let mark = match day.status {
                    Some(DayStatus::Pending) => "*",
                    Some(DayStatus::Completed) => "+",
                    None => " ",
                };
                format!("{:>2}{mark}", day.date.format("%-d"))
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    let busy: Vec<_> = view.days.iter().filter(|d| !d.tasks.is_empty()).collect();
    if !busy.is_empty() {
        println!();
        for day in busy {
            for t in &day.tasks {
                println!("  {} [{}] {}", day.date, check(t.completed), t.title);
            }
        }
    }
}

pub fn print_stats(s: &TaskStats, format: DateFormat) {
    println!("Tasks: {} total, {} completed, {} pending", s.total, s.completed, s.pending);
    println!("Completion rate: {}%", s.completion_rate);
    if !s.recent.is_empty() {
        println!("\nRecent:");
        for t in &s.recent {
            let due = t
                .due_date
                .map(|d| format_date(d, format))
                .unwrap_or_else(|| "-".into());
            println!("  [{}] {} {}", check(t.completed), due, t.title);
        }
    }
    println!("\nRecurring tasks: {}", s.recurring);
    for r in &s.recurrence {
        println!("  {} - {}", r.title, r.summary);
    }
}
