//! Month calendar of tasks by due day.

pub mod bucket;
pub mod grid;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Task;

pub use bucket::{bucket_by_day, day_status, tasks_on, DayStatus};
pub use grid::{month_grid, weekday_from_index, weekday_index, DayCell};

#[derive(Debug, Clone, Serialize)]
pub struct DayTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub status: Option<DayStatus>,
    pub tasks: Vec<DayTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    /// `YYYY-MM`.
    pub month: String,
    pub start_of_week: u8,
    pub days: Vec<CalendarDay>,
}

/// Grid for the month of `reference` with each day's tasks and status.
pub fn month_view(reference: NaiveDate, start_of_week: Weekday, tasks: &[Task]) -> MonthView {
    let buckets = bucket_by_day(tasks);
    let days = month_grid(reference, start_of_week)
        .into_iter()
        .map(|cell| {
            let due = buckets.get(&cell.date).map(Vec::as_slice).unwrap_or(&[]);
            CalendarDay {
                date: cell.date,
                in_month: cell.in_month,
                status: day_status(due),
                tasks: due
                    .iter()
                    .map(|t| DayTask {
                        id: t.id.clone(),
                        title: t.title.clone(),
                        completed: t.completed,
                    })
                    .collect(),
            }
        })
        .collect();

    MonthView {
        month: reference.format("%Y-%m").to_string(),
        start_of_week: weekday_index(start_of_week),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, due: NaiveDate, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: String::new(),
            due_date: Some(due),
            completed,
            recurrence_rule: None,
            recurrence_error: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_month_view_places_tasks() {
        let tasks = vec![
            task("a", date(2024, 3, 5), false),
            task("b", date(2024, 3, 5), true),
            task("c", date(2024, 2, 26), true),
            task("d", date(2024, 5, 1), false),
        ];
        let view = month_view(date(2024, 3, 20), Weekday::Sun, &tasks);
        assert_eq!(view.month, "2024-03");
        assert_eq!(view.start_of_week, 0);

        let mar5 = view.days.iter().find(|d| d.date == date(2024, 3, 5)).unwrap();
        assert_eq!(mar5.tasks.len(), 2);
        assert_eq!(mar5.status, Some(DayStatus::Pending));

        // Leading filler days still show their tasks.
        let feb26 = view.days.iter().find(|d| d.date == date(2024, 2, 26)).unwrap();
        assert!(!feb26.in_month);
        assert_eq!(feb26.status, Some(DayStatus::Completed));

        let placed: usize = view.days.iter().map(|d| d.tasks.len()).sum();
        assert_eq!(placed, 3);
    }
}
