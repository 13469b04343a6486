use std::cmp::Ordering;

use serde::Serialize;

use crate::models::Task;

/// How many tasks the "recent" list shows.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Whole percent, 0 when there are no tasks.
    pub completion_rate: u32,
    pub recurring: usize,
    pub recurrence: Vec<RecurrenceSummary>,
    pub recent: Vec<RecentTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurrenceSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentTask {
    pub id: String,
    pub title: String,
    pub due_date: Option<chrono::NaiveDate>,
    pub completed: bool,
}

pub fn compute(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let completion_rate = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    let recurrence: Vec<RecurrenceSummary> = tasks
        .iter()
        .filter_map(|t| {
            t.recurrence_rule.as_ref().map(|rule| RecurrenceSummary {
                id: t.id.clone(),
                title: t.title.clone(),
                summary: rule.summary(),
            })
        })
        .collect();

    // Latest due date first, undated last.
    let mut by_due: Vec<&Task> = tasks.iter().collect();
    by_due.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    let recent = by_due
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|t| RecentTask {
            id: t.id.clone(),
            title: t.title.clone(),
            due_date: t.due_date,
            completed: t.completed,
        })
        .collect();

    TaskStats {
        total,
        completed,
        pending: total - completed,
        completion_rate,
        recurring: recurrence.len(),
        recurrence,
        recent,
    }
}
