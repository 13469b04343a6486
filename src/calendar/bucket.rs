use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Pending,
    Completed,
}

/// Tasks due exactly on `day`, by linear scan.
pub fn tasks_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due_date == Some(day)).collect()
}

/// Group dated tasks by due day in one pass. Undated tasks are left out.
/// Each bucket keeps the input order, matching [`tasks_on`].
pub fn bucket_by_day(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(day) = task.due_date {
            buckets.entry(day).or_default().push(task);
        }
    }
    buckets
}

/// No tasks: no status. Any incomplete task makes the day pending.
pub fn day_status(tasks: &[&Task]) -> Option<DayStatus> {
    if tasks.is_empty() {
        None
    } else if tasks.iter().any(|t| !t.completed) {
        Some(DayStatus::Pending)
    } else {
        Some(DayStatus::Completed)
    }
}
