use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::error::PearlError;
use crate::models::{Task, TaskChanges, TaskDraft};
use crate::recurrence;

const TASK_COLUMNS: &str =
    "id, title, description, due_date, completed, recurrence_rule, created_at, updated_at";

/// Task ids are ULIDs; anything else is rejected before touching the store.
pub fn validate_id(id: &str) -> Result<(), PearlError> {
    ulid::Ulid::from_string(id)
        .map(|_| ())
        .map_err(|_| PearlError::invalid_id(id))
}

pub fn create_task(conn: &Connection, draft: &TaskDraft) -> Result<Task, PearlError> {
    let id = ulid::Ulid::new().to_string();
    let rule = recurrence::encode(draft.recurrence_rule.as_ref())?;
    conn.execute(
        "INSERT INTO tasks (id, title, description, due_date, recurrence_rule)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            draft.title,
            draft.description,
            draft.due_date.map(|d| d.to_string()),
            rule
        ],
    )?;
    tracing::info!(task_id = %id, "created task");
    get_task_by_id(conn, &id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, PearlError> {
    validate_id(id)?;
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => PearlError::task_not_found(id),
        _ => PearlError::from(e),
    })
}

/// All tasks by due date, earliest first; undated tasks come last.
pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, PearlError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         ORDER BY due_date IS NULL, due_date ASC, created_at ASC, id ASC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Apply a partial update and return the updated task.
pub fn update_task(conn: &Connection, id: &str, changes: &TaskChanges) -> Result<Task, PearlError> {
    validate_id(id)?;
    if changes.is_empty() {
        return get_task_by_id(conn, id);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if let Some(ref title) = changes.title {
        sets.push("title = ?");
        values.push(Value::Text(title.clone()));
    }
    if let Some(ref description) = changes.description {
        sets.push("description = ?");
        values.push(Value::Text(description.clone()));
    }
    if let Some(due_date) = changes.due_date {
        sets.push("due_date = ?");
        values.push(due_date.map_or(Value::Null, |d| Value::Text(d.to_string())));
    }
    if let Some(completed) = changes.completed {
        sets.push("completed = ?");
        values.push(Value::Integer(i64::from(completed)));
    }
    if let Some(ref rule) = changes.recurrence_rule {
        sets.push("recurrence_rule = ?");
        values.push(recurrence::encode(rule.as_ref())?.map_or(Value::Null, Value::Text));
    }
    values.push(Value::Text(id.to_string()));

    let sql = format!(
        "UPDATE tasks SET {}, updated_at = datetime('now') WHERE id = ?",
        sets.join(", ")
    );
    let updated = conn.execute(&sql, params_from_iter(values))?;
    if updated == 0 {
        return Err(PearlError::task_not_found(id));
    }
    tracing::info!(task_id = %id, fields = sets.len(), "updated task");
    get_task_by_id(conn, id)
}

/// Delete a task, returning it as it was.
pub fn delete_task(conn: &Connection, id: &str) -> Result<Task, PearlError> {
    let task = get_task_by_id(conn, id)?;
    conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    tracing::info!(task_id = %id, "deleted task");
    Ok(task)
}

pub fn count_tasks(conn: &Connection) -> Result<i64, PearlError> {
    let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let due_date = match row.get::<_, Option<String>>(3)? {
        Some(text) => Some(NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };
    let raw_rule: Option<String> = row.get(5)?;
    let (recurrence_rule, recurrence_error) = match recurrence::decode(raw_rule.as_deref()) {
        Ok(rule) => (rule, None),
        Err(e) => {
            tracing::warn!(task_id = %id, error = %e, "ignoring undecodable recurrence rule");
            (None, Some(e.message))
        }
    };
    Ok(Task {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date,
        completed: row.get::<_, i64>(4)? != 0,
        recurrence_rule,
        recurrence_error,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
