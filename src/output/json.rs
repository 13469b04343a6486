use serde_json::{json, Value};

use crate::error::PearlError;
use crate::models::Task;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &PearlError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_summary(t: &Task) -> Value {
    let mut v = json!({
        "id": t.id,
        "title": t.title,
        "due_date": t.due_date,
        "completed": t.completed
    });
    if let Some(ref rule) = t.recurrence_rule {
        v["recurrence"] = json!(rule.summary());
    }
    v
}

/// Render a value for stdout. Falls back to compact output, which cannot fail
/// for the `Value`s built here.
pub fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn print_success(data: Value) {
    println!("{}", render(&success(data)));
}

pub fn print_error(err: &PearlError) {
    println!("{}", render(&error(err)));
}
