use chrono::Local;
use serde_json::json;

use crate::calendar::{self, weekday_from_index};
use crate::cli::{finish, Context};
use crate::db::{settings_repo, task_repo};
use crate::error::PearlError;
use crate::models::date::parse_month;
use crate::output;

pub fn run(month: Option<&str>, start_of_week: Option<u8>, ctx: &Context) -> i32 {
    finish(run_inner(month, start_of_week, ctx), ctx.json)
}

fn run_inner(month: Option<&str>, start_of_week: Option<u8>, ctx: &Context) -> Result<i32, PearlError> {
    let reference = match month {
        Some(m) => parse_month(m)?,
        None => Local::now().date_naive(),
    };
    let store = ctx.open_store()?;
    let index = match start_of_week {
        Some(index) => index,
        None => settings_repo::get_or_create_settings(store.conn())?.start_day_of_week,
    };
    let start_of_week = weekday_from_index(index).ok_or_else(|| {
        PearlError::validation(format!("start_of_week must be between 0 and 6, got {index}"))
    })?;
    let tasks = task_repo::list_tasks(store.conn())?;
    let view = calendar::month_view(reference, start_of_week, &tasks);

    if ctx.json {
        output::json::print_success(json!(view));
    } else {
        output::text::print_month(&view);
    }
    Ok(0)
}
