use serde_json::json;

use crate::cli::{finish, Context};
use crate::db::{settings_repo, task_repo};
use crate::error::PearlError;
use crate::output;
use crate::stats;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, PearlError> {
    let store = ctx.open_store()?;
    let tasks = task_repo::list_tasks(store.conn())?;
    let stats = stats::compute(&tasks);
    if ctx.json {
        output::json::print_success(json!(stats));
    } else {
        let format = settings_repo::get_or_create_settings(store.conn())?.date_format;
        output::text::print_stats(&stats, format);
    }
    Ok(0)
}
