use serde_json::json;

use crate::cli::commands::{RuleArgs, TaskCommands};
use crate::cli::{finish, Context};
use crate::db::{settings_repo, task_repo};
use crate::error::PearlError;
use crate::models::{NewTask, TaskChanges, TaskPatch};
use crate::output;
use crate::recurrence::occurrence::{self, MAX_PREVIEW_COUNT};

pub fn run(cmd: TaskCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        TaskCommands::Add { title, description, due, rule } => {
            run_add(title, description, due, &rule, ctx)
        }
        TaskCommands::List => run_list(ctx),
        TaskCommands::Show { id, count } => run_show(&id, count, ctx),
        TaskCommands::Update { id, title, description, due, clear_due, rule, no_repeat } => {
            let patch = build_patch(title, description, due, clear_due, &rule, no_repeat);
            patch.and_then(|p| run_update(&id, p, "Updated", ctx))
        }
        TaskCommands::Done { id } => run_update(&id, completion(true), "Completed", ctx),
        TaskCommands::Undone { id } => run_update(&id, completion(false), "Reopened", ctx),
        TaskCommands::Delete { id } => run_delete(&id, ctx),
    };
    finish(result, ctx.json)
}

fn completion(completed: bool) -> TaskPatch {
    TaskPatch {
        completed: Some(completed),
        ..Default::default()
    }
}

fn build_patch(
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    clear_due: bool,
    rule: &RuleArgs,
    no_repeat: bool,
) -> Result<TaskPatch, PearlError> {
    let due_date = if clear_due { Some(None) } else { due.map(Some) };
    let recurrence_rule = if no_repeat {
        Some(None)
    } else {
        rule.to_input()?.map(Some)
    };
    Ok(TaskPatch {
        title,
        description,
        due_date,
        completed: None,
        recurrence_rule,
    })
}

fn run_add(
    title: String,
    description: Option<String>,
    due: Option<String>,
    rule: &RuleArgs,
    ctx: &Context,
) -> Result<i32, PearlError> {
    let draft = NewTask {
        title,
        description,
        due_date: due,
        recurrence_rule: rule.to_input()?,
    }
    .validate()?;

    let store = ctx.open_store()?;
    let task = task_repo::create_task(store.conn(), &draft)?;
    if ctx.json {
        output::json::print_success(json!({ "task": task }));
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_list(ctx: &Context) -> Result<i32, PearlError> {
    let store = ctx.open_store()?;
    let tasks = task_repo::list_tasks(store.conn())?;
    if ctx.json {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        output::json::print_success(json!({ "tasks": tasks_json }));
    } else {
        let format = settings_repo::get_or_create_settings(store.conn())?.date_format;
        output::text::print_task_list(&tasks, format);
    }
    Ok(0)
}

fn run_show(id: &str, count: usize, ctx: &Context) -> Result<i32, PearlError> {
    if count > MAX_PREVIEW_COUNT {
        return Err(PearlError::validation(format!(
            "count must be at most {MAX_PREVIEW_COUNT}, got {count}"
        )));
    }
    let store = ctx.open_store()?;
    let task = task_repo::get_task_by_id(store.conn(), id)?;
    let rule = task.recurrence_rule.as_ref();
    let anchor = rule.and_then(|r| r.anchor(task.due_date));
    let occurrences = occurrence::generate(anchor, rule, count);

    if ctx.json {
        output::json::print_success(json!({
            "task": task,
            "occurrences": occurrences,
        }));
    } else {
        let format = settings_repo::get_or_create_settings(store.conn())?.date_format;
        output::text::print_task(&task, format);
        if !occurrences.is_empty() {
            output::text::print_dates("Next occurrences", &occurrences, format);
        }
    }
    Ok(0)
}

fn run_update(id: &str, patch: TaskPatch, verb: &str, ctx: &Context) -> Result<i32, PearlError> {
    task_repo::validate_id(id)?;
    let changes: TaskChanges = patch.validate()?;
    if changes.is_empty() {
        return Err(PearlError::validation("Nothing to update"));
    }
    let store = ctx.open_store()?;
    let task = task_repo::update_task(store.conn(), id, &changes)?;
    if ctx.json {
        output::json::print_success(json!({ "task": task }));
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_delete(id: &str, ctx: &Context) -> Result<i32, PearlError> {
    let store = ctx.open_store()?;
    let task = task_repo::delete_task(store.conn(), id)?;
    if ctx.json {
        output::json::print_success(json!({ "deleted": output::json::task_summary(&task) }));
    } else {
        println!("Deleted task: {} ({})", task.title, task.id);
    }
    Ok(0)
}
