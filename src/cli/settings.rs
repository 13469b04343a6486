use serde_json::json;

use crate::cli::commands::SettingsCommands;
use crate::cli::{finish, Context};
use crate::db::settings_repo;
use crate::error::PearlError;
use crate::models::{DateFormat, DefaultView, SettingsPatch, Theme, TimeFormat};
use crate::output;

pub fn run(cmd: SettingsCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        SettingsCommands::Show => run_show(ctx),
        SettingsCommands::Set {
            theme,
            language,
            notifications,
            default_view,
            date_format,
            time_format,
            start_day_of_week,
        } => {
            let patch = build_patch(
                theme.as_deref(),
                language,
                notifications,
                default_view.as_deref(),
                date_format.as_deref(),
                time_format.as_deref(),
                start_day_of_week,
            );
            patch.and_then(|p| run_set(p, ctx))
        }
    };
    finish(result, ctx.json)
}

fn parse_choice<T>(
    value: Option<&str>,
    name: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, PearlError> {
    match value {
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| PearlError::validation(format!("Invalid {name}: {v}"))),
        None => Ok(None),
    }
}

fn build_patch(
    theme: Option<&str>,
    language: Option<String>,
    notifications: Option<bool>,
    default_view: Option<&str>,
    date_format: Option<&str>,
    time_format: Option<&str>,
    start_day_of_week: Option<i64>,
) -> Result<SettingsPatch, PearlError> {
    Ok(SettingsPatch {
        theme: parse_choice(theme, "theme", Theme::from_str)?,
        language,
        notifications,
        default_view: parse_choice(default_view, "default view", DefaultView::from_str)?,
        date_format: parse_choice(date_format, "date format", DateFormat::from_str)?,
        time_format: parse_choice(time_format, "time format", TimeFormat::from_str)?,
        start_day_of_week,
    })
}

fn run_show(ctx: &Context) -> Result<i32, PearlError> {
    let store = ctx.open_store()?;
    let settings = settings_repo::get_or_create_settings(store.conn())?;
    if ctx.json {
        output::json::print_success(json!({ "settings": settings }));
    } else {
        output::text::print_settings(&settings);
    }
    Ok(0)
}

fn run_set(patch: SettingsPatch, ctx: &Context) -> Result<i32, PearlError> {
    let changes = patch.validate()?;
    if changes == Default::default() {
        return Err(PearlError::validation("Nothing to update"));
    }
    let store = ctx.open_store()?;
    let settings = settings_repo::update_settings(store.conn(), &changes)?;
    if ctx.json {
        output::json::print_success(json!({ "settings": settings }));
    } else {
        println!("Settings updated.");
        output::text::print_settings(&settings);
    }
    Ok(0)
}
