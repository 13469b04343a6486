use serde_json::json;

use crate::cli::{finish, Context};
use crate::config::{self, Config};
use crate::db::Store;
use crate::error::PearlError;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, PearlError> {
    let path = ctx.db_path()?;
    let store = Store::init(&path)?;
    store.close()?;
    let config_path = config::config_path(&path);
    Config::write_default(&config_path)?;

    if ctx.json {
        output::json::print_success(json!({
            "path": path.to_string_lossy(),
            "config": config_path.to_string_lossy(),
        }));
    } else {
        println!("Initialized pearl at {}", path.display());
    }
    Ok(0)
}
