use serde_json::json;

use crate::api::ApiServer;
use crate::cli::{finish, Context};
use crate::config::{self, Config};
use crate::db::Store;
use crate::error::PearlError;
use crate::output;

pub fn run(host: Option<String>, port: Option<u16>, ctx: &Context) -> i32 {
    finish(run_inner(host, port, ctx), ctx.json)
}

fn run_inner(host: Option<String>, port: Option<u16>, ctx: &Context) -> Result<i32, PearlError> {
    let db_path = ctx.db_path()?;
    let config = Config::load(&config::config_path(&db_path))?.with_env()?;
    let host = host.unwrap_or(config.host);
    let port = port.unwrap_or(config.port);
    let store = Store::open(&db_path)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| PearlError::config(format!("Cannot start async runtime: {e}")))?;
    runtime.block_on(async {
        let server = ApiServer::start(store, &host, port).await?;
        if ctx.json {
            output::json::print_success(json!({ "url": server.url() }));
        } else {
            println!("Serving on {}  (Ctrl-C to stop)", server.url());
        }

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C; shutting down");
        }
        tracing::info!("shutdown requested");
        server.shutdown().await
    })?;
    Ok(0)
}
