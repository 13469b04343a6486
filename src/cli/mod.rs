pub mod calendar;
pub mod commands;
pub mod init;
pub mod preview;
pub mod serve;
pub mod settings;
pub mod stats;
pub mod task;

use std::path::PathBuf;

pub use commands::*;

use crate::config;
use crate::db::Store;
use crate::error::PearlError;
use crate::output;

/// Global flags every command sees.
pub struct Context {
    pub json: bool,
    pub db: Option<PathBuf>,
}

impl Context {
    pub fn db_path(&self) -> Result<PathBuf, PearlError> {
        config::db_path(self.db.as_deref())
    }

    pub fn open_store(&self) -> Result<Store, PearlError> {
        Store::open(&self.db_path()?)
    }
}

/// Turn a command result into an exit code, reporting errors on the way.
pub fn finish(result: Result<i32, PearlError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(code = e.code.as_str(), error = %e.message, "command failed");
            if json_output {
                output::json::print_error(&e);
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
