use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::PearlError;

use super::migrations;

/// Handle on the task/settings database.
///
/// Opened once by whoever needs it and passed down; there is no global
/// connection. Call [`Store::close`] to release it and surface close errors.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open an existing database. Returns `NOT_INITIALIZED` if it is missing.
    pub fn open(path: &Path) -> Result<Self, PearlError> {
        if !path.exists() {
            return Err(PearlError::not_initialized());
        }
        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        migrations::run_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Create directories and the database if needed, then migrate.
    pub fn init(path: &Path) -> Result<Self, PearlError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PearlError::database(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        migrations::run_migrations(&conn)?;
        tracing::info!(path = %path.display(), "initialized store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, PearlError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn close(self) -> Result<(), PearlError> {
        self.conn.close().map_err(|(_, e)| PearlError::from(e))?;
        tracing::debug!("closed store");
        Ok(())
    }
}

fn configure_connection(conn: &Connection) -> Result<(), PearlError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
