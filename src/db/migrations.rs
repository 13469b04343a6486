use rusqlite::Connection;

use crate::error::PearlError;

pub fn run_migrations(conn: &Connection) -> Result<(), PearlError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            description TEXT NOT NULL DEFAULT '',
            due_date TEXT,
            completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
            recurrence_rule TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS settings (
            user_id TEXT PRIMARY KEY,
            theme TEXT NOT NULL DEFAULT 'system'
                CHECK (theme IN ('light', 'dark', 'system')),
            language TEXT NOT NULL DEFAULT 'en',
            notifications INTEGER NOT NULL DEFAULT 1 CHECK (notifications IN (0, 1)),
            default_view TEXT NOT NULL DEFAULT 'tasks'
                CHECK (default_view IN ('tasks', 'calendar', 'statistics')),
            date_format TEXT NOT NULL DEFAULT 'MM/DD/YYYY'
                CHECK (date_format IN ('MM/DD/YYYY', 'DD/MM/YYYY', 'YYYY-MM-DD')),
            time_format TEXT NOT NULL DEFAULT '12h'
                CHECK (time_format IN ('12h', '24h')),
            start_day_of_week INTEGER NOT NULL DEFAULT 0
                CHECK (start_day_of_week BETWEEN 0 AND 6),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
        CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
        ",
    )?;
    Ok(())
}
