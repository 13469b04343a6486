use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PearlError;
use crate::models::{
    DateFormat, DefaultView, Settings, SettingsChanges, Theme, TimeFormat, DEFAULT_USER,
};

const SETTINGS_COLUMNS: &str = "user_id, theme, language, notifications, default_view,
     date_format, time_format, start_day_of_week, created_at, updated_at";

pub fn get_settings(conn: &Connection) -> Result<Option<Settings>, PearlError> {
    let settings = conn
        .query_row(
            &format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE user_id = ?1"),
            params![DEFAULT_USER],
            row_to_settings,
        )
        .optional()?;
    Ok(settings)
}

/// Read the settings record, writing the defaults on first use.
pub fn get_or_create_settings(conn: &Connection) -> Result<Settings, PearlError> {
    if let Some(settings) = get_settings(conn)? {
        return Ok(settings);
    }
    write_settings(conn, &Settings::default())?;
    tracing::info!("created default settings");
    get_settings(conn)?.ok_or_else(|| PearlError::database("Settings record missing after insert"))
}

pub fn update_settings(conn: &Connection, changes: &SettingsChanges) -> Result<Settings, PearlError> {
    let mut settings = get_or_create_settings(conn)?;
    settings.apply(changes);
    write_settings(conn, &settings)?;
    tracing::info!(?changes, "updated settings");
    get_or_create_settings(conn)
}

fn write_settings(conn: &Connection, s: &Settings) -> Result<(), PearlError> {
    conn.execute(
        "INSERT INTO settings (user_id, theme, language, notifications, default_view,
                               date_format, time_format, start_day_of_week)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(user_id) DO UPDATE SET
             theme = excluded.theme,
             language = excluded.language,
             notifications = excluded.notifications,
             default_view = excluded.default_view,
             date_format = excluded.date_format,
             time_format = excluded.time_format,
             start_day_of_week = excluded.start_day_of_week,
             updated_at = datetime('now')",
        params![
            DEFAULT_USER,
            s.theme.as_str(),
            s.language,
            s.notifications,
            s.default_view.as_str(),
            s.date_format.as_str(),
            s.time_format.as_str(),
            s.start_day_of_week,
        ],
    )?;
    Ok(())
}

fn row_to_settings(row: &rusqlite::Row) -> rusqlite::Result<Settings> {
    let defaults = Settings::default();
    Ok(Settings {
        user_id: row.get(0)?,
        theme: Theme::from_str(&row.get::<_, String>(1)?).unwrap_or(defaults.theme),
        language: row.get(2)?,
        notifications: row.get(3)?,
        default_view: DefaultView::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(defaults.default_view),
        date_format: DateFormat::from_str(&row.get::<_, String>(5)?)
            .unwrap_or(defaults.date_format),
        time_format: TimeFormat::from_str(&row.get::<_, String>(6)?)
            .unwrap_or(defaults.time_format),
        start_day_of_week: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[test]
    fn test_defaults_created_once() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.conn();
        assert!(get_settings(conn).unwrap().is_none());

        let first = get_or_create_settings(conn).unwrap();
        assert_eq!(first.user_id, DEFAULT_USER);
        assert_eq!(first.theme, Theme::System);
        assert!(first.notifications);

        get_or_create_settings(conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_partial_update() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.conn();
        let changes = SettingsChanges {
            theme: Some(Theme::Dark),
            start_day_of_week: Some(1),
            notifications: Some(false),
            ..Default::default()
        };
        let updated = update_settings(conn, &changes).unwrap();
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.start_day_of_week, 1);
        assert!(!updated.notifications);
        assert_eq!(updated.language, "en");
        assert_eq!(updated.time_format, TimeFormat::TwelveHour);
    }
}
