use serde::{Deserialize, Serialize};

use crate::error::PearlError;

/// The only user the application knows about.
pub const DEFAULT_USER: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    Tasks,
    Calendar,
    Statistics,
}

impl DefaultView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Calendar => "calendar",
            Self::Statistics => "statistics",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tasks" => Some(Self::Tasks),
            "calendar" => Some(Self::Calendar),
            "statistics" => Some(Self::Statistics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "MM/DD/YYYY",
            Self::DayMonthYear => "DD/MM/YYYY",
            Self::Iso => "YYYY-MM-DD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MM/DD/YYYY" => Some(Self::MonthDayYear),
            "DD/MM/YYYY" => Some(Self::DayMonthYear),
            "YYYY-MM-DD" => Some(Self::Iso),
            _ => None,
        }
    }

    /// chrono format string for rendering dates in this style.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "%m/%d/%Y",
            Self::DayMonthYear => "%d/%m/%Y",
            Self::Iso => "%Y-%m-%d",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwelveHour => "12h",
            Self::TwentyFourHour => "24h",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "12h" => Some(Self::TwelveHour),
            "24h" => Some(Self::TwentyFourHour),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub user_id: String,
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
    pub default_view: DefaultView,
    pub date_format: DateFormat,
    pub time_format: TimeFormat,
    /// 0 = Sunday through 6 = Saturday.
    pub start_day_of_week: u8,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER.to_string(),
            theme: Theme::System,
            language: "en".to_string(),
            notifications: true,
            default_view: DefaultView::Tasks,
            date_format: DateFormat::MonthDayYear,
            time_format: TimeFormat::TwelveHour,
            start_day_of_week: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl Settings {
    pub fn apply(&mut self, changes: &SettingsChanges) {
        if let Some(theme) = changes.theme {
            self.theme = theme;
        }
        if let Some(ref language) = changes.language {
            self.language = language.clone();
        }
        if let Some(notifications) = changes.notifications {
            self.notifications = notifications;
        }
        if let Some(view) = changes.default_view {
            self.default_view = view;
        }
        if let Some(format) = changes.date_format {
            self.date_format = format;
        }
        if let Some(format) = changes.time_format {
            self.time_format = format;
        }
        if let Some(day) = changes.start_day_of_week {
            self.start_day_of_week = day;
        }
    }
}

/// Partial settings update, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub default_view: Option<DefaultView>,
    #[serde(default)]
    pub date_format: Option<DateFormat>,
    #[serde(default)]
    pub time_format: Option<TimeFormat>,
    #[serde(default)]
    pub start_day_of_week: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChanges {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub notifications: Option<bool>,
    pub default_view: Option<DefaultView>,
    pub date_format: Option<DateFormat>,
    pub time_format: Option<TimeFormat>,
    pub start_day_of_week: Option<u8>,
}

impl SettingsPatch {
    pub fn validate(self) -> Result<SettingsChanges, PearlError> {
        let language = match self.language.as_deref().map(str::trim) {
            Some("") => return Err(PearlError::validation("Language code must not be empty")),
            Some(code) => Some(code.to_string()),
            None => None,
        };
        let start_day_of_week = match self.start_day_of_week {
            Some(day @ 0..=6) => Some(day as u8),
            Some(day) => {
                return Err(PearlError::validation(format!(
                    "start_day_of_week must be between 0 and 6, got {day}"
                )))
            }
            None => None,
        };
        Ok(SettingsChanges {
            theme: self.theme,
            language,
            notifications: self.notifications,
            default_view: self.default_view,
            date_format: self.date_format,
            time_format: self.time_format,
            start_day_of_week,
        })
    }
}
