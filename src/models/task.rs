use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::PearlError;
use crate::models::date::parse_optional_date;
use crate::recurrence::{self, Recurrence, RecurrenceRecord};

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub recurrence_rule: Option<Recurrence>,
    /// Set when the stored rule could not be decoded; the rule then reads as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some()
    }
}

/// A recurrence rule as sent by clients: either the structured record or the
/// same record already JSON-encoded into a string.
#[derive(Debug, Clone)]
pub enum RuleInput {
    Record(RecurrenceRecord),
    Encoded(String),
}

// Dispatch on the JSON shape so a bad record field is reported by name.
impl<'de> Deserialize<'de> for RuleInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => Ok(Self::Encoded(text)),
            value @ serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(Self::Record)
                .map_err(|e| de::Error::custom(format!("invalid recurrence rule: {e}"))),
            other => Err(de::Error::custom(format!(
                "invalid recurrence rule: expected an object or a JSON string, got {other}"
            ))),
        }
    }
}

impl RuleInput {
    pub fn into_rule(self) -> Result<Option<Recurrence>, PearlError> {
        match self {
            Self::Record(record) => Recurrence::from_record(record),
            Self::Encoded(text) => recurrence::decode(Some(&text)),
        }
    }
}

/// Create request, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub recurrence_rule: Option<RuleInput>,
}

/// A validated [`NewTask`].
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub recurrence_rule: Option<Recurrence>,
}

impl NewTask {
    pub fn validate(self) -> Result<TaskDraft, PearlError> {
        Ok(TaskDraft {
            title: validate_title(&self.title)?,
            description: self.description.as_deref().unwrap_or("").trim().to_string(),
            due_date: parse_optional_date(self.due_date.as_deref())?,
            recurrence_rule: match self.recurrence_rule {
                Some(input) => input.into_rule()?,
                None => None,
            },
        })
    }
}

/// Partial update. For `due_date` and `recurrence_rule`, an explicit `null`
/// clears the field while omitting it leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub recurrence_rule: Option<Option<RuleInput>>,
}

/// A validated [`TaskPatch`].
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub recurrence_rule: Option<Option<Recurrence>>,
}

impl TaskPatch {
    pub fn validate(self) -> Result<TaskChanges, PearlError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        let due_date = match self.due_date {
            Some(value) => Some(parse_optional_date(value.as_deref())?),
            None => None,
        };
        let recurrence_rule = match self.recurrence_rule {
            Some(Some(input)) => Some(input.into_rule()?),
            Some(None) => Some(None),
            None => None,
        };
        Ok(TaskChanges {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            due_date,
            completed: self.completed,
            recurrence_rule,
        })
    }
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
            && self.recurrence_rule.is_none()
    }
}

fn validate_title(title: &str) -> Result<String, PearlError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PearlError::validation("Title is required"));
    }
    Ok(trimmed.to_string())
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
