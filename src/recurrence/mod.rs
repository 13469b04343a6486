//! Recurrence rules attached to tasks.
//!
//! A rule is stored as a flat JSON record (`RecurrenceRecord`) and handled
//! everywhere else as the validated `Recurrence` type, whose `Pattern` has one
//! variant per frequency. "No recurrence" has no variant: it is `None`.

pub mod occurrence;
pub mod preview;

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::PearlError;
use crate::models::date::parse_optional_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
            Self::None | Self::Custom => "unit",
        }
    }
}

/// Serialized as its two-letter code. Codes are read case-insensitively,
/// the same way from JSON and from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WeekDay {
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
    #[serde(rename = "SU")]
    Sunday,
}

impl WeekDay {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "MO" => Some(Self::Monday),
            "TU" => Some(Self::Tuesday),
            "WE" => Some(Self::Wednesday),
            "TH" => Some(Self::Thursday),
            "FR" => Some(Self::Friday),
            "SA" => Some(Self::Saturday),
            "SU" => Some(Self::Sunday),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for WeekDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code).ok_or_else(|| {
            de::Error::custom(format!("unknown weekday code '{code}', expected one of MO..SU"))
        })
    }
}

/// Frequency-specific part of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Daily,
    /// `week_days` is sorted Monday first and free of duplicates.
    Weekly { week_days: Vec<WeekDay> },
    /// `month_day` is always within 1..=31.
    Monthly { month_day: u8 },
    Yearly,
    Custom,
}

/// A validated recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RecurrenceRecord")]
pub struct Recurrence {
    pub pattern: Pattern,
    pub interval: NonZeroU32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Flat wire shape of a rule, as persisted on a task and accepted from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRecord {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week_days: Vec<WeekDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

fn default_interval() -> i64 {
    1
}

impl RecurrenceRecord {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: default_interval(),
            week_days: Vec::new(),
            month_day: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl Recurrence {
    pub fn new(pattern: Pattern, interval: u32) -> Result<Self, PearlError> {
        let interval = NonZeroU32::new(interval)
            .ok_or_else(|| PearlError::validation("Recurrence interval must be at least 1"))?;
        Ok(Self {
            pattern,
            interval,
            start_date: None,
            end_date: None,
        })
    }

    /// Validate a wire record. `frequency: none` yields `Ok(None)`.
    pub fn from_record(record: RecurrenceRecord) -> Result<Option<Self>, PearlError> {
        let pattern = match record.frequency {
            Frequency::None => return Ok(None),
            Frequency::Daily => Pattern::Daily,
            Frequency::Weekly => {
                let mut week_days = record.week_days;
                week_days.sort();
                week_days.dedup();
                Pattern::Weekly { week_days }
            }
            Frequency::Monthly => {
                let day = record.month_day.unwrap_or(1);
                if !(1..=31).contains(&day) {
                    return Err(PearlError::validation(format!(
                        "Recurrence monthDay must be between 1 and 31, got {day}"
                    )));
                }
                Pattern::Monthly { month_day: day as u8 }
            }
            Frequency::Yearly => Pattern::Yearly,
            Frequency::Custom => Pattern::Custom,
        };

        let interval = u32::try_from(record.interval)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                PearlError::validation(format!(
                    "Recurrence interval must be a positive integer, got {}",
                    record.interval
                ))
            })?;

        let start_date = parse_optional_date(record.start_date.as_deref())?;
        let end_date = parse_optional_date(record.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(PearlError::validation(format!(
                    "Recurrence endDate {end} is before startDate {start}"
                )));
            }
        }

        Ok(Some(Self {
            pattern,
            interval,
            start_date,
            end_date,
        }))
    }

    pub fn frequency(&self) -> Frequency {
        match self.pattern {
            Pattern::Daily => Frequency::Daily,
            Pattern::Weekly { .. } => Frequency::Weekly,
            Pattern::Monthly { .. } => Frequency::Monthly,
            Pattern::Yearly => Frequency::Yearly,
            Pattern::Custom => Frequency::Custom,
        }
    }

    /// Date the rule counts from: the explicit start, else the given due date.
    pub fn anchor(&self, due_date: Option<NaiveDate>) -> Option<NaiveDate> {
        self.start_date.or(due_date)
    }

    /// One-line description, e.g. `weekly (every 2 weeks)`.
    pub fn summary(&self) -> String {
        let frequency = self.frequency();
        let n = self.interval.get();
        let every = if n == 1 {
            frequency.unit().to_string()
        } else {
            format!("{n} {}s", frequency.unit())
        };
        let mut text = format!("{} (every {every})", frequency.as_str());
        match &self.pattern {
            Pattern::Weekly { week_days } if !week_days.is_empty() => {
                let codes: Vec<&str> = week_days.iter().map(|d| d.code()).collect();
                text.push_str(&format!(" on {}", codes.join(",")));
            }
            Pattern::Monthly { month_day } => {
                text.push_str(&format!(" on day {month_day}"));
            }
            _ => {}
        }
        text
    }
}

impl From<Recurrence> for RecurrenceRecord {
    fn from(rule: Recurrence) -> Self {
        let mut record = RecurrenceRecord::new(rule.frequency());
        record.interval = i64::from(rule.interval.get());
        match rule.pattern {
            Pattern::Weekly { week_days } => record.week_days = week_days,
            Pattern::Monthly { month_day } => record.month_day = Some(i64::from(month_day)),
            _ => {}
        }
        record.start_date = rule.start_date.map(|d| d.to_string());
        record.end_date = rule.end_date.map(|d| d.to_string());
        record
    }
}

/// Encode a rule for storage. Absence stays absent, never an empty record.
pub fn encode(rule: Option<&Recurrence>) -> Result<Option<String>, PearlError> {
    match rule {
        Some(rule) => {
            let record = RecurrenceRecord::from(rule.clone());
            Ok(Some(serde_json::to_string(&record)?))
        }
        None => Ok(None),
    }
}

/// Decode a stored rule. Null, blank text and `frequency: none` decode to `None`.
pub fn decode(text: Option<&str>) -> Result<Option<Recurrence>, PearlError> {
    let text = match text.map(str::trim) {
        None | Some("") | Some("null") => return Ok(None),
        Some(t) => t,
    };
    let record: RecurrenceRecord = serde_json::from_str(text)
        .map_err(|e| PearlError::decode(format!("Malformed recurrence rule: {e}")))?;
    Recurrence::from_record(record).map_err(PearlError::into_decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_round_trip() {
        let mut record = RecurrenceRecord::new(Frequency::Weekly);
        record.interval = 2;
        record.week_days = vec![WeekDay::Monday, WeekDay::Wednesday];
        let rule = Recurrence::from_record(record).unwrap().unwrap();

        let text = encode(Some(&rule)).unwrap().unwrap();
        let back = decode(Some(&text)).unwrap().unwrap();
        assert_eq!(back.frequency(), Frequency::Weekly);
        assert_eq!(back.interval.get(), 2);
        assert_eq!(
            back.pattern,
            Pattern::Weekly { week_days: vec![WeekDay::Monday, WeekDay::Wednesday] }
        );
    }

    #[test]
    fn test_none_is_absent() {
        let record = RecurrenceRecord::new(Frequency::None);
        assert!(Recurrence::from_record(record).unwrap().is_none());
        assert_eq!(encode(None).unwrap(), None);
        assert!(decode(None).unwrap().is_none());
        assert!(decode(Some("")).unwrap().is_none());
        assert!(decode(Some(r#"{"frequency":"none","interval":1}"#)).unwrap().is_none());
    }

    #[test]
    fn test_irrelevant_fields_dropped() {
        let mut record = RecurrenceRecord::new(Frequency::Daily);
        record.week_days = vec![WeekDay::Friday];
        record.month_day = Some(40);
        let rule = Recurrence::from_record(record).unwrap().unwrap();
        assert_eq!(rule.pattern, Pattern::Daily);

        let text = encode(Some(&rule)).unwrap().unwrap();
        assert!(!text.contains("weekDays"));
        assert!(!text.contains("monthDay"));
    }

    #[test]
    fn test_week_days_sorted_and_deduplicated() {
        let rule = decode(Some(
            r#"{"frequency":"weekly","interval":1,"weekDays":["FR","MO","FR"]}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(
            rule.pattern,
            Pattern::Weekly { week_days: vec![WeekDay::Monday, WeekDay::Friday] }
        );
    }

    #[test]
    fn test_interval_rejected_when_not_positive() {
        for interval in [0, -3] {
            let mut record = RecurrenceRecord::new(Frequency::Daily);
            record.interval = interval;
            let err = Recurrence::from_record(record).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        assert!(Recurrence::new(Pattern::Daily, 0).is_err());
    }

    #[test]
    fn test_month_day_range() {
        let mut record = RecurrenceRecord::new(Frequency::Monthly);
        record.month_day = Some(32);
        assert!(Recurrence::from_record(record.clone()).is_err());
        record.month_day = Some(0);
        assert!(Recurrence::from_record(record.clone()).is_err());
        record.month_day = None;
        let rule = Recurrence::from_record(record).unwrap().unwrap();
        assert_eq!(rule.pattern, Pattern::Monthly { month_day: 1 });
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut record = RecurrenceRecord::new(Frequency::Daily);
        record.start_date = Some("2024-05-10".into());
        record.end_date = Some("2024-05-01".into());
        assert_eq!(
            Recurrence::from_record(record).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_empty_dates_are_absent() {
        let rule = decode(Some(
            r#"{"frequency":"daily","interval":1,"startDate":"","endDate":null}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(rule.start_date, None);
        assert_eq!(rule.end_date, None);
    }

    #[test]
    fn test_decode_errors() {
        for bad in [
            "not json",
            r#"{"frequency":"fortnightly"}"#,
            r#"{"frequency":"weekly","weekDays":["XX"]}"#,
            r#"{"frequency":"daily","interval":0}"#,
        ] {
            let err = decode(Some(bad)).unwrap_err();
            assert_eq!(err.code, ErrorCode::DecodeError, "input: {bad}");
        }
    }

    #[test]
    fn test_week_day_codes_case_insensitive() {
        let rule = decode(Some(r#"{"frequency":"weekly","weekDays":["we"," Mo "]}"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            rule.pattern,
            Pattern::Weekly { week_days: vec![WeekDay::Monday, WeekDay::Wednesday] }
        );
        assert_eq!(WeekDay::from_code("we"), Some(WeekDay::Wednesday));

        let err = decode(Some(r#"{"frequency":"weekly","weekDays":["XX"]}"#)).unwrap_err();
        assert!(err.message.contains("unknown weekday code 'XX'"), "{}", err.message);
    }

    #[test]
    fn test_anchor_prefers_start_date() {
        let mut rule = Recurrence::new(Pattern::Yearly, 1).unwrap();
        assert_eq!(rule.anchor(Some(date(2024, 3, 1))), Some(date(2024, 3, 1)));
        rule.start_date = Some(date(2024, 1, 1));
        assert_eq!(rule.anchor(Some(date(2024, 3, 1))), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_summary() {
        let rule = Recurrence::new(Pattern::Daily, 1).unwrap();
        assert_eq!(rule.summary(), "daily (every day)");
        let rule = Recurrence::new(
            Pattern::Weekly { week_days: vec![WeekDay::Monday, WeekDay::Wednesday] },
            2,
        )
        .unwrap();
        assert_eq!(rule.summary(), "weekly (every 2 weeks) on MO,WE");
        let rule = Recurrence::new(Pattern::Monthly { month_day: 15 }, 1).unwrap();
        assert_eq!(rule.summary(), "monthly (every month) on day 15");
    }
}
