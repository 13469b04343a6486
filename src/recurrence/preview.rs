use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PearlError;
use crate::models::date::parse_optional_date;
use crate::models::RuleInput;

use super::occurrence::{generate, generate_within_end, DEFAULT_PREVIEW_COUNT, MAX_PREVIEW_COUNT};
use super::Frequency;

/// A request to preview a rule, as accepted by the API and built by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    /// Anchor date; falls back to the rule's `startDate`.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub rule: Option<RuleInput>,
    #[serde(default)]
    pub count: Option<usize>,
    /// Drop dates after the rule's `endDate`.
    #[serde(default)]
    pub bounded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub frequency: Frequency,
    pub summary: Option<String>,
    pub start: Option<NaiveDate>,
    pub dates: Vec<NaiveDate>,
}

impl PreviewRequest {
    pub fn run(self) -> Result<Preview, PearlError> {
        let count = self.count.unwrap_or(DEFAULT_PREVIEW_COUNT);
        if count > MAX_PREVIEW_COUNT {
            return Err(PearlError::validation(format!(
                "count must be at most {MAX_PREVIEW_COUNT}, got {count}"
            )));
        }
        let rule = match self.rule {
            Some(input) => input.into_rule()?,
            None => None,
        };
        let start = match parse_optional_date(self.start.as_deref())? {
            Some(date) => Some(date),
            None => rule.as_ref().and_then(|r| r.start_date),
        };
        let dates = if self.bounded {
            generate_within_end(start, rule.as_ref(), count)
        } else {
            generate(start, rule.as_ref(), count)
        };
        Ok(Preview {
            frequency: rule.as_ref().map_or(Frequency::None, |r| r.frequency()),
            summary: rule.as_ref().map(|r| r.summary()),
            start,
            dates,
        })
    }
}
