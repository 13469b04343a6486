use chrono::{Days, Months, NaiveDate};

use super::{Pattern, Recurrence};

/// Number of occurrences shown after the anchor when a caller does not ask.
pub const DEFAULT_PREVIEW_COUNT: usize = 10;

/// Upper bound on `count` accepted from clients.
pub const MAX_PREVIEW_COUNT: usize = 366;

/// Preview the dates a rule produces from `start`.
///
/// Returns the anchor followed by `count` dates, the k-th one being the anchor
/// advanced by `interval * k` units of the rule's frequency. Months and years
/// clamp to the last valid day of the target month (Jan 31 + 1 month is
/// Feb 28/29). `custom` has no unit and yields the anchor alone. A missing
/// rule or start yields nothing. `end_date` is not applied here; see
/// [`generate_within_end`].
pub fn generate(start: Option<NaiveDate>, rule: Option<&Recurrence>, count: usize) -> Vec<NaiveDate> {
    let (Some(anchor), Some(rule)) = (start, rule) else {
        return Vec::new();
    };

    if rule.pattern == Pattern::Custom {
        return vec![anchor];
    }

    // `count` is caller-controlled; grow past the preview cap on demand.
    let mut dates = Vec::with_capacity(count.min(MAX_PREVIEW_COUNT).saturating_add(1));
    dates.push(anchor);

    let step = u64::from(rule.interval.get());
    for k in 1..=count as u64 {
        // Stops early only past chrono's representable range.
        match step.checked_mul(k).and_then(|units| advance(anchor, &rule.pattern, units)) {
            Some(date) => dates.push(date),
            None => break,
        }
    }
    dates
}

/// Same as [`generate`], then drops dates after the rule's `end_date`.
pub fn generate_within_end(
    start: Option<NaiveDate>,
    rule: Option<&Recurrence>,
    count: usize,
) -> Vec<NaiveDate> {
    let mut dates = generate(start, rule, count);
    if let Some(end) = rule.and_then(|r| r.end_date) {
        dates.retain(|d| *d <= end);
    }
    dates
}

fn advance(anchor: NaiveDate, pattern: &Pattern, units: u64) -> Option<NaiveDate> {
    match pattern {
        Pattern::Daily => anchor.checked_add_days(Days::new(units)),
        Pattern::Weekly { .. } => anchor.checked_add_days(Days::new(units.checked_mul(7)?)),
        Pattern::Monthly { .. } => anchor.checked_add_months(Months::new(u32::try_from(units).ok()?)),
        Pattern::Yearly => {
            let months = u32::try_from(units.checked_mul(12)?).ok()?;
            anchor.checked_add_months(Months::new(months))
        }
        Pattern::Custom => None,
    }
}
