use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// One square of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the filler days borrowed from the previous or next month.
    pub in_month: bool,
}

/// Map a settings index (0 = Sunday .. 6 = Saturday) to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Days between the start of the week and `day`, in 0..7.
fn offset_in_week(day: Weekday, start_of_week: Weekday) -> u64 {
    u64::from((day.num_days_from_sunday() + 7 - start_of_week.num_days_from_sunday()) % 7)
}

pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Full weeks covering the month of `reference`, starting on `start_of_week`.
///
/// The grid runs from the start of the week holding the 1st to the end of the
/// week holding the last day, so its length is always a multiple of 7.
pub fn month_grid(reference: NaiveDate, start_of_week: Weekday) -> Vec<DayCell> {
    let (Some(first), Some(last)) = (reference.with_day(1), last_day_of_month(reference)) else {
        return Vec::new();
    };

    let leading = offset_in_week(first.weekday(), start_of_week);
    let trailing = 6 - offset_in_week(last.weekday(), start_of_week);
    let (Some(grid_start), Some(grid_end)) = (
        first.checked_sub_days(Days::new(leading)),
        last.checked_add_days(Days::new(trailing)),
    ) else {
        return Vec::new();
    };

    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| DayCell {
            date,
            in_month: date.year() == first.year() && date.month() == first.month(),
        })
        .collect()
}
