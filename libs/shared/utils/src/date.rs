use chrono::{Datelike, Duration, NaiveDate};

/// First day of the week containing `reference`. Weeks start on Sunday,
/// matching the calendar views.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(reference.weekday().num_days_from_sunday() as i64)
}

/// The 7-day window starting at the week's first day.
pub fn week_of(reference: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(reference);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}
