//! Weekly average-grade trend for charting a climber's progress.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::logging::debug;
use crate::record::SendRecord;
use crate::scoring::parse_grade;

/// Number of weeks covered by a trend, including the current one.
pub const TREND_WEEKS: usize = 24;

/// One point of the trend series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Mean grade of the sends logged that week, `0.0` when there were none.
    pub average_grade: f64,
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Whole weeks between the week of `then` and the week of `now`.
///
/// Zero for the current week, negative for future weeks.
pub fn week_offset(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let days = week_start(now.date_naive())
        .signed_duration_since(week_start(then.date_naive()))
        .num_days();
    days.div_euclid(7)
}

/// Average grade per week over the last [`TREND_WEEKS`] weeks, oldest first.
///
/// Sends with an unreadable grade are skipped rather than counted as zero,
/// as are sends outside the window. Point `i` is dated
/// `as_of - 7 * (23 - i)` days.
pub fn weekly_trend<'a, I>(records: I, as_of: DateTime<Utc>) -> [TrendPoint; TREND_WEEKS]
where
    I: IntoIterator<Item = &'a SendRecord>,
{
    // Indexed by week offset: 0 is this week.
    let mut buckets = [(0.0_f64, 0_u32); TREND_WEEKS];

    for record in records {
        let Some(grade) = parse_grade(&record.grade) else {
            continue;
        };
        let Ok(offset) = usize::try_from(week_offset(record.timestamp, as_of)) else {
            continue;
        };
        if let Some((sum, count)) = buckets.get_mut(offset) {
            *sum += grade as f64;
            *count += 1;
        }
    }

    debug!(
        weeks = buckets.iter().filter(|(_, count)| *count > 0).count(),
        "bucketed weekly trend"
    );

    let today = as_of.date_naive();
    std::array::from_fn(|i| {
        let offset = TREND_WEEKS - 1 - i;
        let average_grade = match buckets.get(offset) {
            Some(&(sum, count)) if count > 0 => sum / f64::from(count),
            _ => 0.0,
        };
        let date = today
            .checked_sub_days(Days::new(7 * offset as u64))
            .unwrap_or(today);
        TrendPoint {
            date,
            average_grade,
        }
    })
}
