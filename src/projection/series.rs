//! Calendar-month bucketing for dashboard chart series
//!
//! Both series cover the last N calendar months including the month of the
//! reference timestamp, oldest first, always exactly N points.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::position::LiquidityPosition;

/// Default chart window used by the dashboard
pub const DEFAULT_MONTH_WINDOW: usize = 6;

/// One chart point: month label plus the value for that month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Short month name, e.g. "Jan"
    pub label: String,
    pub value: f64,
}

/// A calendar month interval `[start, end]` in UTC
#[derive(Debug, Clone, Copy)]
struct MonthBucket {
    start: DateTime<Utc>,
    /// Last instant of the month
    end: DateTime<Utc>,
}

impl MonthBucket {
    fn new(year: i32, month: u32) -> Self {
        let start = month_start(year, month);
        // month0 index of the following month
        let next_index = year * 12 + month as i32;
        let next_start = month_start(next_index.div_euclid(12), next_index.rem_euclid(12) as u32 + 1);
        Self {
            start,
            end: next_start - Duration::milliseconds(1),
        }
    }

    fn label(&self) -> String {
        self.start.format("%b").to_string()
    }
}

/// First instant of a calendar month in UTC
///
/// `month` is always 1..=12 here, so the fallback is unreachable; it exists
/// only to keep the construction panic-free.
fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// The last `window` calendar months up to and including `now`'s month,
/// oldest first
fn month_window(now: DateTime<Utc>, window: usize) -> Vec<MonthBucket> {
    let base = now.year() * 12 + now.month0() as i32;
    (0..window as i32)
        .rev()
        .map(|offset| {
            let index = base - offset;
            MonthBucket::new(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cumulative earned ROI as of the end of each month in the window
///
/// Uses the same linear progress interpolation as `earned_to_date`, with the
/// reference time pinned to each month's last instant. Positions created
/// after a month's end contribute 0 to that month, so the per-position
/// series is monotonically non-decreasing. Values are rounded to cents.
pub fn monthly_earned_series(
    positions: &[LiquidityPosition],
    now: DateTime<Utc>,
    month_window_len: usize,
) -> Vec<SeriesPoint> {
    month_window(now, month_window_len)
        .iter()
        .map(|bucket| {
            let earned: f64 = positions
                .iter()
                .filter(|p| p.created_at <= bucket.end)
                .map(|p| p.earned_to_date(bucket.end))
                .sum();
            SeriesPoint {
                label: bucket.label(),
                value: round_cents(earned),
            }
        })
        .collect()
}

/// Principal active during each month in the window
///
/// A position counts toward a month when its `[created_at, end_date]`
/// interval overlaps it (`created_at <= month_end && end_date >=
/// month_start`). This is a step function, not cumulative: the series drops
/// as positions mature.
pub fn monthly_active_liquidity_series(
    positions: &[LiquidityPosition],
    now: DateTime<Utc>,
    month_window_len: usize,
) -> Vec<SeriesPoint> {
    month_window(now, month_window_len)
        .iter()
        .map(|bucket| {
            let active: f64 = positions
                .iter()
                .filter(|p| p.created_at <= bucket.end && p.end_date() >= bucket.start)
                .map(|p| p.amount)
                .sum();
            SeriesPoint {
                label: bucket.label(),
                value: active,
            }
        })
        .collect()
}
