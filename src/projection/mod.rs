//! Pure projection operations over liquidity position snapshots

mod aggregate;
mod series;
mod snapshot;

pub use aggregate::{
    aggregate, apy_tier, earned_to_date, expected_return, has_matured_position, nearest_maturity,
    PortfolioAggregate,
};
pub use series::{
    monthly_active_liquidity_series, monthly_earned_series, SeriesPoint, DEFAULT_MONTH_WINDOW,
};
pub use snapshot::{compute_batch, AnalyticsSnapshot};
