//! One-shot analytics snapshot: everything a dashboard view renders
//!
//! A snapshot is recomputed from the same immutable position slice on every
//! tick or refresh; nothing here holds state between invocations.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::position::LiquidityPosition;

use super::aggregate::{
    aggregate, apy_tier, earned_to_date, expected_return, has_matured_position, nearest_maturity,
    PortfolioAggregate,
};
use super::series::{monthly_active_liquidity_series, monthly_earned_series, SeriesPoint};

/// Display-ready analytics for one portfolio at one instant
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    /// Reference timestamp the snapshot was evaluated at
    pub as_of: DateTime<Utc>,

    pub position_count: usize,
    pub matured_count: usize,

    pub aggregate: PortfolioAggregate,

    /// Total return expected over all committed durations
    pub expected_return: f64,

    /// Return earned up to `as_of`
    pub earned_to_date: f64,

    /// Rate shown on the dashboard: the weighted actual rate when positions
    /// carry one, otherwise the APY tier for the total amount
    pub display_rate: f64,

    /// True when `display_rate` came from the tier table rather than
    /// actual positions
    pub rate_is_fallback: bool,

    /// Earliest maturity still ahead of `as_of`
    pub nearest_maturity: Option<DateTime<Utc>>,

    /// True when at least one position has matured
    pub withdraw_available: bool,

    /// Cumulative earned ROI per calendar month, oldest first
    pub earned_series: Vec<SeriesPoint>,

    /// Active principal per calendar month, oldest first
    pub active_liquidity_series: Vec<SeriesPoint>,
}

impl AnalyticsSnapshot {
    /// Evaluate every projection operation over `positions` at `as_of`
    pub fn compute(
        positions: &[LiquidityPosition],
        as_of: DateTime<Utc>,
        month_window: usize,
    ) -> Self {
        let agg = aggregate(positions);

        let (display_rate, rate_is_fallback) = if agg.weighted_rate > 0.0 {
            (agg.weighted_rate, false)
        } else {
            (apy_tier(agg.total_amount), true)
        };

        Self {
            as_of,
            position_count: positions.len(),
            matured_count: positions.iter().filter(|p| p.is_matured(as_of)).count(),
            aggregate: agg,
            expected_return: expected_return(positions),
            earned_to_date: earned_to_date(positions, as_of),
            display_rate,
            rate_is_fallback,
            nearest_maturity: nearest_maturity(positions, as_of),
            withdraw_available: has_matured_position(positions, as_of),
            earned_series: monthly_earned_series(positions, as_of, month_window),
            active_liquidity_series: monthly_active_liquidity_series(positions, as_of, month_window),
        }
    }
}

/// Compute snapshots for many portfolios in parallel
///
/// Used for platform-wide analytics jobs where one snapshot per LP account
/// is evaluated against the same reference time.
pub fn compute_batch(
    portfolios: &[Vec<LiquidityPosition>],
    as_of: DateTime<Utc>,
    month_window: usize,
) -> Vec<AnalyticsSnapshot> {
    portfolios
        .par_iter()
        .map(|positions| AnalyticsSnapshot::compute(positions, as_of, month_window))
        .collect()
}
