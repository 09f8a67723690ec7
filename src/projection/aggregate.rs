//! Portfolio-level aggregates, ROI projections, and maturity queries
//!
//! Every function is a pure fold over a position slice plus an explicit
//! reference timestamp. Empty input always yields identity values (0 or
//! `None`), never NaN or infinity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::position::LiquidityPosition;

/// Amount-weighted portfolio aggregates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioAggregate {
    /// Sum of principal across positions
    pub total_amount: f64,

    /// Amount-weighted average annual rate (0 when no principal)
    pub weighted_rate: f64,

    /// Amount-weighted average duration in months (0 when no principal)
    pub weighted_duration: f64,
}

impl PortfolioAggregate {
    /// Identity aggregate for an empty portfolio
    pub fn zero() -> Self {
        Self {
            total_amount: 0.0,
            weighted_rate: 0.0,
            weighted_duration: 0.0,
        }
    }
}

/// Compute total principal and amount-weighted rate/duration averages
pub fn aggregate(positions: &[LiquidityPosition]) -> PortfolioAggregate {
    let total_amount: f64 = positions.iter().map(|p| p.amount).sum();
    if total_amount <= 0.0 {
        return PortfolioAggregate::zero();
    }

    let rate_sum: f64 = positions.iter().map(|p| p.amount * p.interest_rate).sum();
    let duration_sum: f64 = positions
        .iter()
        .map(|p| p.amount * p.duration_months as f64)
        .sum();

    PortfolioAggregate {
        total_amount,
        weighted_rate: rate_sum / total_amount,
        weighted_duration: duration_sum / total_amount,
    }
}

/// Total return expected across all positions over their full durations
pub fn expected_return(positions: &[LiquidityPosition]) -> f64 {
    positions.iter().map(|p| p.total_expected_return()).sum()
}

/// Return earned across all positions up to `now`
///
/// Converges to `expected_return` once every position has matured.
pub fn earned_to_date(positions: &[LiquidityPosition], now: DateTime<Utc>) -> f64 {
    positions.iter().map(|p| p.earned_to_date(now)).sum()
}

/// Fallback display APY for a given total liquidity amount
///
/// Tier boundaries are inclusive on the lower bound. Only used when no
/// positions carry a real weighted rate yet.
pub fn apy_tier(total_amount: f64) -> f64 {
    if total_amount >= 1_000_000.0 {
        20.0
    } else if total_amount >= 100_000.0 {
        18.0
    } else if total_amount >= 10_000.0 {
        14.0
    } else {
        12.0
    }
}

/// Earliest maturity strictly after `now`
///
/// `None` when the portfolio is empty or every position has already matured.
pub fn nearest_maturity(
    positions: &[LiquidityPosition],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    positions
        .iter()
        .map(|p| p.end_date())
        .filter(|end| *end > now)
        .min()
}

/// Whether at least one position has matured (withdraw becomes available)
pub fn has_matured_position(positions: &[LiquidityPosition], now: DateTime<Utc>) -> bool {
    positions.iter().any(|p| p.is_matured(now))
}
