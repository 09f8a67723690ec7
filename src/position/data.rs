//! Liquidity position records and per-position derived math

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// A single liquidity contribution fetched from the platform ledger
///
/// Positions are read-only snapshots: the engine never creates, mutates,
/// or deletes them. All mutation happens through the ledger API and is
/// reflected only by re-fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPosition {
    /// Ledger identifier, display only
    pub id: Option<String>,

    /// Principal contributed (non-negative after normalization)
    pub amount: f64,

    /// Annual percentage rate, e.g. 12.0 for 12% APY
    pub interest_rate: f64,

    /// Committed duration in months
    pub duration_months: u32,

    /// Position start timestamp
    pub created_at: DateTime<Utc>,

    /// Ledger status string, carried through untouched
    pub status: Option<String>,
}

impl LiquidityPosition {
    /// Create a position, clamping negative or non-finite numeric inputs to 0
    pub fn new(
        amount: f64,
        interest_rate: f64,
        duration_months: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            amount: clamp_non_negative(amount),
            interest_rate: clamp_non_negative(interest_rate),
            duration_months,
            created_at,
            status: None,
        }
    }

    /// Maturity instant: `created_at` plus the committed duration in calendar months
    ///
    /// Saturates at the maximum representable timestamp if the addition
    /// overflows chrono's range.
    pub fn end_date(&self) -> DateTime<Utc> {
        self.created_at
            .checked_add_months(Months::new(self.duration_months))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Total return expected over the full committed duration
    ///
    /// Monthly rate is the annual APY divided by 12, applied as simple
    /// interest for `duration_months` months.
    pub fn total_expected_return(&self) -> f64 {
        self.amount * (self.interest_rate / 12.0 / 100.0) * self.duration_months as f64
    }

    /// Fraction of the committed duration elapsed at `now`, clamped to [0, 1]
    ///
    /// A zero-duration position resolves to 1.0 (instantly matured) rather
    /// than dividing elapsed time by a zero interval.
    pub fn progress_ratio(&self, now: DateTime<Utc>) -> f64 {
        let end = self.end_date();
        if end <= self.created_at {
            return 1.0;
        }

        let total_ms = (end - self.created_at).num_milliseconds() as f64;
        let elapsed_ms = (now - self.created_at).num_milliseconds() as f64;
        (elapsed_ms / total_ms).clamp(0.0, 1.0)
    }

    /// Return earned up to `now`: linear interpolation of the expected
    /// return by elapsed progress
    pub fn earned_to_date(&self, now: DateTime<Utc>) -> f64 {
        self.total_expected_return() * self.progress_ratio(now)
    }

    /// Whether the committed duration has fully elapsed at `now`
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.end_date() <= now
    }
}

/// Coerce negative or non-finite values to 0 so malformed ledger data never
/// propagates NaN into displayed totals
pub(crate) fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_expected_return() {
        // 12,000 at 12% APY for 12 months: 12000 * (12/12/100) * 12 = 1440.00
        let p = LiquidityPosition::new(12_000.0, 12.0, 12, start());
        assert_relative_eq!(p.total_expected_return(), 1_440.0);
    }

    #[test]
    fn test_earned_convergence() {
        let p = LiquidityPosition::new(12_000.0, 12.0, 12, start());

        // Nothing earned at inception
        assert_relative_eq!(p.earned_to_date(start()), 0.0);

        // Full convergence at maturity
        let maturity = p.end_date();
        assert_relative_eq!(p.earned_to_date(maturity), 1_440.0);

        // And no over-accrual past maturity
        let later = maturity + chrono::Duration::days(90);
        assert_relative_eq!(p.earned_to_date(later), 1_440.0);
    }

    #[test]
    fn test_progress_ratio_bounds() {
        let p = LiquidityPosition::new(5_000.0, 10.0, 6, start());

        let before = start() - chrono::Duration::days(30);
        assert_relative_eq!(p.progress_ratio(before), 0.0);

        let mid = start() + chrono::Duration::days(91);
        let ratio = p.progress_ratio(mid);
        assert!(ratio > 0.0 && ratio < 1.0);

        let after = p.end_date() + chrono::Duration::days(1);
        assert_relative_eq!(p.progress_ratio(after), 1.0);
    }

    #[test]
    fn test_zero_duration_matures_instantly() {
        let p = LiquidityPosition::new(1_000.0, 12.0, 0, start());

        assert_eq!(p.end_date(), p.created_at);
        assert_relative_eq!(p.progress_ratio(start()), 1.0);
        assert!(p.is_matured(start()));
        assert!(p.earned_to_date(start()).is_finite());
        assert_relative_eq!(p.earned_to_date(start()), 0.0);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let p = LiquidityPosition::new(-500.0, -3.0, 6, start());
        assert_relative_eq!(p.amount, 0.0);
        assert_relative_eq!(p.interest_rate, 0.0);
        assert_relative_eq!(p.total_expected_return(), 0.0);
    }

    #[test]
    fn test_maturity() {
        let p = LiquidityPosition::new(5_000.0, 14.0, 3, start());
        let end = Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap();
        assert_eq!(p.end_date(), end);
        assert!(!p.is_matured(end - chrono::Duration::seconds(1)));
        assert!(p.is_matured(end));
    }
}
