//! LP Yield Engine - liquidity-provider yield projections for an RWA lending platform
//!
//! This library provides:
//! - Normalization of loosely-typed ledger position records
//! - Portfolio aggregates (total principal, weighted rate and duration)
//! - Expected and earned-to-date ROI projections with maturity tracking
//! - Monthly earned-ROI and active-liquidity chart series
//! - Batch snapshot computation and a scoped live-refresh timer

pub mod position;
pub mod projection;
pub mod ticker;

// Re-export commonly used types
pub use position::{LiquidityPosition, LoadError};
pub use projection::{AnalyticsSnapshot, PortfolioAggregate, SeriesPoint, DEFAULT_MONTH_WINDOW};
pub use ticker::RefreshTimer;
