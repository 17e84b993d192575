// src/stats/mod.rs
//! Owner-scoped read-only aggregates over analyses and comparisons

pub mod aggregate;
pub mod service;
pub mod types;

pub use aggregate::{TREND_DAYS, merge_activity, zero_fill_trend};
pub use service::StatsService;
pub use types::{
    ActivityEntry, ActivityKind, ChangeBreakdown, IssueFrequency, OverviewStats, TrendPoint,
};
