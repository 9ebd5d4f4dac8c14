//! Per-student usage analytics over the seat ledger.

pub mod aggregator;

pub use aggregator::{AnalyticsAggregator, SectionUsage, UsageSummary};
