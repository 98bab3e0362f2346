//! Computation core: derived totals, version suggestion, dashboard
//! rollups, stats cache refresh, and per-project statistics.

pub mod project_stats;
pub mod rollup;
pub mod stats_cache;
pub mod totals;
pub mod versioning;
