//! Click analytics: agent classification and single-pass aggregation

pub mod aggregator;
pub mod classifier;

pub use aggregator::{
    ClickAccumulator, ClickSummary, DateBucket, DeviceStats, LinkClickStats, OsStats,
    WINDOW_DAYS, local_today, summarize_events, summarize_links,
};
pub use classifier::{DeviceCategory, OsCategory, classify_device, classify_os};
