//! Data layer for the restaurant sales dashboard.
//!
//! Loads the sales CSV into an immutable [`dataset::Dataset`], narrows it
//! with the filter engine, and runs the aggregation pipeline that feeds
//! every table, chart and KPI.

pub mod aggregator;
pub mod analysis;
pub mod dataset;
pub mod filter;
pub mod reader;

pub use dashboard_core as core;
