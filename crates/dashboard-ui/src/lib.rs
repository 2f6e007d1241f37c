//! Terminal UI layer for the restaurant sales dashboard.
//!
//! Provides themes, the header and filter selector components, table and
//! chart views, the page layout, the printed summary, and the main
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod dashboard_view;
pub mod summary;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
