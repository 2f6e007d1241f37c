//! Runtime layer for the sales dashboard.
//!
//! Owns the process-wide dataset cache and the interactive session state
//! that turns user input into fresh dashboard snapshots.

pub mod data_manager;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
