//! Shared domain types for the restaurant sales dashboard.
//!
//! Holds the error types, the order-line model with its derived calendar
//! fields, timestamp parsing, display formatting and the CLI settings used
//! by every other crate in the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamps;
