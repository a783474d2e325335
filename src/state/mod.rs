//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `ProductOutcome`: What happened to each product endpoint (harvested or failed)
//! - `FailureKind`: Classification of a failed product endpoint

mod outcome;

// Re-export main types
pub use outcome::{FailureKind, ProductOutcome};
