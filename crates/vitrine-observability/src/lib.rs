//! Structured logging for Vitrine batch jobs.
//!
//! This crate provides:
//! - `RunId` - Correlation id shared by every entry of one job run
//! - `StructuredLogger` - Structured logging with run context
//! - `LogBuilder` - Fluent entries with typed fields

mod logging;
mod run_id;

pub use logging::*;
pub use run_id::*;
