//! Output writers for replay reports.

pub mod json;
pub mod schema;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use schema::{ReplayReport, ReplaySummary};
