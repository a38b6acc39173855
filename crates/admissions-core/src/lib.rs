//! Admission decision workflow engine: case intake, completeness
//! validation, checklist review, and the faculty/central-authority decision
//! hand-off.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
