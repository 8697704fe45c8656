//! Risk scoring and priority-driven batch processing for debt recovery.

pub mod config;
pub mod error;
pub mod recording;
pub mod telemetry;
pub mod workflows;
