//! Shared data models for the extraction pipeline.

pub mod config;

pub use config::{ConditioningConfig, IntakeConfig, InvexConfig, OcrConfig, RasterConfig};
