//! Competitive alert engine.
//!
//! This crate provides:
//! - Four rule evaluators over a catalog snapshot (brand price gap,
//!   assortment gap, competitor promotion, underpriced competitor item)
//! - Stable severity ranking of the merged alert list
//! - YAML-based `AlertConfig` documents for thresholds and brand aliases
//! - Category/brand key normalization and a per-invocation catalog index

pub mod alert;
pub mod alert_config;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod metadata;
pub mod normalize;
pub mod summary;

pub use alert::{Alert, AlertData, AlertType, Severity};
pub use alert_config::{
    engine_config_for, load_alert_config, parse_alert_config, EngineConfig, Thresholds,
};
pub use error::{Result, RuleError};
pub use evaluator::{generate_alerts, rank_alerts, AlertEngine};
pub use summary::{filter_by_type, AlertSummary};
