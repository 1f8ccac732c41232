//! Alert records produced by the engine.

use brandwatch_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What kind of competitive signal an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    PriceCheaper,
    CategoryGap,
    CompetitorPromo,
    UnderpricedItem,
}

/// Urgency classification. Declaration order is the ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank: High 0, Medium 1, Low 2.
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }
}

/// Evidence behind an alert, one shape per rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertData {
    BrandPriceGap {
        #[serde(with = "rust_decimal::serde::float")]
        reference_avg: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        competitor_avg: Decimal,
        gap_percent: i64,
    },
    CategoryGap {
        category: String,
        /// Every competitor present in the category, first encountered first.
        brands: Vec<String>,
    },
    CompetitorPromo {
        product_id: ProductId,
        product: String,
        /// Absolute discount in percent.
        #[serde(with = "rust_decimal::serde::float")]
        discount: Decimal,
    },
    UnderpricedItem {
        product_id: ProductId,
        product: String,
        #[serde(with = "rust_decimal::serde::float")]
        product_price: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        reference_avg: Decimal,
        category: String,
        gap_percent: i64,
    },
}

/// A single ranked competitive signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Brand the alert is about (a representative one for category gaps).
    pub brand: String,
    pub data: AlertData,
}
