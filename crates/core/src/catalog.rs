//! Catalog data model: brand aggregates, products, promotions and price history.
//!
//! These are the read-only feeds the dashboard fetches from the catalog
//! backend. Prices are exact decimals so ratio thresholds compare exactly.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{BrandwatchError, Result};

/// Catalog-wide product identifier.
pub type ProductId = i64;

// ── Brand aggregates ──────────────────────────────────────────

/// Brand-level summary statistics computed upstream from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAggregate {
    pub brand: String,
    #[serde(default)]
    pub product_count: u32,
    pub avg_price: Decimal,
    #[serde(default)]
    pub min_price: Decimal,
    #[serde(default)]
    pub max_price: Decimal,
    #[serde(default)]
    pub sites: BTreeSet<String>,
}

impl BrandAggregate {
    /// `min_price <= avg_price <= max_price`.
    pub fn has_consistent_range(&self) -> bool {
        self.min_price <= self.avg_price && self.avg_price <= self.max_price
    }

    /// An aggregate with no priced products reports a zero average.
    pub fn has_prices(&self) -> bool {
        self.avg_price > Decimal::ZERO
    }
}

// ── Products ──────────────────────────────────────────────────

/// A single catalog entry scraped from one retail site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub brand: String,
    pub name: String,
    /// Free-text category as scraped; compare only after normalization.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub site: String,
}

// ── Promotions ────────────────────────────────────────────────

/// A product currently priced below its last price observed before the
/// lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecord {
    /// The promotions endpoint reports the product's id as `id`.
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Signed price change in percent; negative for a discount.
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PromotionRecord {
    /// Reported discount, or one derived from the price pair when absent.
    pub fn discount(&self) -> Option<Decimal> {
        self.discount_percent
            .or_else(|| discount_percent(self.old_price?, self.current_price?))
    }
}

/// Signed percentage change from `old` to `current`, rounded to 2 dp.
///
/// Returns `None` when `old` is zero or the change is not representable.
pub fn discount_percent(old: Decimal, current: Decimal) -> Option<Decimal> {
    let ratio = current.checked_sub(old)?.checked_div(old)?;
    let percent = ratio.checked_mul(Decimal::ONE_HUNDRED)?;
    Some(percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Arithmetic mean; `None` for no values or when the sum overflows.
pub fn checked_mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len()))
}

// ── Price history ─────────────────────────────────────────────

/// One observed price for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub product_id: ProductId,
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub observed_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

// ── Contract checks ───────────────────────────────────────────

/// Fail when a record has no usable brand key.
///
/// `what` names the record for the error message (e.g. `"product 42"`).
pub fn require_brand(what: &str, brand: &str) -> Result<()> {
    if brand.trim().is_empty() {
        return Err(BrandwatchError::Contract(format!("{} has a blank brand", what)));
    }
    Ok(())
}

/// Fail on the first record of any feed that has no usable brand key.
pub fn validate_feeds(
    aggregates: &[BrandAggregate],
    products: &[Product],
    promotions: &[PromotionRecord],
) -> Result<()> {
    for agg in aggregates {
        require_brand("brand aggregate", &agg.brand)?;
    }
    for p in products {
        require_brand(&format!("product {}", p.id), &p.brand)?;
    }
    for promo in promotions {
        require_brand(&format!("promotion for product {}", promo.product_id), &promo.brand)?;
    }
    Ok(())
}
