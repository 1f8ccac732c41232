//! Alert engine: runs the four competitive rules over a snapshot and ranks
//! their output.
//!
//! Rules are plain functions over a shared read-only [`RuleContext`],
//! applied in a fixed order. No rule observes another's output. Their
//! alerts are concatenated in rule order and stably sorted by severity, so
//! equal-severity alerts keep rule order, then emission order.
//!
//! Missing data is never an error: an absent reference brand, an empty
//! feed or an incomplete record simply produces no alert. The only error
//! is a caller contract violation (a record with a blank brand).

mod assortment_gap;
mod price_gap;
mod promotion;
mod underpriced;

use brandwatch_core::{validate_feeds, BrandAggregate, Product, PromotionRecord, Snapshot};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::alert::Alert;
use crate::alert_config::EngineConfig;
use crate::error::Result;
use crate::index::CatalogIndex;
use crate::normalize::BrandKeys;

pub use assortment_gap::evaluate as evaluate_assortment_gap;
pub use price_gap::evaluate as evaluate_price_gap;
pub use promotion::evaluate as evaluate_promotions;
pub use underpriced::evaluate as evaluate_underpriced;

// ── Rule context ────────────────────────────────────────────────────

/// Everything a rule may read. Built once per invocation.
pub struct RuleContext<'a> {
    pub config: &'a EngineConfig,
    pub aggregates: &'a [BrandAggregate],
    pub promotions: &'a [PromotionRecord],
    pub index: CatalogIndex<'a>,
    /// Aggregate of the reference brand; `None` suppresses the
    /// reference-dependent rules.
    pub reference: Option<&'a BrandAggregate>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        config: &'a EngineConfig,
        aggregates: &'a [BrandAggregate],
        products: &'a [Product],
        promotions: &'a [PromotionRecord],
    ) -> Self {
        let index = CatalogIndex::build(
            products,
            &config.reference_brand,
            BrandKeys::new(&config.brand_aliases),
        );
        let reference = index.reference_aggregate(aggregates);
        Self {
            config,
            aggregates,
            promotions,
            index,
            reference,
        }
    }

    /// Format a price with the configured currency symbol.
    pub(crate) fn price(&self, value: Decimal) -> String {
        format!("{}{}", value.normalize(), self.config.currency_symbol)
    }
}

/// A rule evaluator.
pub type RuleFn = fn(&RuleContext<'_>) -> Vec<Alert>;

/// Rules in emission order.
pub const RULES: [(&str, RuleFn); 4] = [
    ("price_gap", price_gap::evaluate),
    ("assortment_gap", assortment_gap::evaluate),
    ("competitor_promo", promotion::evaluate),
    ("underpriced_item", underpriced::evaluate),
];

/// `round((1 - value / reference) * 100)`, halves rounded up.
///
/// Callers guarantee `reference > 0`.
pub(crate) fn percent_below(value: Decimal, reference: Decimal) -> i64 {
    let gap = (Decimal::ONE - value / reference) * Decimal::ONE_HUNDRED;
    round_whole(gap)
}

/// Round to a whole number, halves toward positive infinity.
pub(crate) fn round_whole(value: Decimal) -> i64 {
    (value + Decimal::new(5, 1)).floor().to_i64().unwrap_or_default()
}

// ── Engine ──────────────────────────────────────────────────────────

/// Stateless alert engine bound to a validated configuration.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    config: EngineConfig,
}

impl AlertEngine {
    /// Validate `config` and build an engine around it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every rule and return the ranked alert list.
    pub fn evaluate(
        &self,
        aggregates: &[BrandAggregate],
        products: &[Product],
        promotions: &[PromotionRecord],
    ) -> Result<Vec<Alert>> {
        validate_feeds(aggregates, products, promotions)?;

        let ctx = RuleContext::new(&self.config, aggregates, products, promotions);
        if ctx.reference.is_none() {
            tracing::debug!(
                reference = %self.config.reference_brand,
                "reference brand has no aggregate; brand and item price rules skipped"
            );
        }

        let mut alerts = Vec::new();
        for (name, rule) in RULES {
            let emitted = rule(&ctx);
            tracing::debug!(rule = name, count = emitted.len(), "rule evaluated");
            alerts.extend(emitted);
        }

        let alerts = rank_alerts(alerts);
        tracing::info!(
            reference = %self.config.reference_brand,
            count = alerts.len(),
            "alerts generated"
        );
        Ok(alerts)
    }

    pub fn evaluate_snapshot(&self, snapshot: &Snapshot) -> Result<Vec<Alert>> {
        self.evaluate(&snapshot.aggregates, &snapshot.products, &snapshot.promotions)
    }
}

/// Generate alerts with default thresholds for the given reference brand.
pub fn generate_alerts(
    aggregates: &[BrandAggregate],
    products: &[Product],
    promotions: &[PromotionRecord],
    reference_brand: &str,
) -> Result<Vec<Alert>> {
    AlertEngine::new(EngineConfig::for_reference(reference_brand))?
        .evaluate(aggregates, products, promotions)
}

/// Stable sort by severity rank; ties keep their incoming order.
pub fn rank_alerts(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by_key(|a| a.severity.rank());
    alerts
}

// ── Tests ───────────────────────────────────────────────────────────
