//! Upstream feed derivation from a product catalog plus its price history.
//!
//! The dashboard normally receives brand aggregates and promotions
//! pre-computed by the catalog backend. These functions reproduce those
//! feeds from raw data so a snapshot can be built offline.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{checked_mean, discount_percent, BrandAggregate, PricePoint, Product, ProductId, PromotionRecord};

// ── Price history index ───────────────────────────────────────

/// Price history grouped per product, in observation order.
struct History<'a> {
    by_product: HashMap<ProductId, Vec<&'a PricePoint>>,
}

impl<'a> History<'a> {
    fn new(points: &'a [PricePoint]) -> Self {
        let mut by_product: HashMap<ProductId, Vec<&PricePoint>> = HashMap::new();
        for point in points {
            by_product.entry(point.product_id).or_default().push(point);
        }
        Self { by_product }
    }

    /// Most recent observation; on equal timestamps the later entry wins.
    fn latest(&self, id: ProductId) -> Option<&'a PricePoint> {
        self.latest_matching(id, |_| true)
    }

    /// Most recent observation strictly before `cutoff`.
    fn latest_before(&self, id: ProductId, cutoff: DateTime<Utc>) -> Option<&'a PricePoint> {
        self.latest_matching(id, |p| p.observed_at < cutoff)
    }

    fn latest_matching(
        &self,
        id: ProductId,
        keep: impl Fn(&PricePoint) -> bool,
    ) -> Option<&'a PricePoint> {
        let mut best: Option<&'a PricePoint> = None;
        for &point in self.by_product.get(&id)? {
            if !keep(point) {
                continue;
            }
            match best {
                Some(b) if point.observed_at < b.observed_at => {}
                _ => best = Some(point),
            }
        }
        best
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ── Brand aggregates ──────────────────────────────────────────

#[derive(Default)]
struct BrandAcc {
    ids: BTreeSet<ProductId>,
    priced: HashSet<ProductId>,
    prices: Vec<Decimal>,
    min: Option<Decimal>,
    max: Option<Decimal>,
    sites: BTreeSet<String>,
}

/// Build one aggregate per brand over each product's latest price.
///
/// Products with a blank brand are skipped. Brands without any priced
/// product report zero prices. Output is ordered by product count
/// descending, then brand name.
pub fn derive_brand_aggregates(products: &[Product], history: &[PricePoint]) -> Vec<BrandAggregate> {
    let history = History::new(history);
    let mut brands: BTreeMap<&str, BrandAcc> = BTreeMap::new();

    for product in products {
        if product.brand.trim().is_empty() {
            continue;
        }
        let acc = brands.entry(product.brand.as_str()).or_default();
        acc.ids.insert(product.id);
        if !product.site.is_empty() {
            acc.sites.insert(product.site.clone());
        }
        // Count each product's latest price once even if the catalog repeats it.
        if acc.priced.contains(&product.id) {
            continue;
        }
        let Some(latest) = history.latest(product.id) else {
            continue;
        };
        acc.priced.insert(product.id);
        acc.prices.push(latest.price);
        acc.min = Some(acc.min.map_or(latest.price, |m| m.min(latest.price)));
        acc.max = Some(acc.max.map_or(latest.price, |m| m.max(latest.price)));
    }

    let mut aggregates: Vec<BrandAggregate> = brands
        .into_iter()
        .map(|(brand, acc)| {
            let avg = match checked_mean(&acc.prices) {
                Some(mean) => round2(mean),
                None => {
                    if !acc.prices.is_empty() {
                        tracing::warn!(brand, "average price overflowed; reported as unpriced");
                    }
                    Decimal::ZERO
                }
            };
            BrandAggregate {
                brand: brand.to_string(),
                product_count: u32::try_from(acc.ids.len()).unwrap_or(u32::MAX),
                avg_price: avg,
                min_price: round2(acc.min.unwrap_or_default()),
                max_price: round2(acc.max.unwrap_or_default()),
                sites: acc.sites,
            }
        })
        .collect();

    // BTreeMap iteration already orders by brand; the sort is stable.
    aggregates.sort_by(|a, b| b.product_count.cmp(&a.product_count));
    aggregates
}

// ── Promotions ────────────────────────────────────────────────

/// Find products whose latest price is below the last price observed
/// before the lookback window.
///
/// Ordered by discount ascending (deepest first), then product id.
pub fn derive_promotions(
    products: &[Product],
    history: &[PricePoint],
    lookback_days: u32,
    now: DateTime<Utc>,
) -> Vec<PromotionRecord> {
    let history = History::new(history);
    // A window reaching past the representable calendar covers all history.
    let Some(cutoff) = TimeDelta::try_days(i64::from(lookback_days))
        .and_then(|window| now.checked_sub_signed(window))
    else {
        tracing::debug!(lookback_days, "lookback window out of range; no promotions");
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut promotions = Vec::new();

    for product in products {
        if !seen.insert(product.id) {
            continue;
        }
        let (Some(current), Some(old)) = (
            history.latest(product.id),
            history.latest_before(product.id, cutoff),
        ) else {
            continue;
        };
        if current.price >= old.price {
            continue;
        }
        let Some(discount) = discount_percent(old.price, current.price) else {
            continue;
        };
        promotions.push(PromotionRecord {
            product_id: product.id,
            brand: product.brand.clone(),
            name: product.name.clone(),
            old_price: Some(old.price),
            current_price: Some(current.price),
            discount_percent: Some(discount),
            site: Some(product.site.clone()).filter(|s| !s.is_empty()),
            category: product.category.clone(),
        });
    }

    promotions.sort_by(|a, b| {
        a.discount_percent
            .cmp(&b.discount_percent)
            .then(a.product_id.cmp(&b.product_id))
    });
    tracing::debug!(
        lookback_days,
        count = promotions.len(),
        "derived promotions from price history"
    );
    promotions
}

/// Fill in `current_price` from history for products that lack one.
pub fn latest_prices(products: &[Product], history: &[PricePoint]) -> Vec<Product> {
    let history = History::new(history);
    products
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if p.current_price.is_none() {
                p.current_price = history.latest(p.id).map(|point| point.price);
            }
            p
        })
        .collect()
}

// ── Price positioning ─────────────────────────────────────────

/// Where a brand's average price sits relative to the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePositioning {
    Premium,
    Mid,
    Accessible,
    Unknown,
}

/// Premium above 1.5x the global average, mid above 0.8x, else accessible.
pub fn price_positioning(brand_avg: Decimal, global_avg: Decimal) -> PricePositioning {
    if brand_avg.is_zero() || global_avg.is_zero() {
        return PricePositioning::Unknown;
    }
    let above = |factor: Decimal| {
        global_avg
            .checked_mul(factor)
            .is_some_and(|threshold| brand_avg > threshold)
    };
    if above(Decimal::new(15, 1)) {
        PricePositioning::Premium
    } else if above(Decimal::new(8, 1)) {
        PricePositioning::Mid
    } else {
        PricePositioning::Accessible
    }
}

/// Mean current price over all priced products, zero when none are priced
/// or the sum is not representable.
pub fn global_average_price(products: &[Product]) -> Decimal {
    let prices: Vec<Decimal> = products.iter().filter_map(|p| p.current_price).collect();
    checked_mean(&prices).unwrap_or_default()
}
