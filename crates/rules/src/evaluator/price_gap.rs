//! Brand-level price gap: competitors whose average price sits well below
//! the reference brand's.

use crate::alert::{Alert, AlertData, AlertType, Severity};

use super::{percent_below, RuleContext};

/// One High `PriceCheaper` alert per competitor aggregate with
/// `avg_price < reference_avg * brand_price_ratio`.
///
/// Skipped when the reference aggregate is missing or unpriced. Competitor
/// aggregates without prices carry no signal.
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Alert> {
    let Some(reference) = ctx.reference.filter(|r| r.has_prices()) else {
        return Vec::new();
    };
    let threshold = reference.avg_price * ctx.config.thresholds.brand_price_ratio;
    let reference_name = &ctx.config.reference_brand;

    let mut alerts = Vec::new();
    for agg in ctx.aggregates {
        if ctx.index.is_reference(&agg.brand) {
            continue;
        }
        if !agg.has_consistent_range() {
            tracing::warn!(
                brand = %agg.brand,
                min = %agg.min_price,
                avg = %agg.avg_price,
                max = %agg.max_price,
                "brand aggregate violates min <= avg <= max"
            );
        }
        if !agg.has_prices() || agg.avg_price >= threshold {
            continue;
        }

        let gap = percent_below(agg.avg_price, reference.avg_price);
        alerts.push(Alert {
            alert_type: AlertType::PriceCheaper,
            severity: Severity::High,
            title: format!("{} is {}% cheaper on average", agg.brand, gap),
            description: format!(
                "Average price {}: {} vs {}: {}",
                agg.brand,
                ctx.price(agg.avg_price),
                reference_name,
                ctx.price(reference.avg_price),
            ),
            brand: agg.brand.clone(),
            data: AlertData::BrandPriceGap {
                reference_avg: reference.avg_price,
                competitor_avg: agg.avg_price,
                gap_percent: gap,
            },
        });
    }
    alerts
}
