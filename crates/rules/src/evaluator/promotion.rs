//! Competitor promotions with a meaningful discount.

use crate::alert::{Alert, AlertData, AlertType, Severity};

use super::{round_whole, RuleContext};

/// One `CompetitorPromo` alert per competitor promotion whose absolute
/// discount reaches `promo_min_discount`; High from `promo_high_discount`.
///
/// A promotion lacking its price pair cannot be described and is skipped.
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Alert> {
    let thresholds = &ctx.config.thresholds;
    let mut alerts = Vec::new();

    for promo in ctx.promotions {
        if ctx.index.is_reference(&promo.brand) {
            continue;
        }
        let (Some(discount), Some(old_price), Some(current_price)) =
            (promo.discount(), promo.old_price, promo.current_price)
        else {
            tracing::debug!(product_id = promo.product_id, "incomplete promotion skipped");
            continue;
        };
        let discount = discount.abs();
        if discount.is_zero() || discount < thresholds.promo_min_discount {
            continue;
        }
        let severity = if discount >= thresholds.promo_high_discount {
            Severity::High
        } else {
            Severity::Medium
        };

        alerts.push(Alert {
            alert_type: AlertType::CompetitorPromo,
            severity,
            title: format!("{}: -{}% on {}", promo.brand, round_whole(discount), promo.name),
            description: format!("From {} to {}", ctx.price(old_price), ctx.price(current_price)),
            brand: promo.brand.clone(),
            data: AlertData::CompetitorPromo {
                product_id: promo.product_id,
                product: promo.name.clone(),
                discount: discount.normalize(),
            },
        });
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert_config::EngineConfig;
    use brandwatch_core::PromotionRecord;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn promo(brand: &str, discount: Option<Decimal>) -> PromotionRecord {
        PromotionRecord {
            product_id: 1,
            brand: brand.to_string(),
            name: "Hydrating Toner".to_string(),
            old_price: Some(dec!(40)),
            current_price: Some(dec!(28)),
            discount_percent: discount,
            site: Some("sephora".to_string()),
            category: None,
        }
    }

    fn run(promotions: &[PromotionRecord]) -> Vec<Alert> {
        let config = EngineConfig::default();
        let ctx = RuleContext::new(&config, &[], &[], promotions);
        evaluate(&ctx)
    }

    fn severity_for(discount: Decimal) -> Option<Severity> {
        run(&[promo("Murad", Some(discount))]).first().map(|a| a.severity)
    }

    #[test]
    fn discount_boundaries() {
        assert_eq!(severity_for(dec!(-15)), Some(Severity::Medium));
        assert_eq!(severity_for(dec!(-14.999)), None);
        assert_eq!(severity_for(dec!(-30)), Some(Severity::High));
        assert_eq!(severity_for(dec!(-29.999)), Some(Severity::Medium));
    }

    #[test]
    fn title_and_description() {
        let alerts = run(&[promo("Murad", Some(dec!(-30)))]);
        assert_eq!(alerts[0].title, "Murad: -30% on Hydrating Toner");
        assert_eq!(alerts[0].description, "From 40€ to 28€");
        assert_eq!(alerts[0].brand, "Murad");
    }

    #[test]
    fn title_rounds_discount_magnitude() {
        let alerts = run(&[promo("Murad", Some(dec!(-29.5)))]);
        assert_eq!(alerts[0].title, "Murad: -30% on Hydrating Toner");
        assert_eq!(alerts[0].severity, Severity::Medium);
    }

    #[test]
    fn reference_promotions_are_ignored() {
        assert!(run(&[promo("dermalogica", Some(dec!(-50)))]).is_empty());
    }

    #[test]
    fn missing_discount_is_derived_from_prices() {
        // (28 - 40) / 40 = -30%
        let alerts = run(&[promo("Murad", None)]);
        assert_eq!(alerts[0].severity, Severity::High);
    }

    #[test]
    fn missing_current_price_is_skipped() {
        let mut p = promo("Murad", Some(dec!(-40)));
        p.current_price = None;
        assert!(run(&[p]).is_empty());
    }

    #[test]
    fn zero_discount_is_skipped() {
        assert!(run(&[promo("Murad", Some(Decimal::ZERO))]).is_empty());
    }
}
