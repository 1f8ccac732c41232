//! Category price cross-check: competitor items priced far below the
//! reference brand's average in the same category.

use crate::alert::{Alert, AlertData, AlertType, Severity};

use super::{percent_below, round_whole, RuleContext};

/// One Medium `PriceCheaper` alert per competitor product priced strictly
/// below `reference_category_avg * item_price_ratio`.
///
/// Categories are walked in the order the reference brand first appears in
/// them; products in catalog order. Skipped when the reference brand has no
/// aggregate.
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Alert> {
    if ctx.reference.is_none() {
        return Vec::new();
    }
    let ratio = ctx.config.thresholds.item_price_ratio;
    let reference_name = &ctx.config.reference_brand;
    let mut alerts = Vec::new();

    for (category, reference_avg) in ctx.index.reference_category_averages() {
        let threshold = reference_avg * ratio;
        for entry in ctx.index.competitors_in(category) {
            let Some(price) = entry.known_price() else {
                continue;
            };
            if price >= threshold {
                continue;
            }
            let product = entry.product;
            let gap = percent_below(price, reference_avg);
            alerts.push(Alert {
                alert_type: AlertType::PriceCheaper,
                severity: Severity::Medium,
                title: format!("{} - \"{}\" at {}", product.brand, product.name, ctx.price(price)),
                description: format!(
                    "{}% cheaper than the {} average ({}{}) in category \"{}\"",
                    gap,
                    reference_name,
                    round_whole(reference_avg),
                    ctx.config.currency_symbol,
                    category,
                ),
                brand: product.brand.clone(),
                data: AlertData::UnderpricedItem {
                    product_id: product.id,
                    product: product.name.clone(),
                    product_price: price,
                    reference_avg,
                    category: category.to_string(),
                    gap_percent: gap,
                },
            });
        }
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert_config::EngineConfig;
    use brandwatch_core::{BrandAggregate, Product};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn product(id: i64, brand: &str, category: &str, price: Option<Decimal>) -> Product {
        Product {
            id,
            brand: brand.to_string(),
            name: format!("Product {}", id),
            category: Some(category.to_string()),
            current_price: price,
            site: "sephora".to_string(),
        }
    }

    fn reference_agg() -> Vec<BrandAggregate> {
        vec![BrandAggregate {
            brand: "Dermalogica".to_string(),
            product_count: 2,
            avg_price: dec!(60),
            min_price: dec!(40),
            max_price: dec!(80),
            sites: Default::default(),
        }]
    }

    fn run(aggregates: &[BrandAggregate], products: &[Product]) -> Vec<Alert> {
        let config = EngineConfig::default();
        let ctx = RuleContext::new(&config, aggregates, products, &[]);
        evaluate(&ctx)
    }

    #[test]
    fn item_below_category_average_alerts() {
        let products = vec![
            product(1, "Dermalogica", "Serums", Some(dec!(80))),
            product(2, "Dermalogica", "serums", Some(dec!(40))),
            product(3, "Murad", "SERUMS", Some(dec!(30))),
        ];
        let alerts = run(&reference_agg(), &products);
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.alert_type, AlertType::PriceCheaper);
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.title, "Murad - \"Product 3\" at 30€");
        assert_eq!(
            alert.description,
            "50% cheaper than the Dermalogica average (60€) in category \"serums\""
        );
    }

    #[test]
    fn exactly_at_ratio_does_not_alert() {
        let products = vec![
            product(1, "Dermalogica", "serums", Some(dec!(100))),
            product(2, "Murad", "serums", Some(dec!(70))),
            product(3, "Murad", "serums", Some(dec!(69.99))),
        ];
        let alerts = run(&reference_agg(), &products);
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].data,
            AlertData::UnderpricedItem {
                product_id: 3,
                product: "Product 3".to_string(),
                product_price: dec!(69.99),
                reference_avg: dec!(100),
                category: "serums".to_string(),
                gap_percent: 30,
            }
        );
    }

    #[test]
    fn missing_reference_aggregate_suppresses_rule() {
        let products = vec![
            product(1, "Dermalogica", "serums", Some(dec!(100))),
            product(2, "Murad", "serums", Some(dec!(10))),
        ];
        assert!(run(&[], &products).is_empty());
    }

    #[test]
    fn unpriced_items_carry_no_signal() {
        let products = vec![
            product(1, "Dermalogica", "serums", None),
            product(2, "Dermalogica", "masks", Some(dec!(50))),
            product(3, "Murad", "serums", Some(dec!(1))),
            product(4, "Murad", "masks", None),
        ];
        assert!(run(&reference_agg(), &products).is_empty());
    }

    #[test]
    fn categories_follow_reference_order() {
        let products = vec![
            product(1, "Dermalogica", "masks", Some(dec!(50))),
            product(2, "Dermalogica", "serums", Some(dec!(50))),
            product(3, "Murad", "serums", Some(dec!(10))),
            product(4, "Clinique", "masks", Some(dec!(10))),
        ];
        let ids: Vec<i64> = run(&reference_agg(), &products)
            .iter()
            .map(|a| match &a.data {
                AlertData::UnderpricedItem { product_id, .. } => *product_id,
                other => panic!("unexpected payload {:?}", other),
            })
            .collect();
        assert_eq!(ids, vec![4, 3]);
    }
}
