//! Assortment gap: categories several competitors cover but the reference
//! brand does not.

use crate::alert::{Alert, AlertData, AlertType, Severity};

use super::RuleContext;

/// One Medium `CategoryGap` alert per uncovered category shared by at least
/// `min_gap_competitors` distinct competitor brands.
///
/// Runs from the catalog alone, so it still fires when the reference brand
/// has no aggregate (or no products at all).
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Alert> {
    let min_brands = ctx.config.thresholds.min_gap_competitors;
    let mut alerts = Vec::new();

    for (category, brands) in ctx.index.competitor_categories() {
        if ctx.index.reference_covers(category) || brands.len() < min_brands {
            continue;
        }
        let names: Vec<String> = brands.into_values().collect();
        let Some(representative) = names.first().cloned() else {
            continue;
        };
        alerts.push(Alert {
            alert_type: AlertType::CategoryGap,
            severity: Severity::Medium,
            title: format!("Missing range: {}", category),
            description: format!(
                "{} competitors present: {}",
                names.len(),
                names.join(", ")
            ),
            brand: representative,
            data: AlertData::CategoryGap {
                category: category.to_string(),
                brands: names,
            },
        });
    }
    alerts
}
