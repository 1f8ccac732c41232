//! Counts and filters over a ranked alert list, as shown on the dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::alert::{Alert, AlertType, Severity};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertSummary {
    pub total: usize,
    pub by_type: BTreeMap<AlertType, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = Self {
            total: alerts.len(),
            ..Self::default()
        };
        for alert in alerts {
            *summary.by_type.entry(alert.alert_type).or_default() += 1;
            *summary.by_severity.entry(alert.severity).or_default() += 1;
        }
        summary
    }

    pub fn count(&self, alert_type: AlertType) -> usize {
        self.by_type.get(&alert_type).copied().unwrap_or(0)
    }
}

/// Alerts of one type, ranking order preserved.
pub fn filter_by_type(alerts: &[Alert], alert_type: AlertType) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.alert_type == alert_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertData;

    fn alert(alert_type: AlertType, severity: Severity, title: &str) -> Alert {
        Alert {
            alert_type,
            severity,
            title: title.to_string(),
            description: String::new(),
            brand: "Murad".to_string(),
            data: AlertData::CategoryGap {
                category: "masks".to_string(),
                brands: vec![],
            },
        }
    }

    #[test]
    fn counts_by_type_and_severity() {
        let alerts = vec![
            alert(AlertType::PriceCheaper, Severity::High, "a"),
            alert(AlertType::CompetitorPromo, Severity::High, "b"),
            alert(AlertType::PriceCheaper, Severity::Medium, "c"),
        ];
        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(AlertType::PriceCheaper), 2);
        assert_eq!(summary.count(AlertType::CategoryGap), 0);
        assert_eq!(summary.by_severity.get(&Severity::High), Some(&2));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_type"]["price_cheaper"], 2);
    }

    #[test]
    fn filter_keeps_order() {
        let alerts = vec![
            alert(AlertType::PriceCheaper, Severity::High, "first"),
            alert(AlertType::CategoryGap, Severity::Medium, "gap"),
            alert(AlertType::PriceCheaper, Severity::Medium, "second"),
        ];
        let titles: Vec<&str> = filter_by_type(&alerts, AlertType::PriceCheaper)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
