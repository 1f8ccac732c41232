//! AlertConfig rule kind: reference brand, alert thresholds and brand
//! aliases for the competitive alert engine.

use std::collections::BTreeMap;
use std::path::Path;

use brandwatch_core::config::{DashboardConfig, DEFAULT_REFERENCE_BRAND};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};
use crate::metadata::CommonMetadata;

/// Document kind accepted by [`AlertConfigRule::compile`].
pub const ALERT_CONFIG_KIND: &str = "AlertConfig";

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level AlertConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlertConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub spec: AlertConfigSpec,
}

/// Specification section of an AlertConfig rule. Every field is optional
/// and falls back to the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlertConfigSpec {
    /// Brand whose competitive position is measured.
    #[serde(default = "default_reference_brand")]
    pub reference_brand: String,
    /// Symbol appended to prices in alert text.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Canonical brand name → spellings that should resolve to it.
    #[serde(default = "default_brand_aliases")]
    pub brand_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for AlertConfigSpec {
    fn default() -> Self {
        Self {
            reference_brand: default_reference_brand(),
            currency_symbol: default_currency_symbol(),
            thresholds: Thresholds::default(),
            brand_aliases: default_brand_aliases(),
        }
    }
}

/// Numeric cut-offs used by the four rule evaluators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Thresholds {
    /// A competitor brand alerts when its average price is strictly below
    /// `reference_avg * brand_price_ratio`.
    pub brand_price_ratio: Decimal,
    /// Minimum absolute discount (percent) for a competitor promotion.
    pub promo_min_discount: Decimal,
    /// Absolute discount (percent) at which a promotion becomes High.
    pub promo_high_discount: Decimal,
    /// A competitor item alerts when priced strictly below
    /// `reference_category_avg * item_price_ratio`.
    pub item_price_ratio: Decimal,
    /// Distinct competitor brands needed before an uncovered category alerts.
    pub min_gap_competitors: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            brand_price_ratio: Decimal::new(85, 2),
            promo_min_discount: Decimal::new(15, 0),
            promo_high_discount: Decimal::new(30, 0),
            item_price_ratio: Decimal::new(7, 1),
            min_gap_competitors: 2,
        }
    }
}

fn default_reference_brand() -> String {
    DEFAULT_REFERENCE_BRAND.to_string()
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

/// Spellings seen across the scraped retail sites.
fn default_brand_aliases() -> BTreeMap<String, Vec<String>> {
    [
        ("skinceuticals", &["skin ceuticals"][..]),
        ("drunk elephant", &["drunkelephant"][..]),
        ("paula's choice", &["paulas choice", "paula choice"][..]),
        ("the ordinary", &["ordinary"][..]),
        ("dr. dennis gross", &["dr dennis gross", "dennis gross"][..]),
    ]
    .into_iter()
    .map(|(canonical, aliases)| {
        (
            canonical.to_string(),
            aliases.iter().map(|a| a.to_string()).collect(),
        )
    })
    .collect()
}

// ── Compiled (hot-path) types ───────────────────────────────────────

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub reference_brand: String,
    pub currency_symbol: String,
    pub thresholds: Thresholds,
    pub brand_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        AlertConfigSpec::default().into()
    }
}

impl From<AlertConfigSpec> for EngineConfig {
    fn from(spec: AlertConfigSpec) -> Self {
        Self {
            reference_brand: spec.reference_brand,
            currency_symbol: spec.currency_symbol,
            thresholds: spec.thresholds,
            brand_aliases: spec.brand_aliases,
        }
    }
}

impl EngineConfig {
    /// Defaults with a different reference brand.
    pub fn for_reference(reference_brand: impl Into<String>) -> Self {
        Self {
            reference_brand: reference_brand.into(),
            ..Self::default()
        }
    }

    /// Check value ranges; the engine assumes a validated config.
    pub fn validate(&self) -> Result<()> {
        if self.reference_brand.trim().is_empty() {
            return Err(RuleError::Validation("reference_brand must not be blank".into()));
        }
        let t = &self.thresholds;
        for (name, ratio) in [
            ("brand_price_ratio", t.brand_price_ratio),
            ("item_price_ratio", t.item_price_ratio),
        ] {
            if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
                return Err(RuleError::Validation(format!(
                    "{} must be in (0, 1], got {}",
                    name, ratio
                )));
            }
        }
        if t.promo_min_discount < Decimal::ZERO || t.promo_high_discount < Decimal::ZERO {
            return Err(RuleError::Validation("promotion discounts must be non-negative".into()));
        }
        if t.promo_min_discount > t.promo_high_discount {
            return Err(RuleError::Validation(format!(
                "promo_min_discount ({}) exceeds promo_high_discount ({})",
                t.promo_min_discount, t.promo_high_discount
            )));
        }
        if t.min_gap_competitors == 0 {
            return Err(RuleError::Validation("min_gap_competitors must be at least 1".into()));
        }
        Ok(())
    }
}

impl AlertConfigRule {
    /// Validate the document and produce the engine config.
    ///
    /// A disabled document yields the built-in defaults.
    pub fn compile(&self) -> Result<EngineConfig> {
        if self.kind != ALERT_CONFIG_KIND {
            return Err(RuleError::Validation(format!(
                "expected kind {}, got {}",
                ALERT_CONFIG_KIND, self.kind
            )));
        }
        if !self.metadata.enabled {
            tracing::debug!(id = %self.metadata.id, "alert config disabled, using defaults");
            return Ok(EngineConfig::default());
        }
        let config = EngineConfig::from(self.spec.clone());
        config.validate()?;
        Ok(config)
    }
}

/// Parse and compile an AlertConfig YAML document.
pub fn parse_alert_config(yaml: &str) -> Result<EngineConfig> {
    let rule: AlertConfigRule = serde_yaml::from_str(yaml)?;
    rule.compile()
}

/// Read, parse and compile an AlertConfig YAML file.
pub fn load_alert_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path)?;
    let config = parse_alert_config(&yaml)?;
    tracing::info!(
        path = %path.display(),
        reference = %config.reference_brand,
        "loaded alert config"
    );
    Ok(config)
}

/// Engine config for a dashboard: its AlertConfig document when one is
/// configured, otherwise the defaults with the dashboard's reference brand.
pub fn engine_config_for(dashboard: &DashboardConfig) -> Result<EngineConfig> {
    let config = match &dashboard.alert_config {
        Some(path) => load_alert_config(path)?,
        None => EngineConfig::for_reference(dashboard.reference_brand.clone()),
    };
    config.validate()?;
    Ok(config)
}
