use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Parse a profiled u32 within `range`; unparsable or out-of-range values
/// fall back to `default`.
fn profiled_env_u32(
    profile: &str,
    key: &str,
    default: u32,
    range: RangeInclusive<u32>,
) -> u32 {
    let Some(raw) = profiled_env_opt(profile, key) else {
        return default;
    };
    match raw.parse::<u32>() {
        Ok(v) if range.contains(&v) => v,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid value, using default");
            default
        }
    }
}

/// Longest promotion lookback accepted from the environment.
pub const MAX_LOOKBACK_DAYS: u32 = 3650;
/// Largest catalog page the dashboard requests.
pub const MAX_CATALOG_PAGE_SIZE: u32 = 5000;

/// Reference brand used when nothing else is configured.
pub const DEFAULT_REFERENCE_BRAND: &str = "Dermalogica";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub dashboard: DashboardConfig,
    pub storage: StorageConfig,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &[
    "BRANDWATCH_REFERENCE_BRAND",
    "BRANDWATCH_ALERT_CONFIG",
    "BRANDWATCH_DATA_DIR",
];

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `BRANDWATCH_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("BRANDWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            dashboard: DashboardConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
        }
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  dashboard:   reference_brand={}, lookback_days={}, page_size={}",
            self.dashboard.reference_brand,
            self.dashboard.lookback_days,
            self.dashboard.catalog_page_size,
        );
        tracing::info!(
            "  alerts:      config={}",
            self.dashboard
                .alert_config
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string()),
        );
        tracing::info!("  storage:     data_dir={}", self.storage.data_dir.display());
    }
}

// ── Dashboard ─────────────────────────────────────────────────

/// Parameters the dashboard passes to its feeds and to the alert engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub reference_brand: String,
    /// Days of price history that count as "recent" for promotions.
    pub lookback_days: u32,
    pub catalog_page_size: u32,
    /// Optional AlertConfig YAML document overriding engine defaults.
    pub alert_config: Option<PathBuf>,
}

impl DashboardConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            reference_brand: profiled_env_or(p, "BRANDWATCH_REFERENCE_BRAND", DEFAULT_REFERENCE_BRAND),
            lookback_days: profiled_env_u32(
                p,
                "BRANDWATCH_LOOKBACK_DAYS",
                30,
                1..=MAX_LOOKBACK_DAYS,
            ),
            catalog_page_size: profiled_env_u32(
                p,
                "BRANDWATCH_CATALOG_PAGE_SIZE",
                300,
                1..=MAX_CATALOG_PAGE_SIZE,
            ),
            alert_config: profiled_env_opt(p, "BRANDWATCH_ALERT_CONFIG").map(PathBuf::from),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding exported feed snapshots.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_dir: PathBuf::from(profiled_env_or(p, "BRANDWATCH_DATA_DIR", "data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile so parallel tests never share keys.

    #[test]
    fn defaults_when_unset() {
        let config = Config::for_profile("brandwatchtestdefaults");
        assert_eq!(config.profile, "BRANDWATCHTESTDEFAULTS");
        assert_eq!(config.dashboard.lookback_days, 30);
        assert_eq!(config.dashboard.catalog_page_size, 300);
    }

    #[test]
    fn profiled_key_wins() {
        env::set_var("BWTESTPROFILED_BRANDWATCH_LOOKBACK_DAYS", "7");
        env::set_var("BWTESTPROFILED_BRANDWATCH_ALERT_CONFIG", "alerts/custom.yml");
        let config = Config::for_profile("bwtestprofiled");
        assert_eq!(config.dashboard.lookback_days, 7);
        assert_eq!(
            config.dashboard.alert_config,
            Some(PathBuf::from("alerts/custom.yml"))
        );
        assert!(Config::available_profiles().contains(&"BWTESTPROFILED".to_string()));
    }

    #[test]
    fn unparsable_number_falls_back() {
        env::set_var("BWTESTBADNUM_BRANDWATCH_CATALOG_PAGE_SIZE", "lots");
        let config = Config::for_profile("bwtestbadnum");
        assert_eq!(config.dashboard.catalog_page_size, 300);
    }

    #[test]
    fn out_of_range_numbers_fall_back() {
        env::set_var("BWTESTRANGE_BRANDWATCH_LOOKBACK_DAYS", "4294967295");
        env::set_var("BWTESTRANGE_BRANDWATCH_CATALOG_PAGE_SIZE", "0");
        let config = Config::for_profile("bwtestrange");
        assert_eq!(config.dashboard.lookback_days, 30);
        assert_eq!(config.dashboard.catalog_page_size, 300);
    }

    #[test]
    fn lookback_at_maximum_is_kept() {
        env::set_var("BWTESTMAXLB_BRANDWATCH_LOOKBACK_DAYS", "3650");
        let config = Config::for_profile("bwtestmaxlb");
        assert_eq!(config.dashboard.lookback_days, MAX_LOOKBACK_DAYS);
    }

    #[test]
    fn profile_label_for_default() {
        let config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
    }

    #[test]
    fn from_env_with_dotenv() {
        load_dotenv();
        let config = Config::from_env();
        assert!(!config.dashboard.reference_brand.is_empty());
        config.log_summary();
    }
}
