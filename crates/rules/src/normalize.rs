//! Key normalization for categories and brands.
//!
//! Categories and brands are free text scraped from several retail sites.
//! Every comparison in the engine goes through these keys.

use std::collections::{BTreeMap, HashMap};

/// Lowercased, trimmed category; `None` for a missing or blank category.
pub fn category_key(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

/// Resolves brand spellings to one canonical key.
#[derive(Debug, Clone, Default)]
pub struct BrandKeys {
    aliases: HashMap<String, String>,
}

impl BrandKeys {
    /// Build from a canonical → aliases table. Both sides are normalized.
    pub fn new(aliases: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = HashMap::new();
        for (canonical, spellings) in aliases {
            let canonical_key = fold(canonical);
            for spelling in spellings {
                map.insert(fold(spelling), canonical_key.clone());
            }
        }
        Self { aliases: map }
    }

    /// Canonical key for a brand name.
    pub fn key(&self, brand: &str) -> String {
        let folded = fold(brand);
        match self.aliases.get(&folded) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_trimmed_and_lowercased() {
        assert_eq!(category_key(Some("  Sérums ")), Some("sérums".to_string()));
        assert_eq!(category_key(Some("MASKS")), Some("masks".to_string()));
    }

    #[test]
    fn blank_category_is_absent() {
        assert_eq!(category_key(Some("   ")), None);
        assert_eq!(category_key(None), None);
    }

    #[test]
    fn brand_alias_resolves_to_canonical() {
        let mut table = BTreeMap::new();
        table.insert(
            "Paula's Choice".to_string(),
            vec!["paulas choice".to_string(), "Paula Choice".to_string()],
        );
        let keys = BrandKeys::new(&table);
        assert_eq!(keys.key("PAULAS CHOICE "), "paula's choice");
        assert_eq!(keys.key("paula choice"), "paula's choice");
        assert_eq!(keys.key("Paula's Choice"), "paula's choice");
    }

    #[test]
    fn unknown_brand_is_folded() {
        let keys = BrandKeys::default();
        assert_eq!(keys.key(" Dermalogica"), "dermalogica");
    }
}
