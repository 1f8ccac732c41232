//! Normalized catalog view shared by every rule evaluator.
//!
//! Built once per invocation: category and brand keys are derived a single
//! time, and per-category lookups replace repeated scans of the catalog.
//! All maps preserve first-encountered order so alert emission order is a
//! function of catalog order alone.

use brandwatch_core::{checked_mean, BrandAggregate, Product};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

use crate::normalize::{category_key, BrandKeys};

/// A product with its normalized keys.
#[derive(Debug, Clone)]
pub struct IndexedProduct<'a> {
    pub product: &'a Product,
    pub brand_key: String,
    pub category: Option<String>,
}

impl IndexedProduct<'_> {
    /// A price that can be compared; zero means the site showed none.
    pub fn known_price(&self) -> Option<Decimal> {
        self.product.current_price.filter(|p| *p > Decimal::ZERO)
    }
}

/// Competitor brands present in one category, keyed by brand key.
pub type BrandsInCategory = IndexMap<String, String>;

#[derive(Debug)]
pub struct CatalogIndex<'a> {
    brand_keys: BrandKeys,
    reference_key: String,
    /// Categories the reference brand covers.
    reference_categories: IndexSet<String>,
    /// Category → known prices of the reference brand's products.
    reference_prices: IndexMap<String, Vec<Decimal>>,
    /// Category → competitor products, in catalog order.
    competitor_products: IndexMap<String, Vec<IndexedProduct<'a>>>,
}

impl<'a> CatalogIndex<'a> {
    pub fn build(products: &'a [Product], reference_brand: &str, brand_keys: BrandKeys) -> Self {
        let reference_key = brand_keys.key(reference_brand);
        let mut reference_categories = IndexSet::new();
        let mut reference_prices: IndexMap<String, Vec<Decimal>> = IndexMap::new();
        let mut competitor_products: IndexMap<String, Vec<IndexedProduct<'a>>> = IndexMap::new();

        for product in products {
            let entry = IndexedProduct {
                product,
                brand_key: brand_keys.key(&product.brand),
                category: category_key(product.category.as_deref()),
            };
            // Uncategorized products carry no assortment or category price signal.
            let Some(category) = entry.category.clone() else {
                continue;
            };
            if entry.brand_key == reference_key {
                reference_categories.insert(category.clone());
                if let Some(price) = entry.known_price() {
                    reference_prices.entry(category).or_default().push(price);
                }
            } else {
                competitor_products.entry(category).or_default().push(entry);
            }
        }

        tracing::debug!(
            products = products.len(),
            reference_categories = reference_categories.len(),
            competitor_categories = competitor_products.len(),
            "catalog index built"
        );

        Self {
            brand_keys,
            reference_key,
            reference_categories,
            reference_prices,
            competitor_products,
        }
    }

    pub fn brand_key(&self, brand: &str) -> String {
        self.brand_keys.key(brand)
    }

    pub fn is_reference(&self, brand: &str) -> bool {
        self.brand_key(brand) == self.reference_key
    }

    /// First aggregate whose brand resolves to the reference brand.
    pub fn reference_aggregate<'b>(&self, aggregates: &'b [BrandAggregate]) -> Option<&'b BrandAggregate> {
        aggregates.iter().find(|a| self.is_reference(&a.brand))
    }

    pub fn reference_covers(&self, category: &str) -> bool {
        self.reference_categories.contains(category)
    }

    /// Mean reference price per category, for categories with at least one
    /// priced reference product. Order follows the catalog. A category whose
    /// prices overflow the sum is left out.
    pub fn reference_category_averages(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.reference_prices.iter().filter_map(|(category, prices)| {
            let Some(mean) = checked_mean(prices) else {
                if !prices.is_empty() {
                    tracing::warn!(category = %category, "reference category average overflowed");
                }
                return None;
            };
            Some((category.as_str(), mean))
        })
    }

    /// Competitor products in a category, in catalog order.
    pub fn competitors_in(&self, category: &str) -> &[IndexedProduct<'a>] {
        self.competitor_products
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories with competitor products, each with its distinct
    /// competitor brands (display name = first spelling encountered).
    pub fn competitor_categories(&self) -> impl Iterator<Item = (&str, BrandsInCategory)> + '_ {
        self.competitor_products.iter().map(|(category, entries)| {
            let mut brands = BrandsInCategory::new();
            for entry in entries {
                brands
                    .entry(entry.brand_key.clone())
                    .or_insert_with(|| entry.product.brand.clone());
            }
            (category.as_str(), brands)
        })
    }
}
