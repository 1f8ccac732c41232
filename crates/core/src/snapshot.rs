//! An immutable snapshot of the three dashboard feeds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{validate_feeds, BrandAggregate, Product, PromotionRecord};
use crate::error::Result;

/// Brand aggregates, product catalog and promotion list fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub aggregates: Vec<BrandAggregate>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub promotions: Vec<PromotionRecord>,
}

/// The catalog endpoint pages its results; older exports are a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductFeed {
    List(Vec<Product>),
    Page { products: Vec<Product> },
}

impl Snapshot {
    pub fn new(
        aggregates: Vec<BrandAggregate>,
        products: Vec<Product>,
        promotions: Vec<PromotionRecord>,
    ) -> Self {
        Self {
            aggregates,
            products,
            promotions,
        }
    }

    /// Load a snapshot from three JSON feed exports.
    pub fn from_files(
        aggregates: impl AsRef<Path>,
        products: impl AsRef<Path>,
        promotions: impl AsRef<Path>,
    ) -> Result<Self> {
        let aggregates = parse_aggregates(&std::fs::read_to_string(aggregates)?)?;
        let products = parse_products(&std::fs::read_to_string(products)?)?;
        let promotions = parse_promotions(&std::fs::read_to_string(promotions)?)?;
        tracing::debug!(
            aggregates = aggregates.len(),
            products = products.len(),
            promotions = promotions.len(),
            "snapshot loaded"
        );
        Ok(Self::new(aggregates, products, promotions))
    }

    /// Check that every record carries a brand key.
    pub fn validate(&self) -> Result<()> {
        validate_feeds(&self.aggregates, &self.products, &self.promotions)
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty() && self.products.is_empty() && self.promotions.is_empty()
    }
}

pub fn parse_aggregates(json: &str) -> Result<Vec<BrandAggregate>> {
    Ok(serde_json::from_str(json)?)
}

/// Accepts either `{"products": [...], ...}` or a bare JSON array.
pub fn parse_products(json: &str) -> Result<Vec<Product>> {
    let feed: ProductFeed = serde_json::from_str(json)?;
    Ok(match feed {
        ProductFeed::List(products) => products,
        ProductFeed::Page { products } => products,
    })
}

pub fn parse_promotions(json: &str) -> Result<Vec<PromotionRecord>> {
    Ok(serde_json::from_str(json)?)
}
