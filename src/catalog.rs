//! Catalog
//!
//! The read-only product list, as shipped in `products.json`. Products are
//! kept in file order; that order is the default display order and the
//! source of the home page's featured selection.

use std::{fs, path::Path, str::FromStr};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Number of products shown in the featured selection.
pub const FEATURED_COUNT: usize = 6;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),
}

/// Category filter for catalog queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,

    /// Exactly this category
    Only(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => CategoryFilter::All,
            category => CategoryFilter::Only(category.to_string()),
        })
    }
}

/// Sort orders offered on the products page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order
    #[default]
    Default,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,

    /// Alphabetical by name
    Name,
}

/// Error returned for an unrecognised sort order name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SortOrder::Default),
            "price-low" => Ok(SortOrder::PriceLow),
            "price-high" => Ok(SortOrder::PriceHigh),
            "name" => Ok(SortOrder::Name),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// Filter, search and sort settings for [`Catalog::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category filter
    pub category: CategoryFilter,

    /// Free-text search; blank means no search
    pub search: String,

    /// Result order
    pub sort: SortOrder,
}

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products, in the given order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CatalogError> {
        let products: Vec<Product> = products.into_iter().collect();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or ids are duplicated.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;

        Self::from_products(products)
    }

    /// Parse a YAML sequence of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or ids are duplicated.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_norway::from_str(yaml)?;

        Self::from_products(products)
    }

    /// Load a catalog file; `.yml` and `.yaml` files are read as YAML,
    /// anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Self::from_yaml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    /// Look a product up by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// The first `count` products.
    pub fn featured(&self, count: usize) -> &[Product] {
        self.products
            .get(..count.min(self.products.len()))
            .unwrap_or_default()
    }

    /// Filter, search and sort the catalog.
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let term = query.search.trim().to_lowercase();

        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| match &query.category {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => &product.category == category,
            })
            .filter(|product| term.is_empty() || matches_search(product, &term))
            .collect();

        match query.sort {
            SortOrder::Default => {}
            SortOrder::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Name => products.sort_by_cached_key(|product| product.name.to_lowercase()),
        }

        products
    }
}

/// Case-insensitive match of a lowercased term against name, description
/// and category.
fn matches_search(product: &Product, term: &str) -> bool {
    product.name.to_lowercase().contains(term)
        || product
            .description
            .as_ref()
            .is_some_and(|description| description.to_lowercase().contains(term))
        || product.category.to_lowercase().contains(term)
}
