//! Items

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::products::{Product, ProductId};

/// Default quantity for a line item stored without one.
const fn default_quantity() -> u32 {
    1
}

/// Reads an absent or `null` quantity as the default.
fn quantity_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_quantity))
}

/// A product snapshot held in the cart, with its own quantity.
///
/// The snapshot is taken when the product is added; later catalog changes
/// (price included) do not flow back into existing line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Image path or URL
    #[serde(default)]
    pub image: String,

    /// Unit price at the time the product was added
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Number of units, at least 1 while the item is in a cart
    #[serde(default = "default_quantity", deserialize_with = "quantity_or_default")]
    pub quantity: u32,

    /// Optional description copied from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Pass-through catalog fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Snapshot a product with the given quantity.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.price,
            quantity,
            description: product.description.clone(),
            extra: product.extra.clone(),
        }
    }

    /// Price multiplied by quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
