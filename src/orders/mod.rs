//! Orders

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{items::LineItem, pricing::OrderTotals, uuids::TypedUuid};

pub mod recorder;

pub use recorder::{OrderError, OrderRecorder};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle status.
///
/// Orders are only ever created as `Pending`; nothing in this crate moves
/// them on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting fulfilment
    #[default]
    Pending,
}

/// Customer contact and delivery details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Full name
    pub full_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,
}

/// Required customer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// Full name
    FullName,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Street address
    Address,

    /// City
    City,
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CustomerField::FullName => "full name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Address => "address",
            CustomerField::City => "city",
        })
    }
}

/// One or more required customer fields were blank.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Missing delivery information: {}", join_fields(.missing))]
pub struct ValidationError {
    /// Blank fields, in form order
    pub missing: SmallVec<[CustomerField; 5]>,
}

fn join_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Customer {
    /// Copy of the customer with every field trimmed.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }

    /// Check that every required field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: SmallVec<[CustomerField; 5]> = [
            (CustomerField::FullName, &self.full_name),
            (CustomerField::Email, &self.email),
            (CustomerField::Phone, &self.phone),
            (CustomerField::Address, &self.address),
            (CustomerField::City, &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// Identifier of the chosen payment method (e.g. `cod`, `card`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    /// Wrap a payment method identifier, returning `None` when it is blank.
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();

        (!id.is_empty()).then(|| Self(id.to_string()))
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique, time-ordered identifier
    #[serde(rename = "orderId")]
    pub id: OrderUuid,

    /// Creation time
    #[serde(rename = "date")]
    pub created_at: Timestamp,

    /// Customer details, trimmed
    pub customer: Customer,

    /// Snapshot of the cart's line items
    pub items: Vec<LineItem>,

    /// Chosen payment method
    pub payment_method: PaymentMethodId,

    /// Totals computed from `items`
    #[serde(flatten)]
    pub totals: OrderTotals,

    /// Lifecycle status
    pub status: OrderStatus,
}

impl Order {
    /// Customer-facing reference, e.g. `ORD-0192…`.
    pub fn reference(&self) -> String {
        format!("ORD-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{cart::Cart, pricing::compute_totals, products::Product};

    use super::*;

    fn customer() -> Customer {
        Customer {
            full_name: "Ayesha Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: "03001234567".to_string(),
            address: "12 Mall Road".to_string(),
            city: "Lahore".to_string(),
        }
    }

    #[test]
    fn complete_customer_validates() {
        assert_eq!(customer().validate(), Ok(()));
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let customer = Customer {
            email: "   ".to_string(),
            city: String::new(),
            ..customer()
        };

        assert_eq!(
            customer.validate(),
            Err(ValidationError {
                missing: smallvec![CustomerField::Email, CustomerField::City],
            })
        );
    }

    #[test]
    fn validation_error_lists_fields() {
        let err = ValidationError {
            missing: smallvec![CustomerField::FullName, CustomerField::Phone],
        };

        assert_eq!(
            err.to_string(),
            "Missing delivery information: full name, phone"
        );
    }

    #[test]
    fn blank_payment_method_is_none() {
        assert_eq!(PaymentMethodId::new("  "), None);
        assert_eq!(
            PaymentMethodId::new(" cod ").map(|id| id.as_str().to_string()),
            Some("cod".to_string())
        );
    }

    #[test]
    fn order_serializes_with_storefront_field_names() -> TestResult {
        let mut cart = Cart::new();
        cart.add(&Product::new(1, "Oud Royale", "men", Decimal::from(1000)), 1);

        let order = Order {
            id: OrderUuid::now_v7(),
            created_at: Timestamp::now(),
            customer: customer(),
            items: cart.items().to_vec(),
            payment_method: PaymentMethodId::new("cod").ok_or("blank payment method")?,
            totals: compute_totals(&cart),
            status: OrderStatus::Pending,
        };

        let json = serde_json::to_value(&order)?;

        assert!(json.get("orderId").is_some(), "missing orderId in {json}");
        assert!(json.get("date").is_some(), "missing date in {json}");
        assert_eq!(json.get("status"), Some(&serde_json::json!("pending")));
        assert_eq!(json.get("paymentMethod"), Some(&serde_json::json!("cod")));
        assert_eq!(
            json.pointer("/customer/fullName"),
            Some(&serde_json::json!("Ayesha Khan"))
        );
        assert_eq!(json.get("tax"), Some(&serde_json::json!(130.0)));

        let parsed: Order = serde_json::from_value(json)?;
        assert_eq!(parsed, order);

        Ok(())
    }
}
