//! Order Recorder

use jiff::Timestamp;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    orders::{Customer, Order, OrderStatus, OrderUuid, PaymentMethodId, ValidationError},
    storage::{ORDERS_KEY, Storage, StorageError, write_json},
    store::CartStore,
};

/// Reasons an order could not be placed.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart has no line items.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Required customer fields were blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No payment method was selected.
    #[error("No payment method selected")]
    MissingPaymentMethod,

    /// The stored order log is not a JSON array and cannot be appended to.
    #[error("Stored order log is corrupt: {0}")]
    CorruptOrderLog(#[source] serde_json::Error),

    /// The order log could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Turns carts into orders and keeps the order log.
///
/// The log is append-only. Entries this version cannot read, such as orders
/// with older identifier formats, are kept as they are and skipped by
/// [`OrderRecorder::orders`].
#[derive(Debug)]
pub struct OrderRecorder<S: Storage> {
    store: CartStore<S>,
}

impl<S: Storage> Clone for OrderRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: Storage> OrderRecorder<S> {
    /// Create a recorder over the given cart store's storage.
    pub fn new(store: CartStore<S>) -> Self {
        Self { store }
    }

    /// The cart store this recorder clears after each order.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Place an order for `cart`.
    ///
    /// On success the order has been appended to the log and the persisted
    /// cart cleared. On failure neither has changed.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: the cart has no line items.
    /// - [`OrderError::Validation`]: a required customer field is blank.
    /// - [`OrderError::MissingPaymentMethod`]: no payment method was given.
    /// - [`OrderError::CorruptOrderLog`]: the stored log is not a JSON array.
    /// - [`OrderError::Storage`]: the order log or cart could not be written.
    pub fn place_order(
        &self,
        cart: &Cart,
        customer: &Customer,
        payment_method: Option<PaymentMethodId>,
    ) -> Result<Order, OrderError> {
        let order = {
            let _guard = self.store.lock();

            self.place_order_locked(cart, customer, payment_method)?
        };

        self.store.notify(&Cart::new());

        Ok(order)
    }

    /// Place an order for whatever is currently in the cart store.
    ///
    /// # Errors
    ///
    /// As [`OrderRecorder::place_order`].
    pub fn checkout(
        &self,
        customer: &Customer,
        payment_method: Option<PaymentMethodId>,
    ) -> Result<Order, OrderError> {
        let order = {
            let _guard = self.store.lock();

            let cart = self.store.load_cart();

            self.place_order_locked(&cart, customer, payment_method)?
        };

        self.store.notify(&Cart::new());

        Ok(order)
    }

    /// Every readable order placed so far, oldest first.
    ///
    /// An absent or malformed log reads as empty.
    pub fn orders(&self) -> Vec<Order> {
        let _guard = self.store.lock();

        let entries = match self.store.storage().get(ORDERS_KEY) {
            Ok(raw) => parse_log(raw.as_deref()).unwrap_or_else(|err| {
                warn!(error = %err, "stored order log is malformed; treating as empty");
                Vec::new()
            }),
            Err(err) => {
                warn!(error = %err, "failed to read order log; treating as empty");
                Vec::new()
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                serde_json::from_value(entry)
                    .inspect_err(|err| {
                        warn!(position, error = %err, "skipping unreadable order");
                    })
                    .ok()
            })
            .collect()
    }

    fn place_order_locked(
        &self,
        cart: &Cart,
        customer: &Customer,
        payment_method: Option<PaymentMethodId>,
    ) -> Result<Order, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        customer.validate()?;

        let payment_method = payment_method.ok_or(OrderError::MissingPaymentMethod)?;

        let order = Order {
            id: OrderUuid::now_v7(),
            created_at: Timestamp::now(),
            customer: customer.trimmed(),
            items: cart.items().to_vec(),
            payment_method,
            totals: self.store.compute_totals(cart),
            status: OrderStatus::Pending,
        };

        let storage = self.store.storage();
        let previous = storage.get(ORDERS_KEY)?;

        let mut entries = parse_log(previous.as_deref()).map_err(OrderError::CorruptOrderLog)?;

        entries.push(
            serde_json::to_value(&order).map_err(|source| StorageError::Serialize {
                key: ORDERS_KEY.to_string(),
                source,
            })?,
        );

        write_json(storage.as_ref(), ORDERS_KEY, &entries)?;

        if let Err(err) = self.store.clear_locked() {
            warn!(error = %err, order = %order.id, "failed to clear cart; rolling back order");

            match previous {
                Some(raw) => storage.set(ORDERS_KEY, &raw)?,
                None => storage.remove(ORDERS_KEY)?,
            }

            return Err(err.into());
        }

        info!(
            order = %order.id,
            items = order.items.len(),
            total = %order.totals.total,
            "placed order"
        );

        Ok(order)
    }
}

/// Split a stored log into its raw entries. An absent log is empty.
fn parse_log(raw: Option<&str>) -> Result<Vec<Value>, serde_json::Error> {
    raw.map_or_else(|| Ok(Vec::new()), serde_json::from_str)
}
