//! Cart Store
//!
//! Owns the persisted cart. Every read-modify-write of the cart key goes
//! through [`CartStore`] while holding the storage's
//! [`StorageLock`](crate::storage::StorageLock), so
//! stores built separately over the same storage (and any
//! [`OrderRecorder`](crate::orders::OrderRecorder)) never interleave.
//!
//! Observers are called after the lock is released and may read or mutate
//! the cart from their callbacks.

use std::{
    fmt,
    sync::{Arc, MutexGuard},
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    catalog::Catalog,
    items::LineItem,
    observer::CartObserver,
    pricing::{OrderTotals, PricingPolicy},
    products::{Product, ProductId},
    storage::{CART_KEY, Storage, StorageError, write_json},
};

/// Errors raised by cart store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed to persist the cart.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The product is not in the catalog.
    #[error("Product {0} not found in catalog")]
    UnknownProduct(ProductId),
}

/// Cart Store
pub struct CartStore<S: Storage> {
    storage: Arc<S>,
    policy: PricingPolicy,
    observers: Vec<Arc<dyn CartObserver>>,
}

impl<S: Storage> CartStore<S> {
    /// Create a cart store over the given storage with the default pricing policy.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_policy(storage, PricingPolicy::default())
    }

    /// Create a cart store with a custom pricing policy.
    pub fn with_policy(storage: Arc<S>, policy: PricingPolicy) -> Self {
        Self {
            storage,
            policy,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified after each change.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CartObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The pricing policy used by [`CartStore::compute_totals`].
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Read the persisted cart.
    ///
    /// An absent, unreadable, malformed or invariant-violating value reads as
    /// an empty cart.
    pub fn get_cart(&self) -> Cart {
        let _guard = self.lock();

        self.load_cart()
    }

    /// Add `quantity` units of a product, merging with an existing line item
    /// for the same id.
    ///
    /// A zero quantity leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the updated cart cannot be written.
    pub fn add_item(&self, product: &Product, quantity: u32) -> Result<Cart, StoreError> {
        let (cart, index) = {
            let _guard = self.lock();

            let mut cart = self.load_cart();

            let Some(index) = cart.add(product, quantity) else {
                return Ok(cart);
            };

            self.save_cart(&cart)?;

            (cart, index)
        };

        debug!(product = %product.id, quantity, "added item to cart");

        if let Some(item) = cart.get_item(index) {
            self.notify_added(item);
        }

        self.notify(&cart);

        Ok(cart)
    }

    /// Look a product up in the catalog and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::UnknownProduct`] if the catalog has no such
    /// product, or a [`StoreError::Storage`] if the cart cannot be written.
    pub fn add_product_by_id(
        &self,
        catalog: &Catalog,
        id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, StoreError> {
        let product = catalog
            .get(id)
            .ok_or_else(|| StoreError::UnknownProduct(id.clone()))?;

        self.add_item(product, quantity)
    }

    /// Adjust the quantity of the item at `index` by `delta`.
    ///
    /// Items reaching zero or below are removed. An out-of-range index is a
    /// no-op and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the updated cart cannot be written.
    pub fn update_quantity(&self, index: usize, delta: i64) -> Result<Cart, StoreError> {
        let cart = {
            let _guard = self.lock();

            let mut cart = self.load_cart();

            if !cart.update_quantity(index, delta) {
                debug!(index, "update_quantity ignored out-of-range index");
                return Ok(cart);
            }

            self.save_cart(&cart)?;

            cart
        };

        debug!(index, delta, "updated cart quantity");

        self.notify(&cart);

        Ok(cart)
    }

    /// Remove the item at `index`. An out-of-range index is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the updated cart cannot be written.
    pub fn remove_item(&self, index: usize) -> Result<Cart, StoreError> {
        let (cart, removed) = {
            let _guard = self.lock();

            let mut cart = self.load_cart();

            let Some(removed) = cart.remove(index) else {
                debug!(index, "remove_item ignored out-of-range index");
                return Ok(cart);
            };

            self.save_cart(&cart)?;

            (cart, removed)
        };

        debug!(index, product = %removed.id, "removed item from cart");

        self.notify(&cart);

        Ok(cart)
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the cart key cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        {
            let _guard = self.lock();

            self.clear_locked()?;
        }

        self.notify(&Cart::new());

        Ok(())
    }

    /// Compute totals for a cart with this store's pricing policy.
    pub fn compute_totals(&self, cart: &Cart) -> OrderTotals {
        self.policy.totals(cart)
    }

    /// Total number of units in a cart.
    pub fn item_count(cart: &Cart) -> u64 {
        cart.item_count()
    }

    /// Hold the storage's read-modify-write lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.storage.lock().acquire()
    }

    /// Read the cart; the caller must hold the lock.
    pub(crate) fn load_cart(&self) -> Cart {
        match self.storage.get(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "stored cart is malformed; treating as empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!(error = %err, "failed to read cart; treating as empty");
                Cart::new()
            }
        }
    }

    /// Delete the cart; the caller must hold the lock and notify afterwards.
    pub(crate) fn clear_locked(&self) -> Result<(), StorageError> {
        self.storage.remove(CART_KEY)?;

        debug!("cleared cart");

        Ok(())
    }

    /// Tell observers about the new cart state; the caller must not hold the lock.
    pub(crate) fn notify(&self, cart: &Cart) {
        let count = cart.item_count();

        self.observers
            .iter()
            .for_each(|observer| observer.cart_changed(cart, count));
    }

    fn notify_added(&self, item: &LineItem) {
        self.observers
            .iter()
            .for_each(|observer| observer.item_added(item));
    }

    fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), CART_KEY, cart)
    }
}

impl<S: Storage> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            policy: self.policy,
            observers: self.observers.clone(),
        }
    }
}

impl<S: Storage> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("policy", &self.policy)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Mutex, PoisonError, mpsc},
        time::Duration,
    };

    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{observer::MockCartObserver, storage::MemoryStorage};

    use super::*;

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(Arc::new(MemoryStorage::new()))
    }

    fn oud() -> Product {
        Product::new(1, "Oud Royale", "men", Decimal::from(3500))
    }

    fn rose() -> Product {
        Product::new(2, "Rose Mist", "women", Decimal::from(1800))
    }

    #[test]
    fn empty_storage_reads_as_empty_cart() {
        assert!(store().get_cart().is_empty());
    }

    #[test]
    fn add_item_twice_merges_quantity() -> TestResult {
        let store = store();

        store.add_item(&oud(), 1)?;
        let cart = store.add_item(&oud(), 1)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(0).map(|item| item.quantity), Some(2));
        assert_eq!(store.get_cart(), cart);

        Ok(())
    }

    #[test]
    fn malformed_cart_reads_as_empty() -> TestResult {
        let store = store();
        store.storage().set(CART_KEY, "{not json")?;

        assert!(store.get_cart().is_empty());

        Ok(())
    }

    #[test]
    fn cart_with_duplicate_ids_reads_as_empty() -> TestResult {
        let store = store();
        store.storage().set(
            CART_KEY,
            r#"[{"id":1,"name":"A","category":"men","price":10},
                {"id":1,"name":"A","category":"men","price":10}]"#,
        )?;

        assert!(store.get_cart().is_empty());

        Ok(())
    }

    #[test]
    fn mutating_a_corrupt_cart_starts_afresh() -> TestResult {
        let store = store();
        store.storage().set(CART_KEY, "null")?;

        let cart = store.add_item(&rose(), 1)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(store.get_cart(), cart);

        Ok(())
    }

    #[test]
    fn out_of_range_update_does_not_write() -> TestResult {
        let store = store();
        store.add_item(&oud(), 1)?;
        let before = store.storage().get(CART_KEY)?;

        store.update_quantity(3, 1)?;
        store.remove_item(3)?;

        assert_eq!(store.storage().get(CART_KEY)?, before);

        Ok(())
    }

    #[test]
    fn clear_removes_the_key() -> TestResult {
        let store = store();
        store.add_item(&oud(), 1)?;

        store.clear()?;

        assert_eq!(store.storage().get(CART_KEY)?, None);
        assert!(store.get_cart().is_empty());

        Ok(())
    }

    #[test]
    fn clones_share_state() -> TestResult {
        let store = store();
        let other = store.clone();

        store.add_item(&oud(), 2)?;

        assert_eq!(other.get_cart().item_count(), 2);

        Ok(())
    }

    #[test]
    fn observers_receive_counts_after_mutations() -> TestResult {
        let mut observer = MockCartObserver::new();

        observer
            .expect_item_added()
            .withf(|item| item.id == ProductId::Number(1))
            .times(2)
            .return_const(());
        observer
            .expect_cart_changed()
            .withf(|_, count| *count == 1)
            .times(1)
            .return_const(());
        observer
            .expect_cart_changed()
            .withf(|_, count| *count == 3)
            .times(1)
            .return_const(());
        observer
            .expect_cart_changed()
            .withf(|cart, count| *count == 2 && cart.len() == 1)
            .times(1)
            .return_const(());

        let store = store().with_observer(Arc::new(observer));

        store.add_item(&oud(), 1)?;
        store.add_item(&oud(), 2)?;
        store.update_quantity(0, -1)?;

        Ok(())
    }

    #[test]
    fn no_op_mutations_do_not_notify() -> TestResult {
        let mut observer = MockCartObserver::new();
        observer.expect_cart_changed().never();
        observer.expect_item_added().never();

        let store = store().with_observer(Arc::new(observer));

        store.add_item(&oud(), 0)?;
        store.update_quantity(0, 1)?;
        store.remove_item(0)?;

        Ok(())
    }

    #[test]
    fn clear_notifies_with_zero_count() -> TestResult {
        let mut observer = MockCartObserver::new();
        observer
            .expect_cart_changed()
            .with(eq(Cart::new()), eq(0))
            .times(1)
            .return_const(());

        let store = store().with_observer(Arc::new(observer));

        store.clear()?;

        Ok(())
    }

    #[test]
    fn separately_built_stores_do_not_lose_updates() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = CartStore::new(Arc::clone(&storage));

                scope.spawn(move || {
                    for _ in 0..500 {
                        assert!(store.add_item(&oud(), 1).is_ok(), "add_item failed");
                    }
                });
            }
        });

        assert_eq!(CartStore::new(storage).get_cart().item_count(), 2000);

        Ok(())
    }

    /// Reads the cart back from inside its callback.
    struct Rereading {
        store: CartStore<MemoryStorage>,
        seen: Mutex<Vec<u64>>,
    }

    impl CartObserver for Rereading {
        fn cart_changed(&self, _cart: &Cart, _item_count: u64) {
            let count = self.store.get_cart().item_count();

            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(count);
        }
    }

    #[test]
    fn observers_can_read_the_cart_from_callbacks() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let observer = Arc::new(Rereading {
            store: CartStore::new(Arc::clone(&storage)),
            seen: Mutex::default(),
        });
        let store = CartStore::new(storage).with_observer(observer.clone());

        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let result = store
                .add_item(&oud(), 2)
                .and_then(|_| store.update_quantity(0, -1))
                .and_then(|_| store.clear());

            _ = tx.send(result.is_ok());
        });

        let finished = rx.recv_timeout(Duration::from_secs(5))?;

        assert!(finished, "store mutation failed");
        assert_eq!(
            *observer.seen.lock().unwrap_or_else(PoisonError::into_inner),
            vec![2, 1, 0]
        );

        Ok(())
    }

    #[test]
    fn add_unknown_product_by_id_fails() -> TestResult {
        let store = store();
        let catalog = Catalog::from_products([oud()])?;

        let result = store.add_product_by_id(&catalog, &ProductId::Number(99), 1);

        assert!(
            matches!(result, Err(StoreError::UnknownProduct(ProductId::Number(99)))),
            "expected UnknownProduct, got {result:?}"
        );
        assert!(store.get_cart().is_empty());

        Ok(())
    }

    #[test]
    fn add_product_by_id_snapshots_catalog_entry() -> TestResult {
        let store = store();
        let catalog = Catalog::from_products([oud(), rose()])?;

        let cart = store.add_product_by_id(&catalog, &ProductId::Number(2), 1)?;

        assert_eq!(cart.get_item(0).map(|item| item.name.as_str()), Some("Rose Mist"));

        Ok(())
    }
}
