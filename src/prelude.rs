//! Essentae prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, CategoryFilter, ProductQuery, SortOrder},
    contact::{ContactErrors, ContactField, ContactFieldError, ContactForm, ContactValidator},
    items::LineItem,
    observer::{CartObserver, NoopObserver},
    orders::{
        Customer, CustomerField, Order, OrderError, OrderRecorder, OrderStatus, OrderUuid,
        PaymentMethodId, ValidationError,
    },
    pricing::{OrderTotals, PricingPolicy, compute_totals},
    products::{Product, ProductId},
    receipt::{ReceiptError, write_cart, write_order, write_products},
    storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageLock},
    store::{CartStore, StoreError},
};
