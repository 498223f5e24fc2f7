//! Essentae
//!
//! Storefront core for the Essentae fragrance shop: the product catalog, a
//! locally persisted shopping cart, checkout into an append-only order log,
//! and contact form validation.
//!
//! All state lives in a [`storage::Storage`] under two fixed keys. The
//! [`store::CartStore`] is the only writer of the cart key and the
//! [`orders::OrderRecorder`] the only writer of the order log; both share a
//! lock so that every read-modify-write is atomic.

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod items;
pub mod observer;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod store;
pub mod uuids;
