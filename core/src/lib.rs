// src/lib.rs

//! FastCart: order placement against row-locked inventory.
//!
//! The crate owns the part of the commerce backend that has real invariants:
//!  - Normalizing an order request so each product appears on one line.
//!  - Locking the referenced inventory rows, checking availability and pricing
//!    every line from a snapshot of the current product price.
//!  - Decrementing stock and persisting the order and its lines inside one
//!    transaction, so concurrent orders can never oversell a product.
//!
//! Storage is reached only through the [`OrderStore`] / [`OrderTransaction`]
//! traits. [`InMemoryStore`] implements them in-process; the application crate
//! provides the Postgres implementation.

pub mod builder;
pub mod error;
pub mod memory;
pub mod model;
pub mod normalize;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::builder::{OrderBuilder, EMPTY_ORDER_MESSAGE};
pub use crate::error::{OrderError, StoreError, StoreResult};
pub use crate::memory::{InMemoryStore, InMemoryTransaction, ProductRecord};
pub use crate::model::{
  CreatedOrder, LockedProduct, NewOrder, NewOrderItem, OrderId, OrderLine, OrderStatus, PlacedOrder, ProductId,
  RequestedItem, StockUpdate, UnknownOrderStatus,
};
pub use crate::normalize::normalize_items;
pub use crate::store::{OrderStore, OrderTransaction};
