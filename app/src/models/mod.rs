// fastcart/app/src/models/mod.rs

//! Request payloads and database rows for the HTTP layer. Order placement
//! types themselves live in the `fastcart` core crate.

pub mod order;
pub mod pagination;
pub mod product;

pub use order::{CreateOrderRequest, DbOrderStatus, OrderSummary, OrderSummaryRow};
pub use pagination::{Page, PageQuery, PaginatedResponse};
pub use product::{Product, ProductCreate, ProductSummary};
