//! Domain entities and request/response schemas.
//!
//! # Design Decisions
//! - Request payloads use `Option` fields so missing-field errors are
//!   reported by name with a 400, not a deserializer rejection
//! - Each payload validates itself into a checked "new entity" value
//!   before any storage call

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, Product};
pub use user::{Claims, LoginRequest, LoginResponse, RegisterRequest, StoredUser};
