//! API models

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, OrderUser, ShippingAddress};
pub use product::Product;
pub use user::{Customer, CustomerUpdated, UserProfile};
