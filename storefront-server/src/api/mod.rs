//! API route modules
//!
//! - [`health`] - liveness and the root banner
//! - [`auth`] - registration, login, admin creation
//! - [`products`] - catalog listing and admin product management
//! - [`orders`] - checkout, order management, statistics
//! - [`users`] - profile and admin customer management

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
