//! HTTP request handlers.

pub mod health_handler;
pub mod item_handler;

pub use health_handler::{health, root};
pub use item_handler::item_routes;
