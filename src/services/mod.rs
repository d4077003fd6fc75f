//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod item_service;

pub use item_service::{ItemManager, ItemService};

#[cfg(any(test, feature = "test-utils"))]
pub use item_service::MockItemService;
