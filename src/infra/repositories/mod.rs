//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
pub mod entities;
mod query;

pub use base::BaseRepository;
pub use entities::BaseEntity;
pub use query::{Changes, FilterBy, FindOptions};
