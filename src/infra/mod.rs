//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database pool, sessions and migrations
//! - Generic repository and entity definitions

pub mod db;
pub mod repositories;

pub use db::{DatabaseHelper, Migrator, Session};
pub use repositories::{BaseEntity, BaseRepository, Changes, FilterBy, FindOptions};
