//! Axum Service Template - CRUD web service foundation
//!
//! This crate provides a layered foundation for building REST APIs with
//! Axum and SeaORM: a generic repository, transactional sessions,
//! uniform JSON errors and a migration CLI.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and DTOs
//! - **services**: Application use cases
//! - **infra**: Database helper, sessions, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **utils**: Migration scaffolding
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Scaffold a new migration
//! cargo run -- migrate revision -m "add tags"
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::Item;
pub use errors::{AppError, AppResult};
pub use infra::DatabaseHelper;
