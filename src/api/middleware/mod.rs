//! API middleware.

mod error_path;

pub use error_path::{error_path_middleware, panic_response};
