//! Custom request extractors.

mod params;
mod validated_json;

pub use params::{IdPath, QueryParams};
pub use validated_json::ValidatedJson;
