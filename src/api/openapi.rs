//! OpenAPI documentation configuration.
//!
//! The document backs the Swagger UI in debug mode and can be written to
//! disk at startup.

use std::fs;
use std::path::{Path, PathBuf};

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, item_handler};
use crate::config::AppConfig;
use crate::domain::{CreateItem, ItemResponse, PatchItem, UpdateItem};
use crate::errors::{ErrorBody, ErrorKind};
use crate::types::{MessageResponse, PaginatedItems};

/// OpenAPI documentation for the service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Axum Service Template",
        description = "CRUD web service with Axum, SeaORM and SeaORM migrations"
    ),
    paths(
        health_handler::root,
        health_handler::health,
        item_handler::list_items,
        item_handler::get_item,
        item_handler::create_item,
        item_handler::replace_item,
        item_handler::patch_item,
        item_handler::delete_item,
    ),
    components(
        schemas(
            CreateItem,
            UpdateItem,
            PatchItem,
            ItemResponse,
            PaginatedItems,
            MessageResponse,
            ErrorBody,
            ErrorKind,
            health_handler::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity"),
        (name = "Items", description = "Item management operations")
    )
)]
pub struct ApiDoc;

/// Write the OpenAPI document when enabled.
///
/// Failures are logged and never abort startup. Returns the written path.
pub fn generate_openapi_file(config: &AppConfig) -> Option<PathBuf> {
    if !config.generate_openapi_file {
        return None;
    }

    let path = config.openapi_output_path();
    match write_document(&path) {
        Ok(()) => {
            tracing::info!("OpenAPI schema written to {}", path.display());
            Some(path)
        }
        Err(e) => {
            tracing::error!("Failed to write OpenAPI schema to {}: {}", path.display(), e);
            None
        }
    }
}

fn write_document(path: &Path) -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(std::io::Error::other)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_item_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/items"));
        assert!(doc.paths.paths.contains_key("/api/v1/items/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn file_is_written_into_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs").join("openapi.json");
        let config = AppConfig {
            generate_openapi_file: true,
            openapi_file_path: target.to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        let written = generate_openapi_file(&config).unwrap();

        assert_eq!(written, target);
        let contents = fs::read_to_string(&target).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(json["info"]["title"], "Axum Service Template");
    }

    #[test]
    fn disabled_generation_writes_nothing() {
        let config = AppConfig::default();
        assert!(generate_openapi_file(&config).is_none());
    }
}
