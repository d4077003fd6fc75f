//! Migration scaffolding templates.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::MIGRATIONS_DIR;
use crate::errors::{AppError, AppResult};

/// Write an empty migration for `message` into the migrations directory.
pub fn generate_migration(message: &str) -> AppResult<PathBuf> {
    generate_migration_in(Path::new(MIGRATIONS_DIR), message, Utc::now())
}

/// Write an empty migration into `dir`, stamped with `now`.
pub fn generate_migration_in(
    dir: &Path,
    message: &str,
    now: DateTime<Utc>,
) -> AppResult<PathBuf> {
    let slug = slugify(message);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Migration message must contain at least one letter or digit",
        ));
    }

    let module = format!("m{}_{}", now.format("%Y%m%d_%H%M%S"), slug);
    let path = dir.join(format!("{}.rs", module));
    if path.exists() {
        return Err(AppError::validation(format!(
            "Migration {} already exists",
            path.display()
        )));
    }

    write_file(&path, &migration_template(message))?;
    tracing::info!(
        "Created {}; register `{}::Migration` in the Migrator to apply it",
        path.display(),
        module
    );

    Ok(path)
}

fn migration_template(message: &str) -> String {
    let title = message.trim().replace('\n', " ");
    format!(
        r#"//! Migration: {title}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {{
    async fn up(&self, _manager: &SchemaManager) -> Result<(), DbErr> {{
        Ok(())
    }}

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {{
        Ok(())
    }}
}}
"#
    )
}

/// Lower-case `message` and collapse every run of other characters into `_`.
fn slugify(message: &str) -> String {
    let mut slug = String::with_capacity(message.len());
    for c in message.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Write content to file
fn write_file(path: &Path, content: &str) -> AppResult<()> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::internal(e.to_string()))?;
    }

    fs::write(path, content).map_err(|e| AppError::internal(e.to_string()))?;

    Ok(())
}
