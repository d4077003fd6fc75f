//! Item service - Handles item-related business logic.
//!
//! Every call runs in its own session; writes are committed before returning.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{Order, Set};
use uuid::Uuid;

use crate::domain::{CreateItem, Item, PatchItem, UpdateItem};
use crate::errors::AppResult;
use crate::infra::repositories::entities::item::{self, ActiveModel, Entity as ItemEntity};
use crate::infra::{Changes, DatabaseHelper};
use crate::types::PaginatedResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Item service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ItemService: Send + Sync {
    /// List items ordered by creation time
    async fn list(&self, page: u64, per_page: u64) -> AppResult<PaginatedResult<Item>>;

    /// Get item by ID
    async fn get(&self, id: Uuid) -> AppResult<Item>;

    /// Create a new item
    async fn create(&self, data: CreateItem) -> AppResult<Item>;

    /// Replace all writable fields
    async fn replace(&self, id: Uuid, data: UpdateItem) -> AppResult<Item>;

    /// Update only the provided fields
    async fn patch(&self, id: Uuid, data: PatchItem) -> AppResult<Item>;

    /// Delete item by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ItemService backed by the database.
pub struct ItemManager {
    db: DatabaseHelper,
}

impl ItemManager {
    /// Create new item service instance
    pub fn new(db: DatabaseHelper) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemService for ItemManager {
    async fn list(&self, page: u64, per_page: u64) -> AppResult<PaginatedResult<Item>> {
        let session = self.db.session().await?;
        let result = session
            .repository::<ItemEntity>()
            .get_paginated(
                page,
                per_page,
                None,
                Some((item::Column::CreatedAt, Order::Asc)),
            )
            .await?;
        session.commit().await?;

        Ok(result.map(Item::from))
    }

    async fn get(&self, id: Uuid) -> AppResult<Item> {
        let session = self.db.session().await?;
        let model = session
            .repository::<ItemEntity>()
            .get_by_id_or_404(id)
            .await?;
        session.commit().await?;

        Ok(Item::from(model))
    }

    async fn create(&self, data: CreateItem) -> AppResult<Item> {
        let item = Item::new(data.name, data.description);
        let active_model = ActiveModel {
            id: Set(item.id),
            name: Set(item.name),
            description: Set(item.description),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        };

        let session = self.db.session().await?;
        let model = session
            .repository::<ItemEntity>()
            .create(active_model)
            .await?;
        session.commit().await?;

        tracing::info!(item_id = %model.id, "Item created");
        Ok(Item::from(model))
    }

    async fn replace(&self, id: Uuid, data: UpdateItem) -> AppResult<Item> {
        let changes = Changes::<ItemEntity>::new()
            .set(item::Column::Name, data.name)
            .set_opt(item::Column::Description, data.description)
            .set(item::Column::UpdatedAt, Utc::now());

        let session = self.db.session().await?;
        let model = session
            .repository::<ItemEntity>()
            .update(id, changes)
            .await?;
        session.commit().await?;

        Ok(Item::from(model))
    }

    async fn patch(&self, id: Uuid, data: PatchItem) -> AppResult<Item> {
        let changes = if data.is_empty() {
            Changes::new()
        } else {
            Changes::<ItemEntity>::new()
                .set_opt(item::Column::Name, data.name)
                .set_opt(item::Column::Description, data.description)
                .set(item::Column::UpdatedAt, Utc::now())
        };

        let session = self.db.session().await?;
        let model = session
            .repository::<ItemEntity>()
            .patch(id, changes)
            .await?;
        session.commit().await?;

        Ok(Item::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.db.session().await?;
        session.repository::<ItemEntity>().delete(id).await?;
        session.commit().await?;

        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }
}
