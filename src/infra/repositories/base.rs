//! Generic repository shared by every UUID-keyed entity.
//!
//! The repository borrows a connection, which is either the pool itself or
//! the transaction of a [`crate::infra::Session`]. Driver failures are logged
//! with the entity name and converted into the database error family of
//! [`AppError`].

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr,
};
use uuid::Uuid;

use super::entities::BaseEntity;
use super::query::{Changes, FilterBy, FindOptions};
use crate::config::INTEGRITY_VIOLATION_MESSAGE;
use crate::errors::{AppError, AppResult};
use crate::types::PaginatedResult;

/// CRUD, counting and pagination over one entity.
pub struct BaseRepository<'c, E, C> {
    conn: &'c C,
    _entity: PhantomData<E>,
}

impl<'c, E, C> BaseRepository<'c, E, C>
where
    E: BaseEntity,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Get database connection reference
    pub fn conn(&self) -> &'c C {
        self.conn
    }

    /// Find entity by primary key
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::id_column().eq(id))
            .one(self.conn)
            .await
            .map_err(|e| {
                tracing::error!("Error getting {} by id {}: {}", E::NAME, id, e);
                AppError::operation("get entity", e)
            })
    }

    /// Find entity by primary key or fail with `EntityNotFound`
    pub async fn get_by_id_or_404(&self, id: Uuid) -> AppResult<E::Model> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    /// Find entities matching the options
    ///
    /// Offset and limit are only applied when greater than zero.
    pub async fn find(&self, options: FindOptions<E>) -> AppResult<Vec<E::Model>> {
        let mut query = E::find();

        if let Some(condition) = options.filters {
            query = query.filter(condition);
        }
        if let Some((column, order)) = options.order_by {
            query = query.order_by(column, order);
        }
        if let Some(offset) = options.offset.filter(|o| *o > 0) {
            query = query.offset(offset);
        }
        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            query = query.limit(limit);
        }

        query.all(self.conn).await.map_err(|e| {
            tracing::error!("Error finding {}: {}", E::NAME, e);
            AppError::operation("find entities", e)
        })
    }

    /// Find all entities matching equality filters
    pub async fn get_all(&self, filter: &FilterBy<E>) -> AppResult<Vec<E::Model>> {
        E::find()
            .filter(filter.condition())
            .all(self.conn)
            .await
            .map_err(|e| {
                tracing::error!("Error getting all {}: {}", E::NAME, e);
                AppError::operation("get all entities", e)
            })
    }

    /// Find the single entity matching equality filters
    ///
    /// More than one match is reported as a failed operation.
    pub async fn get_one_or_none(&self, filter: &FilterBy<E>) -> AppResult<Option<E::Model>> {
        let mut rows = E::find()
            .filter(filter.condition())
            .limit(2)
            .all(self.conn)
            .await
            .map_err(|e| {
                tracing::error!("Error getting one {}: {}", E::NAME, e);
                AppError::operation("get entity", e)
            })?;

        if rows.len() > 1 {
            tracing::error!("Error getting one {}: multiple rows match {}", E::NAME, filter);
            return Err(AppError::operation(
                "get entity",
                "Multiple rows were found when one or none was required",
            ));
        }

        Ok(rows.pop())
    }

    /// Find the single entity matching equality filters or fail with `EntityNotFoundBy`
    pub async fn get_one_or_404(&self, filter: &FilterBy<E>) -> AppResult<E::Model> {
        self.get_one_or_none(filter)
            .await?
            .ok_or_else(|| AppError::not_found_by(E::NAME, filter))
    }

    /// Insert a new entity and return the stored row
    pub async fn create<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'c,
        E::Model: IntoActiveModel<A>,
    {
        model
            .insert(self.conn)
            .await
            .map_err(|e| self.write_error("create entity", None, e))
    }

    /// Write every assignment in `changes` to the row with `id`
    ///
    /// An empty change set returns the current row unchanged.
    pub async fn update(&self, id: Uuid, changes: Changes<E>) -> AppResult<E::Model> {
        if changes.is_empty() {
            return self.get_by_id_or_404(id).await;
        }

        let mut statement = E::update_many().filter(E::id_column().eq(id));
        for (column, expr) in changes.into_exprs() {
            statement = statement.col_expr(column, expr);
        }

        let mut rows = statement
            .exec_with_returning(self.conn)
            .await
            .map_err(|e| self.write_error("update entity", Some(id), e))?;

        rows.pop().ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    /// Partial update that ignores `None` values
    pub async fn patch(&self, id: Uuid, changes: Changes<E>) -> AppResult<E::Model> {
        self.update(id, changes.without_nulls()).await
    }

    /// Delete entity by primary key
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(self.conn)
            .await
            .map_err(|e| {
                tracing::error!("Error deleting {} with id {}: {}", E::NAME, id, e);
                AppError::operation("delete entity", e)
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(E::NAME, id));
        }

        Ok(())
    }

    /// Count entities, optionally restricted by a condition
    pub async fn count(&self, filters: Option<Condition>) -> AppResult<u64> {
        let mut query = E::find();
        if let Some(condition) = filters {
            query = query.filter(condition);
        }

        query.count(self.conn).await.map_err(|e| {
            tracing::error!("Error counting {}: {}", E::NAME, e);
            AppError::operation("count entities", e)
        })
    }

    /// Fetch one page together with the total number of matching rows
    pub async fn get_paginated(
        &self,
        page: u64,
        per_page: u64,
        filters: Option<Condition>,
        order_by: Option<(E::Column, Order)>,
    ) -> AppResult<PaginatedResult<E::Model>> {
        if page < 1 {
            return Err(AppError::validation("Page number must be >= 1"));
        }
        if per_page < 1 {
            return Err(AppError::validation("Per page number must be >= 1"));
        }

        let offset = (page - 1).saturating_mul(per_page);
        let total = self.count(filters.clone()).await?;

        let mut options = FindOptions::new().limit(per_page).offset(offset);
        options.filters = filters;
        options.order_by = order_by;
        let items = self.find(options).await?;

        Ok(PaginatedResult::new(items, total, page, per_page))
    }

    /// Re-read an entity from the database
    pub async fn refresh(&self, model: &E::Model) -> AppResult<E::Model> {
        let id = E::id_of(model);
        E::find()
            .filter(E::id_column().eq(id))
            .one(self.conn)
            .await
            .map_err(|e| {
                tracing::error!("Error refreshing {}: {}", E::NAME, e);
                AppError::operation("refresh entity", e)
            })?
            .ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    /// Classify a failed insert or update
    fn write_error(&self, operation: &str, id: Option<Uuid>, err: DbErr) -> AppError {
        let target = match id {
            Some(id) => format!("{} with id {}", E::NAME, id),
            None => E::NAME.to_string(),
        };

        if is_integrity_violation(&err) {
            tracing::error!("Integrity error during {} of {}: {}", operation, target, err);
            return AppError::validation(INTEGRITY_VIOLATION_MESSAGE);
        }

        tracing::error!("Error during {} of {}: {}", operation, target, err);
        AppError::operation(operation, err)
    }
}

/// SQLSTATE class 23: unique, foreign key, not null, check and exclusion violations.
fn is_integrity_violation(err: &DbErr) -> bool {
    if err.sql_err().is_some() {
        return true;
    }

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code.starts_with("23")),
        _ => false,
    }
}
