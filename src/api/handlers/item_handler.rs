//! Item handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{IdPath, QueryParams, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CreateItem, ItemResponse, PatchItem, UpdateItem};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginatedResult, PaginationParams};

/// Create item routes
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item)
                .put(replace_item)
                .patch(patch_item)
                .delete(delete_item),
        )
}

/// List items, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "Items",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of items", body = PaginatedItems),
        (status = 500, description = "Invalid page number", body = ErrorBody),
        (status = 422, description = "Malformed query string", body = ErrorBody)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<PaginatedResult<ItemResponse>>> {
    let page = state.item_service.list(params.page, params.limit()).await?;

    Ok(Json(page.map(ItemResponse::from)))
}

/// Get item by ID
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<ItemResponse>> {
    let item = state.item_service.get(id).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 500, description = "Integrity constraint violated", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItem>,
) -> AppResult<Created<ItemResponse>> {
    let item = state.item_service.create(payload).await?;
    Ok(Created(ItemResponse::from(item)))
}

/// Replace an item's writable fields
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item replaced", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody)
    )
)]
pub async fn replace_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdateItem>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.item_service.replace(id, payload).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// Update only the provided fields
#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = PatchItem,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody)
    )
)]
pub async fn patch_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<PatchItem>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.item_service.patch(id, payload).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<NoContent> {
    state.item_service.delete(id).await?;
    Ok(NoContent)
}
