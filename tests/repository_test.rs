//! Integration tests for the generic repository and sessions.
//!
//! Queries run against SeaORM's mock connection, which replays canned rows
//! in the order the repository asks for them.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use chrono::Utc;
use sea_orm::sqlx::error::{DatabaseError, ErrorKind};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Order, RuntimeErr,
    Value,
};
use uuid::Uuid;

use service_template::config::INTEGRITY_VIOLATION_MESSAGE;
use service_template::errors::AppError;
use service_template::infra::repositories::entities::item;
use service_template::infra::{BaseRepository, Changes, DatabaseHelper, FilterBy, FindOptions};

// =============================================================================
// Test Helpers
// =============================================================================

fn model(name: &str) -> item::Model {
    let now = Utc::now();
    item::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

/// Server-side error carrying a SQLSTATE code, as the driver reports it.
#[derive(Debug)]
struct SqlStateError {
    code: &'static str,
}

impl fmt::Display for SqlStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "database error {}", self.code)
    }
}

impl StdError for SqlStateError {}

impl DatabaseError for SqlStateError {
    fn message(&self) -> &str {
        "constraint failed"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.code))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        match self.code {
            "23502" => ErrorKind::NotNullViolation,
            "23505" => ErrorKind::UniqueViolation,
            "23514" => ErrorKind::CheckViolation,
            _ => ErrorKind::Other,
        }
    }
}

fn sqlstate(code: &'static str) -> DbErr {
    DbErr::Query(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(Box::new(
        SqlStateError { code },
    ))))
}

fn new_active_model(name: &str) -> item::ActiveModel {
    let now = Utc::now();
    item::ActiveModel {
        id: sea_orm::Set(Uuid::new_v4()),
        name: sea_orm::Set(name.to_string()),
        description: sea_orm::Set(None),
        created_at: sea_orm::Set(now),
        updated_at: sea_orm::Set(now),
    }
}

fn repository(conn: &DatabaseConnection) -> BaseRepository<'_, item::Entity, DatabaseConnection> {
    BaseRepository::new(conn)
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_get_by_id_returns_none_when_missing() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<item::Model>::new()])
        .into_connection();

    let found = repository(&conn).get_by_id(Uuid::new_v4()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_one_or_404_names_the_filter() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<item::Model>::new()])
        .into_connection();
    let filter = FilterBy::new().eq(item::Column::Name, "Widget");

    let err = repository(&conn).get_one_or_404(&filter).await.unwrap_err();

    assert!(matches!(err, AppError::EntityNotFoundBy { .. }));
    assert_eq!(err.to_string(), "Item with name=Widget not found");
}

#[tokio::test]
async fn test_get_one_or_none_rejects_multiple_rows() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("a"), model("b")]])
        .into_connection();
    let filter = FilterBy::new().eq(item::Column::Description, "shared");

    let err = repository(&conn).get_one_or_none(&filter).await.unwrap_err();

    match err {
        AppError::DatabaseOperation { operation, .. } => assert_eq!(operation, "get entity"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_find_returns_rows_in_query_order() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("a"), model("b")]])
        .into_connection();
    let options = FindOptions::new()
        .order_by(item::Column::Name, Order::Asc)
        .limit(2);

    let rows = repository(&conn).find(options).await.unwrap();

    let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn test_count_reads_aggregate() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(7)]])
        .into_connection();

    assert_eq!(repository(&conn).count(None).await.unwrap(), 7);
}

// =============================================================================
// Pagination Tests
// =============================================================================

#[tokio::test]
async fn test_get_paginated_rejects_zero_per_page() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = repository(&conn)
        .get_paginated(1, 0, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m == "Per page number must be >= 1"));
}

#[tokio::test]
async fn test_get_paginated_last_page() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(5)]])
        .append_query_results([vec![model("e")]])
        .into_connection();

    let page = repository(&conn)
        .get_paginated(3, 2, None, Some((item::Column::CreatedAt, Order::Asc)))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 5);
    assert!(!page.has_next);
    assert!(page.has_prev);
}

// =============================================================================
// Write Tests
// =============================================================================

#[tokio::test]
async fn test_update_returns_written_row() {
    let mut stored = model("Widget");
    stored.name = "Gadget".to_string();
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();
    let changes = Changes::new().set(item::Column::Name, "Gadget");

    let row = repository(&conn).update(stored.id, changes).await.unwrap();

    assert_eq!(row.name, "Gadget");
}

#[tokio::test]
async fn test_patch_with_only_nulls_reads_current_row() {
    let stored = model("Widget");
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();
    let changes = Changes::new().set_opt(item::Column::Description, None::<String>);

    let row = repository(&conn).patch(stored.id, changes).await.unwrap();

    assert_eq!(row, stored);
}

#[tokio::test]
async fn test_refresh_of_deleted_row_is_not_found() {
    let stored = model("Widget");
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<item::Model>::new()])
        .into_connection();

    let err = repository(&conn).refresh(&stored).await.unwrap_err();

    assert!(matches!(err, AppError::EntityNotFound { .. }));
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_session_reads_and_commits() {
    let stored = model("Widget");
    let helper = DatabaseHelper::from_connection(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection(),
    );

    let session = helper.session().await.unwrap();
    let row = session
        .repository::<item::Entity>()
        .get_by_id_or_404(stored.id)
        .await
        .unwrap();
    session.commit().await.unwrap();

    assert_eq!(row.id, stored.id);
}

#[tokio::test]
async fn test_session_rollback_succeeds() {
    let helper = DatabaseHelper::from_connection(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let session = helper.session().await.unwrap();

    assert!(session.rollback().await.is_ok());
}

// =============================================================================
// Generated SQL Tests
// =============================================================================

#[tokio::test]
async fn test_find_skips_zero_offset_and_limit() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("a")]])
        .into_connection();

    let options = FindOptions::new().limit(0).offset(0);
    repository(&conn).find(options).await.unwrap();

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(!log.contains("LIMIT"));
    assert!(!log.contains("OFFSET"));
}

#[tokio::test]
async fn test_find_applies_positive_offset_and_limit() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("a")]])
        .into_connection();

    let options = FindOptions::new().limit(5).offset(10);
    repository(&conn).find(options).await.unwrap();

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("LIMIT"));
    assert!(log.contains("OFFSET"));
}

#[tokio::test]
async fn test_get_all_filters_by_equality() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model("Widget")]])
        .into_connection();
    let filter = FilterBy::new().eq(item::Column::Name, "Widget");

    let rows = repository(&conn).get_all(&filter).await.unwrap();

    assert_eq!(rows.len(), 1);
    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("WHERE"));
    assert!(log.contains(r#"String(Some("Widget"))"#));
}

#[tokio::test]
async fn test_update_writes_null_for_missing_value() {
    let stored = model("Widget");
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();
    let changes = Changes::new().set_opt(item::Column::Description, None::<String>);

    repository(&conn).update(stored.id, changes).await.unwrap();

    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("UPDATE"));
    assert!(log.contains("String(None)"));
}

#[tokio::test]
async fn test_create_inserts_and_returns_row() {
    let stored = model("Widget");
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let row = repository(&conn)
        .create(new_active_model("Widget"))
        .await
        .unwrap();

    assert_eq!(row, stored);
    let log = format!("{:?}", conn.into_transaction_log());
    assert!(log.contains("INSERT INTO"));
}

#[tokio::test]
async fn test_delete_without_affected_rows_is_not_found() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let id = Uuid::new_v4();

    let err = repository(&conn).delete(id).await.unwrap_err();

    assert_eq!(err.to_string(), format!("Item with id {} not found", id));
}

// =============================================================================
// Integrity Violation Tests
// =============================================================================

#[tokio::test]
async fn test_create_not_null_violation_is_integrity_error() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sqlstate("23502")])
        .into_connection();

    let err = repository(&conn)
        .create(new_active_model("Widget"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m == INTEGRITY_VIOLATION_MESSAGE));
}

#[tokio::test]
async fn test_update_check_violation_is_integrity_error() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sqlstate("23514")])
        .into_connection();
    let changes = Changes::new().set(item::Column::Name, "Widget");

    let err = repository(&conn)
        .update(Uuid::new_v4(), changes)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m == INTEGRITY_VIOLATION_MESSAGE));
}

#[tokio::test]
async fn test_other_server_error_is_failed_operation() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sqlstate("42P01")])
        .into_connection();

    let err = repository(&conn)
        .create(new_active_model("Widget"))
        .await
        .unwrap_err();

    match err {
        AppError::DatabaseOperation { operation, .. } => assert_eq!(operation, "create entity"),
        other => panic!("unexpected error: {other:?}"),
    }
}
