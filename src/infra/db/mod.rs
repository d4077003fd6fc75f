//! Database connection and initialization.

use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::DatabaseConfig;
use crate::errors::AppResult;

pub mod migrations;
mod session;

pub use migrations::Migrator;
pub use session::Session;

/// Pooled database access shared by the whole application.
#[derive(Clone)]
pub struct DatabaseHelper {
    connection: Arc<DatabaseConnection>,
    echo_pool: bool,
}

impl DatabaseHelper {
    /// Open the pool and run pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let helper = Self::connect_without_migrations(config).await?;
        Migrator::up(helper.connection(), None).await?;
        tracing::info!("Database connected and migrations applied");
        Ok(helper)
    }

    /// Open the pool without touching the schema (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let connection = Database::connect(connect_options(config)).await?;
        tracing::debug!(
            max_connections = config.max_connections(),
            pre_ping = config.pool_pre_ping,
            "Database pool created"
        );
        Ok(Self {
            connection: Arc::new(connection),
            echo_pool: config.echo_pool,
        })
    }

    /// Wrap an existing connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection: Arc::new(connection),
            echo_pool: false,
        }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Begin a new session (one transaction).
    pub async fn session(&self) -> AppResult<Session> {
        if self.echo_pool {
            tracing::debug!("Checking out connection for new session");
        }
        Session::begin(self.connection()).await
    }

    /// Close every pooled connection.
    pub async fn dispose(&self) -> Result<(), DbErr> {
        self.connection.close_by_ref().await?;
        tracing::info!("Database pool disposed");
        Ok(())
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(self.connection(), None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(self.connection(), Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(self.connection())
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(self.connection()).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

/// Translate pool settings into connection options.
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections())
        .acquire_timeout(config.acquire_timeout())
        .connect_timeout(config.acquire_timeout())
        .test_before_acquire(config.pool_pre_ping)
        .sqlx_logging(config.echo);
    options
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn options_follow_pool_settings() {
        let config = DatabaseConfig {
            pool_size: 4,
            max_overflow: 6,
            pool_timeout: 7,
            ..DatabaseConfig::default()
        };

        let options = connect_options(&config);
        assert_eq!(options.get_max_connections(), Some(10));
        assert_eq!(options.get_acquire_timeout(), Some(Duration::from_secs(7)));
        assert_eq!(options.get_url(), config.url);
    }

    #[tokio::test]
    async fn clones_share_one_pool_and_dispose() {
        use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

        let helper = DatabaseHelper::from_connection(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let shared = helper.clone();

        assert!(std::ptr::eq(helper.connection(), shared.connection()));
        assert!(shared.ping().await.is_ok());
        assert!(helper.dispose().await.is_ok());
    }
}
