//! PostgreSQL directory store and audit sink.
//!
//! Queries hit the denormalized directory tables with single indexed
//! lookups. This module performs no permission checks of its own.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{AuditRecord, EntityUser, OrgNode, Principal, ScopeAssignment};
use crate::services::audit::AuditSink;
use crate::services::error::AuthzError;

use super::DirectoryStore;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await?;

    tracing::info!("Successfully connected to PostgreSQL");

    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Check database health.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// PostgreSQL-backed directory store.
#[derive(Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Create a new directory store from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DirectoryStore for PostgresDirectory {
    async fn find_principal(&self, principal_id: Uuid) -> Result<Option<Principal>, AuthzError> {
        sqlx::query_as::<_, Principal>("SELECT * FROM principals WHERE principal_id = $1")
            .bind(principal_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthzError::Directory(anyhow::anyhow!(e)))
    }

    async fn find_entity_user(
        &self,
        principal_id: Uuid,
    ) -> Result<Option<EntityUser>, AuthzError> {
        sqlx::query_as::<_, EntityUser>("SELECT * FROM entity_users WHERE principal_id = $1")
            .bind(principal_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthzError::Directory(anyhow::anyhow!(e)))
    }

    async fn find_org_node(&self, node_id: Uuid) -> Result<Option<OrgNode>, AuthzError> {
        sqlx::query_as::<_, OrgNode>("SELECT * FROM org_nodes WHERE node_id = $1")
            .bind(node_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthzError::Directory(anyhow::anyhow!(e)))
    }

    async fn scope_assignments(
        &self,
        principal_id: Uuid,
    ) -> Result<Vec<ScopeAssignment>, AuthzError> {
        sqlx::query_as::<_, ScopeAssignment>(
            "SELECT * FROM scope_assignments WHERE principal_id = $1",
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthzError::Directory(anyhow::anyhow!(e)))
    }

    async fn assignment_version(&self) -> Result<u64, AuthzError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT version_value FROM directory_versions WHERE counter_key = 'scope_assignments'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthzError::Directory(anyhow::anyhow!(e)))?;
        Ok(row.0 as u64)
    }
}

/// PostgreSQL-backed audit sink. Append-only inserts.
#[derive(Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Create a new audit sink from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuthzError> {
        sqlx::query(
            r#"
            INSERT INTO audit_records
                (audit_id, actor_id, effective_principal_id, event_code, action_code,
                 resource_type, resource_id, details, recorded_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.audit_id)
        .bind(record.actor_id)
        .bind(record.effective_principal_id)
        .bind(&record.event_code)
        .bind(&record.action_code)
        .bind(&record.resource_type)
        .bind(record.resource_id)
        .bind(&record.details)
        .bind(record.recorded_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthzError::AuditUnavailable(e.to_string()))?;
        Ok(())
    }
}
