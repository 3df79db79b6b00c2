//! MySQL implementation of the SecurityEventRepository trait.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use sf_core::domain::entities::{SecurityEvent, SecurityEventKind};
use sf_core::errors::DomainError;
use sf_core::repositories::SecurityEventRepository;

use super::db_error;

/// MySQL implementation of SecurityEventRepository
///
/// Events are append-only rows in the `security_events` table.
pub struct MySqlSecurityEventRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSecurityEventRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to SecurityEvent entity
    fn row_to_event(row: &MySqlRow) -> Result<SecurityEvent, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("read id"))?;
        let kind: String = row.try_get("kind").map_err(db_error("read kind"))?;
        let kind = SecurityEventKind::parse(&kind).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown security event kind: {}", kind),
        })?;
        let metadata: JsonValue = row.try_get("metadata").map_err(db_error("read metadata"))?;

        Ok(SecurityEvent {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            kind,
            email: row.try_get("email").map_err(db_error("read email"))?,
            ip_address: row.try_get("ip_address").map_err(db_error("read ip_address"))?,
            user_agent: row.try_get("user_agent").map_err(db_error("read user_agent"))?,
            metadata,
            created_at: row.try_get("created_at").map_err(db_error("read created_at"))?,
        })
    }
}

#[async_trait]
impl SecurityEventRepository for MySqlSecurityEventRepository {
    async fn create(&self, event: &SecurityEvent) -> Result<(), DomainError> {
        let metadata = serde_json::to_string(&event.metadata).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize metadata: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO security_events (
                id, kind, email, ip_address, user_agent, metadata, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.to_string())
        .bind(event.kind.as_str())
        .bind(&event.email)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(metadata)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create security event"))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str, limit: usize) -> Result<Vec<SecurityEvent>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, email, ip_address, user_agent, metadata, created_at
            FROM security_events
            WHERE email = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(email)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find security events by email"))?;

        rows.iter().map(Self::row_to_event).collect()
    }
}
