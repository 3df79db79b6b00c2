//! MySQL implementation of the VerificationRepository trait.
//!
//! Records live in the `email_verifications` table. Attempt mutations are
//! single `UPDATE`s guarded by the failure count the caller observed, so two
//! requests deciding on the same snapshot never both land. The post-increment
//! value is read back through `LAST_INSERT_ID(expr)` on the same connection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use sf_core::domain::entities::VerificationRecord;
use sf_core::errors::DomainError;
use sf_core::repositories::VerificationRepository;

use super::db_error;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, code, name, created_at, expires_at, verified,
           verified_at, failed_attempts, last_attempt_at
    FROM email_verifications
"#;

/// MySQL implementation of VerificationRepository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to VerificationRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<VerificationRecord, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("read id"))?;

        Ok(VerificationRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(db_error("read email"))?,
            code: row.try_get("code").map_err(db_error("read code"))?,
            name: row.try_get("name").map_err(db_error("read name"))?,
            created_at: row.try_get("created_at").map_err(db_error("read created_at"))?,
            expires_at: row.try_get("expires_at").map_err(db_error("read expires_at"))?,
            verified: row.try_get("verified").map_err(db_error("read verified"))?,
            verified_at: row.try_get("verified_at").map_err(db_error("read verified_at"))?,
            failed_attempts: row
                .try_get("failed_attempts")
                .map_err(db_error("read failed_attempts"))?,
            last_attempt_at: row
                .try_get("last_attempt_at")
                .map_err(db_error("read last_attempt_at"))?,
        })
    }

    async fn count(&self, query: &str, bind: CountBind) -> Result<u64, DomainError> {
        let statement = sqlx::query(query);
        let statement = match bind {
            CountBind::None => statement,
            CountBind::Instant(at) => statement.bind(at),
            CountBind::Threshold(threshold) => statement.bind(threshold),
        };

        let row = statement
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count verification records"))?;
        let count: i64 = row.try_get("count").map_err(db_error("read count"))?;
        Ok(count.max(0) as u64)
    }
}

enum CountBind {
    None,
    Instant(DateTime<Utc>),
    Threshold(i32),
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn find_active_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationRecord>, DomainError> {
        let query = format!(
            "{} WHERE email = ? AND expires_at > ? ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(email)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find verification record"))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn replace_for_email(&self, record: &VerificationRecord) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))?;

        sqlx::query("DELETE FROM email_verifications WHERE email = ?")
            .bind(&record.email)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete previous verification records"))?;

        sqlx::query(
            r#"
            INSERT INTO email_verifications (
                id, email, code, name, created_at, expires_at, verified,
                verified_at, failed_attempts, last_attempt_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.email)
        .bind(&record.code)
        .bind(&record.name)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.verified)
        .bind(record.verified_at)
        .bind(record.failed_attempts)
        .bind(record.last_attempt_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert verification record"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, DomainError> {
        // LAST_INSERT_ID is per connection, so both statements must share one
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("acquire connection"))?;

        let result = sqlx::query(
            r#"
            UPDATE email_verifications
            SET failed_attempts = LAST_INSERT_ID(failed_attempts + 1),
                last_attempt_at = ?
            WHERE id = ? AND failed_attempts = ?
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .bind(observed_failed_attempts)
        .execute(&mut *conn)
        .await
        .map_err(db_error("record failed attempt"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query("SELECT LAST_INSERT_ID() AS failed_attempts")
            .fetch_one(&mut *conn)
            .await
            .map_err(db_error("read failed attempt count"))?;
        let count: u64 = row
            .try_get("failed_attempts")
            .map_err(db_error("read failed attempt count"))?;

        Ok(Some(i32::try_from(count).unwrap_or(i32::MAX)))
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE email_verifications
            SET verified = TRUE, verified_at = ?, failed_attempts = 0, last_attempt_at = ?
            WHERE id = ? AND verified = FALSE AND failed_attempts = ?
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .bind(observed_failed_attempts)
        .execute(&self.pool)
        .await
        .map_err(db_error("mark verification record verified"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM email_verifications WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete expired verification records"))?;
        Ok(result.rows_affected())
    }

    async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM email_verifications WHERE verified = FALSE AND created_at < ?")
                .bind(created_before)
                .execute(&self.pool)
                .await
                .map_err(db_error("delete stale verification records"))?;
        Ok(result.rows_affected())
    }

    async fn delete_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM email_verifications WHERE verified = FALSE AND failed_attempts >= ?",
        )
        .bind(min_failed_attempts)
        .execute(&self.pool)
        .await
        .map_err(db_error("delete abusive verification records"))?;
        Ok(result.rows_affected())
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.count(
            "SELECT COUNT(*) AS count FROM email_verifications WHERE expires_at < ?",
            CountBind::Instant(now),
        )
        .await
    }

    async fn count_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.count(
            "SELECT COUNT(*) AS count FROM email_verifications WHERE verified = FALSE AND created_at < ?",
            CountBind::Instant(created_before),
        )
        .await
    }

    async fn count_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError> {
        self.count(
            "SELECT COUNT(*) AS count FROM email_verifications WHERE verified = FALSE AND failed_attempts >= ?",
            CountBind::Threshold(min_failed_attempts),
        )
        .await
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        self.count("SELECT COUNT(*) AS count FROM email_verifications", CountBind::None)
            .await
    }
}
