//! MySQL challenge store over the `mobile_number_verification` table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};
use tracing::{debug, error};

use mv_core::{ChallengeStore, DomainError, HolderContext, VerificationChallenge};
use mv_shared::phone::mask_phone_number;

use crate::InfrastructureError;

/// Table definition, also shipped as `migrations/0001_mobile_number_verification.sql`
pub const SCHEMA: &str = include_str!("../../../migrations/0001_mobile_number_verification.sql");

/// Challenge persistence for deployments that keep state in MySQL
///
/// The `(canonical, holder)` primary key gives one pending challenge per pair;
/// a token-conditioned `DELETE` makes `consume` atomic.
pub struct MySqlChallengeStore {
    pool: Pool<MySql>,
}

impl MySqlChallengeStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// Create the table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    fn db_error(operation: &str, canonical: &str, e: sqlx::Error) -> DomainError {
        error!(
            phone = %mask_phone_number(canonical),
            error = %e,
            "Failed to {} challenge",
            operation
        );
        InfrastructureError::Database(e).into()
    }
}

#[async_trait]
impl ChallengeStore for MySqlChallengeStore {
    async fn put(
        &self,
        canonical: &str,
        holder: &HolderContext,
        challenge: &VerificationChallenge,
    ) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO mobile_number_verification (
                canonical, holder, token, verification_code, issued_at
            ) VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                token = VALUES(token),
                verification_code = VALUES(verification_code),
                issued_at = VALUES(issued_at)
        "#;

        sqlx::query(query)
            .bind(canonical)
            .bind(holder.as_str())
            .bind(&challenge.token)
            .bind(&challenge.code_hash)
            .bind(challenge.issued_at)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("store", canonical, e))?;

        debug!(
            phone = %mask_phone_number(canonical),
            event = "challenge_stored",
            "Challenge stored in database"
        );
        Ok(())
    }

    async fn get(
        &self,
        canonical: &str,
        holder: &HolderContext,
    ) -> Result<Option<VerificationChallenge>, DomainError> {
        let query = r#"
            SELECT token, verification_code, issued_at
            FROM mobile_number_verification
            WHERE canonical = ? AND holder = ?
        "#;

        let row = sqlx::query(query)
            .bind(canonical)
            .bind(holder.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("load", canonical, e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let challenge = VerificationChallenge::new(
            row.try_get("token")
                .map_err(|e| Self::db_error("decode", canonical, e))?,
            row.try_get("verification_code")
                .map_err(|e| Self::db_error("decode", canonical, e))?,
            row.try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| Self::db_error("decode", canonical, e))?,
        );
        Ok(Some(challenge))
    }

    async fn consume(
        &self,
        canonical: &str,
        holder: &HolderContext,
        token: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM mobile_number_verification WHERE canonical = ? AND holder = ? AND token = ?",
        )
        .bind(canonical)
        .bind(holder.as_str())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("consume", canonical, e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, canonical: &str, holder: &HolderContext) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM mobile_number_verification WHERE canonical = ? AND holder = ?")
            .bind(canonical)
            .bind(holder.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("remove", canonical, e))?;
        Ok(())
    }

    async fn purge_issued_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM mobile_number_verification WHERE issued_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to purge challenges");
                DomainError::from(InfrastructureError::Database(e))
            })?;

        debug!(
            removed = result.rows_affected(),
            event = "challenges_purged",
            "Purged challenges from database"
        );
        Ok(result.rows_affected())
    }
}
