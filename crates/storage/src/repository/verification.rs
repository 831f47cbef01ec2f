use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::services::verification_code::MAX_CODE_ATTEMPTS;

/// One-time code persistence.
///
/// Confirming a code consumes it and applies its effect to the account in a
/// single transaction: either both happen or neither does. Every wrong guess
/// counts against the pending code, which stops matching after
/// `MAX_CODE_ATTEMPTS` failures.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store `code` for `phone_number`, replacing any pending code
    async fn issue(&self, phone_number: &str, code: &str) -> Result<()>;

    /// Whether `code` is pending for `phone_number` and issued at or after
    /// `valid_since`. Does not consume the code.
    async fn check(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
    ) -> Result<bool>;

    /// Consume a code issued at or after `valid_since` and mark the account verified.
    /// Returns `false` when no such code exists.
    async fn confirm_phone(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
    ) -> Result<bool>;

    /// Consume a code issued at or after `valid_since` and store a new password hash.
    /// Returns `false` when no such code exists.
    async fn reset_password(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
        password_hash: &str,
    ) -> Result<bool>;
}

pub struct VerificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VerificationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn consume(
        tx: &mut Transaction<'_, Postgres>,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM verify_phone_numbers
            WHERE phone_number = $1 AND code = $2 AND created_at >= $3 AND attempts < $4
            "#,
        )
        .bind(phone_number)
        .bind(code)
        .bind(valid_since)
        .bind(MAX_CODE_ATTEMPTS)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_failed_attempt(&self, phone_number: &str) -> Result<()> {
        sqlx::query(
            "UPDATE verify_phone_numbers SET attempts = attempts + 1 WHERE phone_number = $1",
        )
        .bind(phone_number)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl VerificationStore for VerificationRepository<'_> {
    async fn issue(&self, phone_number: &str, code: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO verify_phone_numbers (phone_number, code, created_at, attempts)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (phone_number)
            DO UPDATE SET code = EXCLUDED.code, created_at = EXCLUDED.created_at, attempts = 0
            "#,
        )
        .bind(phone_number)
        .bind(code)
        .bind(chrono::Utc::now().naive_utc())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn check(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
    ) -> Result<bool> {
        let matches = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM verify_phone_numbers
                WHERE phone_number = $1 AND code = $2 AND created_at >= $3 AND attempts < $4
            )
            "#,
        )
        .bind(phone_number)
        .bind(code)
        .bind(valid_since)
        .bind(MAX_CODE_ATTEMPTS)
        .fetch_one(self.pool)
        .await?;

        if !matches {
            self.record_failed_attempt(phone_number).await?;
        }

        Ok(matches)
    }

    async fn confirm_phone(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        if !Self::consume(&mut tx, phone_number, code, valid_since).await? {
            tx.rollback().await?;
            self.record_failed_attempt(phone_number).await?;
            return Ok(false);
        }

        let updated = sqlx::query("UPDATE accounts SET is_verified = TRUE WHERE phone_number = $1")
            .bind(phone_number)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn reset_password(
        &self,
        phone_number: &str,
        code: &str,
        valid_since: NaiveDateTime,
        password_hash: &str,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        if !Self::consume(&mut tx, phone_number, code, valid_since).await? {
            tx.rollback().await?;
            self.record_failed_attempt(phone_number).await?;
            return Ok(false);
        }

        let updated =
            sqlx::query("UPDATE accounts SET password_hash = $2 WHERE phone_number = $1")
                .bind(phone_number)
                .bind(password_hash)
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
