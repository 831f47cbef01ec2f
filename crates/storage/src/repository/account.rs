use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::account::{ProfileResponse, UpdateProfileRequest};
use crate::error::{Result, StorageError};
use crate::models::{Account, NewAccount};

const ACCOUNT_COLUMNS: &str = r#"
    account_id, phone_number, email, password_hash, first_name, last_name, avatar,
    gender, size, birthday, height, weight, country_id, city_id, sport_club_id,
    is_verified, is_admin, is_superuser, is_staff, date_login, date_created
"#;

/// Account persistence used by the authentication flows
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, account_id: i32) -> Result<Account>;

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Account>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn create(&self, account: &NewAccount) -> Result<Account>;

    async fn update_password(&self, account_id: i32, password_hash: &str) -> Result<()>;

    /// Refresh `date_login` to now
    async fn touch_login(&self, account_id: i32) -> Result<()>;
}

pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Profile with the referenced country, city and club names
    pub async fn profile(&self, account_id: i32) -> Result<ProfileResponse> {
        let profile = sqlx::query_as::<_, ProfileResponse>(
            r#"
            SELECT a.account_id, a.first_name, a.last_name, a.email, a.phone_number,
                   a.avatar, a.gender, a.birthday, a.height, a.weight,
                   a.country_id, co.name AS country_name,
                   a.city_id, ci.name AS city_name,
                   a.sport_club_id, sc.name AS club_name,
                   a.size, a.date_login, a.date_created
            FROM accounts a
            LEFT JOIN countries co ON co.country_id = a.country_id
            LEFT JOIN cities ci ON ci.city_id = a.city_id
            LEFT JOIN sport_clubs sc ON sc.sport_club_id = a.sport_club_id
            WHERE a.account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }

    /// Apply a partial profile update; `avatar` is the stored URL of a new upload
    pub async fn update_profile(
        &self,
        account_id: i32,
        req: &UpdateProfileRequest,
        avatar: Option<&str>,
    ) -> Result<Account> {
        let sql = format!(
            r#"
            UPDATE accounts
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                avatar = COALESCE($5, avatar),
                gender = COALESCE($6, gender),
                size = COALESCE($7, size),
                birthday = COALESCE($8, birthday),
                height = COALESCE($9, height),
                weight = COALESCE($10, weight),
                country_id = COALESCE($11, country_id),
                city_id = COALESCE($12, city_id),
                sport_club_id = COALESCE($13, sport_club_id)
            WHERE account_id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(account_id)
            .bind(&req.first_name)
            .bind(&req.last_name)
            .bind(&req.email)
            .bind(avatar)
            .bind(&req.gender)
            .bind(&req.size)
            .bind(req.birthday)
            .bind(req.height)
            .bind(req.weight)
            .bind(req.country_id)
            .bind(req.city_id)
            .bind(req.sport_club_id)
            .fetch_optional(self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(StorageError::NotFound)?;

        Ok(account)
    }
}

fn map_write_error(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);

    if error.is_unique_violation() {
        return match error.constraint() {
            Some("accounts_phone_number_key") => StorageError::Duplicate {
                field: "phone_number",
                message: "Phone number already registered".to_string(),
            },
            Some("accounts_email_key") => StorageError::Duplicate {
                field: "email",
                message: "Email already registered".to_string(),
            },
            _ => StorageError::ConstraintViolation("Account already exists".to_string()),
        };
    }

    if error.is_foreign_key_violation() {
        return StorageError::ConstraintViolation(
            "Unknown country, city or sport club".to_string(),
        );
    }

    error
}

#[async_trait]
impl AccountStore for AccountRepository<'_> {
    async fn find_by_id(&self, account_id: i32) -> Result<Account> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1");

        sqlx::query_as::<_, Account>(&sql)
            .bind(account_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone_number = $1");

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(phone_number)
            .fetch_optional(self.pool)
            .await?;

        Ok(account)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, account: &NewAccount) -> Result<Account> {
        let sql = format!(
            r#"
            INSERT INTO accounts (
                phone_number, email, password_hash, first_name, last_name, avatar,
                gender, size, birthday, country_id, sport_club_id,
                is_verified, is_admin, is_superuser, is_staff
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'none'), COALESCE($8, 'none'),
                    $9, $10, $11, $12, $13, $14, $15)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Account>(&sql)
            .bind(&account.phone_number)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.avatar)
            .bind(&account.gender)
            .bind(&account.size)
            .bind(account.birthday)
            .bind(account.country_id)
            .bind(account.sport_club_id)
            .bind(account.is_verified)
            .bind(account.is_admin)
            .bind(account.is_superuser)
            .bind(account.is_staff)
            .fetch_one(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(created)
    }

    async fn update_password(&self, account_id: i32, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE account_id = $1")
            .bind(account_id)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn touch_login(&self, account_id: i32) -> Result<()> {
        sqlx::query(
            "UPDATE accounts SET date_login = (NOW() AT TIME ZONE 'utc') WHERE account_id = $1",
        )
        .bind(account_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
