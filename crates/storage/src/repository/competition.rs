use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{Category, Competition, CompetitionMap, CompetitionText};

const COMPETITION_COLUMNS: &str = r#"
    competition_id, title, sub_title, youtube, image, media, category_id, period,
    distance, start_date, end_date, members, where_is_ticket, entry_limit, created_at
"#;

/// Repository for the competition catalog
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, title, icon, svg FROM categories ORDER BY category_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_category(&self, category_id: i32) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT category_id, title, icon, svg FROM categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Competitions that have not started yet
    pub async fn list_future(&self, today: NaiveDate) -> Result<Vec<Competition>> {
        let sql = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions WHERE start_date > $1 ORDER BY start_date, competition_id"
        );

        let competitions = sqlx::query_as::<_, Competition>(&sql)
            .bind(today)
            .fetch_all(self.pool)
            .await?;

        Ok(competitions)
    }

    /// Competitions running on `today`
    pub async fn list_present(&self, today: NaiveDate) -> Result<Vec<Competition>> {
        let sql = format!(
            r#"
            SELECT {COMPETITION_COLUMNS} FROM competitions
            WHERE start_date <= $1 AND end_date >= $1
            ORDER BY start_date, competition_id
            "#
        );

        let competitions = sqlx::query_as::<_, Competition>(&sql)
            .bind(today)
            .fetch_all(self.pool)
            .await?;

        Ok(competitions)
    }

    /// Finished competitions, most recent first
    pub async fn list_past(
        &self,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Competition>> {
        let sql = format!(
            r#"
            SELECT {COMPETITION_COLUMNS} FROM competitions
            WHERE end_date < $1
            ORDER BY end_date DESC, competition_id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let competitions = sqlx::query_as::<_, Competition>(&sql)
            .bind(today)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(competitions)
    }

    pub async fn count_past(&self, today: NaiveDate) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competitions WHERE end_date < $1")
                .bind(today)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    pub async fn find_by_id(&self, competition_id: i32) -> Result<Competition> {
        let sql = format!("SELECT {COMPETITION_COLUMNS} FROM competitions WHERE competition_id = $1");

        sqlx::query_as::<_, Competition>(&sql)
            .bind(competition_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Distances of a competition in creation order
    pub async fn list_maps(&self, competition_id: i32) -> Result<Vec<CompetitionMap>> {
        let maps = sqlx::query_as::<_, CompetitionMap>(
            r#"
            SELECT map_id, competition_id, title, maps
            FROM competition_maps
            WHERE competition_id = $1
            ORDER BY map_id
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(maps)
    }

    pub async fn list_texts(&self, competition_id: i32) -> Result<Vec<CompetitionText>> {
        let texts = sqlx::query_as::<_, CompetitionText>(
            r#"
            SELECT text_id, competition_id, title, description
            FROM competition_texts
            WHERE competition_id = $1
            ORDER BY text_id
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(texts)
    }
}
