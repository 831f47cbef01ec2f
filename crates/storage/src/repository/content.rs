use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{Banner, News, Partner};

/// Repository for the news feed, banners and partners
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_banners(&self) -> Result<Vec<Banner>> {
        let banners = sqlx::query_as::<_, Banner>(
            "SELECT banner_id, title, image, link FROM banners ORDER BY banner_id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    pub async fn list_news(&self, limit: i64, offset: i64) -> Result<Vec<News>> {
        let news = sqlx::query_as::<_, News>(
            r#"
            SELECT news_id, title, description, image, created_at
            FROM news
            ORDER BY created_at DESC, news_id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(news)
    }

    pub async fn count_news(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn find_news(&self, news_id: i32) -> Result<News> {
        sqlx::query_as::<_, News>(
            "SELECT news_id, title, description, image, created_at FROM news WHERE news_id = $1",
        )
        .bind(news_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn list_partners(&self) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            "SELECT partner_id, name, logo, url FROM partners ORDER BY partner_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(partners)
    }
}
