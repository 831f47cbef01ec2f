use sqlx::PgPool;
use storage::{
    dto::common::PaginationParams,
    error::Result,
    models::{Banner, News, Partner},
    repository::content::ContentRepository,
};

pub async fn list_banners(pool: &PgPool) -> Result<Vec<Banner>> {
    ContentRepository::new(pool).list_banners().await
}

/// One page of news, newest first, with the total count
pub async fn list_news(pool: &PgPool, params: &PaginationParams) -> Result<(Vec<News>, i64)> {
    let repo = ContentRepository::new(pool);

    let news = repo
        .list_news(i64::from(params.limit()), i64::from(params.offset()))
        .await?;
    let total_items = repo.count_news().await?;

    Ok((news, total_items))
}

pub async fn get_news(pool: &PgPool, news_id: i32) -> Result<News> {
    ContentRepository::new(pool).find_news(news_id).await
}

pub async fn list_partners(pool: &PgPool) -> Result<Vec<Partner>> {
    ContentRepository::new(pool).list_partners().await
}
