use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct News {
    pub news_id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}
