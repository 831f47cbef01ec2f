use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Banner {
    pub banner_id: i32,
    pub title: Option<String>,
    pub image: String,
    pub link: Option<String>,
}
