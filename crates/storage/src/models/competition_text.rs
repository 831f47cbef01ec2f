use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionText {
    pub text_id: i32,
    pub competition_id: i32,
    pub title: String,
    pub description: String,
}
