use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: i32,
    pub account_id: i32,
    pub competition_id: i32,
    pub map_id: i32,
    pub personal_id: Option<String>,
    pub duration: Option<String>,
    pub position: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
}
