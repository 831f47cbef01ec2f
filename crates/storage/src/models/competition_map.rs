use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A distance/route variant offered within a competition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionMap {
    pub map_id: i32,
    pub competition_id: i32,
    pub title: String,
    pub maps: Option<String>,
}
