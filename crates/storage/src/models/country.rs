use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Country {
    pub country_id: i32,
    pub name: String,
    pub flag: Option<String>,
}
