use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Partner {
    pub partner_id: i32,
    pub name: String,
    pub logo: Option<String>,
    pub url: Option<String>,
}
