use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::Country;

/// One participation in the caller's history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionResultEntry {
    pub participant_id: i32,
    pub title: String,
    pub position: Option<i32>,
    /// Title of the chosen distance
    pub category_name: String,
    pub category_icon: Option<String>,
    pub svg: Option<String>,
    /// Map image of the chosen distance
    pub image: Option<String>,
    pub duration: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Participations sharing a calendar month, keyed as `"{month}-{year}"`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthResults {
    pub month: String,
    pub count: usize,
    pub results: Vec<CompetitionResultEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionHistoryResponse {
    pub account_id: i32,
    pub full_name: String,
    pub avatar: Option<String>,
    pub country: Option<Country>,
    pub sport_club: Option<String>,
    pub age: Option<i32>,
    pub count: usize,
    pub data: Vec<MonthResults>,
}
