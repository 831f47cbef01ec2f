use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{Category, CompetitionText};
use crate::services::ranking::Timed;

/// Competition starting after today
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FutureCompetitionResponse {
    pub competition_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub category: Category,
    /// Title of the most recently added distance
    pub last_distance: Option<String>,
    pub period: Option<String>,
    pub start_date: NaiveDate,
}

/// Avatar of one of the first joiners, shown on banners
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BannerParticipant {
    pub participant_id: i32,
    pub avatar: Option<String>,
}

/// Competition running today, in banner shape
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PresentCompetitionResponse {
    pub competition_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub category: Category,
    pub distance: Option<String>,
    pub count: i64,
    pub competition_participants: Vec<BannerParticipant>,
}

/// A participant as shown on leaderboards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ParticipantListEntry {
    pub participant_id: i32,
    pub full_name: String,
    pub avatar: Option<String>,
    pub flag: Option<String>,
    pub personal_id: Option<String>,
    pub duration: Option<String>,
}

impl Timed for ParticipantListEntry {
    fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }
}

/// One distance with its fastest finishers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistanceLeaders {
    pub map_id: i32,
    pub title: String,
    pub best_duration: Option<String>,
    pub participants: Vec<ParticipantListEntry>,
}

/// Finished competition with per-distance leaderboards
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PastCompetitionResponse {
    pub competition_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub category: Category,
    pub end_date: NaiveDate,
    pub distances: Vec<DistanceLeaders>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionMapResponse {
    pub map_id: i32,
    pub title: String,
    pub maps: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionDetailResponse {
    pub competition_id: i32,
    pub title: String,
    pub sub_title: Option<String>,
    pub youtube: Option<String>,
    pub media: Option<String>,
    pub category_icon: Option<String>,
    pub competition_maps: Vec<CompetitionMapResponse>,
    pub period: Option<String>,
    pub distance: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub members: Option<i32>,
    pub joiners_count: i64,
    pub free_joiners_count: i64,
    pub where_is_ticket: Option<String>,
    #[serde(rename = "limit")]
    pub entry_limit: Option<String>,
    pub competition_texts: Vec<CompetitionText>,
    pub best_duration: Option<String>,
    pub participants: Vec<ParticipantListEntry>,
}

/// The caller's own entry in one distance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ParticipantDetailResponse {
    pub participant_id: i32,
    pub full_name: String,
    pub avatar: Option<String>,
    pub flag: Option<String>,
    pub personal_id: Option<String>,
    pub duration: Option<String>,
    pub position: Option<i32>,
    pub competition_title: String,
    pub competition_image: Option<String>,
    pub competition_category: String,
    pub competition_distance: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinCompetitionResponse {
    pub participant_id: i32,
    pub competition_id: i32,
    pub map_id: i32,
    pub personal_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<crate::models::Participant> for JoinCompetitionResponse {
    fn from(participant: crate::models::Participant) -> Self {
        Self {
            participant_id: participant.participant_id,
            competition_id: participant.competition_id,
            map_id: participant.map_id,
            personal_id: participant.personal_id,
            created_at: participant.created_at,
        }
    }
}

impl From<crate::models::CompetitionMap> for CompetitionMapResponse {
    fn from(map: crate::models::CompetitionMap) -> Self {
        Self {
            map_id: map.map_id,
            title: map.title,
            maps: map.maps,
        }
    }
}
