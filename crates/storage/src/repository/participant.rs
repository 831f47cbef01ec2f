use sqlx::PgPool;

use crate::dto::competition::{BannerParticipant, ParticipantDetailResponse, ParticipantListEntry};
use crate::dto::history::CompetitionResultEntry;
use crate::error::{Result, StorageError};
use crate::models::{Competition, CompetitionMap, Participant, RaceDuration};

const PARTICIPANT_COLUMNS: &str = r#"
    participant_id, account_id, competition_id, map_id, personal_id, duration,
    position, created_at
"#;

const FULL_NAME: &str =
    "TRIM(CONCAT(COALESCE(a.first_name, ''), ' ', COALESCE(a.last_name, '')))";

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register `account_id` for the distance `map_id`.
    ///
    /// The competition row stays locked for the whole transaction, so the member
    /// limit and personal id sequence hold under concurrent joins.
    pub async fn join(&self, account_id: i32, map_id: i32) -> Result<Participant> {
        let mut tx = self.pool.begin().await?;

        let map = sqlx::query_as::<_, CompetitionMap>(
            "SELECT map_id, competition_id, title, maps FROM competition_maps WHERE map_id = $1",
        )
        .bind(map_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let competition = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, title, sub_title, youtube, image, media, category_id, period,
                   distance, start_date, end_date, members, where_is_ticket, entry_limit, created_at
            FROM competitions
            WHERE competition_id = $1
            FOR UPDATE
            "#,
        )
        .bind(map.competition_id)
        .fetch_one(&mut *tx)
        .await?;

        let already_joined = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM participants WHERE account_id = $1 AND map_id = $2)",
        )
        .bind(account_id)
        .bind(map.map_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_joined {
            return Err(StorageError::Conflict(
                "Already joined this distance".to_string(),
            ));
        }

        let joined = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE competition_id = $1",
        )
        .bind(competition.competition_id)
        .fetch_one(&mut *tx)
        .await?;

        if competition.is_full(joined) {
            return Err(StorageError::Conflict("Competition is full".to_string()));
        }

        let sql = format!(
            r#"
            INSERT INTO participants (account_id, competition_id, map_id, personal_id, created_at)
            VALUES ($1, $2, $3, $4, (NOW() AT TIME ZONE 'utc'))
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        );

        let participant = sqlx::query_as::<_, Participant>(&sql)
            .bind(account_id)
            .bind(competition.competition_id)
            .bind(map.map_id)
            .bind((joined + 1).to_string())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(participant)
    }

    pub async fn count_for_competition(&self, competition_id: i32) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE competition_id = $1",
        )
        .bind(competition_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Avatars of the first `limit` joiners
    pub async fn first_joiners(
        &self,
        competition_id: i32,
        limit: i64,
    ) -> Result<Vec<BannerParticipant>> {
        let joiners = sqlx::query_as::<_, BannerParticipant>(
            r#"
            SELECT p.participant_id, a.avatar
            FROM participants p
            INNER JOIN accounts a ON a.account_id = p.account_id
            WHERE p.competition_id = $1
            ORDER BY p.created_at, p.participant_id
            LIMIT $2
            "#,
        )
        .bind(competition_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(joiners)
    }

    /// Everyone who chose the distance, in join order
    pub async fn list_for_map(&self, map_id: i32) -> Result<Vec<ParticipantListEntry>> {
        let sql = format!(
            r#"
            SELECT p.participant_id, {FULL_NAME} AS full_name, a.avatar, co.flag,
                   p.personal_id, p.duration
            FROM participants p
            INNER JOIN accounts a ON a.account_id = p.account_id
            LEFT JOIN countries co ON co.country_id = a.country_id
            WHERE p.map_id = $1
            ORDER BY p.participant_id
            "#
        );

        let entries = sqlx::query_as::<_, ParticipantListEntry>(&sql)
            .bind(map_id)
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    /// Everyone in the competition across all distances, in join order
    pub async fn list_for_competition(
        &self,
        competition_id: i32,
    ) -> Result<Vec<ParticipantListEntry>> {
        let sql = format!(
            r#"
            SELECT p.participant_id, {FULL_NAME} AS full_name, a.avatar, co.flag,
                   p.personal_id, p.duration
            FROM participants p
            INNER JOIN accounts a ON a.account_id = p.account_id
            LEFT JOIN countries co ON co.country_id = a.country_id
            WHERE p.competition_id = $1
            ORDER BY p.participant_id
            "#
        );

        let entries = sqlx::query_as::<_, ParticipantListEntry>(&sql)
            .bind(competition_id)
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    /// The account's entry in one distance with competition context
    pub async fn find_for_account(
        &self,
        account_id: i32,
        map_id: i32,
    ) -> Result<ParticipantDetailResponse> {
        let sql = format!(
            r#"
            SELECT p.participant_id, {FULL_NAME} AS full_name, a.avatar, co.flag,
                   p.personal_id, p.duration, p.position,
                   c.title AS competition_title, c.image AS competition_image,
                   cat.title AS competition_category, m.title AS competition_distance,
                   p.created_at
            FROM participants p
            INNER JOIN accounts a ON a.account_id = p.account_id
            LEFT JOIN countries co ON co.country_id = a.country_id
            INNER JOIN competitions c ON c.competition_id = p.competition_id
            INNER JOIN categories cat ON cat.category_id = c.category_id
            INNER JOIN competition_maps m ON m.map_id = p.map_id
            WHERE p.account_id = $1 AND p.map_id = $2
            "#
        );

        sqlx::query_as::<_, ParticipantDetailResponse>(&sql)
            .bind(account_id)
            .bind(map_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// All participations of an account, oldest first
    pub async fn history(&self, account_id: i32) -> Result<Vec<CompetitionResultEntry>> {
        let entries = sqlx::query_as::<_, CompetitionResultEntry>(
            r#"
            SELECT p.participant_id, c.title, p.position, m.title AS category_name,
                   cat.icon AS category_icon, cat.svg, m.maps AS image,
                   p.duration, p.created_at
            FROM participants p
            INNER JOIN competitions c ON c.competition_id = p.competition_id
            INNER JOIN categories cat ON cat.category_id = c.category_id
            INNER JOIN competition_maps m ON m.map_id = p.map_id
            WHERE p.account_id = $1
            ORDER BY p.created_at, p.participant_id
            "#,
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Store a finishing time, keeping the position unless a new one is given
    pub async fn record_result(
        &self,
        participant_id: i32,
        duration: RaceDuration,
        position: Option<i32>,
    ) -> Result<Participant> {
        let sql = format!(
            r#"
            UPDATE participants
            SET duration = $2, position = COALESCE($3, position)
            WHERE participant_id = $1
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Participant>(&sql)
            .bind(participant_id)
            .bind(duration.to_string())
            .bind(position)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}
