use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        competition::{
            CompetitionDetailResponse, CompetitionMapResponse, DistanceLeaders,
            FutureCompetitionResponse, JoinCompetitionResponse, ParticipantDetailResponse,
            ParticipantListEntry, PastCompetitionResponse, PresentCompetitionResponse,
        },
        history::CompetitionHistoryResponse,
    },
    error::{Result, StorageError},
    models::{Account, Category},
    repository::{
        competition::CompetitionRepository, location::LocationRepository,
        participant::ParticipantRepository,
    },
    services::{
        history::group_by_month,
        ranking::{LEADERBOARD_SIZE, Timed, fastest_duration, top_by_duration},
    },
};

/// How many joiner avatars a banner shows
const BANNER_AVATARS: i64 = 3;

/// Fastest time and the leading entries of one ranking group
fn leaderboard(entries: Vec<ParticipantListEntry>) -> (Option<String>, Vec<ParticipantListEntry>) {
    let best = fastest_duration(entries.iter().map(Timed::duration)).map(|d| d.to_string());

    (best, top_by_duration(entries, LEADERBOARD_SIZE))
}

async fn categories_by_id(repo: &CompetitionRepository<'_>) -> Result<HashMap<i32, Category>> {
    Ok(repo
        .list_categories()
        .await?
        .into_iter()
        .map(|category| (category.category_id, category))
        .collect())
}

fn category_of(categories: &HashMap<i32, Category>, category_id: i32) -> Result<Category> {
    categories
        .get(&category_id)
        .cloned()
        .ok_or(StorageError::NotFound)
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
    CompetitionRepository::new(pool).list_categories().await
}

pub async fn list_future(pool: &PgPool, today: NaiveDate) -> Result<Vec<FutureCompetitionResponse>> {
    let repo = CompetitionRepository::new(pool);
    let categories = categories_by_id(&repo).await?;

    let mut response = Vec::new();
    for competition in repo.list_future(today).await? {
        let last_distance = repo
            .list_maps(competition.competition_id)
            .await?
            .pop()
            .map(|map| map.title);

        response.push(FutureCompetitionResponse {
            competition_id: competition.competition_id,
            category: category_of(&categories, competition.category_id)?,
            title: competition.title,
            image: competition.image,
            last_distance,
            period: competition.period,
            start_date: competition.start_date,
        });
    }

    Ok(response)
}

pub async fn list_present(
    pool: &PgPool,
    today: NaiveDate,
) -> Result<Vec<PresentCompetitionResponse>> {
    let repo = CompetitionRepository::new(pool);
    let participants = ParticipantRepository::new(pool);
    let categories = categories_by_id(&repo).await?;

    let mut response = Vec::new();
    for competition in repo.list_present(today).await? {
        let count = participants
            .count_for_competition(competition.competition_id)
            .await?;
        let joiners = participants
            .first_joiners(competition.competition_id, BANNER_AVATARS)
            .await?;

        response.push(PresentCompetitionResponse {
            competition_id: competition.competition_id,
            category: category_of(&categories, competition.category_id)?,
            title: competition.title,
            image: competition.image,
            distance: competition.distance,
            count,
            competition_participants: joiners,
        });
    }

    Ok(response)
}

/// A page of finished competitions with per-distance leaderboards, plus the total count
pub async fn list_past(
    pool: &PgPool,
    today: NaiveDate,
    params: &PaginationParams,
) -> Result<(Vec<PastCompetitionResponse>, i64)> {
    let repo = CompetitionRepository::new(pool);
    let participants = ParticipantRepository::new(pool);
    let categories = categories_by_id(&repo).await?;

    let competitions = repo
        .list_past(
            today,
            i64::from(params.limit()),
            i64::from(params.offset()),
        )
        .await?;
    let total_items = repo.count_past(today).await?;

    let mut response = Vec::with_capacity(competitions.len());
    for competition in competitions {
        let mut distances = Vec::new();
        for map in repo.list_maps(competition.competition_id).await? {
            let (best_duration, leaders) =
                leaderboard(participants.list_for_map(map.map_id).await?);

            distances.push(DistanceLeaders {
                map_id: map.map_id,
                title: map.title,
                best_duration,
                participants: leaders,
            });
        }

        response.push(PastCompetitionResponse {
            competition_id: competition.competition_id,
            category: category_of(&categories, competition.category_id)?,
            title: competition.title,
            image: competition.image,
            end_date: competition.end_date,
            distances,
        });
    }

    Ok((response, total_items))
}

pub async fn get_detail(pool: &PgPool, competition_id: i32) -> Result<CompetitionDetailResponse> {
    let repo = CompetitionRepository::new(pool);
    let participants = ParticipantRepository::new(pool);

    let competition = repo.find_by_id(competition_id).await?;
    let category = repo.find_category(competition.category_id).await?;
    let maps = repo.list_maps(competition_id).await?;
    let texts = repo.list_texts(competition_id).await?;
    let joiners_count = participants.count_for_competition(competition_id).await?;
    let (best_duration, leaders) =
        leaderboard(participants.list_for_competition(competition_id).await?);

    Ok(CompetitionDetailResponse {
        competition_id: competition.competition_id,
        free_joiners_count: competition.free_places(joiners_count),
        title: competition.title,
        sub_title: competition.sub_title,
        youtube: competition.youtube,
        media: competition.media,
        category_icon: category.icon,
        competition_maps: maps.into_iter().map(CompetitionMapResponse::from).collect(),
        period: competition.period,
        distance: competition.distance,
        start_date: competition.start_date,
        end_date: competition.end_date,
        members: competition.members,
        joiners_count,
        where_is_ticket: competition.where_is_ticket,
        entry_limit: competition.entry_limit,
        competition_texts: texts,
        best_duration,
        participants: leaders,
    })
}

pub async fn join(pool: &PgPool, account_id: i32, map_id: i32) -> Result<JoinCompetitionResponse> {
    let participant = ParticipantRepository::new(pool)
        .join(account_id, map_id)
        .await?;

    tracing::info!(
        "Account {} joined distance {} as #{}",
        account_id,
        map_id,
        participant.personal_id.as_deref().unwrap_or("?")
    );

    Ok(JoinCompetitionResponse::from(participant))
}

pub async fn get_participant(
    pool: &PgPool,
    account_id: i32,
    map_id: i32,
) -> Result<ParticipantDetailResponse> {
    ParticipantRepository::new(pool)
        .find_for_account(account_id, map_id)
        .await
}

/// The account's participations grouped by month, under a profile header
pub async fn my_competitions(
    pool: &PgPool,
    account: &Account,
    today: NaiveDate,
) -> Result<CompetitionHistoryResponse> {
    let locations = LocationRepository::new(pool);

    let country = match account.country_id {
        Some(country_id) => Some(locations.find_country(country_id).await?),
        None => None,
    };
    let sport_club = match account.sport_club_id {
        Some(club_id) => Some(locations.find_club(club_id).await?.name),
        None => None,
    };

    let entries = ParticipantRepository::new(pool)
        .history(account.account_id)
        .await?;
    let count = entries.len();

    Ok(CompetitionHistoryResponse {
        account_id: account.account_id,
        full_name: account.full_name(),
        avatar: account.avatar.clone(),
        country,
        sport_club,
        age: account.age(today),
        count,
        data: group_by_month(entries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(participant_id: i32, duration: Option<&str>) -> ParticipantListEntry {
        ParticipantListEntry {
            participant_id,
            full_name: format!("Runner {}", participant_id),
            avatar: None,
            flag: None,
            personal_id: Some(participant_id.to_string()),
            duration: duration.map(String::from),
        }
    }

    #[test]
    fn test_leaderboard_orders_fastest_first() {
        let (best, leaders) = leaderboard(vec![
            entry(1, Some("01:02:03")),
            entry(2, None),
            entry(3, Some("00:58:10")),
        ]);

        assert_eq!(best.as_deref(), Some("00:58:10"));
        let ids: Vec<i32> = leaders.iter().map(|e| e.participant_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_leaderboard_keeps_three_entries() {
        let (_, leaders) = leaderboard(vec![
            entry(1, Some("00:40:00")),
            entry(2, Some("00:30:00")),
            entry(3, Some("00:50:00")),
            entry(4, Some("00:20:00")),
        ]);

        let ids: Vec<i32> = leaders.iter().map(|e| e.participant_id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_leaderboard_without_times() {
        let (best, leaders) = leaderboard(vec![entry(1, None), entry(2, Some("bad"))]);

        assert_eq!(best, None);
        assert_eq!(leaders.len(), 2);
        assert_eq!(leaders[0].participant_id, 1);
    }
}
