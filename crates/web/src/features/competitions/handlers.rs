use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        competition::{
            CompetitionDetailResponse, FutureCompetitionResponse, JoinCompetitionResponse,
            ParticipantDetailResponse, PastCompetitionResponse, PresentCompetitionResponse,
        },
        history::CompetitionHistoryResponse,
    },
    models::Category,
};

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedAccount;

use super::services;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/category",
    responses(
        (status = 200, description = "All competition categories", body = Vec<Category>)
    ),
    tag = "competitions"
)]
pub async fn list_categories(State(db): State<Database>) -> Result<Json<Vec<Category>>, WebError> {
    Ok(Json(services::list_categories(db.pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/competitions/future",
    responses(
        (status = 200, description = "Competitions starting after today", body = Vec<FutureCompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_future(
    State(db): State<Database>,
) -> Result<Json<Vec<FutureCompetitionResponse>>, WebError> {
    Ok(Json(services::list_future(db.pool(), today()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/competitions/present",
    responses(
        (status = 200, description = "Competitions running today", body = Vec<PresentCompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_present(
    State(db): State<Database>,
) -> Result<Json<Vec<PresentCompetitionResponse>>, WebError> {
    Ok(Json(services::list_present(db.pool(), today()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/competitions/past",
    params(PaginationParams),
    responses(
        (status = 200, description = "Finished competitions with top 3 per distance", body = PaginatedResponse<PastCompetitionResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "competitions"
)]
pub async fn list_past(
    State(db): State<Database>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let (competitions, total_items) = services::list_past(db.pool(), today(), &params).await?;

    let response =
        PaginatedResponse::new(competitions, params.page, params.page_size, total_items);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/detail/{id}",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    responses(
        (status = 200, description = "Competition with distances, texts and leaders", body = CompetitionDetailResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_detail(
    State(db): State<Database>,
    Path(competition_id): Path<i32>,
) -> Result<Json<CompetitionDetailResponse>, WebError> {
    Ok(Json(services::get_detail(db.pool(), competition_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/competition/join/{choice_id}",
    params(
        ("choice_id" = i32, Path, description = "Distance (competition map) id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Joined the distance", body = JoinCompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Distance not found"),
        (status = 409, description = "Already joined or competition is full")
    ),
    tag = "competitions"
)]
pub async fn join(
    State(db): State<Database>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    Path(choice_id): Path<i32>,
) -> Result<Response, WebError> {
    let participant = services::join(db.pool(), account.account_id, choice_id).await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/participant/{choice_id}",
    params(
        ("choice_id" = i32, Path, description = "Distance (competition map) id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's entry in the distance", body = ParticipantDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has not joined this distance")
    ),
    tag = "competitions"
)]
pub async fn get_participant(
    State(db): State<Database>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    Path(choice_id): Path<i32>,
) -> Result<Json<ParticipantDetailResponse>, WebError> {
    let participant =
        services::get_participant(db.pool(), account.account_id, choice_id).await?;

    Ok(Json(participant))
}

#[utoipa::path(
    get,
    path = "/api/v1/competition/my-competitions",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's participations grouped by month", body = CompetitionHistoryResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitions"
)]
pub async fn my_competitions(
    State(db): State<Database>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Result<Json<CompetitionHistoryResponse>, WebError> {
    let history = services::my_competitions(db.pool(), &account, today()).await?;

    Ok(Json(history))
}
