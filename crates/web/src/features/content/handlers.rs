use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::{PaginatedResponse, PaginationParams},
    models::{Banner, News, Partner},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/main/banner",
    responses(
        (status = 200, description = "Home page banners, newest first", body = Vec<Banner>)
    ),
    tag = "main"
)]
pub async fn list_banners(State(db): State<Database>) -> Result<Json<Vec<Banner>>, WebError> {
    Ok(Json(services::list_banners(db.pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/main/news",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated news", body = PaginatedResponse<News>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "main"
)]
pub async fn list_news(
    State(db): State<Database>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let (news, total_items) = services::list_news(db.pool(), &params).await?;

    let response = PaginatedResponse::new(news, params.page, params.page_size, total_items);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/main/news/{id}",
    params(
        ("id" = i32, Path, description = "News id")
    ),
    responses(
        (status = 200, description = "News found", body = News),
        (status = 404, description = "News not found")
    ),
    tag = "main"
)]
pub async fn get_news(
    State(db): State<Database>,
    Path(news_id): Path<i32>,
) -> Result<Json<News>, WebError> {
    Ok(Json(services::get_news(db.pool(), news_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/main/partners",
    responses(
        (status = 200, description = "Partners", body = Vec<Partner>)
    ),
    tag = "main"
)]
pub async fn list_partners(State(db): State<Database>) -> Result<Json<Vec<Partner>>, WebError> {
    Ok(Json(services::list_partners(db.pool()).await?))
}
