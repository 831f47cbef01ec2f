use axum::{
    Json,
    extract::{Query, State},
};
use storage::{
    Database,
    dto::location::{CityFilter, CityResponse},
    models::{Country, SportClub},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/account/countries",
    responses(
        (status = 200, description = "All countries by name", body = Vec<Country>)
    ),
    tag = "locations"
)]
pub async fn list_countries(State(db): State<Database>) -> Result<Json<Vec<Country>>, WebError> {
    Ok(Json(services::list_countries(db.pool()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/account/cities",
    params(CityFilter),
    responses(
        (status = 200, description = "Cities with their country", body = Vec<CityResponse>)
    ),
    tag = "locations"
)]
pub async fn list_cities(
    State(db): State<Database>,
    Query(filter): Query<CityFilter>,
) -> Result<Json<Vec<CityResponse>>, WebError> {
    Ok(Json(services::list_cities(db.pool(), &filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/account/clubs",
    responses(
        (status = 200, description = "All sport clubs by name", body = Vec<SportClub>)
    ),
    tag = "locations"
)]
pub async fn list_clubs(State(db): State<Database>) -> Result<Json<Vec<SportClub>>, WebError> {
    Ok(Json(services::list_clubs(db.pool()).await?))
}
