use sqlx::PgPool;
use storage::{
    dto::location::{CityFilter, CityResponse},
    error::Result,
    models::{Country, SportClub},
    repository::location::LocationRepository,
};

pub async fn list_countries(pool: &PgPool) -> Result<Vec<Country>> {
    LocationRepository::new(pool).list_countries().await
}

pub async fn list_cities(pool: &PgPool, filter: &CityFilter) -> Result<Vec<CityResponse>> {
    LocationRepository::new(pool).list_cities(filter).await
}

pub async fn list_clubs(pool: &PgPool) -> Result<Vec<SportClub>> {
    LocationRepository::new(pool).list_clubs().await
}
