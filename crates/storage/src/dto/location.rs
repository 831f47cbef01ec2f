use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// City together with the country it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CityResponse {
    pub city_id: i32,
    pub name: String,
    pub country: String,
    pub country_id: i32,
    pub flag: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CityFilter {
    /// Only list cities of this country
    pub country_id: Option<i32>,
}

/// Entry of a location import file: a country and the names of its cities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryImport {
    pub name: String,
    pub flag: Option<String>,
    #[serde(default)]
    pub cities: Vec<String>,
}
