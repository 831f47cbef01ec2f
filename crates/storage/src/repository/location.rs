use sqlx::{PgPool, QueryBuilder};

use crate::dto::location::{CityFilter, CityResponse};
use crate::error::{Result, StorageError};
use crate::models::{City, Country, SportClub};

pub struct LocationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LocationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>(
            "SELECT country_id, name, flag FROM countries ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(countries)
    }

    pub async fn find_country(&self, country_id: i32) -> Result<Country> {
        sqlx::query_as::<_, Country>(
            "SELECT country_id, name, flag FROM countries WHERE country_id = $1",
        )
        .bind(country_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Cities with their country's name and flag, optionally for one country
    pub async fn list_cities(&self, filter: &CityFilter) -> Result<Vec<CityResponse>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT ci.city_id, ci.name, co.name AS country, co.country_id, co.flag
            FROM cities ci
            INNER JOIN countries co ON co.country_id = ci.country_id
            WHERE 1=1
            "#,
        );

        if let Some(country_id) = filter.country_id {
            query.push(" AND ci.country_id = ");
            query.push_bind(country_id);
        }

        query.push(" ORDER BY co.name, ci.name");

        let cities = query
            .build_query_as::<CityResponse>()
            .fetch_all(self.pool)
            .await?;

        Ok(cities)
    }

    pub async fn list_clubs(&self) -> Result<Vec<SportClub>> {
        let clubs = sqlx::query_as::<_, SportClub>(
            "SELECT sport_club_id, name, flag FROM sport_clubs ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(clubs)
    }

    pub async fn find_club(&self, sport_club_id: i32) -> Result<SportClub> {
        sqlx::query_as::<_, SportClub>(
            "SELECT sport_club_id, name, flag FROM sport_clubs WHERE sport_club_id = $1",
        )
        .bind(sport_club_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Insert a country or refresh the flag of an existing one with the same name
    pub async fn upsert_country(&self, name: &str, flag: Option<&str>) -> Result<Country> {
        let country = sqlx::query_as::<_, Country>(
            r#"
            INSERT INTO countries (name, flag)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET flag = COALESCE(EXCLUDED.flag, countries.flag)
            RETURNING country_id, name, flag
            "#,
        )
        .bind(name)
        .bind(flag)
        .fetch_one(self.pool)
        .await?;

        Ok(country)
    }

    /// Insert a city, moving an existing city with the same name to `country_id`
    pub async fn upsert_city(&self, name: &str, country_id: i32) -> Result<City> {
        let city = sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (name, country_id)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET country_id = EXCLUDED.country_id
            RETURNING city_id, name, country_id
            "#,
        )
        .bind(name)
        .bind(country_id)
        .fetch_one(self.pool)
        .await?;

        Ok(city)
    }
}
