use async_trait::async_trait;
use storage::{
    dto::location::CountryImport,
    models::{City, Country},
    repository::location::LocationRepository,
};

use crate::error::{AdminError, Result};

/// Destination of a location import
#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn upsert_country(&self, name: &str, flag: Option<&str>) -> Result<Country>;

    async fn upsert_city(&self, name: &str, country_id: i32) -> Result<City>;
}

#[async_trait]
impl LocationSink for LocationRepository<'_> {
    async fn upsert_country(&self, name: &str, flag: Option<&str>) -> Result<Country> {
        Ok(LocationRepository::upsert_country(self, name, flag).await?)
    }

    async fn upsert_city(&self, name: &str, country_id: i32) -> Result<City> {
        Ok(LocationRepository::upsert_city(self, name, country_id).await?)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub countries: usize,
    pub cities: usize,
}

/// Parse an import file of `[{"name", "flag", "cities": [..]}]` entries.
///
/// Names are trimmed; blank country or city names are rejected.
pub fn parse_locations(json: &str) -> Result<Vec<CountryImport>> {
    let mut countries: Vec<CountryImport> = serde_json::from_str(json)?;

    for country in &mut countries {
        country.name = country.name.trim().to_string();
        if country.name.is_empty() {
            return Err(AdminError::ValidationError(
                "Country name must not be empty".to_string(),
            ));
        }

        for city in &mut country.cities {
            *city = city.trim().to_string();
            if city.is_empty() {
                return Err(AdminError::ValidationError(format!(
                    "City names of {} must not be empty",
                    country.name
                )));
            }
        }
    }

    Ok(countries)
}

pub async fn import_locations(
    sink: &impl LocationSink,
    countries: &[CountryImport],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for entry in countries {
        let country = sink
            .upsert_country(&entry.name, entry.flag.as_deref())
            .await?;
        summary.countries += 1;

        for city in &entry.cities {
            sink.upsert_city(city, country.country_id).await?;
            summary.cities += 1;
        }

        tracing::info!(
            "Imported {} with {} cities",
            country.name,
            entry.cities.len()
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        countries: Mutex<Vec<Country>>,
        cities: Mutex<HashMap<String, i32>>,
    }

    #[async_trait]
    impl LocationSink for MemorySink {
        async fn upsert_country(&self, name: &str, flag: Option<&str>) -> Result<Country> {
            let mut countries = self.countries.lock().unwrap();
            if let Some(existing) = countries.iter_mut().find(|c| c.name == name) {
                if flag.is_some() {
                    existing.flag = flag.map(String::from);
                }
                return Ok(existing.clone());
            }

            let country = Country {
                country_id: countries.len() as i32 + 1,
                name: name.to_string(),
                flag: flag.map(String::from),
            };
            countries.push(country.clone());
            Ok(country)
        }

        async fn upsert_city(&self, name: &str, country_id: i32) -> Result<City> {
            let mut cities = self.cities.lock().unwrap();
            cities.insert(name.to_string(), country_id);
            Ok(City {
                city_id: cities.len() as i32,
                name: name.to_string(),
                country_id,
            })
        }
    }

    const FILE: &str = r#"[
        {"name": " Uzbekistan ", "flag": "uz.png", "cities": ["Tashkent", "Samarkand"]},
        {"name": "Kazakhstan", "cities": ["Almaty"]}
    ]"#;

    #[test]
    fn test_parse_trims_names() {
        let countries = parse_locations(FILE).unwrap();

        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Uzbekistan");
        assert_eq!(countries[1].flag, None);
        assert_eq!(countries[1].cities, vec!["Almaty".to_string()]);
    }

    #[test]
    fn test_parse_rejects_blank_names() {
        let result = parse_locations(r#"[{"name": "  ", "cities": []}]"#);
        assert!(matches!(result, Err(AdminError::ValidationError(_))));

        let result = parse_locations(r#"[{"name": "Uzbekistan", "cities": [""]}]"#);
        assert!(matches!(result, Err(AdminError::ValidationError(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_locations("{not json"),
            Err(AdminError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_import_links_cities_to_countries() {
        let sink = MemorySink::default();
        let summary = import_locations(&sink, &parse_locations(FILE).unwrap())
            .await
            .unwrap();

        assert_eq!(summary, ImportSummary { countries: 2, cities: 3 });

        let cities = sink.cities.lock().unwrap();
        assert_eq!(cities["Tashkent"], 1);
        assert_eq!(cities["Almaty"], 2);
    }

    #[tokio::test]
    async fn test_reimport_keeps_country_ids() {
        let sink = MemorySink::default();
        let countries = parse_locations(FILE).unwrap();

        import_locations(&sink, &countries).await.unwrap();
        import_locations(&sink, &countries).await.unwrap();

        assert_eq!(sink.countries.lock().unwrap().len(), 2);
    }
}
