use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: i32,
    pub title: String,
    pub sub_title: Option<String>,
    pub youtube: Option<String>,
    pub image: Option<String>,
    pub media: Option<String>,
    pub category_id: i32,
    pub period: Option<String>,
    pub distance: Option<String>,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub members: Option<i32>,
    pub where_is_ticket: Option<String>,
    pub entry_limit: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Competition {
    /// Places left before `members` is reached; 0 when the competition is unlimited
    pub fn free_places(&self, joined: i64) -> i64 {
        match self.members {
            Some(members) => (i64::from(members) - joined).max(0),
            None => 0,
        }
    }

    pub fn is_full(&self, joined: i64) -> bool {
        self.members
            .is_some_and(|members| joined >= i64::from(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn competition(members: Option<i32>) -> Competition {
        Competition {
            competition_id: 1,
            title: "Tashkent Marathon".to_string(),
            sub_title: None,
            youtube: None,
            image: None,
            media: None,
            category_id: 1,
            period: None,
            distance: Some("42km".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 4, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 14).unwrap(),
            members,
            where_is_ticket: None,
            entry_limit: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_full_competition_rejects_joins() {
        let limited = competition(Some(2));

        assert!(!limited.is_full(1));
        assert!(limited.is_full(2));
        assert!(limited.is_full(3));
    }

    #[test]
    fn test_unlimited_competition_is_never_full() {
        let unlimited = competition(None);

        assert!(!unlimited.is_full(10_000));
        assert_eq!(unlimited.free_places(10), 0);
    }

    #[test]
    fn test_free_places_saturate_at_zero() {
        let limited = competition(Some(3));

        assert_eq!(limited.free_places(1), 2);
        assert_eq!(limited.free_places(5), 0);
    }
}
