use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::FromRow;

pub const GENDERS: &[&str] = &["none", "male", "female"];

pub const SIZES: &[&str] = &[
    "none", "xs", "s", "m", "l", "xl", "xxl", "xxxl", "xxxxl",
];

/// A registered user, identified by phone number.
///
/// The password hash never leaves the storage layer: responses are built from
/// the DTOs in [`crate::dto::account`].
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: i32,
    pub phone_number: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub gender: String,
    pub size: String,
    pub birthday: Option<NaiveDate>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub country_id: Option<i32>,
    pub city_id: Option<i32>,
    pub sport_club_id: Option<i32>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub date_login: NaiveDateTime,
    pub date_created: NaiveDateTime,
}

impl Account {
    /// "First Last" when both parts are set, otherwise whatever is available
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Age in whole calendar years as of `today`'s year
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        self.birthday.map(|birthday| today.year() - birthday.year())
    }
}

/// Insert payload for a new account
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub phone_number: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub country_id: Option<i32>,
    pub sport_club_id: Option<i32>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub is_staff: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(first: Option<&str>, last: Option<&str>) -> Account {
        let now = chrono::Utc::now().naive_utc();
        Account {
            account_id: 1,
            phone_number: "+998901234567".to_string(),
            email: None,
            password_hash: String::new(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            avatar: None,
            gender: "none".to_string(),
            size: "none".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 6, 15),
            height: None,
            weight: None,
            country_id: None,
            city_id: None,
            sport_club_id: None,
            is_verified: false,
            is_admin: false,
            is_superuser: false,
            is_staff: false,
            date_login: now,
            date_created: now,
        }
    }

    #[test]
    fn test_full_name_joins_both_parts() {
        assert_eq!(account(Some("John"), Some("Doe")).full_name(), "John Doe");
    }

    #[test]
    fn test_full_name_falls_back_to_first_name() {
        assert_eq!(account(Some("John"), None).full_name(), "John");
    }

    #[test]
    fn test_age_uses_calendar_year() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(account(None, None).age(today), Some(34));
    }
}
