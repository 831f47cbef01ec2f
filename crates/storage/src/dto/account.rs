use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Account, GENDERS, SIZES};
use crate::services::image::{MAX_AVATAR_BYTES, decode_image};

lazy_static! {
    static ref PHONE_NUMBER: Regex =
        Regex::new(r"^[\+]?[(]?[0-9]{3}[)]?[-\s\.]?[0-9]{3}[-\s\.]?[0-9]{4,6}$")
            .expect("phone number pattern is valid");
    static ref LATIN_NAME: Regex =
        Regex::new(r"^[A-Za-z]+(?:[ '\-][A-Za-z]+)*$").expect("latin name pattern is valid");
}

/// Request payload for creating a new (unverified) account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,

    #[validate(length(
        min = 6,
        max = 16,
        message = "Password must be between 6 and 16 characters"
    ))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    #[validate(custom(function = "validate_latin_name"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    #[validate(custom(function = "validate_latin_name"))]
    pub last_name: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    pub birthday: NaiveDate,

    /// Base64 encoded PNG, JPEG or WebP image, optionally as a `data:` URL
    #[validate(custom(function = "validate_avatar"))]
    pub avatar: String,

    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    #[validate(custom(function = "validate_size"))]
    pub size: Option<String>,

    pub country_id: Option<i32>,

    pub sport_club_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub account_id: i32,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyPhoneRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Code must have 6 digits"))]
    pub code: String,
}

/// Body of the endpoints that only need a phone number (resend code, reset request)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PhoneNumberRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 17, message = "Phone number is required"))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 64, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub phone_number: String,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub old_password: String,

    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordConfirmRequest {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Code must have 6 digits"))]
    pub code: String,

    #[validate(length(min = 6, max = 16, message = "Password must be between 6 and 16 characters"))]
    pub password: String,

    #[validate(length(min = 6, max = 16, message = "Password must be between 6 and 16 characters"))]
    pub password2: String,
}

impl ResetPasswordConfirmRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password2
    }
}

/// Profile as returned to its owner, with country/city/club names resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileResponse {
    pub account_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub gender: String,
    pub birthday: Option<NaiveDate>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub country_id: Option<i32>,
    pub country_name: Option<String>,
    pub city_id: Option<i32>,
    pub city_name: Option<String>,
    pub sport_club_id: Option<i32>,
    pub club_name: Option<String>,
    pub size: String,
    pub date_login: NaiveDateTime,
    pub date_created: NaiveDateTime,
}

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    #[validate(custom(function = "validate_latin_name"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    #[validate(custom(function = "validate_latin_name"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_avatar"))]
    pub avatar: Option<String>,

    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    #[validate(custom(function = "validate_size"))]
    pub size: Option<String>,

    pub birthday: Option<NaiveDate>,

    #[validate(custom(function = "validate_measurement"))]
    pub height: Option<Decimal>,

    #[validate(custom(function = "validate_measurement"))]
    pub weight: Option<Decimal>,

    pub country_id: Option<i32>,

    pub city_id: Option<i32>,

    pub sport_club_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AboutMeResponse {
    pub account_id: i32,
    pub phone_number: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

impl From<&Account> for AboutMeResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            phone_number: account.phone_number.clone(),
            full_name: account.full_name(),
            avatar: account.avatar.clone(),
        }
    }
}

// Validation helpers
fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if phone_number.len() <= 17 && PHONE_NUMBER.is_match(phone_number) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_phone_number",
            "Phone number must be entered in the format: '+998 33 215 05 48'. Up to 13 digits allowed.",
        ))
    }
}

pub fn validate_latin_name(name: &str) -> Result<(), ValidationError> {
    if LATIN_NAME.is_match(name) {
        Ok(())
    } else {
        Err(invalid("not_latin", "Only Latin letters are allowed"))
    }
}

fn validate_avatar(avatar: &str) -> Result<(), ValidationError> {
    decode_image(avatar, MAX_AVATAR_BYTES).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("invalid_avatar");
        error.message = Some(Cow::Owned(e.to_string()));
        error
    })
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(invalid("invalid_gender", "Gender must be one of: none, male, female"))
    }
}

fn validate_size(size: &str) -> Result<(), ValidationError> {
    if SIZES.contains(&size) {
        Ok(())
    } else {
        Err(invalid("invalid_size", "Unknown size"))
    }
}

fn validate_measurement(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() && *value < Decimal::from(1000) {
        Ok(())
    } else {
        Err(invalid("invalid_measurement", "Value must be between 0 and 1000"))
    }
}
