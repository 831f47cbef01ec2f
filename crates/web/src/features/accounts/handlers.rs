use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        account::{
            AboutMeResponse, AccessTokenResponse, ChangePasswordRequest, LoginRequest,
            LoginResponse, PhoneNumberRequest, ProfileResponse, RefreshTokenRequest,
            RegisterRequest, RegisterResponse, ResetPasswordConfirmRequest,
            UpdateProfileRequest, VerifyPhoneRequest,
        },
        common::SuccessResponse,
    },
    repository::{account::AccountRepository, verification::VerificationRepository},
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedAccount;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/v1/account/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification code sent", body = RegisterResponse),
        (status = 400, description = "Validation error or phone/email already registered")
    ),
    tag = "account"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let pool = state.db.pool();
    let response = services::register(
        &AccountRepository::new(pool),
        &VerificationRepository::new(pool),
        state.sms.as_ref(),
        &state.media,
        &req,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/account/verify-phone",
    request_body = VerifyPhoneRequest,
    responses(
        (status = 200, description = "Phone number verified", body = SuccessResponse),
        (status = 400, description = "Invalid or expired code")
    ),
    tag = "account"
)]
pub async fn verify_phone(
    State(state): State<AppState>,
    Json(req): Json<VerifyPhoneRequest>,
) -> Result<Json<SuccessResponse>, WebError> {
    req.validate()?;

    let response = services::verify_phone(
        &VerificationRepository::new(state.db.pool()),
        &req,
        state.code_ttl,
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/resend-code",
    request_body = PhoneNumberRequest,
    responses(
        (status = 200, description = "New code sent", body = SuccessResponse),
        (status = 400, description = "Account already verified"),
        (status = 404, description = "No account for this phone number")
    ),
    tag = "account"
)]
pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<PhoneNumberRequest>,
) -> Result<Json<SuccessResponse>, WebError> {
    req.validate()?;

    let pool = state.db.pool();
    let response = services::resend_code(
        &AccountRepository::new(pool),
        &VerificationRepository::new(pool),
        state.sms.as_ref(),
        &req.phone_number,
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "User not found or not verified", body = SuccessResponse)
    ),
    tag = "account"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, WebError> {
    req.validate()?;

    let response =
        services::login(&AccountRepository::new(state.db.pool()), &state.tokens, &req).await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/token/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Refresh token invalid or expired")
    ),
    tag = "account"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, WebError> {
    req.validate()?;

    Ok(Json(services::refresh_token(&state.tokens, &req)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/change-password",
    request_body = ChangePasswordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Password updated", body = SuccessResponse),
        (status = 400, description = "Old password not match"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "account"
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, WebError> {
    req.validate()?;

    let response =
        services::change_password(&AccountRepository::new(state.db.pool()), &account, &req)
            .await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/reset-password",
    request_body = PhoneNumberRequest,
    responses(
        (status = 200, description = "Reset code sent", body = SuccessResponse),
        (status = 404, description = "No account for this phone number")
    ),
    tag = "account"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PhoneNumberRequest>,
) -> Result<Json<SuccessResponse>, WebError> {
    req.validate()?;

    let pool = state.db.pool();
    let response = services::request_password_reset(
        &AccountRepository::new(pool),
        &VerificationRepository::new(pool),
        state.sms.as_ref(),
        &req.phone_number,
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/account/reset-password/confirm",
    request_body = ResetPasswordConfirmRequest,
    responses(
        (status = 200, description = "Password reset", body = SuccessResponse),
        (status = 400, description = "Passwords not match, or invalid or expired code")
    ),
    tag = "account"
)]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordConfirmRequest>,
) -> Result<Json<SuccessResponse>, WebError> {
    req.validate()?;

    let response = services::confirm_password_reset(
        &VerificationRepository::new(state.db.pool()),
        &req,
        state.code_ttl,
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/account/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "account"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Result<Json<ProfileResponse>, WebError> {
    let profile = services::get_profile(state.db.pool(), account.account_id).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/v1/account/profile",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email taken or unknown location")
    ),
    tag = "account"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, WebError> {
    req.validate()?;

    let profile =
        services::update_profile(state.db.pool(), &state.media, account.account_id, &req).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/account/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Who the token belongs to", body = AboutMeResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "account"
)]
pub async fn about_me(
    Extension(AuthenticatedAccount(account)): Extension<AuthenticatedAccount>,
) -> Json<AboutMeResponse> {
    Json(AboutMeResponse::from(&account))
}
