use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    about_me, change_password, confirm_password_reset, get_profile, login, refresh_token,
    register, request_password_reset, resend_code, update_profile, verify_phone,
};
use crate::features::locations;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/change-password", post(change_password))
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/me", get(about_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/verify-phone", post(verify_phone))
        .route("/resend-code", post(resend_code))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh_token))
        .route("/reset-password", post(request_password_reset))
        .route("/reset-password/confirm", post(confirm_password_reset))
        .merge(locations::routes())
        .merge(protected)
}
