use axum::{Router, routing::get};

use super::handlers::{get_news, list_banners, list_news, list_partners};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banner", get(list_banners))
        .route("/news", get(list_news))
        .route("/news/:id", get(get_news))
        .route("/partners", get(list_partners))
}
