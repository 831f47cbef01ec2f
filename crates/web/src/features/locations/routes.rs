use axum::{Router, routing::get};

use super::handlers::{list_cities, list_clubs, list_countries};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/cities", get(list_cities))
        .route("/clubs", get(list_clubs))
}
