use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    get_detail, get_participant, join, list_categories, list_future, list_past, list_present,
    my_competitions,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/join/:choice_id", post(join))
        .route("/participant/:choice_id", get(get_participant))
        .route("/my-competitions", get(my_competitions))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/category", get(list_categories))
        .route("/competitions/future", get(list_future))
        .route("/competitions/present", get(list_present))
        .route("/competitions/past", get(list_past))
        .route("/detail/:id", get(get_detail))
        .merge(protected)
}
