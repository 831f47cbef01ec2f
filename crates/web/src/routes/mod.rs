use axum::{Router, extract::DefaultBodyLimit};
use storage::services::image::MAX_AVATAR_BYTES;

use crate::features::{accounts, competitions, content};
use crate::state::AppState;

/// Room for the rest of a registration or profile body next to the avatar
const JSON_FIELDS_HEADROOM: usize = 64 * 1024;

/// Largest accepted request body: a base64 encoded avatar at the size cap plus
/// the other JSON fields
pub const MAX_BODY_BYTES: usize = MAX_AVATAR_BYTES.div_ceil(3) * 4 + JSON_FIELDS_HEADROOM;

/// All API routes under `/api/v1`
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/account", accounts::routes(state.clone()))
        .nest("/competition", competitions::routes(state.clone()))
        .nest("/main", content::routes());

    Router::new()
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
