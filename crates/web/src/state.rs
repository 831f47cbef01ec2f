use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;

use crate::auth::TokenService;
use crate::media::MediaStorage;
use crate::sms::SmsSender;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub media: Arc<MediaStorage>,
    pub sms: Arc<dyn SmsSender>,
    /// How long an issued verification code stays valid
    pub code_ttl: chrono::Duration,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
