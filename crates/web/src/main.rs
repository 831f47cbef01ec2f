use std::sync::Arc;

use anyhow::Context;
use storage::Database;
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod features;
mod media;
mod middleware;
mod routes;
mod sms;
mod state;

use auth::TokenService;
use config::Config;
use features::{accounts, competitions, content, locations};
use media::MediaStorage;
use sms::{HttpSmsSender, LogSmsSender, SmsSender};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::handlers::register,
        accounts::handlers::verify_phone,
        accounts::handlers::resend_code,
        accounts::handlers::login,
        accounts::handlers::refresh_token,
        accounts::handlers::change_password,
        accounts::handlers::request_password_reset,
        accounts::handlers::confirm_password_reset,
        accounts::handlers::get_profile,
        accounts::handlers::update_profile,
        accounts::handlers::about_me,
        locations::handlers::list_countries,
        locations::handlers::list_cities,
        locations::handlers::list_clubs,
        competitions::handlers::list_categories,
        competitions::handlers::list_future,
        competitions::handlers::list_present,
        competitions::handlers::list_past,
        competitions::handlers::get_detail,
        competitions::handlers::join,
        competitions::handlers::get_participant,
        competitions::handlers::my_competitions,
        content::handlers::list_banners,
        content::handlers::list_news,
        content::handlers::get_news,
        content::handlers::list_partners,
    ),
    components(
        schemas(
            storage::dto::account::RegisterRequest,
            storage::dto::account::RegisterResponse,
            storage::dto::account::VerifyPhoneRequest,
            storage::dto::account::PhoneNumberRequest,
            storage::dto::account::LoginRequest,
            storage::dto::account::LoginResponse,
            storage::dto::account::TokenPair,
            storage::dto::account::RefreshTokenRequest,
            storage::dto::account::AccessTokenResponse,
            storage::dto::account::ChangePasswordRequest,
            storage::dto::account::ResetPasswordConfirmRequest,
            storage::dto::account::ProfileResponse,
            storage::dto::account::UpdateProfileRequest,
            storage::dto::account::AboutMeResponse,
            storage::dto::common::SuccessResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::location::CityResponse,
            storage::dto::competition::FutureCompetitionResponse,
            storage::dto::competition::BannerParticipant,
            storage::dto::competition::PresentCompetitionResponse,
            storage::dto::competition::ParticipantListEntry,
            storage::dto::competition::DistanceLeaders,
            storage::dto::competition::PastCompetitionResponse,
            storage::dto::competition::CompetitionMapResponse,
            storage::dto::competition::CompetitionDetailResponse,
            storage::dto::competition::ParticipantDetailResponse,
            storage::dto::competition::JoinCompetitionResponse,
            storage::dto::history::CompetitionResultEntry,
            storage::dto::history::MonthResults,
            storage::dto::history::CompetitionHistoryResponse,
            storage::models::Country,
            storage::models::SportClub,
            storage::models::Category,
            storage::models::CompetitionText,
            storage::models::Banner,
            storage::models::News,
            storage::models::Partner,
        )
    ),
    tags(
        (name = "account", description = "Registration, login and profile endpoints"),
        (name = "locations", description = "Countries, cities and sport clubs"),
        (name = "competitions", description = "Competition listings, joining and results"),
        (name = "main", description = "Home page content"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

fn sms_sender(config: &Config) -> anyhow::Result<Arc<dyn SmsSender>> {
    match &config.sms_gateway_url {
        Some(url) => {
            tracing::info!("Sending verification codes through {}", url);
            let sender = HttpSmsSender::new(url.clone(), config.sms_gateway_token.clone())
                .context("Failed to build SMS gateway client")?;
            Ok(Arc::new(sender))
        }
        None => {
            tracing::warn!("SMS_GATEWAY_URL not set, verification codes will only be logged");
            Ok(Arc::new(LogSmsSender))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting competition API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("Failed to create media root {}", config.media_root.display()))?;

    let media = MediaStorage::new(&config.media_root, &config.media_url);

    let state = AppState {
        db,
        tokens: Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::minutes(config.access_token_ttl_minutes),
            chrono::Duration::days(config.refresh_token_ttl_days),
        )),
        media: Arc::new(media.clone()),
        sms: sms_sender(&config)?,
        code_ttl: chrono::Duration::seconds(config.verification_code_ttl_seconds),
    };

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service(&config.media_url, ServeDir::new(media.root()))
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app).await?;

    Ok(())
}
