//! PromptForge - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptforge_backend::{
    api,
    config::Config,
    db,
    error::Result,
    services::{
        auth_service::AuthService, creation_service::PgCreationStore,
        generation_service::GenerationService, image_generator::ImageApiClient,
        media_service::S3MediaStore, quota_service::PgQuotaLedger,
        text_generator::ChatCompletionsClient,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptforge_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting PromptForge backend");

    // Connect to database
    let db_pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // Session verification against the identity provider's signing secret
    let auth = Arc::new(AuthService::new(&config.session_jwt_secret));

    // Storage adapters
    let quota = Arc::new(PgQuotaLedger::new(db_pool.clone()));
    let creations = Arc::new(PgCreationStore::new(db_pool.clone()));
    let media = Arc::new(S3MediaStore::new(
        &config.media_bucket,
        &config.media_region,
        config.media_endpoint.as_deref(),
        &config.media_public_base_url,
    )?);

    // External generator clients
    let text = Arc::new(ChatCompletionsClient::new(
        config.llm_base_url.clone(),
        &config.llm_api_key,
        config.llm_model.clone(),
    )?);
    let image = Arc::new(ImageApiClient::new(
        config.image_api_base_url.clone(),
        config.image_api_key.clone(),
    )?);

    let generation = Arc::new(GenerationService::new(
        quota,
        creations.clone(),
        text,
        image,
        media,
        config.free_usage_limit,
    ));

    // Create application state
    let state = Arc::new(api::AppState::new(
        config.clone(),
        db_pool,
        auth,
        creations,
        generation,
    ));

    // Build router
    let app = Router::new()
        .merge(api::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
