//! API module - HTTP handlers and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::creation_service::CreationStore;
use crate::services::generation_service::GenerationService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: PgPool,
    pub auth: Arc<AuthService>,
    pub creations: Arc<dyn CreationStore>,
    pub generation: Arc<GenerationService>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: PgPool,
        auth: Arc<AuthService>,
        creations: Arc<dyn CreationStore>,
        generation: Arc<GenerationService>,
    ) -> Self {
        Self {
            config,
            db,
            auth,
            creations,
            generation,
        }
    }
}

pub type SharedState = Arc<AppState>;
