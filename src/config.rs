//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use std::env;

/// Default free-tier generation cap
const DEFAULT_FREE_USAGE_LIMIT: i64 = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Server bind address (host:port)
    pub bind_address: String,

    /// HS256 secret shared with the identity provider, used to verify
    /// the session tokens it issues
    pub session_jwt_secret: String,

    /// Base URL of the OpenAI-compatible completion API
    pub llm_base_url: String,

    /// API key for the completion API
    pub llm_api_key: String,

    /// Model identifier sent with every completion request
    pub llm_model: String,

    /// Base URL of the image generation provider
    pub image_api_base_url: String,

    /// API key for the image generation provider
    pub image_api_key: String,

    /// Object store bucket for generated media
    pub media_bucket: String,

    /// Object store region
    pub media_region: String,

    /// Custom object store endpoint (for MinIO or other S3-compatible services)
    pub media_endpoint: Option<String>,

    /// Public base URL under which stored media is reachable
    pub media_public_base_url: String,

    /// Number of generations a free user gets before being asked to upgrade
    pub free_usage_limit: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Config("DATABASE_URL not set".into()))?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            session_jwt_secret: env::var("SESSION_JWT_SECRET")
                .map_err(|_| AppError::Config("SESSION_JWT_SECRET not set".into()))?,
            llm_base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".into()
            }),
            llm_api_key: env::var("LLM_API_KEY")
                .map_err(|_| AppError::Config("LLM_API_KEY not set".into()))?,
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into()),
            image_api_base_url: env::var("IMAGE_API_BASE_URL")
                .unwrap_or_else(|_| "https://clipdrop-api.co".into()),
            image_api_key: env::var("IMAGE_API_KEY")
                .map_err(|_| AppError::Config("IMAGE_API_KEY not set".into()))?,
            media_bucket: env::var("MEDIA_BUCKET")
                .map_err(|_| AppError::Config("MEDIA_BUCKET not set".into()))?,
            media_region: env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".into()),
            media_endpoint: env::var("MEDIA_ENDPOINT").ok(),
            media_public_base_url: env::var("MEDIA_PUBLIC_BASE_URL")
                .map_err(|_| AppError::Config("MEDIA_PUBLIC_BASE_URL not set".into()))?,
            free_usage_limit: env::var("FREE_USAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FREE_USAGE_LIMIT),
        })
    }
}
