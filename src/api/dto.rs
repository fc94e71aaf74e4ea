//! Request and response payloads shared by the API handlers.
//!
//! Success envelopes always carry `success: true`; failures are produced
//! by the error type and carry `success: false` with a message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::creation::Creation;

#[derive(Debug, Deserialize)]
pub struct GenerateArticleRequest {
    pub prompt: String,
    /// Requested article length as a token budget
    pub length: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBlogTitleRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    /// Share the result in the community feed
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleLikeRequest {
    pub id: Uuid,
}

/// `{success: true, content}` - content is markdown for text kinds, a
/// public URL for images
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub content: String,
}

impl GenerateResponse {
    pub fn new(content: String) -> Self {
        Self {
            success: true,
            content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreationsResponse {
    pub success: bool,
    pub creations: Vec<Creation>,
}

impl CreationsResponse {
    pub fn new(creations: Vec<Creation>) -> Self {
        Self {
            success: true,
            creations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub success: bool,
    pub message: String,
    pub likes: Vec<String>,
}
