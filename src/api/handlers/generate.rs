//! AI generation endpoints.
//!
//! Each endpoint fixes the creation kind; the client never chooses it.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Extension, Json, Router,
};
use bytes::Bytes;

use crate::api::dto::{
    GenerateArticleRequest, GenerateBlogTitleRequest, GenerateImageRequest, GenerateResponse,
};
use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::{AppError, Result};

/// Create generation routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/generate-article", post(generate_article))
        .route("/generate-blog-title", post(generate_blog_title))
        .route("/generate-image", post(generate_image))
        .route("/remove-image-background", post(remove_image_background))
}

/// Generate a markdown article from a prompt
pub async fn generate_article(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
    Json(request): Json<GenerateArticleRequest>,
) -> Result<Json<GenerateResponse>> {
    let creation = state
        .generation
        .generate_article(&user, &request.prompt, request.length)
        .await?;

    Ok(Json(GenerateResponse::new(creation.content)))
}

/// Generate blog title suggestions from a prompt
pub async fn generate_blog_title(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
    Json(request): Json<GenerateBlogTitleRequest>,
) -> Result<Json<GenerateResponse>> {
    let creation = state
        .generation
        .generate_blog_title(&user, &request.prompt)
        .await?;

    Ok(Json(GenerateResponse::new(creation.content)))
}

/// Generate an image from a prompt (premium only)
pub async fn generate_image(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateResponse>> {
    let creation = state
        .generation
        .generate_image(&user, &request.prompt, request.publish)
        .await?;

    Ok(Json(GenerateResponse::new(creation.content)))
}

/// Remove the background from an uploaded image (premium only).
/// Expects a multipart form with an `image` part.
pub async fn remove_image_background(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>> {
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("image") {
            image = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?,
            );
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("Missing image upload".to_string()))?;

    let creation = state
        .generation
        .remove_image_background(&user, image)
        .await?;

    Ok(Json(GenerateResponse::new(creation.content)))
}
