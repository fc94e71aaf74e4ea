//! Dashboard and community feed endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::api::dto::{CreationsResponse, ToggleLikeRequest, ToggleLikeResponse};
use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;

/// Create creation routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/get-user-creations", get(get_user_creations))
        .route("/get-published-creations", get(get_published_creations))
        .route("/toggle-like-creation", post(toggle_like_creation))
}

/// List the authenticated user's creations, newest first
pub async fn get_user_creations(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
) -> Result<Json<CreationsResponse>> {
    let creations = state.creations.list_by_owner(&user.user_id).await?;
    Ok(Json(CreationsResponse::new(creations)))
}

/// List published creations for the community feed
pub async fn get_published_creations(
    State(state): State<SharedState>,
    Extension(AuthExtension(_user)): Extension<AuthExtension>,
) -> Result<Json<CreationsResponse>> {
    let creations = state.creations.list_published().await?;
    Ok(Json(CreationsResponse::new(creations)))
}

/// Toggle the authenticated user's like on a creation
pub async fn toggle_like_creation(
    State(state): State<SharedState>,
    Extension(AuthExtension(user)): Extension<AuthExtension>,
    Json(request): Json<ToggleLikeRequest>,
) -> Result<Json<ToggleLikeResponse>> {
    let creation = state
        .creations
        .toggle_like(request.id, &user.user_id)
        .await?;

    let message = if creation.likes.iter().any(|u| u == &user.user_id) {
        "Creation liked"
    } else {
        "Like removed"
    };

    Ok(Json(ToggleLikeResponse {
        success: true,
        message: message.to_string(),
        likes: creation.likes,
    }))
}
