//! Authentication middleware.
//!
//! Extracts the bearer session token issued by the identity provider,
//! verifies it, and exposes the authenticated user to handlers via a
//! request extension.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::auth_service::{AuthService, AuthUser};

/// Extension that holds the authenticated user
#[derive(Debug, Clone)]
pub struct AuthExtension(pub AuthUser);

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Authentication middleware function - requires a valid session token
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(&request) else {
        return unauthorized("Missing authorization header");
    };

    match auth_service.verify_session_token(&token) {
        Ok(user) => {
            request.extensions_mut().insert(AuthExtension(user));
            next.run(request).await
        }
        Err(_) => unauthorized("Invalid or expired session token"),
    }
}
