//! Session token verification.
//!
//! Session tokens are issued by the external identity provider; this
//! service only verifies them and extracts the authenticated user. The
//! subscription tier travels as a claim, so no provider round-trip is
//! needed per request.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    pub fn is_premium(&self) -> bool {
        matches!(self, Plan::Premium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Premium => "premium",
        }
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id at the identity provider)
    pub sub: String,
    /// Subscription tier
    pub plan: Plan,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user as seen by handlers
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub plan: Plan,
}

/// Verifies provider-issued session tokens
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Create a new verifier from the shared signing secret
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Verify a bearer session token and extract the authenticated user
    pub fn verify_session_token(&self, token: &str) -> Result<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Authentication("Invalid or expired session token".into()))?;

        Ok(AuthUser {
            user_id: data.claims.sub,
            plan: data.claims.plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-session-secret";

    fn mint(plan: Plan, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user_2abc".to_string(),
            plan,
            iat: now,
            exp: now + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let service = AuthService::new(SECRET);
        let user = service
            .verify_session_token(&mint(Plan::Premium, 3600))
            .unwrap();
        assert_eq!(user.user_id, "user_2abc");
        assert!(user.plan.is_premium());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = AuthService::new(SECRET);
        // Past the default 60s leeway
        let result = service.verify_session_token(&mint(Plan::Free, -3600));
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = AuthService::new("some-other-secret");
        let result = service.verify_session_token(&mint(Plan::Free, 3600));
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }
}
