//! Free-tier usage quota.
//!
//! The counter lives in its own table and is advanced with a single
//! upsert, so concurrent successful generations cannot lose increments.
//! The check itself never writes: a generation that fails downstream
//! must not consume quota. In-flight requests can still pass the
//! read-only check together just under the cap, so enforcement is
//! approximate under concurrency.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::services::auth_service::Plan;

/// Message shown when a free user exhausts the cap
pub const FREE_LIMIT_MESSAGE: &str =
    "Free usage limit exceeded. Upgrade to premium for unlimited access.";

/// Verdict of a quota check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

/// Pure gate rule: premium always passes, free passes below the cap.
/// All generation kinds share one counter.
pub fn check(plan: Plan, used: i64, limit: i64) -> Verdict {
    if plan.is_premium() {
        return Verdict::Allow;
    }
    if used >= limit {
        return Verdict::Deny(FREE_LIMIT_MESSAGE.to_string());
    }
    Verdict::Allow
}

/// Per-user usage counter storage
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Current counter value, 0 when the user has no row yet
    async fn usage(&self, user_id: &str) -> Result<i64>;

    /// Advance the counter by exactly one, returning the new value.
    /// Called only after a confirmed successful free-tier generation.
    async fn record_use(&self, user_id: &str) -> Result<i64>;
}

/// Postgres-backed usage counters
pub struct PgQuotaLedger {
    db: PgPool,
}

impl PgQuotaLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuotaLedger for PgQuotaLedger {
    async fn usage(&self, user_id: &str) -> Result<i64> {
        let used: Option<i32> =
            sqlx::query_scalar("SELECT used FROM usage_counters WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(i64::from(used.unwrap_or(0)))
    }

    async fn record_use(&self, user_id: &str) -> Result<i64> {
        let used: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO usage_counters (user_id, used)
            VALUES ($1, 1)
            ON CONFLICT (user_id) DO UPDATE SET
                used = usage_counters.used + 1,
                updated_at = NOW()
            RETURNING used
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(i64::from(used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_always_allowed() {
        assert_eq!(check(Plan::Premium, 0, 10), Verdict::Allow);
        assert_eq!(check(Plan::Premium, 10, 10), Verdict::Allow);
        assert_eq!(check(Plan::Premium, 9999, 10), Verdict::Allow);
    }

    #[test]
    fn test_free_allowed_below_cap() {
        assert_eq!(check(Plan::Free, 0, 10), Verdict::Allow);
        assert_eq!(check(Plan::Free, 9, 10), Verdict::Allow);
    }

    #[test]
    fn test_free_denied_at_cap() {
        assert_eq!(
            check(Plan::Free, 10, 10),
            Verdict::Deny(FREE_LIMIT_MESSAGE.to_string())
        );
        assert_eq!(
            check(Plan::Free, 11, 10),
            Verdict::Deny(FREE_LIMIT_MESSAGE.to_string())
        );
    }
}
