//! Generation request pipeline.
//!
//! Each request runs quota check -> provider call -> persist -> counter
//! update. Order matters: a failed provider call or insert must leave
//! the usage counter untouched, and no row is written without fully
//! generated content.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::models::creation::{Creation, CreationKind, NewCreation};
use crate::services::auth_service::AuthUser;
use crate::services::creation_service::CreationStore;
use crate::services::image_generator::ImageGenerator;
use crate::services::media_service::MediaStore;
use crate::services::quota_service::{self, QuotaLedger, Verdict};
use crate::services::text_generator::{CompletionParams, TextGenerator};

/// Sampling temperature for all text completions
const TEMPERATURE: f64 = 0.7;

/// Token budget for blog title generation
const BLOG_TITLE_MAX_TOKENS: u32 = 100;

const IMAGES_PREMIUM_MESSAGE: &str =
    "Free users cannot generate images. Upgrade to premium for this feature.";
const BACKGROUND_PREMIUM_MESSAGE: &str =
    "Background removal is only available to premium subscribers.";

/// Orchestrates a generation request from quota check to persisted creation
pub struct GenerationService {
    quota: Arc<dyn QuotaLedger>,
    creations: Arc<dyn CreationStore>,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    media: Arc<dyn MediaStore>,
    free_usage_limit: i64,
}

impl GenerationService {
    pub fn new(
        quota: Arc<dyn QuotaLedger>,
        creations: Arc<dyn CreationStore>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        media: Arc<dyn MediaStore>,
        free_usage_limit: i64,
    ) -> Self {
        Self {
            quota,
            creations,
            text,
            image,
            media,
            free_usage_limit,
        }
    }

    /// Generate a markdown article from a prompt.
    /// `length` is the requested token budget.
    pub async fn generate_article(
        &self,
        user: &AuthUser,
        prompt: &str,
        length: u32,
    ) -> Result<Creation> {
        if length == 0 {
            return Err(AppError::Validation(
                "Article length must be positive".to_string(),
            ));
        }
        self.generate_text(user, prompt, CreationKind::Article, length)
            .await
    }

    /// Generate blog title suggestions from a prompt
    pub async fn generate_blog_title(&self, user: &AuthUser, prompt: &str) -> Result<Creation> {
        self.generate_text(user, prompt, CreationKind::BlogTitle, BLOG_TITLE_MAX_TOKENS)
            .await
    }

    async fn generate_text(
        &self,
        user: &AuthUser,
        prompt: &str,
        kind: CreationKind,
        max_tokens: u32,
    ) -> Result<Creation> {
        let prompt = validated_prompt(prompt)?;
        self.check_quota(user).await?;

        let content = self
            .text
            .complete(
                prompt,
                CompletionParams {
                    temperature: TEMPERATURE,
                    max_tokens,
                },
            )
            .await?;

        let creation = self
            .creations
            .append(NewCreation {
                user_id: user.user_id.clone(),
                prompt: prompt.to_string(),
                content,
                kind,
                publish: false,
            })
            .await?;

        self.consume_quota(user).await?;

        tracing::info!(
            user_id = %user.user_id,
            kind = kind.as_str(),
            creation_id = %creation.id,
            "Generation completed"
        );

        Ok(creation)
    }

    /// Generate an image from a prompt. Premium only, regardless of the
    /// usage counter; premium requests never touch the counter either.
    pub async fn generate_image(
        &self,
        user: &AuthUser,
        prompt: &str,
        publish: bool,
    ) -> Result<Creation> {
        if !user.plan.is_premium() {
            return Err(AppError::PlanRequired(IMAGES_PREMIUM_MESSAGE.to_string()));
        }
        let prompt = validated_prompt(prompt)?;

        let png = self.image.text_to_image(prompt).await?;
        let url = self.media.store_png(png).await?;

        let creation = self
            .creations
            .append(NewCreation {
                user_id: user.user_id.clone(),
                prompt: prompt.to_string(),
                content: url,
                kind: CreationKind::Image,
                publish,
            })
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            creation_id = %creation.id,
            publish,
            "Image generation completed"
        );

        Ok(creation)
    }

    /// Remove the background from an uploaded image. Premium only.
    pub async fn remove_image_background(
        &self,
        user: &AuthUser,
        image: Bytes,
    ) -> Result<Creation> {
        if !user.plan.is_premium() {
            return Err(AppError::PlanRequired(
                BACKGROUND_PREMIUM_MESSAGE.to_string(),
            ));
        }
        if image.is_empty() {
            return Err(AppError::Validation("Missing image upload".to_string()));
        }

        let png = self.image.remove_background(image).await?;
        let url = self.media.store_png(png).await?;

        self.creations
            .append(NewCreation {
                user_id: user.user_id.clone(),
                prompt: "Remove background from image".to_string(),
                content: url,
                kind: CreationKind::Image,
                publish: false,
            })
            .await
    }

    /// Read-only gate. Premium bypasses the ledger entirely.
    async fn check_quota(&self, user: &AuthUser) -> Result<()> {
        let used = if user.plan.is_premium() {
            0
        } else {
            self.quota.usage(&user.user_id).await?
        };

        match quota_service::check(user.plan, used, self.free_usage_limit) {
            Verdict::Allow => Ok(()),
            Verdict::Deny(message) => Err(AppError::QuotaExceeded(message)),
        }
    }

    /// Counter update happens only after the row is persisted, and only
    /// for free users.
    async fn consume_quota(&self, user: &AuthUser) -> Result<()> {
        if user.plan.is_premium() {
            return Ok(());
        }
        self.quota.record_use(&user.user_id).await?;
        Ok(())
    }
}

fn validated_prompt(prompt: &str) -> Result<&str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Prompt must not be empty".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::services::auth_service::Plan;

    #[derive(Default)]
    struct FakeLedger {
        used: AtomicI64,
        fail_record: bool,
    }

    #[async_trait]
    impl QuotaLedger for FakeLedger {
        async fn usage(&self, _user_id: &str) -> Result<i64> {
            Ok(self.used.load(Ordering::SeqCst))
        }

        async fn record_use(&self, _user_id: &str) -> Result<i64> {
            if self.fail_record {
                return Err(AppError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.used.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<Vec<Creation>>,
    }

    #[async_trait]
    impl CreationStore for FakeStore {
        async fn append(&self, new: NewCreation) -> Result<Creation> {
            let creation = Creation {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                prompt: new.prompt,
                content: new.content,
                kind: new.kind,
                publish: new.publish,
                likes: Vec::new(),
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(creation.clone());
            Ok(creation)
        }

        async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Creation>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn list_published(&self) -> Result<Vec<Creation>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.publish)
                .cloned()
                .collect())
        }

        async fn toggle_like(&self, id: Uuid, user_id: &str) -> Result<Creation> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound("Creation not found".to_string()))?;
            if let Some(pos) = row.likes.iter().position(|u| u == user_id) {
                row.likes.remove(pos);
            } else {
                row.likes.push(user_id.to_string());
            }
            Ok(row.clone())
        }
    }

    #[derive(Default)]
    struct FakeText {
        fail: bool,
        called: AtomicBool,
        last_params: Mutex<Option<CompletionParams>>,
    }

    #[async_trait]
    impl TextGenerator for FakeText {
        async fn complete(&self, _prompt: &str, params: CompletionParams) -> Result<String> {
            self.called.store(true, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params);
            if self.fail {
                return Err(AppError::Generator("provider unreachable".to_string()));
            }
            Ok("## Generated\n\nSome *markdown* body.".to_string())
        }
    }

    #[derive(Default)]
    struct FakeImage {
        fail: bool,
        called: AtomicBool,
    }

    #[async_trait]
    impl ImageGenerator for FakeImage {
        async fn text_to_image(&self, _prompt: &str) -> Result<Bytes> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Generator("provider unreachable".to_string()));
            }
            Ok(Bytes::from_static(b"\x89PNG\r\n\x1a\n"))
        }

        async fn remove_background(&self, _image: Bytes) -> Result<Bytes> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Generator("provider unreachable".to_string()));
            }
            Ok(Bytes::from_static(b"\x89PNG\r\n\x1a\n"))
        }
    }

    struct FakeMedia;

    #[async_trait]
    impl MediaStore for FakeMedia {
        async fn store_png(&self, _data: Bytes) -> Result<String> {
            Ok("https://media.example.com/creations/test.png".to_string())
        }
    }

    struct Harness {
        service: GenerationService,
        ledger: Arc<FakeLedger>,
        store: Arc<FakeStore>,
        text: Arc<FakeText>,
        image: Arc<FakeImage>,
    }

    fn harness(ledger: FakeLedger, text: FakeText, image: FakeImage) -> Harness {
        let ledger = Arc::new(ledger);
        let store = Arc::new(FakeStore::default());
        let text = Arc::new(text);
        let image = Arc::new(image);
        let service = GenerationService::new(
            ledger.clone(),
            store.clone(),
            text.clone(),
            image.clone(),
            Arc::new(FakeMedia),
            10,
        );
        Harness {
            service,
            ledger,
            store,
            text,
            image,
        }
    }

    fn free_user() -> AuthUser {
        AuthUser {
            user_id: "user_free".to_string(),
            plan: Plan::Free,
        }
    }

    fn premium_user() -> AuthUser {
        AuthUser {
            user_id: "user_premium".to_string(),
            plan: Plan::Premium,
        }
    }

    fn ledger_at(used: i64) -> FakeLedger {
        let ledger = FakeLedger::default();
        ledger.used.store(used, Ordering::SeqCst);
        ledger
    }

    #[tokio::test]
    async fn test_free_user_at_cap_is_denied_without_generator_call() {
        let h = harness(ledger_at(10), FakeText::default(), FakeImage::default());

        let result = h.service.generate_article(&free_user(), "hello", 500).await;

        assert!(matches!(result, Err(AppError::QuotaExceeded(_))));
        assert!(!h.text.called.load(Ordering::SeqCst));
        assert!(h.store.rows.lock().unwrap().is_empty());
        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_successful_free_generation_appends_once_and_counts_once() {
        let h = harness(ledger_at(3), FakeText::default(), FakeImage::default());

        let creation = h
            .service
            .generate_article(&free_user(), "hello", 500)
            .await
            .unwrap();

        assert_eq!(creation.kind, CreationKind::Article);
        assert_eq!(h.store.rows.lock().unwrap().len(), 1);
        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_no_row_and_no_usage() {
        let text = FakeText {
            fail: true,
            ..FakeText::default()
        };
        let h = harness(ledger_at(3), text, FakeImage::default());

        let result = h.service.generate_article(&free_user(), "hello", 500).await;

        assert!(matches!(result, Err(AppError::Generator(_))));
        assert!(h.store.rows.lock().unwrap().is_empty());
        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_premium_user_never_touches_the_counter() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        h.service
            .generate_article(&premium_user(), "hello", 500)
            .await
            .unwrap();

        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_last_free_use_then_denied() {
        let h = harness(ledger_at(9), FakeText::default(), FakeImage::default());
        let user = free_user();

        h.service
            .generate_article(&user, "hello", 500)
            .await
            .unwrap();
        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 10);

        let next = h.service.generate_article(&user, "hello again", 500).await;
        assert!(matches!(next, Err(AppError::QuotaExceeded(_))));
        assert_eq!(h.store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_image_requires_premium_regardless_of_usage() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        let result = h
            .service
            .generate_image(&free_user(), "a red fox", false)
            .await;

        assert!(matches!(result, Err(AppError::PlanRequired(_))));
        assert!(!h.image.called.load(Ordering::SeqCst));
        assert!(h.store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_premium_image_publish_flag_round_trips() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        let creation = h
            .service
            .generate_image(&premium_user(), "a red fox", true)
            .await
            .unwrap();

        assert_eq!(creation.kind, CreationKind::Image);
        assert!(creation.publish);
        assert_eq!(
            creation.content,
            "https://media.example.com/creations/test.png"
        );

        let published = h.store.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, creation.id);
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected_before_any_call() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        for prompt in ["", "   ", "\n\t"] {
            let result = h.service.generate_blog_title(&free_user(), prompt).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(!h.text.called.load(Ordering::SeqCst));
        assert_eq!(h.ledger.used.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_length_article_is_rejected() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        let result = h.service.generate_article(&free_user(), "hello", 0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_article_uses_requested_length_as_token_budget() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        h.service
            .generate_article(&free_user(), "hello", 800)
            .await
            .unwrap();

        let params = h.text.last_params.lock().unwrap().unwrap();
        assert_eq!(params.max_tokens, 800);
        assert_eq!(params.temperature, 0.7);
    }

    #[tokio::test]
    async fn test_blog_title_uses_fixed_token_budget() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        h.service
            .generate_blog_title(&free_user(), "rust blogging")
            .await
            .unwrap();

        let params = h.text.last_params.lock().unwrap().unwrap();
        assert_eq!(params.max_tokens, 100);
        assert_eq!(params.temperature, 0.7);
    }

    #[tokio::test]
    async fn test_background_removal_requires_premium() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        let result = h
            .service
            .remove_image_background(&free_user(), Bytes::from_static(b"img"))
            .await;

        assert!(matches!(result, Err(AppError::PlanRequired(_))));
        assert!(!h.image.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_background_removal_appends_unpublished_image() {
        let h = harness(ledger_at(0), FakeText::default(), FakeImage::default());

        let creation = h
            .service
            .remove_image_background(&premium_user(), Bytes::from_static(b"img"))
            .await
            .unwrap();

        assert_eq!(creation.kind, CreationKind::Image);
        assert!(!creation.publish);
        assert_eq!(h.store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_counter_failure_after_persist_reports_error() {
        // The row exists but the request still reports failure, matching
        // the boundary contract: any error inside the pipeline surfaces
        // as success=false.
        let ledger = FakeLedger {
            fail_record: true,
            ..FakeLedger::default()
        };
        let h = harness(ledger, FakeText::default(), FakeImage::default());

        let result = h.service.generate_article(&free_user(), "hello", 500).await;

        assert!(result.is_err());
        assert_eq!(h.store.rows.lock().unwrap().len(), 1);
    }
}
