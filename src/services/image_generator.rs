//! Image provider client.
//!
//! Text-to-image and background removal against a ClipDrop-style API:
//! multipart form in, binary PNG out, authenticated via `x-api-key`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;

use crate::error::{AppError, Result};

/// Image generation seam
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a PNG from a text prompt
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes>;

    /// Strip the background from an uploaded image, returning a PNG
    async fn remove_background(&self, image: Bytes) -> Result<Bytes>;
}

/// Client for an `x-api-key` authenticated image API
pub struct ImageApiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ImageApiClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build image client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    async fn send_form(&self, path: &str, form: multipart::Form) -> Result<Bytes> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Generator(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generator(format!(
                "image endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Generator(e.to_string()))
    }
}

#[async_trait]
impl ImageGenerator for ImageApiClient {
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes> {
        let form = multipart::Form::new().text("prompt", prompt.to_string());
        self.send_form("/text-to-image/v1", form).await
    }

    async fn remove_background(&self, image: Bytes) -> Result<Bytes> {
        let part = multipart::Part::bytes(image.to_vec()).file_name("image.png");
        let form = multipart::Form::new().part("image_file", part);
        self.send_form("/remove-background/v1", form).await
    }
}
