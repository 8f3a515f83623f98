use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::ImageProvider;

/// Client for the random-image provider. The provider is treated as
/// unreliable: every failure mode is logged and collapsed to `None` so the
/// creation workflow never stalls on it.
pub struct DogApiClient {
    client: Client,
    url: String,
    request_timeout: Duration,
}

impl DogApiClient {
    pub fn new(url: String, request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url,
            request_timeout,
        }
    }
}

#[derive(Deserialize)]
struct RandomImageResponse {
    status: String,
    message: Option<String>,
}

#[async_trait]
impl ImageProvider for DogApiClient {
    async fn fetch_random_image(&self) -> Option<String> {
        let response = match self
            .client
            .get(&self.url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Image provider request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Image provider returned an error status");
            return None;
        }

        let body = match response.json::<RandomImageResponse>().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "Image provider returned a malformed body");
                return None;
            }
        };

        if body.status == "success" {
            body.message.filter(|url| !url.is_empty())
        } else {
            None
        }
    }
}

/// Always returns the same reference. Test double.
pub struct FixedImageProvider {
    url: String,
}

impl FixedImageProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ImageProvider for FixedImageProvider {
    async fn fetch_random_image(&self) -> Option<String> {
        Some(self.url.clone())
    }
}

/// Always fails, forcing callers onto the fallback reference. Test double.
pub struct UnavailableImageProvider;

#[async_trait]
impl ImageProvider for UnavailableImageProvider {
    async fn fetch_random_image(&self) -> Option<String> {
        None
    }
}
