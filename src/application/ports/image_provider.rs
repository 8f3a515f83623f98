use async_trait::async_trait;

/// Third-party source of dog image references, treated as unreliable: every
/// failure mode collapses to `None` and callers must supply a fallback.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn fetch_random_image(&self) -> Option<String>;
}
