use async_trait::async_trait;

/// Opaque "token -> subject" capability. Token issuance belongs to an
/// external identity service; the API only ever verifies.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Some(subject)` when the bearer token is valid, `None` otherwise.
    async fn verify(&self, token: &str) -> Option<String>;
}
