use async_trait::async_trait;

use crate::application::ports::TokenVerifier;

/// Verifies the service token issued out-of-band by the identity service.
/// This adapter only checks; it never issues.
pub struct SharedSecretVerifier {
    token: String,
    subject: String,
}

impl SharedSecretVerifier {
    pub fn new(token: String, subject: String) -> Self {
        Self { token, subject }
    }
}

#[async_trait]
impl TokenVerifier for SharedSecretVerifier {
    async fn verify(&self, token: &str) -> Option<String> {
        // An unset secret must reject everything, including empty tokens.
        if !self.token.is_empty() && token == self.token {
            Some(self.subject.clone())
        } else {
            None
        }
    }
}
