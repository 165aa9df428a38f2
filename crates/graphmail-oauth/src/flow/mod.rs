//! `OAuth2` wire-level exchanges with the provider.

mod device;

pub use device::{DeviceAuthorization, DeviceFlow};

use crate::error::Result;
use crate::provider::Provider;
use crate::token::{Token, parse_token_response};
use reqwest::Client;
use std::collections::HashMap;

/// Common `OAuth2` client configuration for a public client.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from the provider's app registration.
    pub client_id: String,
    /// Provider configuration.
    pub provider: Provider,
    /// HTTP client.
    http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            provider,
            http_client: Client::new(),
        }
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects the
    /// refresh grant.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", &self.client_id);

        let response = self
            .http_client
            .post(self.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        parse_token_response(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_client_creation() {
        let provider = Provider::microsoft("common").unwrap();
        let client = OAuthClient::new("test_client_id", provider);
        assert_eq!(client.client_id, "test_client_id");
        assert_eq!(client.provider.name, "Microsoft");
    }
}
