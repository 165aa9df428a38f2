//! Device Authorization Flow implementation (RFC 8628).

use super::OAuthClient;
use crate::error::{Error, Result};
use crate::token::{ErrorResponse, Token, parse_token_response};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Device authorization response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAuthorization {
    /// Device code for polling.
    pub device_code: String,
    /// User code to display to the user.
    pub user_code: String,
    /// Verification URI where the user should go.
    pub verification_uri: String,
    /// Complete verification URI (optional).
    pub verification_uri_complete: Option<String>,
    /// Expiration time in seconds.
    pub expires_in: u32,
    /// Polling interval in seconds (minimum 5 seconds).
    #[serde(default = "default_interval")]
    pub interval: u32,
}

const fn default_interval() -> u32 {
    5
}

/// Device Authorization Flow for `OAuth2`.
///
/// Suitable for devices with limited input capabilities or no browser
/// (e.g., CLI applications).
#[derive(Debug)]
pub struct DeviceFlow {
    client: OAuthClient,
}

impl DeviceFlow {
    /// Creates a new device flow.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self { client }
    }

    /// Returns the underlying OAuth client.
    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }

    /// Requests device authorization from the server.
    ///
    /// Returns the device code and user code that should be displayed to
    /// the user. Scopes are passed verbatim, joined with a single space.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorization request fails.
    pub async fn request_device_authorization(
        &self,
        scopes: &[String],
    ) -> Result<DeviceAuthorization> {
        let scope = scopes.join(" ");

        let mut params = HashMap::new();
        params.insert("client_id", self.client.client_id.as_str());
        if !scope.is_empty() {
            params.insert("scope", &scope);
        }

        let response = self
            .client
            .http_client
            .post(self.client.provider.device_auth_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        response.json().await.map_err(Into::into)
    }

    /// Polls the token endpoint once after waiting for the given interval.
    ///
    /// Should be called repeatedly after displaying the user code until the
    /// user completes authorization or the device code expires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthDenied`] if the user denies authorization, and
    /// [`Error::OAuth`] for `authorization_pending`, `slow_down`, and
    /// `expired_token`, which the caller is expected to handle.
    pub async fn poll_for_token(&self, device_code: &str, interval: Duration) -> Result<Token> {
        tokio::time::sleep(interval).await;

        let mut params = HashMap::new();
        params.insert("grant_type", "urn:ietf:params:oauth:grant-type:device_code");
        params.insert("device_code", device_code);
        params.insert("client_id", &self.client.client_id);

        let response = self
            .client
            .http_client
            .post(self.client.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;

            return match error.error.as_str() {
                "access_denied" => Err(Error::AuthDenied),
                _ => Err(error.into_error()),
            };
        }

        parse_token_response(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[test]
    fn test_device_flow_creation() {
        let provider = Provider::microsoft("common").unwrap();
        let client = OAuthClient::new("test_client", provider);
        let flow = DeviceFlow::new(client);
        assert_eq!(flow.client().client_id, "test_client");
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(default_interval(), 5);
    }

    #[test]
    fn test_device_auth_deserialization() {
        let json = r#"{
            "device_code": "dev123",
            "user_code": "USER-CODE",
            "verification_uri": "https://example.com/device",
            "expires_in": 1800,
            "interval": 5
        }"#;

        let auth: DeviceAuthorization = serde_json::from_str(json).unwrap();
        assert_eq!(auth.device_code, "dev123");
        assert_eq!(auth.user_code, "USER-CODE");
        assert_eq!(auth.interval, 5);
        assert!(auth.verification_uri_complete.is_none());
    }

    #[test]
    fn test_interval_defaults_when_missing() {
        let json = r#"{
            "device_code": "dev123",
            "user_code": "USER-CODE",
            "verification_uri": "https://example.com/device",
            "expires_in": 900
        }"#;

        let auth: DeviceAuthorization = serde_json::from_str(json).unwrap();
        assert_eq!(auth.interval, 5);
    }
}
