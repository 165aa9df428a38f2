//! `OAuth2` provider endpoint configurations.

use crate::error::Result;
use url::Url;

/// `OAuth2` provider configuration for the device-authorization grant.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Microsoft").
    pub name: String,
    /// Device authorization endpoint URL.
    pub device_auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        device_auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            device_auth_url: Url::parse(device_auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
        })
    }

    /// Microsoft identity platform configuration for the given tenant.
    ///
    /// The tenant is commonly `common`, `organizations`, `consumers`, or a
    /// directory GUID.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn microsoft(tenant: &str) -> Result<Self> {
        Self::new(
            "Microsoft",
            format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/devicecode"),
            format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token"),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_microsoft_provider() {
        let provider = Provider::microsoft("common").unwrap();
        assert_eq!(provider.name, "Microsoft");
        assert_eq!(
            provider.device_auth_url.as_str(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/devicecode"
        );
        assert_eq!(
            provider.token_url.as_str(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_microsoft_provider_with_tenant_guid() {
        let provider = Provider::microsoft("f8cdef31-a31e-4b4a-93e4-5f571e91255a").unwrap();
        assert!(
            provider
                .token_url
                .path()
                .starts_with("/f8cdef31-a31e-4b4a-93e4-5f571e91255a/")
        );
    }

    #[test]
    fn test_custom_provider() {
        let provider = Provider::new(
            "Custom",
            "https://auth.example.com/devicecode",
            "https://auth.example.com/token",
        )
        .unwrap();
        assert_eq!(provider.name, "Custom");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(Provider::new("Broken", "not a url", "https://auth.example.com/token").is_err());
    }
}
