//! Device-code credential: lazy authentication and token caching.
//!
//! [`DeviceCodeCredential`] is the single owner of the current token. It
//! runs the device-code round on first use, serves the cached token while
//! it is valid, and refreshes it on demand. All provider interaction is
//! driven by [`DeviceCodeCredential::access_token`]; there is no background
//! refresh.

use crate::error::{Error, Result};
use crate::flow::{DeviceFlow, OAuthClient};
use crate::provider::Provider;
use crate::token::Token;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default safety margin, in seconds, before expiry at which a token is
/// refreshed.
const DEFAULT_REFRESH_MARGIN_SECS: i64 = 60;

/// Extra delay added to the polling interval on `slow_down`, per RFC 8628.
const SLOW_DOWN_BACKOFF: Duration = Duration::from_secs(5);

/// Credential-building configuration.
///
/// All three values are required; `scopes` is a raw comma-separated list
/// that is split verbatim, with no whitespace trimming.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Application (client) ID from the app registration.
    pub client_id: String,
    /// Directory (tenant) ID, or `common`/`organizations`/`consumers`.
    pub tenant_id: String,
    /// Comma-separated scope list, e.g. `User.Read,Mail.Read`.
    pub scopes: String,
}

/// The verification URL and user code shown to the human during
/// device-code authentication.
///
/// Produced once per authentication round, handed to the registered
/// challenge callback exactly once, then discarded.
#[derive(Debug, Clone)]
pub struct DeviceCodeChallenge {
    /// Verification URI where the user should sign in.
    pub verification_uri: String,
    /// Code the user must enter at the verification URI.
    pub user_code: String,
    /// Moment at which the challenge expires.
    pub expires_at: DateTime<Utc>,
}

/// Callback invoked exactly once per authentication round with the
/// challenge to display. Runs on whatever task drives the token request;
/// implementers must not assume a particular thread.
pub type ChallengeHandler = Arc<dyn Fn(&DeviceCodeChallenge) + Send + Sync>;

/// A lazily authenticating device-code credential.
///
/// Construction validates configuration and performs no network I/O. The
/// exchange is deferred to the first [`access_token`](Self::access_token)
/// call, which may suspend for human-scale time while the user completes
/// verification out-of-band.
pub struct DeviceCodeCredential {
    flow: DeviceFlow,
    scopes: Vec<String>,
    on_challenge: ChallengeHandler,
    refresh_margin: chrono::Duration,
    // Held across the whole exchange so concurrent callers trigger a
    // single provider round and all receive the same token.
    cached: Mutex<Option<Token>>,
}

impl DeviceCodeCredential {
    /// Creates a credential from configuration and a challenge callback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any configuration field is missing or
    /// the scope list is empty.
    pub fn new(
        config: &AuthConfig,
        provider: Provider,
        on_challenge: ChallengeHandler,
    ) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(Error::Config("client id is missing".into()));
        }
        if config.tenant_id.is_empty() {
            return Err(Error::Config("tenant id is missing".into()));
        }
        let scopes = parse_scopes(&config.scopes)?;

        let client = OAuthClient::new(&config.client_id, provider);
        Ok(Self {
            flow: DeviceFlow::new(client),
            scopes,
            on_challenge,
            refresh_margin: chrono::Duration::seconds(DEFAULT_REFRESH_MARGIN_SECS),
            cached: Mutex::new(None),
        })
    }

    /// Sets the safety margin before expiry at which a refresh is triggered.
    #[must_use]
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = chrono::Duration::from_std(margin)
            .unwrap_or(chrono::Duration::MAX);
        self
    }

    /// Returns a valid access token, authenticating or refreshing if needed.
    ///
    /// The cached token is served as long as it stays outside the refresh
    /// margin. On first use this call blocks on the device-code round and
    /// the user completing verification; on expiry it blocks on the refresh
    /// exchange. Concurrent callers share a single exchange.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthTimeout`] if the challenge expires before the
    /// user completes it, [`Error::AuthDenied`] on explicit denial, and
    /// [`Error::OAuth`]/[`Error::Http`] for other provider failures.
    pub async fn access_token(&self) -> Result<Token> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.expires_within(self.refresh_margin) {
                return Ok(token.clone());
            }
            debug!("cached access token is expiring, renewing");
        }

        let fresh = match cached.take() {
            Some(previous) => self.renew(previous).await?,
            None => self.device_round().await?,
        };

        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Renews an expired token, preferring the refresh grant when a refresh
    /// token is available and falling back to a new device round when the
    /// provider rejects it.
    async fn renew(&self, previous: Token) -> Result<Token> {
        if let Some(refresh_token) = previous.refresh_token.clone() {
            match self.flow.client().refresh_token(&refresh_token).await {
                Ok(mut token) => {
                    // Providers may omit the refresh token on renewal.
                    if token.refresh_token.is_none() {
                        token.refresh_token = Some(refresh_token);
                    }
                    debug!("access token refreshed");
                    return Ok(token);
                }
                Err(Error::OAuth { error, .. }) => {
                    debug!(%error, "refresh grant rejected, starting a new device round");
                }
                Err(e) => return Err(e),
            }
        }

        self.device_round().await
    }

    /// Runs one full device-code round: request a challenge, hand it to the
    /// callback, then poll until completion, denial, or challenge expiry.
    async fn device_round(&self) -> Result<Token> {
        let auth = self.flow.request_device_authorization(&self.scopes).await?;

        let challenge = DeviceCodeChallenge {
            verification_uri: auth.verification_uri.clone(),
            user_code: auth.user_code.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(i64::from(auth.expires_in)),
        };
        info!(
            provider = %self.flow.client().provider.name,
            "device authorization requested, awaiting user verification"
        );
        (self.on_challenge)(&challenge);

        let mut interval = Duration::from_secs(u64::from(auth.interval));
        loop {
            if Utc::now() >= challenge.expires_at {
                return Err(Error::AuthTimeout(u64::from(auth.expires_in)));
            }

            match self.flow.poll_for_token(&auth.device_code, interval).await {
                Ok(token) => {
                    info!("device authorization completed");
                    return Ok(token);
                }
                Err(Error::OAuth { ref error, .. }) if error == "authorization_pending" => {}
                Err(Error::OAuth { ref error, .. }) if error == "slow_down" => {
                    interval += SLOW_DOWN_BACKOFF;
                }
                Err(Error::OAuth { ref error, .. }) if error == "expired_token" => {
                    return Err(Error::AuthTimeout(u64::from(auth.expires_in)));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl fmt::Debug for DeviceCodeCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCodeCredential")
            .field("flow", &self.flow)
            .field("scopes", &self.scopes)
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}

/// Splits a raw comma-separated scope string, passing entries through
/// verbatim (no whitespace trimming).
fn parse_scopes(raw: &str) -> Result<Vec<String>> {
    if raw.is_empty() {
        return Err(Error::Config("scope list is empty".into()));
    }
    Ok(raw.split(',').map(String::from).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn noop_challenge() -> ChallengeHandler {
        Arc::new(|_| {})
    }

    fn provider() -> Provider {
        Provider::microsoft("common").unwrap()
    }

    fn config() -> AuthConfig {
        AuthConfig {
            client_id: "abc".into(),
            tenant_id: "common".into(),
            scopes: "User.Read,Mail.Read".into(),
        }
    }

    #[test]
    fn test_valid_config_is_accepted() {
        let credential = DeviceCodeCredential::new(&config(), provider(), noop_challenge());
        assert!(credential.is_ok());
    }

    #[test]
    fn test_missing_client_id_is_rejected() {
        let mut config = config();
        config.client_id = String::new();
        let err = DeviceCodeCredential::new(&config, provider(), noop_challenge()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_tenant_id_is_rejected() {
        let mut config = config();
        config.tenant_id = String::new();
        let err = DeviceCodeCredential::new(&config, provider(), noop_challenge()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_scopes_are_rejected() {
        let mut config = config();
        config.scopes = String::new();
        let err = DeviceCodeCredential::new(&config, provider(), noop_challenge()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_scopes_are_split_verbatim() {
        assert_eq!(
            parse_scopes("User.Read, Mail.Read").unwrap(),
            vec!["User.Read".to_string(), " Mail.Read".to_string()]
        );
        assert_eq!(parse_scopes("User.Read").unwrap(), vec!["User.Read"]);
    }

    #[test]
    fn test_debug_does_not_expose_cached_token() {
        let credential =
            DeviceCodeCredential::new(&config(), provider(), noop_challenge()).unwrap();
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("DeviceCodeCredential"));
        assert!(!rendered.contains("access_token"));
    }
}
