//! Initialization-gated facade over the Graph session.

use crate::error::{Error, Result};
use crate::model::{Message, User};
use crate::session::GraphSession;
use graphmail_oauth::{AuthConfig, ChallengeHandler, DeviceCodeCredential, Provider};
use std::sync::Arc;

/// Entry point for authenticated Graph mail operations.
///
/// A client starts uninitialized; every operation fails with
/// [`Error::NotInitialized`] (and performs no I/O) until
/// [`initialize`](Self::initialize) succeeds. Initialization validates
/// configuration and builds the session but performs no network I/O
/// itself; the device-code exchange is deferred to the first operation
/// that needs a token.
#[derive(Debug, Default)]
pub struct GraphClient {
    session: Option<GraphSession>,
}

impl GraphClient {
    /// Creates an uninitialized client.
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Initializes the client from credential configuration and a challenge
    /// callback, binding it to the Microsoft identity platform tenant named
    /// in the configuration.
    ///
    /// On failure the client stays uninitialized.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any field is missing or the scope
    /// list is empty.
    pub fn initialize(&mut self, config: &AuthConfig, on_challenge: ChallengeHandler) -> Result<()> {
        let provider = Provider::microsoft(&config.tenant_id)?;
        let credential = DeviceCodeCredential::new(config, provider, on_challenge)?;
        self.session = Some(GraphSession::new(Arc::new(credential)));
        Ok(())
    }

    /// Initializes the client with a pre-built session. Used by tests to
    /// point the client at mock endpoints.
    pub fn initialize_with_session(&mut self, session: GraphSession) {
        self.session = Some(session);
    }

    /// Returns whether `initialize` has succeeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&GraphSession> {
        self.session.as_ref().ok_or(Error::NotInitialized)
    }

    /// Returns the current bearer token string, authenticating on first use.
    /// Treat the value as a secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before `initialize`; propagates
    /// authentication failures.
    pub async fn token(&self) -> Result<String> {
        self.session()?.access_token().await
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before `initialize`,
    /// [`Error::Api`] on a non-2xx response.
    pub async fn current_user(&self) -> Result<User> {
        self.session()?.current_user().await
    }

    /// Lists the first page of inbox messages, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before `initialize`,
    /// [`Error::Api`] on a non-2xx response.
    pub async fn inbox_page(&self) -> Result<Vec<Message>> {
        self.session()?.inbox_page().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn noop_challenge() -> ChallengeHandler {
        Arc::new(|_| {})
    }

    #[test]
    fn test_operations_before_initialize_fail_fast() {
        let client = GraphClient::new();
        assert!(!client.is_initialized());

        let err = tokio_test::block_on(client.current_user()).unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        let err = tokio_test::block_on(client.inbox_page()).unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        let err = tokio_test::block_on(client.token()).unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[test]
    fn test_failed_initialize_leaves_client_uninitialized() {
        let config = AuthConfig {
            client_id: String::new(),
            tenant_id: "common".into(),
            scopes: "User.Read".into(),
        };

        let mut client = GraphClient::new();
        let err = client.initialize(&config, noop_challenge()).unwrap_err();
        assert!(matches!(
            err,
            Error::OAuth(graphmail_oauth::Error::Config(_))
        ));
        assert!(!client.is_initialized());
    }

    #[test]
    fn test_initialize_accepts_valid_config() {
        let config = AuthConfig {
            client_id: "abc".into(),
            tenant_id: "common".into(),
            scopes: "User.Read,Mail.Read".into(),
        };

        let mut client = GraphClient::new();
        client.initialize(&config, noop_challenge()).unwrap();
        assert!(client.is_initialized());
    }
}
