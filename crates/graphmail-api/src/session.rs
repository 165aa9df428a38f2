//! Authenticated Graph API session.

use crate::error::{Error, Result};
use crate::model::{Collection, Message, User};
use graphmail_oauth::DeviceCodeCredential;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Base URL of the Microsoft Graph v1.0 API.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// An authenticated Graph API session: an HTTP client bound to a
/// device-code credential.
///
/// The bearer token is fetched from the credential on every request rather
/// than captured once, so a mid-session refresh is transparent.
#[derive(Debug, Clone)]
pub struct GraphSession {
    credential: Arc<DeviceCodeCredential>,
    http: reqwest::Client,
    base_url: String,
}

impl GraphSession {
    /// Creates a session against the public Graph endpoint.
    #[must_use]
    pub fn new(credential: Arc<DeviceCodeCredential>) -> Self {
        Self::with_base_url(credential, GRAPH_BASE_URL)
    }

    /// Creates a session against a custom base URL (used by tests).
    #[must_use]
    pub fn with_base_url(credential: Arc<DeviceCodeCredential>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            credential,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Returns the current bearer token string, authenticating or
    /// refreshing as needed. Treat the value as a secret.
    ///
    /// # Errors
    ///
    /// Propagates authentication failures from the credential.
    pub async fn access_token(&self) -> Result<String> {
        Ok(self.credential.access_token().await?.access_token)
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] on a non-2xx response and propagates
    /// authentication failures.
    pub async fn current_user(&self) -> Result<User> {
        self.get_json(
            "/me",
            &[("$select", "displayName,mail,userPrincipalName")],
        )
        .await
    }

    /// Lists the first page of inbox messages, most recent first.
    ///
    /// The ordering is applied server-side and returned unmodified; at most
    /// 100 messages are requested and no further pages are followed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] on a non-2xx response and propagates
    /// authentication failures.
    pub async fn inbox_page(&self) -> Result<Vec<Message>> {
        let page: Collection<Message> = self
            .get_json(
                "/me/mailFolders/inbox/messages",
                &[
                    ("$select", "from,isRead,receivedDateTime,subject"),
                    ("$top", "100"),
                    ("$orderby", "receivedDateTime desc"),
                ],
            )
            .await?;
        Ok(page.value)
    }

    /// Performs an authenticated GET and deserializes the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let token = self.credential.access_token().await?;

        debug!(path, "Graph API request");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        response.json().await.map_err(Into::into)
    }
}
