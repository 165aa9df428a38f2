//! Data shapes returned by the Graph mail API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The signed-in user's profile.
///
/// All fields are provider-dependent and may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name.
    pub display_name: Option<String>,
    /// Primary mail address.
    pub mail: Option<String>,
    /// User principal name.
    pub user_principal_name: Option<String>,
}

/// A message summary from the inbox listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Sender, when known.
    pub from: Option<Recipient>,
    /// Moment the message was received.
    pub received_date_time: DateTime<Utc>,
    /// Whether the message has been read.
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    /// Returns the sender's mail address, when known.
    #[must_use]
    pub fn from_address(&self) -> Option<&str> {
        self.from
            .as_ref()
            .and_then(|r| r.email_address.address.as_deref())
    }
}

/// A message participant (Graph wraps addresses in a recipient object).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// The participant's address details.
    pub email_address: EmailAddress,
}

/// A name/address pair.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    /// Display name.
    pub name: Option<String>,
    /// Mail address.
    pub address: Option<String>,
}

/// Graph collection envelope for list responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    pub value: Vec<T>,
}
