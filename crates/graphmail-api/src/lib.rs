//! # graphmail-api
//!
//! Authenticated Microsoft Graph mail API session built on top of
//! [`graphmail_oauth`]'s device-code credential.
//!
//! [`GraphClient`] is the entry point: construct it, call
//! [`initialize`](GraphClient::initialize) with credential configuration and
//! a challenge callback, then issue typed operations. Every request fetches
//! the current bearer token from the credential at call time, so token
//! refreshes mid-session are transparent to callers.
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphmail_api::GraphClient;
//! use graphmail_oauth::{AuthConfig, ChallengeHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig {
//!         client_id: "your-client-id".into(),
//!         tenant_id: "common".into(),
//!         scopes: "User.Read,Mail.Read".into(),
//!     };
//!     let on_challenge: ChallengeHandler = Arc::new(|challenge| {
//!         println!("Visit {} and enter {}", challenge.verification_uri, challenge.user_code);
//!     });
//!
//!     let mut client = GraphClient::new();
//!     client.initialize(&config, on_challenge)?;
//!
//!     let user = client.current_user().await?;
//!     println!("Hello, {}!", user.display_name.as_deref().unwrap_or("there"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod model;
pub mod session;

pub use client::GraphClient;
pub use error::{Error, Result};
pub use model::{EmailAddress, Message, Recipient, User};
pub use session::{GRAPH_BASE_URL, GraphSession};
