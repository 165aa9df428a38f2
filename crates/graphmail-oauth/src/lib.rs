//! # graphmail-oauth
//!
//! `OAuth2` device-code authentication (RFC 8628) for input-constrained
//! clients, configured for the Microsoft identity platform.
//!
//! The crate is built around [`DeviceCodeCredential`]: a lazily
//! authenticating token source. Construction validates configuration and
//! performs no network I/O; the first token request runs a device-code
//! round (challenge shown to the user, provider polled until completion),
//! and later requests are served from the cache until the token nears
//! expiry, at which point it is refreshed transparently.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphmail_oauth::{AuthConfig, ChallengeHandler, DeviceCodeCredential, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig {
//!         client_id: "your-client-id".into(),
//!         tenant_id: "common".into(),
//!         scopes: "User.Read,Mail.Read".into(),
//!     };
//!
//!     let on_challenge: ChallengeHandler = Arc::new(|challenge| {
//!         println!("Visit: {}", challenge.verification_uri);
//!         println!("Enter code: {}", challenge.user_code);
//!     });
//!
//!     let provider = Provider::microsoft(&config.tenant_id)?;
//!     let credential = DeviceCodeCredential::new(&config, provider, on_challenge)?;
//!
//!     // First call blocks until the user completes verification out-of-band.
//!     let token = credential.access_token().await?;
//!     // Later calls reuse the cached token and refresh it when it expires.
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod credential;
mod error;
pub mod flow;
pub mod provider;
pub mod token;

pub use credential::{AuthConfig, ChallengeHandler, DeviceCodeChallenge, DeviceCodeCredential};
pub use error::{Error, Result};
pub use flow::{DeviceFlow, OAuthClient};
pub use provider::Provider;
pub use token::Token;
