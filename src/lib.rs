//
//  scm-transport
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # scm-transport
//!
//! The data-transport and event-normalization layer of a multi-provider
//! source-control client.
//!
//! ## Overview
//!
//! - Every resource call funnels through one request executor that decodes
//!   errors, records rate-limit headers and decodes the response body.
//! - Webhook deliveries are normalized into a closed set of provider-agnostic
//!   events with a discriminator-tagged JSON codec.
//!
//! ## Module Structure
//!
//! - [`api`]: request executor, response envelope, errors, rate-limit state
//! - [`webhook`]: webhook event model and codec
//! - [`scm`]: value types embedded in webhook events
//! - [`auth`]: request credentials
//! - [`config`]: client configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use scm_transport::api::gitlab;
//! use scm_transport::auth::Credential;
//!
//! # async fn example() -> Result<(), scm_transport::api::ApiError> {
//! let client = gitlab::new("https://gitlab.example.com")?
//!     .with_auth(Credential::private_token("glpat-xxxxxxxx"));
//!
//! let (response, namespace) = client.find_namespace_by_name("acme").await?;
//! println!("{} ({} requests left)", namespace.full_path, response.rate.remaining);
//! # Ok(())
//! # }
//! ```

pub mod api;

pub mod auth;

pub mod config;

pub mod scm;

pub mod webhook;

pub use api::{ApiError, ScmClient};
pub use config::ClientConfig;
pub use webhook::{Webhook, WebhookError};

/// Crate version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent by clients that were not given one.
pub const USER_AGENT: &str = concat!("scm-transport/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the log filter, e.g. `SCM_DEBUG=debug`.
pub const LOG_ENV: &str = "SCM_DEBUG";

/// Installs a `tracing` subscriber filtered by [`LOG_ENV`] (default `warn`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging_is_idempotent() {
        super::init_logging();
        super::init_logging();
        tracing::debug!("logging initialized twice");
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(super::USER_AGENT.ends_with(super::VERSION));
    }
}
