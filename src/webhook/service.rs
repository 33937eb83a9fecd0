//
//  scm-transport
//  webhook/service.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Inbound webhook parsing.
//!
//! Each provider adapter that receives deliveries implements
//! [`WebhookService`]: it turns the raw headers and body into a [`Webhook`]
//! and checks the delivery against the secret the caller supplies for that
//! webhook.
//!
//! The secret is looked up after parsing, so one service can serve many
//! repositories that each have their own secret.

use reqwest::header::HeaderMap;

use super::{Webhook, WebhookError};

/// Returns the secret a parsed webhook must be validated against.
///
/// An empty secret disables validation for that delivery.
pub type SecretFn<'a> =
    &'a dyn Fn(&Webhook) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

/// Parses and authenticates inbound webhook deliveries.
pub trait WebhookService {
    /// Parses one delivery.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::SignatureInvalid`] if the delivery does not match the secret
    /// - [`WebhookError::Secret`] if `secret` fails
    /// - any decode error of the payload itself
    fn parse(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        secret: SecretFn<'_>,
    ) -> Result<Webhook, WebhookError>;
}

/// Checks a shared-token header against `expected`.
///
/// An empty `expected` accepts any delivery. Otherwise a missing or different
/// token is [`WebhookError::SignatureInvalid`].
pub fn verify_token(expected: &str, presented: Option<&str>) -> Result<(), WebhookError> {
    if expected.is_empty() {
        return Ok(());
    }
    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(WebhookError::SignatureInvalid),
    }
}
