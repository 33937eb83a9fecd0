//
//  scm-transport
//  webhook/codec.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Discriminator-tagged JSON codec for [`Webhook`] values.
//!
//! Decoding happens in two passes over the same payload: the `type` key is
//! read first, then the whole object is parsed into the hook type registered
//! for that discriminator in [`PARSERS`]. The three ways this can fail are kept
//! apart so callers can tell "not JSON" from "JSON of an unknown kind" from
//! "known kind with the wrong shape".

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::{
    BranchHook, DeployHook, Hook, IssueCommentHook, IssueHook, PullRequestCommentHook,
    PullRequestHook, PushHook, ReviewCommentHook, TagHook, Webhook,
};

/// Errors produced while encoding or decoding webhooks.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The payload is not valid JSON.
    #[error("malformed webhook payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The `type` key is missing, not a string, or names no known hook.
    #[error("unrecognized webhook type: {}", .kind.as_deref().unwrap_or("<missing>"))]
    UnrecognizedType {
        /// Discriminator found in the payload, if any.
        kind: Option<String>,
    },

    /// The discriminator is known but the payload does not fit that hook.
    #[error("invalid {kind} payload: {source}")]
    Shape {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode webhook: {0}")]
    Encode(#[source] serde_json::Error),

    /// The delivery's signature or token does not match the secret.
    #[error("invalid webhook signature")]
    SignatureInvalid,

    /// The secret lookup for a delivery failed.
    #[error("failed to resolve webhook secret: {0}")]
    Secret(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A decoded webhook together with the discriminator it was tagged with.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookUnmarshaler {
    pub kind: &'static str,
    pub webhook: Webhook,
}

type Parser = fn(Value) -> Result<Webhook, serde_json::Error>;

/// Discriminator to parser table. Adding a hook type is one entry here.
static PARSERS: &[(&str, Parser)] = &[
    (PushHook::KIND, parse_as::<PushHook> as Parser),
    (BranchHook::KIND, parse_as::<BranchHook> as Parser),
    (TagHook::KIND, parse_as::<TagHook> as Parser),
    (DeployHook::KIND, parse_as::<DeployHook> as Parser),
    (IssueHook::KIND, parse_as::<IssueHook> as Parser),
    (IssueCommentHook::KIND, parse_as::<IssueCommentHook> as Parser),
    (PullRequestHook::KIND, parse_as::<PullRequestHook> as Parser),
    (PullRequestCommentHook::KIND, parse_as::<PullRequestCommentHook> as Parser),
    (ReviewCommentHook::KIND, parse_as::<ReviewCommentHook> as Parser),
];

fn parse_as<H: Hook>(value: Value) -> Result<Webhook, serde_json::Error> {
    H::deserialize(value).map(Into::into)
}

/// Encodes a webhook as tagged JSON, `type` first.
///
/// # Errors
///
/// Only fails if a [`DeployHook`]'s free-form `data` cannot be written as
/// JSON, which cannot happen for values built from parsed JSON.
pub fn encode(webhook: &Webhook) -> Result<Vec<u8>, WebhookError> {
    serde_json::to_vec(webhook).map_err(WebhookError::Encode)
}

/// Decodes a tagged JSON payload into the matching webhook variant.
///
/// # Errors
///
/// - [`WebhookError::Malformed`] if `payload` is not JSON
/// - [`WebhookError::UnrecognizedType`] if `type` is missing or unknown
/// - [`WebhookError::Shape`] if the payload does not fit the named hook
pub fn decode(payload: &[u8]) -> Result<WebhookUnmarshaler, WebhookError> {
    let value: Value = serde_json::from_slice(payload).map_err(WebhookError::Malformed)?;
    from_value(value)
}

/// Same as [`decode`] for a payload that is already parsed.
pub fn from_value(value: Value) -> Result<WebhookUnmarshaler, WebhookError> {
    let found = value.get("type").and_then(Value::as_str);

    let (kind, parse) = PARSERS
        .iter()
        .find(|(kind, _)| Some(*kind) == found)
        .copied()
        .ok_or_else(|| WebhookError::UnrecognizedType {
            kind: found.map(str::to_string),
        })?;

    let webhook = parse(value).map_err(|source| WebhookError::Shape { kind, source })?;
    tracing::debug!(kind, "decoded webhook");

    Ok(WebhookUnmarshaler { kind, webhook })
}

impl Serialize for WebhookUnmarshaler {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.webhook.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WebhookUnmarshaler {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        from_value(value).map_err(de::Error::custom)
    }
}
