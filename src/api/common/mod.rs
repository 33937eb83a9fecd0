//
//  scm-transport
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the provider-neutral pieces every resource call goes
//! through: the response envelope, the error taxonomy and the decoder for
//! error bodies.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all exchanges
//! - [`Response`] - Status, request id and rate snapshot of one exchange
//! - [`ErrorBody`] - Decoded `{"message": ...}` error payload
//! - [`DecodeMode`] - How a success body is read into the output type
//! - [`Rate`] and [`RateState`] - Rate-limit snapshot and its shared cell
//!
//! # Example
//!
//! ```rust
//! use scm_transport::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::Network(e)) => format!("exchange failed: {e}"),
//!         Err(ApiError::Api { response, error }) => {
//!             format!("server said {} ({})", error.message, response.status)
//!         }
//!         Err(ApiError::Decode { source, .. }) => format!("unexpected body: {source}"),
//!         Err(e) => e.to_string(),
//!     }
//! }
//! ```

use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

mod rate;

pub use rate::*;

/// Header carrying the server-assigned request identifier.
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

/// Unified error type for all API exchanges.
///
/// # Variants
///
/// | Variant | Meaning | Envelope |
/// |---------|---------|----------|
/// | `Network` | Connection failure or timeout before a response arrived | No |
/// | `Body` | Headers arrived, reading the body failed | Yes |
/// | `Api` | Server answered with status 300 or above | Yes |
/// | `Decode` | Success status, body does not match the output type | Yes |
/// | `Encode` | Request input could not be serialized | No |
/// | `InvalidUrl` | Base address or path could not be joined | No |
/// | `GraphQl` | GraphQL endpoint reported errors | No |
///
/// # Notes
///
/// - `Api` displays as the server's message alone
/// - The envelope is boxed so the error stays small on the happy path
#[derive(Error, Debug)]
pub enum ApiError {
    /// A transport-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response headers arrived but the body could not be read.
    #[error("Failed to read response body: {source}")]
    Body {
        response: Box<Response>,
        #[source]
        source: reqwest::Error,
    },

    /// The server reported a business error.
    #[error("{}", .error.message)]
    Api {
        response: Box<Response>,
        error: ErrorBody,
    },

    /// The success body did not match the expected shape.
    #[error("Failed to decode response body: {source}")]
    Decode {
        response: Box<Response>,
        #[source]
        source: serde_json::Error,
    },

    /// The request input could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The GraphQL endpoint answered with an `errors` array.
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),
}

impl ApiError {
    /// Returns the response envelope, when the exchange got that far.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Api { response, .. }
            | Self::Body { response, .. }
            | Self::Decode { response, .. } => Some(&**response),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }
}

/// Normalized result of one HTTP exchange.
///
/// The body is not part of the envelope: the executor reads it exactly once
/// and either decodes it or hands it to [`ErrorBody::decode`].
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    /// Request identifier assigned by the server, empty if absent.
    pub id: String,
    pub rate: Rate,
    pub headers: HeaderMap,
}

impl Response {
    /// Builds an envelope from a status and the response headers.
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        let id = headers
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let rate = Rate::from_headers(&headers);

        Self {
            status,
            id,
            rate,
            headers,
        }
    }

    /// Returns `true` for statuses below 300. A 300 itself is an error.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Decoded error payload of a non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "message_text")]
    pub message: String,
}

impl ErrorBody {
    /// Decodes an error body.
    ///
    /// Never fails: a body that is not JSON, or has no `message`, yields an
    /// empty message. The non-success status stays the primary signal.
    ///
    /// ```rust
    /// use scm_transport::api::common::ErrorBody;
    ///
    /// let body = ErrorBody::decode(br#"{"message":"404 Project Not Found"}"#);
    /// assert_eq!(body.message, "404 Project Not Found");
    /// assert_eq!(ErrorBody::decode(b"<html>Bad Gateway</html>").message, "");
    /// ```
    pub fn decode(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

// Validation failures arrive as `{"message": {"name": ["has already been taken"]}}`.
fn message_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(message) => message,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// How a success body is decoded into the caller's output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Decode the body as the output type directly.
    #[default]
    Standard,
    /// The body is a one-element JSON array; decode its element.
    UnwrapArray,
}

impl DecodeMode {
    /// Decodes `body` into `T` according to this mode.
    pub fn decode<T>(self, body: &[u8]) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        match self {
            Self::Standard => serde_json::from_slice(body),
            Self::UnwrapArray => {
                let mut items: Vec<serde_json::Value> = serde_json::from_slice(body)?;
                if items.len() != 1 {
                    return Err(serde::de::Error::invalid_length(
                        items.len(),
                        &"an array with exactly one element",
                    ));
                }
                serde_json::from_value(items.remove(0))
            }
        }
    }
}
