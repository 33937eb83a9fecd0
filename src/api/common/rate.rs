//
//  scm-transport
//  api/common/rate.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Rate-Limit Bookkeeping
//!
//! Hosting services report quota in three response headers. Every exchange
//! parses them into a [`Rate`] and overwrites the client's [`RateState`], so
//! callers can inspect quota without spending a request on it.
//!
//! | Header | Field |
//! |--------|-------|
//! | `RateLimit-Limit` | [`Rate::limit`] |
//! | `RateLimit-Remaining` | [`Rate::remaining`] |
//! | `RateLimit-Reset` | [`Rate::reset`] |
//!
//! The snapshot is advisory. Concurrent exchanges race on it and the last
//! writer wins; a single write never mixes fields from two responses.

use std::sync::{Arc, Mutex};

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header carrying the request quota for the current window.
pub const HEADER_RATE_LIMIT: &str = "RateLimit-Limit";

/// Header carrying the requests left in the current window.
pub const HEADER_RATE_REMAINING: &str = "RateLimit-Remaining";

/// Header carrying the window reset time as Unix epoch seconds.
pub const HEADER_RATE_RESET: &str = "RateLimit-Reset";

/// One rate-limit snapshot as reported by a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rate {
    pub limit: i32,
    pub remaining: i32,
    /// Unix epoch seconds at which the window resets.
    pub reset: i64,
}

impl Rate {
    /// Parses the rate-limit triple from response headers.
    ///
    /// Missing or unparseable values become zero; a bad header never fails
    /// the exchange.
    ///
    /// ```rust
    /// use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    /// use scm_transport::api::common::Rate;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert(HeaderName::from_static("ratelimit-limit"), HeaderValue::from_static("600"));
    /// headers.insert(HeaderName::from_static("ratelimit-remaining"), HeaderValue::from_static("n/a"));
    ///
    /// let rate = Rate::from_headers(&headers);
    /// assert_eq!(rate, Rate { limit: 600, remaining: 0, reset: 0 });
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_number(headers, HEADER_RATE_LIMIT),
            remaining: header_number(headers, HEADER_RATE_REMAINING),
            reset: header_number(headers, HEADER_RATE_RESET),
        }
    }
}

fn header_number<T>(headers: &HeaderMap, name: &str) -> T
where
    T: std::str::FromStr + Default,
{
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}

/// Shared cell holding the most recently observed [`Rate`].
///
/// Cloning a `RateState` yields a handle to the same cell. Each
/// [`ScmClient`](crate::api::ScmClient) owns its own state unless one is
/// injected with [`ScmClient::with_rate_state`](crate::api::ScmClient::with_rate_state).
#[derive(Debug, Clone, Default)]
pub struct RateState {
    inner: Arc<Mutex<Rate>>,
}

impl RateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the snapshot.
    pub fn observe(&self, rate: Rate) {
        let mut current = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = rate;
    }

    /// Returns the last observed snapshot, or zeroes if nothing was observed.
    pub fn current(&self) -> Rate {
        *self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
