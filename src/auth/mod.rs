//
//  scm-transport
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Authentication
//!
//! Credentials the client attaches to every outgoing request. Obtaining or
//! refreshing credentials is the caller's business; this module only knows
//! how to put them on the wire.
//!
//! ## Supported Schemes
//!
//! - **Private token**: GitLab personal/project access token sent in the
//!   `Private-Token` header.
//! - **Bearer**: OAuth 2.0 access token in `Authorization: Bearer`.
//! - **Basic**: username and password in `Authorization: Basic`.

use reqwest::RequestBuilder;

/// Header GitLab reads personal and project access tokens from.
pub const HEADER_PRIVATE_TOKEN: &str = "Private-Token";

/// Authentication credentials attached to each request.
///
/// # Example
///
/// ```rust
/// use scm_transport::auth::Credential;
///
/// let token = Credential::PrivateToken { token: "glpat-xxxxxxxx".to_string() };
/// let oauth = Credential::bearer("ya29.a0Af");
/// assert!(!token.is_empty());
/// assert!(!oauth.is_empty());
/// ```
#[derive(Clone)]
pub enum Credential {
    /// Personal, project or group access token.
    PrivateToken {
        token: String,
    },
    /// OAuth 2.0 access token.
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

impl Credential {
    pub fn private_token(token: impl Into<String>) -> Self {
        Self::PrivateToken {
            token: token.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Adds the authentication header for this credential to `request`.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::PrivateToken { token } => request.header(HEADER_PRIVATE_TOKEN, token),
            Self::Bearer { token } => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    /// Returns `true` when the credential carries no secret at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::PrivateToken { token } | Self::Bearer { token } => token.is_empty(),
            Self::Basic { username, password } => username.is_empty() && password.is_empty(),
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateToken { .. } => f.write_str("PrivateToken(***)"),
            Self::Bearer { .. } => f.write_str("Bearer(***)"),
            Self::Basic { username, .. } => write!(f, "Basic({username}, ***)"),
        }
    }
}
