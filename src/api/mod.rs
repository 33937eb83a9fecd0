//
//  scm-transport
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! The transport contract every provider adapter is built on.
//!
//! ## Architecture
//!
//! - [`client`]: the request executor ([`ScmClient`])
//! - [`common`]: response envelope, error taxonomy, rate-limit state
//! - [`graphql`]: GraphQL pass-through over the same exchange
//! - [`gitlab`]: GitLab construction helpers and namespace lookup
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`]. The three outcomes callers usually need to
//! tell apart are distinct variants:
//!
//! - `Network`: the exchange itself failed
//! - `Api`: the server reported a business error (status 300 or above)
//! - `Decode`: the server answered successfully with an unexpected body

pub mod client;

pub mod common;

pub mod gitlab;

pub mod graphql;

pub use client::{Driver, ScmClient};

pub use common::{ApiError, DecodeMode, Rate, RateState, Response};
