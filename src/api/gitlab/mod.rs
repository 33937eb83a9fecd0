//
//  scm-transport
//  api/gitlab/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GitLab adapter.
//!
//! Construction helpers for GitLab clients and the namespace lookup, the one
//! endpoint whose success body has to be read through
//! [`DecodeMode::UnwrapArray`].

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{Driver, ScmClient};
use super::common::{ApiError, DecodeMode, Response};

/// Address of the hosted GitLab service.
pub const DEFAULT_SERVER: &str = "https://gitlab.com";

/// Creates a GitLab client rooted at `uri`.
pub fn new(uri: &str) -> Result<ScmClient, ApiError> {
    ScmClient::new(Driver::Gitlab, uri)
}

/// Creates a GitLab client for gitlab.com.
pub fn default_client() -> Result<ScmClient, ApiError> {
    new(DEFAULT_SERVER)
}

/// A user or group namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub id: i64,
    pub name: String,
    pub path: String,
    /// `user` or `group`
    pub kind: String,
    pub full_path: String,
    pub parent_id: Option<i64>,
    pub avatar_url: Option<String>,
    pub web_url: String,
}

impl ScmClient {
    /// Looks up a namespace by name.
    ///
    /// The search endpoint answers with an array; exactly one match is
    /// expected and anything else is reported as [`ApiError::Decode`].
    pub async fn find_namespace_by_name(
        &self,
        name: &str,
    ) -> Result<(Response, Namespace), ApiError> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("search", name)
            .finish();
        let path = format!("api/v4/namespaces?{query}");

        self.do_request::<(), _>(Method::GET, &path, None, DecodeMode::UnwrapArray)
            .await
    }
}
