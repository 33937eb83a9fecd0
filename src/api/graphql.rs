//
//  scm-transport
//  api/graphql.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GraphQL pass-through.
//!
//! Queries are POSTed to `<base>/api/graphql` over the caller's configured
//! transport and go through the same exchange as REST calls, so the rate
//! snapshot and error decoding behave identically.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::client::ScmClient;
use super::common::ApiError;

/// Path of the GraphQL endpoint, relative to the base address.
pub const GRAPHQL_PATH: &str = "api/graphql";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl ScmClient {
    /// Runs a GraphQL query and decodes its `data` member.
    ///
    /// Without a configured transport this logs a warning and returns
    /// `Ok(None)` instead of failing.
    ///
    /// # Errors
    ///
    /// Same as [`ScmClient::do_request`], plus [`ApiError::GraphQl`] when the
    /// response carries an `errors` array.
    pub async fn query<T>(
        &self,
        query: &str,
        variables: &serde_json::Value,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let Some(transport) = self.http_client() else {
            warn!(driver = %self.driver(), "no http transport configured for GraphQL");
            return Ok(None);
        };

        let request = GraphQlRequest { query, variables };
        let (response, body) = self
            .exchange(transport, Method::POST, self.graphql_url().clone(), Some(&request))
            .await?;

        let decoded: GraphQlResponse<T> = match serde_json::from_slice(&body) {
            Ok(decoded) => decoded,
            Err(source) => {
                return Err(ApiError::Decode {
                    response: Box::new(response),
                    source,
                })
            }
        };

        if !decoded.errors.is_empty() {
            return Err(ApiError::GraphQl(
                decoded.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        Ok(decoded.data)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::api::Driver;

    #[derive(Debug, Deserialize)]
    struct CurrentUser {
        #[serde(rename = "currentUser")]
        current_user: Login,
    }

    #[derive(Debug, Deserialize)]
    struct Login {
        username: String,
    }

    #[tokio::test]
    async fn test_query_without_transport_is_noop() {
        let client = ScmClient::new(Driver::Gitlab, "http://127.0.0.1:9").unwrap();
        let result: Option<CurrentUser> = client
            .query("{ currentUser { username } }", &json!({}))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_query_posts_to_graphql_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"first": 1}})))
            .with_status(200)
            .with_header("RateLimit-Remaining", "77")
            .with_body(r#"{"data":{"currentUser":{"username":"root"}}}"#)
            .create_async()
            .await;

        let client = ScmClient::new(Driver::Gitlab, &server.url())
            .unwrap()
            .with_http_client(reqwest::Client::new());
        let result: Option<CurrentUser> = client
            .query("{ currentUser { username } }", &json!({"first": 1}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.unwrap().current_user.username, "root");
        assert_eq!(client.rate().remaining, 77);
    }

    #[tokio::test]
    async fn test_query_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/graphql")
            .with_status(200)
            .with_body(r#"{"data":null,"errors":[{"message":"Field 'nope' doesn't exist"}]}"#)
            .create_async()
            .await;

        let client = ScmClient::new(Driver::Gitlab, &server.url())
            .unwrap()
            .with_http_client(reqwest::Client::new());
        let err = client
            .query::<serde_json::Value>("{ nope }", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::GraphQl(ref messages) if messages.len() == 1));
    }
}
