//
//  scm-transport
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Executor
//!
//! This module provides the HTTP client every resource call funnels through.
//! One call performs one exchange and returns the normalized [`Response`]
//! envelope together with the decoded output.
//!
//! ## Exchange Steps
//!
//! 1. Serialize the optional input as JSON (`Content-Type: application/json`)
//! 2. Send the request; transport failures surface as [`ApiError::Network`]
//! 3. Read the request id and rate-limit headers, update the [`RateState`]
//! 4. Read the body; a failure here is [`ApiError::Body`] and keeps the envelope
//! 5. Status 300 or above: decode the error body into [`ApiError::Api`]
//! 6. Otherwise decode the body per [`DecodeMode`] ([`ApiError::Decode`] on mismatch)
//!
//! The response body is read exactly once and dropped on every path. No call
//! is retried here; retry policy belongs to the caller.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::common::{ApiError, DecodeMode, ErrorBody, Rate, RateState, Response};
use super::graphql::GRAPHQL_PATH;
use crate::auth::Credential;
use crate::config::ClientConfig;

/// The hosting provider a client is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Unknown,
    Gitlab,
    Github,
    Gitea,
    Bitbucket,
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Gitlab => "gitlab",
            Self::Github => "github",
            Self::Gitea => "gitea",
            Self::Bitbucket => "bitbucket",
        };
        f.write_str(name)
    }
}

/// The HTTP client shared by all resource calls.
///
/// Each client owns its base address, optional credentials and its own
/// [`RateState`], so independently configured clients in one process never
/// see each other's quota readings.
///
/// # Transport
///
/// A client built with [`ScmClient::new`] has no caller-supplied transport and
/// uses an internal default [`reqwest::Client`] for REST calls. GraphQL
/// queries need a configured transport (see [`ScmClient::with_http_client`]
/// and [`ScmClient::from_config`]).
#[derive(Debug, Clone)]
pub struct ScmClient {
    /// Caller-configured transport
    http: Option<Client>,
    /// Transport used for REST calls when none was configured
    fallback: Client,
    /// Base address, always ending in `/`
    base_url: Url,
    graphql_url: Url,
    driver: Driver,
    auth: Option<Credential>,
    rate: RateState,
}

impl ScmClient {
    /// Creates a client for `driver` rooted at `uri`.
    ///
    /// A trailing `/` is added to the base path when missing so relative
    /// paths join below it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `uri` does not parse.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scm_transport::api::{Driver, ScmClient};
    ///
    /// let client = ScmClient::new(Driver::Gitlab, "https://gitlab.example.com/gitlab")?;
    /// assert_eq!(client.base_url().as_str(), "https://gitlab.example.com/gitlab/");
    /// assert_eq!(
    ///     client.graphql_url().as_str(),
    ///     "https://gitlab.example.com/gitlab/api/graphql"
    /// );
    /// # Ok::<(), scm_transport::api::ApiError>(())
    /// ```
    pub fn new(driver: Driver, uri: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(uri)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let graphql_url = base_url.join(GRAPHQL_PATH)?;

        Ok(Self {
            http: None,
            fallback: Client::builder()
                .user_agent(crate::USER_AGENT)
                .build()?,
            base_url,
            graphql_url,
            driver,
            auth: None,
            rate: RateState::new(),
        })
    }

    /// Creates a client from a loaded configuration.
    ///
    /// The configured timeout and user agent are applied to a dedicated
    /// transport, which also enables GraphQL queries.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let mut client = Self::new(config.driver, &config.server)?.with_http_client(builder.build()?);
        if let Some(token) = config.token.as_deref().filter(|token| !token.is_empty()) {
            client = client.with_auth(Credential::private_token(token));
        }
        Ok(client)
    }

    /// Uses `http` as the transport for every call.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the credentials attached to every request.
    ///
    /// # Returns
    ///
    /// Returns `self` with authentication configured.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use scm_transport::api::{Driver, ScmClient};
    /// use scm_transport::auth::Credential;
    ///
    /// let client = ScmClient::new(Driver::Gitlab, "https://gitlab.example.com")?
    ///     .with_auth(Credential::private_token("glpat-xxxxxxxx"));
    /// # Ok::<(), scm_transport::api::ApiError>(())
    /// ```
    pub fn with_auth(mut self, auth: Credential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Replaces the client's rate-limit cell, e.g. to share one cell between
    /// clients that draw on the same quota.
    pub fn with_rate_state(mut self, rate: RateState) -> Self {
        self.rate = rate;
        self
    }

    /// Returns the provider this client was configured for.
    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Returns the base address request paths are joined onto.
    ///
    /// Always ends in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the GraphQL endpoint, `<base>/api/graphql`.
    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    /// Handle to this client's rate-limit cell.
    pub fn rate_state(&self) -> &RateState {
        &self.rate
    }

    /// Last rate-limit snapshot observed by this client.
    pub fn rate(&self) -> Rate {
        self.rate.current()
    }

    pub(crate) fn http_client(&self) -> Option<&Client> {
        self.http.as_ref()
    }

    /// Resolves a path relative to the base address.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Performs one exchange and decodes the success body into `O`.
    ///
    /// `mode` selects how the body is read; use [`DecodeMode::UnwrapArray`]
    /// only for endpoints that answer with a one-element array.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] if the exchange itself fails
    /// - [`ApiError::Api`] for status 300 or above
    /// - [`ApiError::Decode`] if the body does not fit `O`
    pub async fn do_request<I, O>(
        &self,
        method: Method,
        path: &str,
        input: Option<&I>,
        mode: DecodeMode,
    ) -> Result<(Response, O), ApiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let transport = self.http.as_ref().unwrap_or(&self.fallback);
        let (response, body) = self.exchange(transport, method, url, input).await?;

        match mode.decode(&body) {
            Ok(output) => Ok((response, output)),
            Err(source) => Err(ApiError::Decode {
                response: Box::new(response),
                source,
            }),
        }
    }

    /// Performs one exchange without decoding the success body.
    pub async fn send<I>(
        &self,
        method: Method,
        path: &str,
        input: Option<&I>,
    ) -> Result<Response, ApiError>
    where
        I: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let transport = self.http.as_ref().unwrap_or(&self.fallback);
        let (response, _) = self.exchange(transport, method, url, input).await?;
        Ok(response)
    }

    /// Sends a `GET` and decodes the body into `O`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use scm_transport::api::gitlab;
    ///
    /// # async fn example() -> Result<(), scm_transport::api::ApiError> {
    /// let client = gitlab::default_client()?;
    /// let (response, version): (_, serde_json::Value) = client.get("api/v4/version").await?;
    /// println!("{} (request {})", version["version"], response.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<O: DeserializeOwned>(&self, path: &str) -> Result<(Response, O), ApiError> {
        self.do_request::<(), O>(Method::GET, path, None, DecodeMode::Standard)
            .await
    }

    /// Sends a `POST` with `body` as JSON and decodes the response into `O`.
    pub async fn post<O, B>(&self, path: &str, body: &B) -> Result<(Response, O), ApiError>
    where
        O: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.do_request(Method::POST, path, Some(body), DecodeMode::Standard)
            .await
    }

    /// Sends a `PUT` with `body` as JSON and decodes the response into `O`.
    pub async fn put<O, B>(&self, path: &str, body: &B) -> Result<(Response, O), ApiError>
    where
        O: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.do_request(Method::PUT, path, Some(body), DecodeMode::Standard)
            .await
    }

    /// Sends a `DELETE`; the success body is ignored.
    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    /// Sends one request and reads the body once.
    ///
    /// The rate snapshot is recorded before the status is inspected, so error
    /// responses update it too.
    pub(crate) async fn exchange<I>(
        &self,
        transport: &Client,
        method: Method,
        url: Url,
        input: Option<&I>,
    ) -> Result<(Response, Vec<u8>), ApiError>
    where
        I: Serialize + ?Sized,
    {
        let mut request = transport.request(method.clone(), url.clone());

        if let Some(input) = input {
            let body = serde_json::to_vec(input).map_err(ApiError::Encode)?;
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let res = request.send().await?;
        let response = Response::new(res.status().as_u16(), res.headers().clone());
        self.rate.observe(response.rate);

        debug!(
            driver = %self.driver,
            %method,
            %url,
            status = response.status,
            request_id = %response.id,
            remaining = response.rate.remaining,
            "exchange completed"
        );

        let body = match res.bytes().await {
            Ok(body) => body.to_vec(),
            Err(source) => {
                return Err(ApiError::Body {
                    response: Box::new(response),
                    source,
                })
            }
        };

        if !response.is_success() {
            let error = ErrorBody::decode(&body);
            return Err(ApiError::Api {
                response: Box::new(response),
                error,
            });
        }

        Ok((response, body))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Project {
        id: i64,
        name: String,
    }

    #[derive(Serialize)]
    struct CreateProject<'a> {
        name: &'a str,
        visibility: &'a str,
    }

    fn client_for(server: &mockito::ServerGuard) -> ScmClient {
        ScmClient::new(Driver::Gitlab, &server.url()).unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ScmClient::new(Driver::Gitlab, "https://gitlab.example.com").unwrap();
        assert_eq!(client.base_url().as_str(), "https://gitlab.example.com/");

        let client = ScmClient::new(Driver::Gitlab, "https://example.com/gitlab/").unwrap();
        assert_eq!(
            client.endpoint("/api/v4/projects").unwrap().as_str(),
            "https://example.com/gitlab/api/v4/projects"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ScmClient::new(Driver::Gitlab, "not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_error_status_returns_message_and_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/1")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_header("X-Request-Id", "req-404")
            .with_body(r#"{"message":"not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .get::<Project>("api/v4/projects/1")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), "not found");
        match err {
            ApiError::Api { response, error } => {
                assert_eq!(response.status, 404);
                assert_eq!(response.id, "req-404");
                assert_eq!(error.message, "not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/v4/projects/1")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .delete("api/v4/projects/1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(matches!(err, ApiError::Api { ref error, .. } if error.message.is_empty()));
    }

    #[tokio::test]
    async fn test_rate_headers_update_state() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/2")
            .with_status(200)
            .with_header("RateLimit-Limit", "600")
            .with_header("RateLimit-Remaining", "599")
            .with_header("RateLimit-Reset", "1700000000")
            .with_body(r#"{"id":2,"name":"widgets"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let (response, project) = client
            .get::<Project>("api/v4/projects/2")
            .await
            .unwrap();

        let expected = Rate {
            limit: 600,
            remaining: 599,
            reset: 1_700_000_000,
        };
        assert_eq!(project.name, "widgets");
        assert_eq!(response.rate, expected);
        assert_eq!(client.rate(), expected);
    }

    #[tokio::test]
    async fn test_rate_state_updated_on_error_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_status(429)
            .with_header("RateLimit-Limit", "600")
            .with_header("RateLimit-Remaining", "0")
            .with_header("RateLimit-Reset", "1700000060")
            .with_body(r#"{"message":"Retry later"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.rate_state().observe(Rate {
            limit: 1,
            remaining: 1,
            reset: 1,
        });

        let _ = client.get::<serde_json::Value>("api/v4/user").await;
        assert_eq!(
            client.rate(),
            Rate {
                limit: 600,
                remaining: 0,
                reset: 1_700_000_060
            }
        );
    }

    #[tokio::test]
    async fn test_missing_rate_headers_reset_to_zero() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/version")
            .with_status(200)
            .with_header("RateLimit-Limit", "garbage")
            .with_body(r#"{}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.rate_state().observe(Rate {
            limit: 600,
            remaining: 10,
            reset: 99,
        });

        client
            .get::<serde_json::Value>("api/v4/version")
            .await
            .unwrap();
        assert_eq!(client.rate(), Rate::default());
    }

    #[tokio::test]
    async fn test_clients_do_not_share_rate_state() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_status(204)
            .with_header("RateLimit-Remaining", "42")
            .create_async()
            .await;

        let first = client_for(&server);
        let second = client_for(&server);
        first.send::<()>(Method::GET, "ping", None).await.unwrap();

        assert_eq!(first.rate().remaining, 42);
        assert_eq!(second.rate(), Rate::default());

        let shared = client_for(&server).with_rate_state(first.rate_state().clone());
        assert_eq!(shared.rate().remaining, 42);
    }

    #[tokio::test]
    async fn test_input_is_sent_as_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "widgets", "visibility": "private"})))
            .with_status(201)
            .with_body(r#"{"id":9,"name":"widgets"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let body = CreateProject {
            name: "widgets",
            visibility: "private",
        };
        let (response, project): (_, Project) =
            client.post("api/v4/projects", &body).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
        assert_eq!(
            project,
            Project {
                id: 9,
                name: "widgets".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_auth_header_is_applied() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/user")
            .match_header("private-token", "glpat-abc")
            .with_status(200)
            .with_body(r#"{"id":1,"name":"root"}"#)
            .create_async()
            .await;

        let client = client_for(&server).with_auth(Credential::private_token("glpat-abc"));
        client.get::<Project>("api/v4/user").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/3")
            .with_status(200)
            .with_header("X-Request-Id", "req-3")
            .with_body(r#"{"id":"three""#)
            .create_async()
            .await;

        let err = client_for(&server)
            .get::<Project>("api/v4/projects/3")
            .await
            .unwrap_err();

        match err {
            ApiError::Decode { response, .. } => {
                assert_eq!(response.status, 200);
                assert_eq!(response.id, "req-3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_output() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/v4/projects/3/star")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let response = client_for(&server)
            .send(Method::PUT, "api/v4/projects/3/star", Some(&json!({})))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_unwrap_array_mode() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups/acme")
            .with_status(200)
            .with_body(r#"[{"id":1,"name":"acme"}]"#)
            .create_async()
            .await;

        let (_, project): (_, Project) = client_for(&server)
            .do_request::<(), _>(
                Method::GET,
                "api/v4/groups/acme",
                None,
                DecodeMode::UnwrapArray,
            )
            .await
            .unwrap();

        assert_eq!(
            project,
            Project {
                id: 1,
                name: "acme".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unwrap_array_empty_body_fails_cleanly() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups/empty")
            .with_status(200)
            .create_async()
            .await;

        let err = client_for(&server)
            .do_request::<(), Project>(
                Method::GET,
                "api/v4/groups/empty",
                None,
                DecodeMode::UnwrapArray,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_envelope() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            // Promises 64 bytes, sends 11, then hangs up.
            socket
                .write_all(
                    b"HTTP/1.1 503 Service Unavailable\r\n\
                      X-Request-Id: req-cut\r\n\
                      RateLimit-Remaining: 3\r\n\
                      Content-Length: 64\r\n\r\n\
                      {\"message\":",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = ScmClient::new(Driver::Gitlab, &format!("http://{addr}")).unwrap();
        let err = client
            .get::<serde_json::Value>("api/v4/version")
            .await
            .unwrap_err();

        match err {
            ApiError::Body { response, .. } => {
                assert_eq!(response.status, 503);
                assert_eq!(response.id, "req-cut");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.rate().remaining, 3);
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        // Nothing listens on port 9 of the loopback interface.
        let client = ScmClient::new(Driver::Gitlab, "http://127.0.0.1:9").unwrap();
        let err = client
            .get::<serde_json::Value>("api/v4/version")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.response().is_none());
        assert_eq!(client.rate(), Rate::default());
    }
}
