//! HTTP implementation of [`ForgeApi`].

use super::{
    CreateCommentRequest, CreateCommitCommentRequest, CreateIssueRequest, CreatePullRequest,
    CreateRefRequest, CreateReviewCommentRequest, CreatedComment, CreatedIssue, ForgeApi,
    ListResource, TransportError, UpdateIssueRequest,
};
use crate::config::RemoteEndpoint;
use crate::model::IssueState;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::debug;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Talks to one repository of a GitHub-compatible REST API.
///
/// Authentication, proxy and CA bundle come from the [`RemoteEndpoint`] the
/// client was built for and apply to every request.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    repository_url: String,
}

impl RestClient {
    /// Builds a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] if the token is not a valid header
    /// value, the proxy URL is invalid, or the CA bundle cannot be read.
    pub fn new(endpoint: &RemoteEndpoint) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", endpoint.token()))
            .map_err(|_| TransportError::Client {
                message: "token contains characters not allowed in a header".to_string(),
            })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let Some(proxy) = endpoint.proxy() {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| TransportError::Client {
                message: format!("invalid proxy '{proxy}': {e}"),
            })?;
            builder = builder.proxy(proxy);
        }

        if let Some(path) = endpoint.ca_bundle() {
            let pem = std::fs::read(path).map_err(|e| TransportError::Client {
                message: format!("failed to read CA bundle '{}': {e}", path.display()),
            })?;
            let certificates =
                reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| TransportError::Client {
                    message: format!("invalid CA bundle '{}': {e}", path.display()),
                })?;
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let http = builder.build().map_err(|e| TransportError::Client {
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            repository_url: endpoint.repository_url(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.repository_url, route)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::from_response(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|source| TransportError::Decode { source })
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(route);
        debug!(url = %url, "POST");
        self.send(self.http.post(url).json(body)).await
    }
}

#[async_trait]
impl ForgeApi for RestClient {
    async fn list_page(
        &self,
        resource: ListResource,
        page: u32,
    ) -> Result<Vec<serde_json::Value>, TransportError> {
        let url = self.url(resource.path());
        debug!(url = %url, page, "GET");
        self.send(
            self.http
                .get(url)
                .query(&[("page", page)])
                .query(&[("state", "all")]),
        )
        .await
    }

    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<CreatedIssue, TransportError> {
        self.post("issues", request).await
    }

    async fn update_issue_state(
        &self,
        number: u64,
        state: IssueState,
    ) -> Result<(), TransportError> {
        let url = self.url(&format!("issues/{number}"));
        debug!(url = %url, state = %state, "PATCH");
        let _: IgnoredAny = self
            .send(self.http.patch(url).json(&UpdateIssueRequest { state }))
            .await?;
        Ok(())
    }

    async fn create_ref(&self, request: &CreateRefRequest) -> Result<(), TransportError> {
        let _: IgnoredAny = self.post("git/refs", request).await?;
        Ok(())
    }

    async fn create_pull(
        &self,
        request: &CreatePullRequest,
    ) -> Result<CreatedIssue, TransportError> {
        self.post("pulls", request).await
    }

    async fn create_issue_comment(
        &self,
        number: u64,
        request: &CreateCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.post(&format!("issues/{number}/comments"), request)
            .await
    }

    async fn create_pull_comment(
        &self,
        number: u64,
        request: &CreateReviewCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.post(&format!("pulls/{number}/comments"), request)
            .await
    }

    async fn create_commit_comment(
        &self,
        sha: &str,
        request: &CreateCommitCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.post(&format!("commits/{sha}/comments"), request)
            .await
    }
}
