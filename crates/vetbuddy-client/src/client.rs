//! VetBuddy HTTP client implementation.

use reqwest::{multipart::Form, Client, Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

use crate::error::ClientError;
use crate::response::ApiResponse;

/// VetBuddy API client.
///
/// Cloning is cheap: the underlying connection pool is shared. A client holds
/// at most one bearer token; use [`VetBuddyClient::authenticated`] to derive a
/// client per account.
#[derive(Debug, Clone)]
pub struct VetBuddyClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl VetBuddyClient {
    /// Create a client for a deployment root such as `https://vetbuddy.example.com`.
    ///
    /// `/api` is appended to every request path.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a client with custom options.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Deployment root without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path (`/pets` → `{base}/api/pets`).
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the bearer token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// A copy of this client that sends `token`.
    #[must_use]
    pub fn authenticated(&self, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..self.clone()
        }
    }

    /// A copy of this client without a token.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.api_url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let response = builder.send().await?;
        let response = ApiResponse::read(response).await?;
        tracing::debug!(
            method = %method,
            path = %path,
            status = response.status_code(),
            authenticated = self.token.is_some(),
            "VetBuddy API call"
        );
        Ok(response)
    }

    /// `GET` an API path.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::GET, path);
        self.execute(&Method::GET, path, builder).await
    }

    /// `GET` with query parameters.
    pub async fn get_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(&Method::GET, path, builder).await
    }

    /// `POST` a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(&Method::POST, path, builder).await
    }

    /// `PUT` a JSON body.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(&Method::PUT, path, builder).await
    }

    /// `DELETE` an API path.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::DELETE, path);
        self.execute(&Method::DELETE, path, builder).await
    }

    /// `POST` a multipart form.
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<ApiResponse, ClientError> {
        let builder = self.request(Method::POST, path).multipart(form);
        self.execute(&Method::POST, path, builder).await
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("vetbuddy-smoke/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Options with a custom timeout.
    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }
}
