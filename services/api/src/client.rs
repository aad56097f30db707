//! HTTP client for the salon backend
//!
//! Every request goes through one configured sender that attaches the
//! current session token as a bearer credential when one is present.

use std::time::Duration;

use auth::SessionStore;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::error::{ApiError, ApiResult};

/// HTTP client bound to a backend and a session
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl HttpClient {
    /// Create a new client for `base_url`; each request gives up after
    /// `timeout`
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Configuration("base URL is empty".to_string()));
        }

        let inner = reqwest::Client::builder()
            .user_agent(concat!("salon-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner,
            base_url,
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.inner.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", path, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Request to {} returned {}", path, status);
        Err(ApiError::from_status(status, path, body))
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to decode response from {}: {}", path, e);
            ApiError::Decode(format!("{}: {}", path, e))
        })
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::decode(response, path).await
    }

    /// GET a JSON resource with query parameters
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(builder, path).await?;
        Self::decode(response, path).await
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body), path)
            .await?;
        Self::decode(response, path).await
    }

    /// POST a JSON body, ignoring whatever the backend answers
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.send(self.request(Method::POST, path).json(body), path)
            .await?;
        Ok(())
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PUT, path).json(body), path)
            .await?;
        Self::decode(response, path).await
    }

    /// PUT a JSON body, ignoring whatever the backend answers
    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.send(self.request(Method::PUT, path).json(body), path)
            .await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}
