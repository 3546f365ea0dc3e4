//! PriceTrack REST API Client
//!
//! HTTP client for the PriceTrack backend. Every call except login and
//! register carries the session token as a bearer credential.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::dto::{
    Credentials, LoginForm, Message, PricePoint, ScrapedProduct, Token, TrackRequest,
    TrackedProduct, User,
};
use super::error::{ApiError, ApiResult};
use super::Backend;
use crate::config::ApiConfig;

/// reqwest-backed implementation of [`Backend`]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    /// Send a request and decode a JSON success body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ApiResult<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(request_id = %request_id, path = %path, "Sending backend request");

        let response = request
            .header("X-Request-Id", &request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(request_id = %request_id, path = %path, error = %e, "Backend unreachable");
                ApiError::from_transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                status = status.as_u16(),
                error_message = %err,
                "Backend returned error"
            );
            return Err(err);
        }

        tracing::debug!(request_id = %request_id, status = status.as_u16(), "Backend request succeeded");
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ApiResult<Token> {
        let path = "/auth/login";
        let request = self.request(Method::POST, path).form(&LoginForm {
            username: email,
            password,
        });
        self.send(request, path).await
    }

    async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        let path = "/auth/register";
        let request = self
            .request(Method::POST, path)
            .json(&Credentials { email, password });
        self.send(request, path).await
    }

    async fn current_user(&self, token: &str) -> ApiResult<User> {
        let path = "/users/me";
        self.send(self.authed(Method::GET, path, token), path).await
    }

    async fn tracked_products(&self, token: &str) -> ApiResult<Vec<TrackedProduct>> {
        let path = "/track";
        self.send(self.authed(Method::GET, path, token), path).await
    }

    async fn track_product(&self, token: &str, url: &str) -> ApiResult<ScrapedProduct> {
        let path = "/track";
        let request = self.authed(Method::POST, path, token).json(&TrackRequest {
            urls: vec![url.to_string()],
        });
        self.send(request, path).await
    }

    async fn delete_tracked_product(&self, token: &str, id: i64) -> ApiResult<Message> {
        let path = format!("/track/{}", id);
        self.send(self.authed(Method::DELETE, &path, token), &path).await
    }

    async fn tracked_product(&self, token: &str, id: i64) -> ApiResult<TrackedProduct> {
        let path = format!("/track/{}", id);
        self.send(self.authed(Method::GET, &path, token), &path).await
    }

    async fn price_history(&self, token: &str, id: i64) -> ApiResult<Vec<PricePoint>> {
        let path = format!("/track/{}/history", id);
        self.send(self.authed(Method::GET, &path, token), &path).await
    }
}
