//! HTTP access to the Mini Feed backend.
//!
//! `ApiClient` is the only type here that touches the network. The rest of
//! the crate talks to it through the `PostsApi` and `AuthApi` traits so the
//! submission flow and feed can be driven by in-memory fakes.

use std::fmt;

use async_trait::async_trait;
use log::{debug, trace};
use minifeed_core::model::{DataEnvelope, ErrorBody};
use minifeed_core::{AuthSession, NewPost, Post};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::credentials::Credentials;

/// Used when a failed response carries no `message`.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx status; `message` is the backend's text, if it sent any.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Backend {
        status: u16,
        message: Option<String>,
    },

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("Response did not include any data")]
    MissingData,
}

impl ApiError {
    /// The backend's own wording, when it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /posts?mine=true`
    async fn my_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// `GET /posts`
    async fn all_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// `POST /posts`
    async fn create_post(&self, post: &NewPost) -> Result<Post, ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/register`. Registration does not sign the user in.
    async fn register(&self, mobile: &str, name: &str) -> Result<(), ApiError>;

    /// `POST /auth/login`
    async fn login(&self, mobile: &str, otp: &str) -> Result<AuthSession, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Credentials,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        debug!("{} {}", method, url);

        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, concat!("minifeed/", env!("CARGO_PKG_VERSION")));

        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        trace!("{} {}", status, String::from_utf8_lossy(&bytes));

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty());
            debug!("request failed with {}: {:?}", status, message);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn fetch_posts(&self, path: &str) -> Result<Vec<Post>, ApiError> {
        let envelope: DataEnvelope<Vec<Post>> = self.send(self.request(Method::GET, path)).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl PostsApi for ApiClient {
    async fn my_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_posts("/posts?mine=true").await
    }

    async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_posts("/posts").await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ApiError> {
        let request = self.request(Method::POST, "/posts").json(post);
        let envelope: DataEnvelope<Post> = self.send(request).await?;
        envelope.data.ok_or(ApiError::MissingData)
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, mobile: &str, name: &str) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "/auth/register")
            .json(&json!({ "mobile": mobile, "name": name }));
        let _: DataEnvelope<serde_json::Value> = self.send(request).await?;
        Ok(())
    }

    async fn login(&self, mobile: &str, otp: &str) -> Result<AuthSession, ApiError> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "mobile": mobile, "otp": otp }));
        let envelope: DataEnvelope<AuthSession> = self.send(request).await?;
        envelope.data.ok_or(ApiError::MissingData)
    }
}
