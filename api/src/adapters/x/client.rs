//! X API client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AnnouncementChannel, PostReceipt, DEFAULT_MAX_POST_LEN};
use crate::error::AnnouncementError;

/// Credentials recognized for the X API
#[derive(Debug, Clone, Default)]
pub struct XCredentials {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub bearer_token: Option<String>,
}

impl XCredentials {
    /// Token sent as `Authorization: Bearer`. The app bearer token wins over a
    /// user access token; an API key alone cannot authorize a post.
    pub fn token(&self) -> Option<&str> {
        [&self.bearer_token, &self.access_token]
            .into_iter()
            .filter_map(|t| t.as_deref().map(str::trim))
            .find(|t| !t.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Implementation of the X API client
pub struct XClient {
    http: Client,
    base_url: String,
    token: String,
    max_len: usize,
}

impl XClient {
    /// Build a client, or None when the credentials carry no usable token
    pub fn from_credentials(base_url: String, credentials: &XCredentials) -> Option<Self> {
        let token = credentials.token()?;
        Some(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            max_len: DEFAULT_MAX_POST_LEN,
        })
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/2{}", self.base_url, path)
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<PostReceipt, AnnouncementError> {
        let status = response.status();

        // 201 means the post exists; an unreadable body only costs the id
        if status == StatusCode::CREATED {
            let id = match response.json::<CreatePostResponse>().await {
                Ok(body) => body.data.map(|d| d.id),
                Err(e) => {
                    tracing::warn!(error = %e, "Post created but response body was unreadable");
                    None
                }
            };
            Ok(PostReceipt { id })
        } else if status.as_u16() == 401 {
            Err(AnnouncementError::Unauthorized)
        } else if status.as_u16() == 429 {
            Err(AnnouncementError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AnnouncementError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    data: Option<CreatedPost>,
}

#[derive(Deserialize)]
struct CreatedPost {
    id: String,
}

#[async_trait]
impl AnnouncementChannel for XClient {
    fn max_len(&self) -> usize {
        self.max_len
    }

    async fn post(&self, text: &str) -> Result<PostReceipt, AnnouncementError> {
        let resp = self
            .http
            .post(self.api_url("/tweets"))
            .bearer_auth(&self.token)
            .json(&CreatePostRequest { text })
            .send()
            .await?;

        self.handle_response(resp).await
    }
}
