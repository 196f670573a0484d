//! HTTP transport for the publishing API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{ApiClient, ApiResult, PresignRequest};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::payload::PostPayload;
use crate::types::{
    AccountHealth, ConnectedAccount, CreatedPost, LinkedInOrganization, ListPostsQuery, PostPage,
    PresignedUpload,
};

/// Longest error body kept in an `ApiError::Status`
const MAX_ERROR_BODY: usize = 500;

pub struct HttpApiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    request_timeout: Duration,
    upload_timeout: Duration,
}

#[derive(Deserialize)]
struct AccountsResponse {
    accounts: Vec<ConnectedAccount>,
}

#[derive(Deserialize)]
struct OrganizationsResponse {
    organizations: Vec<LinkedInOrganization>,
}

#[derive(Deserialize)]
struct HealthResponse {
    accounts: Vec<AccountHealth>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreatePostResponse {
    Wrapped { post: CreatedPost },
    Bare(CreatedPost),
}

impl HttpApiClient {
    /// `request_timeout` bounds each JSON call; `upload_timeout` bounds one
    /// presigned PUT, which may carry a large video.
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        request_timeout: Duration,
        upload_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .user_agent(concat!("syndicast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            request_timeout,
            upload_timeout,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_key = SecretString::from(config.resolve_api_key()?);
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.upload_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.api_key.expose_secret())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self
            .authorized(request)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a readable message out of an error body (`{"error": ...}` or `{"message": ...}`)
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            match value.get(key) {
                Some(serde_json::Value::String(message)) => return message.clone(),
                Some(serde_json::Value::Object(inner)) => {
                    if let Some(serde_json::Value::String(message)) = inner.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn list_accounts(&self) -> ApiResult<Vec<ConnectedAccount>> {
        debug!("GET accounts");
        let response: AccountsResponse = self.send_json(self.client.get(self.url("accounts"))).await?;
        Ok(response.accounts)
    }

    async fn linkedin_organizations(
        &self,
        account_id: &str,
    ) -> ApiResult<Vec<LinkedInOrganization>> {
        let path = format!("accounts/{}/linkedin-organizations", account_id);
        debug!("GET {}", path);
        let response: OrganizationsResponse =
            self.send_json(self.client.get(self.url(&path))).await?;
        Ok(response.organizations)
    }

    async fn presign_media(&self, request: &PresignRequest) -> ApiResult<PresignedUpload> {
        debug!(filename = %request.filename, "POST media/presign");
        self.send_json(self.client.post(self.url("media/presign")).json(request))
            .await
    }

    async fn upload_bytes(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<()> {
        debug!(size = bytes.len(), "PUT presigned upload");
        // Presigned URLs carry their own authorization; no bearer token here.
        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            })
        }
    }

    async fn create_post(&self, payload: &PostPayload) -> ApiResult<CreatedPost> {
        debug!(platforms = payload.platforms.len(), "POST posts");
        let response: CreatePostResponse = self
            .send_json(self.client.post(self.url("posts")).json(payload))
            .await?;

        Ok(match response {
            CreatePostResponse::Wrapped { post } => post,
            CreatePostResponse::Bare(post) => post,
        })
    }

    async fn list_posts(&self, query: &ListPostsQuery) -> ApiResult<PostPage> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(status) = &query.status {
            params.push(("status", status.clone()));
        }
        if let Some(platform) = &query.platform {
            params.push(("platform", platform.clone()));
        }

        debug!(page = query.page, limit = query.limit, "GET posts");
        self.send_json(self.client.get(self.url("posts")).query(&params))
            .await
    }

    async fn account_health(&self) -> ApiResult<Vec<AccountHealth>> {
        debug!("GET accounts/health");
        let response: HealthResponse = self
            .send_json(self.client.get(self.url("accounts/health")))
            .await?;
        Ok(response.accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(base_url: &str) -> HttpApiClient {
        HttpApiClient::new(
            base_url,
            SecretString::from("sk_test".to_string()),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Local server that answers every request with `{}` after `delay`
    async fn slow_server(delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    tokio::time::sleep(delay).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                              content-length: 2\r\nconnection: close\r\n\r\n{}",
                        )
                        .await;
                });
            }
        });

        format!("http://{}", addr)
    }

    /// Consume headers and a `content-length` body
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut received = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&received[..end]).to_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= end + 4 + body_len {
                    return;
                }
            }
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => received.extend_from_slice(&chunk[..n]),
            }
        }
    }

    #[test]
    fn test_url_joining() {
        let api = client("https://api.example.com/v1/");
        assert_eq!(api.url("accounts"), "https://api.example.com/v1/accounts");
        assert_eq!(api.url("/posts"), "https://api.example.com/v1/posts");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error": "Invalid API key"}"#), "Invalid API key");
        assert_eq!(
            error_message(r#"{"message": "Rate limit exceeded"}"#),
            "Rate limit exceeded"
        );
        assert_eq!(
            error_message(r#"{"error": {"code": 42, "message": "Account disconnected"}}"#),
            "Account disconnected"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");

        let long = "x".repeat(MAX_ERROR_BODY + 50);
        assert_eq!(error_message(&long).chars().count(), MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_create_post_response_shapes() {
        let wrapped: CreatePostResponse =
            serde_json::from_str(r#"{"post": {"_id": "p1", "status": "published"}}"#).unwrap();
        let bare: CreatePostResponse = serde_json::from_str(
            r#"{"id": "p2", "status": "scheduled", "scheduledFor": "2024-12-25T10:00:00Z"}"#,
        )
        .unwrap();

        match wrapped {
            CreatePostResponse::Wrapped { post } => assert_eq!(post.post_id, "p1"),
            CreatePostResponse::Bare(_) => panic!("expected wrapped response"),
        }
        match bare {
            CreatePostResponse::Bare(post) => {
                assert_eq!(post.post_id, "p2");
                assert_eq!(post.scheduled_for.as_deref(), Some("2024-12-25T10:00:00Z"));
            }
            CreatePostResponse::Wrapped { .. } => panic!("expected bare response"),
        }
    }

    #[tokio::test]
    async fn test_upload_outlives_request_deadline() {
        let base_url = slow_server(Duration::from_millis(400)).await;
        let api = HttpApiClient::new(
            &base_url,
            SecretString::from("sk_test".to_string()),
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
        .unwrap();

        let upload_url = format!("{}/upload/clip.mp4", base_url);
        api.upload_bytes(&upload_url, "video/mp4", vec![0u8; 1024])
            .await
            .unwrap();

        let err = api.list_accounts().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let api = client("http://127.0.0.1:9");
        let err = api.list_accounts().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }
}
