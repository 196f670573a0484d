//! Publishing API abstraction
//!
//! The pipeline only talks to the remote service through [`ApiClient`].
//! [`http::HttpApiClient`] is the real transport; [`mock::MockApi`] is an
//! in-memory stand-in for tests and dry runs.
//!
//! Calls are made one at a time by the pipeline and are never retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::payload::PostPayload;
use crate::types::{
    AccountHealth, ConnectedAccount, CreatedPost, LinkedInOrganization, ListPostsQuery, PostPage,
    PresignedUpload,
};

pub mod http;
pub mod mock;

pub use http::HttpApiClient;
pub use mock::MockApi;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Presign request for one file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Accounts currently connected to the publishing service
    async fn list_accounts(&self) -> ApiResult<Vec<ConnectedAccount>>;

    /// Organization pages a LinkedIn account may post as
    async fn linkedin_organizations(&self, account_id: &str)
        -> ApiResult<Vec<LinkedInOrganization>>;

    /// Obtain a time-limited upload target for one file
    async fn presign_media(&self, request: &PresignRequest) -> ApiResult<PresignedUpload>;

    /// PUT the file bytes to a presigned upload URL
    async fn upload_bytes(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<()>;

    async fn create_post(&self, payload: &PostPayload) -> ApiResult<CreatedPost>;

    async fn list_posts(&self, query: &ListPostsQuery) -> ApiResult<PostPage>;

    /// Token and connection status for every connected account
    async fn account_health(&self) -> ApiResult<Vec<AccountHealth>>;
}
