//! In-memory publishing API for tests
//!
//! `MockApi` holds a scripted set of connected accounts, organizations,
//! posts and failures, and records every call made against it. Clones share
//! state, so a test can keep one handle while the pipeline owns another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ApiClient, ApiResult, PresignRequest};
use crate::error::ApiError;
use crate::payload::PostPayload;
use crate::types::{
    AccountHealth, ConnectedAccount, CreatedPost, LinkedInOrganization, ListPostsQuery,
    Pagination, PostPage, PostSummary, PresignedUpload,
};

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListAccounts,
    LinkedInOrganizations(String),
    /// Filename being presigned
    Presign(String),
    /// Upload URL the bytes were sent to
    Upload(String),
    CreatePost,
    ListPosts,
    AccountHealth,
}

/// Bytes received by `upload_bytes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub upload_url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<ConnectedAccount>,
    organizations: HashMap<String, Vec<LinkedInOrganization>>,
    posts: Vec<PostSummary>,
    health: Option<Vec<AccountHealth>>,

    list_accounts_error: Option<ApiError>,
    presign_error: Option<String>,
    upload_error: Option<String>,
    /// Per-file upload failures, keyed by filename
    upload_failures: HashMap<String, String>,
    create_post_error: Option<ApiError>,

    calls: Vec<ApiCall>,
    presign_requests: Vec<PresignRequest>,
    uploads: Vec<UploadRecord>,
    submitted: Vec<PostPayload>,
}

#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, platform: &str, account_id: &str, username: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .accounts
            .push(ConnectedAccount::new(platform, account_id, username));
        self
    }

    pub fn with_accounts(self, accounts: Vec<ConnectedAccount>) -> Self {
        self.state.lock().unwrap().accounts.extend(accounts);
        self
    }

    /// Organizations returned for one LinkedIn account
    pub fn with_organizations(
        self,
        account_id: &str,
        organizations: Vec<LinkedInOrganization>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .organizations
            .insert(account_id.to_string(), organizations);
        self
    }

    pub fn with_posts(self, posts: Vec<PostSummary>) -> Self {
        self.state.lock().unwrap().posts.extend(posts);
        self
    }

    /// Fixed health report; without one every account reports `active`
    pub fn with_health(self, health: Vec<AccountHealth>) -> Self {
        self.state.lock().unwrap().health = Some(health);
        self
    }

    pub fn fail_list_accounts(self, error: ApiError) -> Self {
        self.state.lock().unwrap().list_accounts_error = Some(error);
        self
    }

    pub fn fail_presign(self, message: &str) -> Self {
        self.state.lock().unwrap().presign_error = Some(message.to_string());
        self
    }

    pub fn fail_upload(self, message: &str) -> Self {
        self.state.lock().unwrap().upload_error = Some(message.to_string());
        self
    }

    /// Fail only the transfer of `filename`; other files upload normally
    pub fn fail_upload_of(self, filename: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .upload_failures
            .insert(filename.to_string(), message.to_string());
        self
    }

    pub fn fail_create_post(self, error: ApiError) -> Self {
        self.state.lock().unwrap().create_post_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn presign_requests(&self) -> Vec<PresignRequest> {
        self.state.lock().unwrap().presign_requests.clone()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// Every payload passed to `create_post`, failed ones included
    pub fn submitted_posts(&self) -> Vec<PostPayload> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn record(&self, call: ApiCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn status_for(payload: &PostPayload) -> &'static str {
    let signal = &payload.signal;
    if signal.is_draft == Some(true) {
        "draft"
    } else if signal.scheduled_for.is_some() {
        "scheduled"
    } else if signal.use_queue == Some(true) {
        "queued"
    } else {
        "published"
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn list_accounts(&self) -> ApiResult<Vec<ConnectedAccount>> {
        self.record(ApiCall::ListAccounts);
        let state = self.state.lock().unwrap();
        match &state.list_accounts_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.accounts.clone()),
        }
    }

    async fn linkedin_organizations(
        &self,
        account_id: &str,
    ) -> ApiResult<Vec<LinkedInOrganization>> {
        self.record(ApiCall::LinkedInOrganizations(account_id.to_string()));
        let state = self.state.lock().unwrap();
        Ok(state
            .organizations
            .get(account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn presign_media(&self, request: &PresignRequest) -> ApiResult<PresignedUpload> {
        self.record(ApiCall::Presign(request.filename.clone()));
        let mut state = self.state.lock().unwrap();
        state.presign_requests.push(request.clone());

        if let Some(message) = &state.presign_error {
            return Err(ApiError::Remote(message.clone()));
        }

        let key = uuid::Uuid::new_v4();
        Ok(PresignedUpload {
            upload_url: format!("https://uploads.mock.invalid/{}/{}", key, request.filename),
            public_url: format!("https://cdn.mock.invalid/{}/{}", key, request.filename),
        })
    }

    async fn upload_bytes(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<()> {
        self.record(ApiCall::Upload(upload_url.to_string()));
        let mut state = self.state.lock().unwrap();

        let file_failure = state
            .upload_failures
            .iter()
            .find(|(name, _)| upload_url.ends_with(&format!("/{}", name)))
            .map(|(_, message)| message);
        if let Some(message) = state.upload_error.as_ref().or(file_failure) {
            return Err(ApiError::Status {
                status: 403,
                body: message.clone(),
            });
        }

        state.uploads.push(UploadRecord {
            upload_url: upload_url.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        });
        Ok(())
    }

    async fn create_post(&self, payload: &PostPayload) -> ApiResult<CreatedPost> {
        self.record(ApiCall::CreatePost);
        let mut state = self.state.lock().unwrap();
        state.submitted.push(payload.clone());

        if let Some(error) = &state.create_post_error {
            return Err(error.clone());
        }

        Ok(CreatedPost {
            post_id: format!("post-{}", uuid::Uuid::new_v4()),
            status: status_for(payload).to_string(),
            scheduled_for: payload.signal.scheduled_for.clone(),
        })
    }

    async fn list_posts(&self, query: &ListPostsQuery) -> ApiResult<PostPage> {
        self.record(ApiCall::ListPosts);
        let state = self.state.lock().unwrap();

        let matching: Vec<&PostSummary> = state
            .posts
            .iter()
            .filter(|post| query.status.as_ref().map_or(true, |s| post.status == *s))
            .filter(|post| {
                query
                    .platform
                    .as_ref()
                    .map_or(true, |p| post.platforms.iter().any(|ps| ps.platform == *p))
            })
            .collect();

        let limit = query.limit.max(1) as usize;
        let total = matching.len();
        let pages = total.div_ceil(limit);
        let start = (query.page.max(1) as usize - 1) * limit;

        Ok(PostPage {
            posts: matching
                .into_iter()
                .skip(start)
                .take(limit)
                .cloned()
                .collect(),
            pagination: Pagination {
                page: query.page,
                limit: query.limit,
                total: total as u64,
                pages: pages as u32,
            },
        })
    }

    async fn account_health(&self) -> ApiResult<Vec<AccountHealth>> {
        self.record(ApiCall::AccountHealth);
        let state = self.state.lock().unwrap();

        if let Some(health) = &state.health {
            return Ok(health.clone());
        }

        Ok(state
            .accounts
            .iter()
            .map(|account| AccountHealth {
                platform: account.platform.clone(),
                username: account.username.clone(),
                status: "active".to_string(),
                message: None,
            })
            .collect())
    }
}
