//! Native threads on twitter and threads
//!
//! Unlike `create_post`, the confirmation prompt runs before any media is
//! uploaded: a declined thread leaves nothing behind.

use std::path::PathBuf;

use tracing::{info, warn};

use super::PublishService;
use crate::accounts::{self, TargetHint};
use crate::confirm::Decision;
use crate::diagnostics::{Diagnostic, SubmissionTarget};
use crate::error::{Result, SubmissionError, SyndicastError};
use crate::media::MediaUploader;
use crate::mode::{effective_schedule, PublishMode};
use crate::payload::{build_thread_entry, ensure_thread_len, PostPayload, Preview, ThreadPlatform};
use crate::types::{PublishOutcome, ThreadItem};

/// One item of a requested thread, media still local
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadItemRequest {
    pub content: String,
    pub media: Vec<PathBuf>,
}

impl ThreadItemRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media: Vec::new(),
        }
    }
}

/// A validated `create_thread` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateThreadRequest {
    pub platform: ThreadPlatform,
    pub items: Vec<ThreadItemRequest>,
    pub first_comment: Option<String>,
    pub schedule_for: Option<String>,
    pub is_draft: bool,
    pub use_queue: bool,
    pub hint: TargetHint,
}

impl CreateThreadRequest {
    pub fn new(platform: ThreadPlatform, items: Vec<ThreadItemRequest>) -> Self {
        Self {
            platform,
            items,
            first_comment: None,
            schedule_for: None,
            is_draft: false,
            use_queue: false,
            hint: TargetHint::None,
        }
    }

    /// Item count is checked first, before anything else about the request.
    pub fn normalized(mut self) -> Result<Self> {
        ensure_thread_len(self.items.len())?;

        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.content.trim().is_empty())
        {
            return Err(SyndicastError::validation(format!(
                "thread item {} has empty content",
                index + 1
            )));
        }

        self.first_comment = self.first_comment.filter(|c| !c.trim().is_empty());
        self.schedule_for = effective_schedule(self.is_draft, self.schedule_for.as_deref())?;
        Ok(self)
    }

    pub fn mode(&self) -> PublishMode {
        PublishMode::resolve(self.is_draft, self.schedule_for.as_deref(), self.use_queue)
    }

    fn media_count(&self) -> usize {
        self.items.iter().map(|item| item.media.len()).sum()
    }

    /// Total characters across every item
    fn content_length(&self) -> usize {
        self.items.iter().map(|item| item.content.chars().count()).sum()
    }

    fn preview_content(&self) -> String {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("[{}/{}] {}", i + 1, self.items.len(), item.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PublishService {
    /// Publish a multi-item thread from one account.
    ///
    /// # Errors
    ///
    /// - `Validation` if fewer than two items are given; nothing else runs
    /// - `Resolution` if no account matches the platform and hint
    /// - `Upload` for the first media file that fails
    /// - `Submission` with a diagnostic naming the platform and account
    pub async fn create_thread(&self, request: CreateThreadRequest) -> Result<PublishOutcome> {
        let request = request.normalized()?;
        let mode = request.mode();
        let platform = request.platform.as_str().to_string();

        let connected = self.fetch_accounts().await?;
        let resolved = accounts::resolve(
            std::slice::from_ref(&platform),
            &connected,
            &request.hint,
        )?;
        let Some(account) = resolved.get(&platform).cloned() else {
            // resolve() fails for every platform it cannot map
            return Err(SyndicastError::validation(format!(
                "no account resolved for {}",
                platform
            )));
        };
        info!(
            platform = %platform,
            account_id = %account.account_id,
            items = request.items.len(),
            "Resolved thread account"
        );

        let preview = Preview {
            targets: Preview::for_accounts(&resolved),
            content: request.preview_content(),
            media_count: request.media_count(),
            mode_label: mode.label(),
            thread_items: Some(request.items.len()),
        };

        if self.confirm(&mode, &preview) == Decision::Declined {
            info!(mode = %mode, "Thread cancelled at confirmation");
            return Ok(PublishOutcome::Cancelled);
        }

        let uploader = MediaUploader::new(self.api());
        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let media = uploader.upload_all(&item.media).await?;
            items.push(ThreadItem {
                content: item.content.clone(),
                media_items: (!media.is_empty()).then_some(media),
            });
        }

        let entry = build_thread_entry(
            request.platform,
            &account.account_id,
            items,
            request.first_comment.clone(),
        )?;

        let payload = PostPayload {
            content: request.items[0].content.clone(),
            title: None,
            media_items: Vec::new(),
            platforms: vec![entry],
            signal: mode.signal(),
        };

        info!(mode = %mode, platform = %platform, "Submitting thread");
        match self.api().create_post(&payload).await {
            Ok(created) => {
                info!(post_id = %created.post_id, status = %created.status, "Thread accepted");
                Ok(PublishOutcome::Published(created))
            }
            Err(remote_error) => {
                warn!(error = %remote_error, "Thread submission rejected");
                Err(SubmissionError::new(Diagnostic::new(
                    remote_error,
                    SubmissionTarget::Thread {
                        platform,
                        account_id: account.account_id,
                        username: account.username,
                    },
                    request.content_length(),
                    mode.label(),
                ))
                .into())
            }
        }
    }
}
