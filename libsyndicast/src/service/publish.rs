//! Multi-platform post creation
//!
//! Order of operations: validate, resolve accounts, upload media, build
//! entries, preview and confirm, submit. Media is uploaded before the
//! confirmation prompt, so a decline leaves the uploads in place.

use std::path::PathBuf;

use tracing::{info, warn};

use super::PublishService;
use crate::accounts::{self, TargetHint};
use crate::confirm::Decision;
use crate::diagnostics::{Diagnostic, SubmissionTarget};
use crate::error::{Result, SubmissionError, SyndicastError};
use crate::media::MediaUploader;
use crate::mode::{effective_schedule, PublishMode};
use crate::payload::{build_platform_entries, canonical_platform, PostPayload, Preview};
use crate::types::{LinkedInOptions, PublishOutcome};

/// A validated `create_post` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub content: String,
    pub title: Option<String>,
    /// Lowercase platform names, in the order requested
    pub platforms: Vec<String>,
    /// Local files to upload, in order
    pub media: Vec<PathBuf>,
    /// RFC 3339 timestamp
    pub schedule_for: Option<String>,
    pub is_draft: bool,
    pub use_queue: bool,
    pub hint: TargetHint,
    pub linkedin: Option<LinkedInOptions>,
}

impl CreatePostRequest {
    pub fn new(content: impl Into<String>, platforms: Vec<String>) -> Self {
        Self {
            content: content.into(),
            platforms,
            ..Default::default()
        }
    }

    /// Check every field once and return the normalized request.
    ///
    /// Platforms are lowercased and de-duplicated, a blank title is dropped and
    /// `schedule_for` is restated in UTC.
    pub fn normalized(mut self) -> Result<Self> {
        if self.content.trim().is_empty() {
            return Err(SyndicastError::validation("content cannot be empty"));
        }

        self.platforms = normalize_platforms(&self.platforms)?;
        self.title = self.title.filter(|t| !t.trim().is_empty());
        self.schedule_for = effective_schedule(self.is_draft, self.schedule_for.as_deref())?;

        if let Some(path) = self.media.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(SyndicastError::validation(format!(
                "media path cannot be empty: {:?}",
                path
            )));
        }

        if self.linkedin.is_some() && !self.platforms.iter().any(|p| p == "linkedin") {
            warn!("LinkedIn options supplied without targeting linkedin; they will be ignored");
        }

        Ok(self)
    }

    pub fn mode(&self) -> PublishMode {
        PublishMode::resolve(self.is_draft, self.schedule_for.as_deref(), self.use_queue)
    }
}

/// Canonicalize and de-duplicate platform names, keeping first occurrence order
pub fn normalize_platforms(platforms: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(platforms.len());

    for platform in platforms {
        let name = canonical_platform(platform);
        if name.is_empty() {
            return Err(SyndicastError::validation("platform names cannot be blank"));
        }
        if !normalized.contains(&name) {
            normalized.push(name);
        }
    }

    if normalized.is_empty() {
        return Err(SyndicastError::validation(
            "at least one platform is required",
        ));
    }

    Ok(normalized)
}

impl PublishService {
    /// Publish one post to every requested platform.
    ///
    /// Returns `PublishOutcome::Cancelled` when the user declines at the
    /// confirmation prompt; that is not an error.
    ///
    /// # Errors
    ///
    /// - `Validation` for bad arguments, before any API call
    /// - `Resolution` naming every platform without a matching account
    /// - `Upload` for the first media file that fails; later files are not tried
    /// - `Submission` with a full diagnostic if the API rejects the post
    pub async fn create_post(&self, request: CreatePostRequest) -> Result<PublishOutcome> {
        let request = request.normalized()?;
        let mode = request.mode();

        let connected = self.fetch_accounts().await?;
        let resolved = accounts::resolve(&request.platforms, &connected, &request.hint)?;
        info!(platforms = ?resolved.platforms(), "Resolved accounts");

        let media_items = MediaUploader::new(self.api())
            .upload_all(&request.media)
            .await?;

        let entries = build_platform_entries(&resolved, request.linkedin.as_ref());

        let preview = Preview {
            targets: Preview::for_accounts(&resolved),
            content: request.content.clone(),
            media_count: media_items.len(),
            mode_label: mode.label(),
            thread_items: None,
        };

        if self.confirm(&mode, &preview) == Decision::Declined {
            info!(mode = %mode, "Post cancelled at confirmation");
            return Ok(PublishOutcome::Cancelled);
        }

        let payload = PostPayload {
            content: request.content.clone(),
            title: request.title.clone(),
            media_items,
            platforms: entries,
            signal: mode.signal(),
        };

        info!(mode = %mode, platforms = payload.platforms.len(), "Submitting post");
        match self.api().create_post(&payload).await {
            Ok(created) => {
                info!(post_id = %created.post_id, status = %created.status, "Post accepted");
                Ok(PublishOutcome::Published(created))
            }
            Err(remote_error) => {
                warn!(error = %remote_error, "Post submission rejected");
                Err(SubmissionError::new(Diagnostic::new(
                    remote_error,
                    SubmissionTarget::Platforms(resolved.platforms()),
                    request.content.chars().count(),
                    mode.label(),
                ))
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::api::mock::{ApiCall, MockApi};
    use crate::config::AgentSettings;
    use crate::confirm::ScriptedGate;
    use crate::error::ApiError;
    use crate::types::{MediaKind, PlatformExtension};

    fn service(api: &MockApi, gate: Arc<ScriptedGate>, confirm: bool) -> PublishService {
        PublishService::new(
            Arc::new(api.clone()),
            AgentSettings {
                enabled: true,
                confirm_destructive_actions: confirm,
            },
            gate,
        )
    }

    fn platforms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalized_request() {
        let mut request =
            CreatePostRequest::new("hi", platforms(&[" Twitter", "linkedin", "twitter"]));
        request.title = Some("  ".to_string());
        request.schedule_for = Some("2024-12-25T11:00:00+01:00".to_string());

        let request = request.normalized().unwrap();
        assert_eq!(request.platforms, platforms(&["twitter", "linkedin"]));
        assert_eq!(request.title, None);
        assert_eq!(
            request.schedule_for.as_deref(),
            Some("2024-12-25T10:00:00Z")
        );
    }

    #[test]
    fn test_x_is_twitter() {
        let request = CreatePostRequest::new("hi", platforms(&["X", "twitter", "linkedin"]))
            .normalized()
            .unwrap();
        assert_eq!(request.platforms, platforms(&["twitter", "linkedin"]));
    }

    #[test]
    fn test_draft_drops_schedule_without_parsing() {
        let mut request = CreatePostRequest::new("hi", platforms(&["twitter"]));
        request.is_draft = true;
        request.schedule_for = Some("next week".to_string());

        let request = request.normalized().unwrap();
        assert_eq!(request.schedule_for, None);
        assert_eq!(request.mode(), PublishMode::Draft);
    }

    #[test]
    fn test_rejects_empty_content_and_platforms() {
        let err = CreatePostRequest::new("  ", platforms(&["twitter"]))
            .normalized()
            .unwrap_err();
        assert!(err.to_string().contains("content cannot be empty"));

        let err = CreatePostRequest::new("hi", Vec::new())
            .normalized()
            .unwrap_err();
        assert!(err.to_string().contains("at least one platform"));
    }

    #[tokio::test]
    async fn test_publish_now_without_confirmation() {
        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let gate = Arc::new(ScriptedGate::decline());

        let outcome = service(&api, gate.clone(), false)
            .create_post(CreatePostRequest::new("hello", platforms(&["twitter"])))
            .await
            .unwrap();

        let PublishOutcome::Published(created) = outcome else {
            panic!("expected a published post");
        };
        assert_eq!(created.status, "published");
        assert_eq!(gate.prompt_count(), 0);

        let submitted = api.submitted_posts();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].platforms[0].account_id, "A1");
        assert_eq!(submitted[0].signal.publish_now, Some(true));
    }

    #[tokio::test]
    async fn test_decline_skips_submission_but_keeps_uploads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let gate = Arc::new(ScriptedGate::decline());
        let mut request = CreatePostRequest::new("hello", platforms(&["twitter"]));
        request.media = vec![path];

        let outcome = service(&api, gate.clone(), true)
            .create_post(request)
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Cancelled);
        assert_eq!(gate.prompt_count(), 1);
        assert_eq!(api.uploads().len(), 1);
        assert!(!api.calls().contains(&ApiCall::CreatePost));

        let preview = gate.last_preview().unwrap();
        assert!(preview.contains("twitter (@alice)"));
        assert!(preview.contains("1 file(s)"));
        assert!(preview.contains("publish now"));
    }

    #[tokio::test]
    async fn test_drafts_are_not_confirmed() {
        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let gate = Arc::new(ScriptedGate::decline());
        let mut request = CreatePostRequest::new("draft me", platforms(&["twitter"]));
        request.is_draft = true;

        let outcome = service(&api, gate.clone(), true)
            .create_post(request)
            .await
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Published(ref p) if p.status == "draft"));
        assert_eq!(gate.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_platform_aborts_before_upload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"mp4").unwrap();

        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let mut request = CreatePostRequest::new("hello", platforms(&["twitter", "instagram"]));
        request.media = vec![path];

        let err = service(&api, Arc::new(ScriptedGate::approve()), true)
            .create_post(request)
            .await
            .unwrap_err();

        let SyndicastError::Resolution(resolution) = &err else {
            panic!("expected a resolution error, got {:?}", err);
        };
        assert_eq!(resolution.missing, platforms(&["instagram"]));
        assert_eq!(api.calls(), vec![ApiCall::ListAccounts]);
    }

    #[tokio::test]
    async fn test_linkedin_entry_carries_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"mp4").unwrap();

        let api = MockApi::new()
            .with_account("twitter", "tw_1", "alice")
            .with_account("linkedin", "li_1", "alice");
        let mut request = CreatePostRequest::new("launch day", platforms(&["twitter", "linkedin"]));
        request.media = vec![path];
        request.linkedin = Some(LinkedInOptions {
            organization_urn: Some("urn:li:organization:42".to_string()),
            ..Default::default()
        });

        service(&api, Arc::new(ScriptedGate::approve()), true)
            .create_post(request)
            .await
            .unwrap();

        let payload = &api.submitted_posts()[0];
        assert_eq!(payload.media_items.len(), 1);
        assert_eq!(payload.media_items[0].kind, MediaKind::Video);
        assert!(payload.platforms[0].extension.is_none());
        assert!(matches!(
            &payload.platforms[1].extension,
            Some(PlatformExtension::LinkedIn(options))
                if options.organization_urn.as_deref() == Some("urn:li:organization:42")
        ));
    }

    #[tokio::test]
    async fn test_rejected_submission_has_diagnostic() {
        let api = MockApi::new()
            .with_account("twitter", "A1", "alice")
            .fail_create_post(ApiError::Status {
                status: 429,
                body: "Too many requests".to_string(),
            });
        let mut request = CreatePostRequest::new("héllo", platforms(&["twitter"]));
        request.use_queue = true;

        let err = service(&api, Arc::new(ScriptedGate::approve()), true)
            .create_post(request)
            .await
            .unwrap_err();

        let SyndicastError::Submission(submission) = &err else {
            panic!("expected a submission error, got {:?}", err);
        };
        let diagnostic = submission.diagnostic();
        assert_eq!(diagnostic.content_length, 5);
        assert_eq!(diagnostic.mode_label, "queued");
        assert_eq!(
            diagnostic.target,
            SubmissionTarget::Platforms(platforms(&["twitter"]))
        );
        assert!(err.to_string().contains("Too many requests"));
        assert_eq!(api.submitted_posts().len(), 1);
    }
}
