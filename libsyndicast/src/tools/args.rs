//! Typed tool arguments
//!
//! Each tool's JSON arguments deserialize into one of these structs and are
//! then checked in a single pass by `into_*`. Field names are snake_case;
//! camelCase spellings are accepted as aliases.

use std::path::PathBuf;

use serde::Deserialize;

use crate::accounts::TargetHint;
use crate::error::{Result, SyndicastError};
use crate::payload::ThreadPlatform;
use crate::service::{CreatePostRequest, CreateThreadRequest, ThreadItemRequest};
use crate::types::{LinkedInOptions, ListPostsQuery};

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        SyndicastError::validation(format!("missing required argument '{}'", field))
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkedInArgs {
    #[serde(alias = "organizationUrn")]
    pub organization_urn: Option<String>,
    #[serde(alias = "documentTitle")]
    pub document_title: Option<String>,
    #[serde(alias = "disableLinkPreview")]
    pub disable_link_preview: Option<bool>,
    #[serde(alias = "firstComment")]
    pub first_comment: Option<String>,
}

impl From<LinkedInArgs> for LinkedInOptions {
    fn from(args: LinkedInArgs) -> Self {
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        LinkedInOptions {
            organization_urn: non_blank(args.organization_urn),
            document_title: non_blank(args.document_title),
            disable_link_preview: args.disable_link_preview,
            first_comment: non_blank(args.first_comment),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostArgs {
    pub content: Option<String>,
    pub title: Option<String>,
    pub platforms: Option<Vec<String>>,
    #[serde(alias = "mediaPaths", alias = "media")]
    pub media_paths: Option<Vec<PathBuf>>,
    #[serde(alias = "scheduleFor", alias = "scheduled_for", alias = "scheduledFor")]
    pub schedule_for: Option<String>,
    #[serde(alias = "isDraft")]
    pub is_draft: Option<bool>,
    #[serde(alias = "useQueue")]
    pub use_queue: Option<bool>,
    #[serde(alias = "accountId")]
    pub account_id: Option<String>,
    pub username: Option<String>,
    pub linkedin: Option<LinkedInArgs>,
}

impl CreatePostArgs {
    pub fn into_request(self) -> Result<CreatePostRequest> {
        let content = required("content", self.content)?;
        let platforms = required("platforms", self.platforms)?;
        let hint = TargetHint::from_args(self.account_id.as_deref(), self.username.as_deref())?;

        CreatePostRequest {
            content,
            title: self.title,
            platforms,
            media: self.media_paths.unwrap_or_default(),
            schedule_for: self.schedule_for,
            is_draft: self.is_draft.unwrap_or_default(),
            use_queue: self.use_queue.unwrap_or_default(),
            hint,
            linkedin: self
                .linkedin
                .map(LinkedInOptions::from)
                .filter(|options| !options.is_empty()),
        }
        .normalized()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThreadItemArgs {
    pub content: Option<String>,
    #[serde(alias = "mediaPaths", alias = "media")]
    pub media_paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateThreadArgs {
    pub platform: Option<String>,
    #[serde(alias = "thread_items", alias = "threadItems")]
    pub items: Option<Vec<ThreadItemArgs>>,
    #[serde(alias = "firstComment")]
    pub first_comment: Option<String>,
    #[serde(alias = "scheduleFor", alias = "scheduled_for", alias = "scheduledFor")]
    pub schedule_for: Option<String>,
    #[serde(alias = "isDraft")]
    pub is_draft: Option<bool>,
    #[serde(alias = "useQueue")]
    pub use_queue: Option<bool>,
    #[serde(alias = "accountId")]
    pub account_id: Option<String>,
    pub username: Option<String>,
}

impl CreateThreadArgs {
    /// Names under which the item list may appear in raw arguments
    pub const ITEM_KEYS: [&'static str; 3] = ["items", "thread_items", "threadItems"];

    pub fn into_request(self) -> Result<CreateThreadRequest> {
        let items = self.items.unwrap_or_default();
        crate::payload::ensure_thread_len(items.len())?;

        let platform = ThreadPlatform::parse(&required("platform", self.platform)?)?;
        let hint = TargetHint::from_args(self.account_id.as_deref(), self.username.as_deref())?;

        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Ok(ThreadItemRequest {
                    content: required(&format!("items[{}].content", i), item.content)?,
                    media: item.media_paths.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        CreateThreadRequest {
            platform,
            items,
            first_comment: self.first_comment,
            schedule_for: self.schedule_for,
            is_draft: self.is_draft.unwrap_or_default(),
            use_queue: self.use_queue.unwrap_or_default(),
            hint,
        }
        .normalized()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListPostsArgs {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub platform: Option<String>,
}

impl ListPostsArgs {
    pub fn into_query(self) -> Result<ListPostsQuery> {
        let defaults = ListPostsQuery::default();
        let non_blank = |s: Option<String>| {
            s.map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
        };

        let query = ListPostsQuery {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
            status: non_blank(self.status),
            platform: non_blank(self.platform),
        };
        query.validate()?;
        Ok(query)
    }
}

/// Arguments for tools that target one account by id or username
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountArgs {
    #[serde(alias = "accountId")]
    pub account_id: Option<String>,
    pub username: Option<String>,
}

impl AccountArgs {
    pub fn into_hint(self) -> Result<TargetHint> {
        TargetHint::from_args(self.account_id.as_deref(), self.username.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListAccountsArgs {
    pub platform: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadMediaArgs {
    #[serde(alias = "file", alias = "file_path", alias = "filePath")]
    pub path: Option<PathBuf>,
}

impl UploadMediaArgs {
    pub fn into_path(self) -> Result<PathBuf> {
        required("path", self.path.filter(|p| !p.as_os_str().is_empty()))
    }
}
