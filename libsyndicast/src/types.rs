//! Core types for Syndicast
//!
//! Wire-facing types serialize as camelCase JSON to match the publishing API.

use serde::{Deserialize, Serialize};

/// A social account connected to the publishing service.
///
/// Fetched fresh on every invocation, never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccount {
    pub platform: String,
    #[serde(alias = "_id", alias = "id")]
    pub account_id: String,
    #[serde(default)]
    pub username: String,
}

impl ConnectedAccount {
    pub fn new(platform: &str, account_id: &str, username: &str) -> Self {
        Self {
            platform: platform.to_string(),
            account_id: account_id.to_string(),
            username: username.to_string(),
        }
    }
}

/// Kind of uploaded media, as understood by the create-post endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type. Anything that is not `video/*` is treated as an image.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A media file after upload: public URL plus classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub filename: String,
}

/// Upload target returned by the presign endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub public_url: String,
}

/// LinkedIn-only fields. Absent fields are omitted from the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_urn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_link_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment: Option<String>,
}

impl LinkedInOptions {
    pub fn is_empty(&self) -> bool {
        self.organization_urn.is_none()
            && self.document_title.is_none()
            && self.disable_link_preview.is_none()
            && self.first_comment.is_none()
    }
}

/// One post in a thread; each item replies to the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadItem {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_items: Option<Vec<MediaItem>>,
}

/// Thread body shared by the twitter and threads variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadOptions {
    pub thread_items: Vec<ThreadItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment: Option<String>,
}

/// Platform-specific data attached to a [`PlatformEntry`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PlatformExtension {
    Thread(ThreadOptions),
    LinkedIn(LinkedInOptions),
}

/// Target of a post: one platform and the account to publish with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntry {
    pub platform: String,
    pub account_id: String,
    #[serde(
        rename = "platformSpecificData",
        skip_serializing_if = "Option::is_none"
    )]
    pub extension: Option<PlatformExtension>,
}

/// A LinkedIn organization page the account can post as
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInOrganization {
    #[serde(alias = "id")]
    pub urn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vanity_name: Option<String>,
}

/// Post as acknowledged by the create-post endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    #[serde(alias = "_id", alias = "id")]
    pub post_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scheduled_for: Option<String>,
}

/// Terminal state of a publish invocation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(CreatedPost),
    /// The user declined at the confirmation prompt
    Cancelled,
}

/// Per-platform status within a listed post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPlatformStatus {
    pub platform: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A post returned by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub platforms: Vec<PostPlatformStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

/// One page of posts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<PostSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Filters for the post listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPostsQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<String>,
    pub platform: Option<String>,
}

impl Default for ListPostsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: None,
            platform: None,
        }
    }
}

/// Token/connection health of a connected account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountHealth {
    pub platform: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Image);
        assert_eq!(
            MediaKind::from_mime("application/octet-stream"),
            MediaKind::Image
        );
    }

    #[test]
    fn test_connected_account_accepts_id_aliases() {
        let json = r#"{"_id": "acc_1", "platform": "twitter", "username": "alice"}"#;
        let account: ConnectedAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.account_id, "acc_1");

        let json = r#"{"accountId": "acc_2", "platform": "linkedin"}"#;
        let account: ConnectedAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.account_id, "acc_2");
        assert_eq!(account.username, "");
    }

    #[test]
    fn test_linkedin_entry_omits_absent_fields() {
        let entry = PlatformEntry {
            platform: "linkedin".to_string(),
            account_id: "li_1".to_string(),
            extension: Some(PlatformExtension::LinkedIn(LinkedInOptions {
                first_comment: Some("Link in comments".to_string()),
                ..Default::default()
            })),
        };

        let value = serde_json::to_value(&entry).unwrap();
        let data = &value["platformSpecificData"];
        assert_eq!(data["firstComment"], "Link in comments");
        assert!(data.get("organizationUrn").is_none());
        assert!(data.get("disableLinkPreview").is_none());
        assert_eq!(value["accountId"], "li_1");
    }

    #[test]
    fn test_entry_without_extension_has_no_platform_data() {
        let entry = PlatformEntry {
            platform: "twitter".to_string(),
            account_id: "tw_1".to_string(),
            extension: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("platformSpecificData").is_none());
    }

    #[test]
    fn test_media_item_serializes_kind_as_type() {
        let item = MediaItem {
            url: "https://cdn.example.com/a.png".to_string(),
            kind: MediaKind::Image,
            filename: "a.png".to_string(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "image");
    }
}
