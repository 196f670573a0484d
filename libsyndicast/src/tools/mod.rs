//! Agent-facing tool registry
//!
//! A tool call arrives as a name plus JSON arguments. [`ToolCall::parse`]
//! turns it into a typed, validated request; [`ToolRegistry::dispatch`]
//! runs it against the [`PublishService`] and converts every outcome,
//! errors included, into a [`ToolResult`]. Nothing escapes dispatch as an
//! error or panic.

pub mod args;
pub mod schema;

pub use schema::{definitions, ToolDefinition};

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use self::args::{
    AccountArgs, CreatePostArgs, CreateThreadArgs, ListAccountsArgs, ListPostsArgs,
    UploadMediaArgs,
};
use crate::accounts::TargetHint;
use crate::error::{Result, SyndicastError};
use crate::mode::PublishMode;
use crate::payload::ensure_thread_len;
use crate::service::{CreatePostRequest, CreateThreadRequest, PublishService};
use crate::types::{CreatedPost, ListPostsQuery, PublishOutcome};

/// Tool names
pub mod names {
    pub const CREATE_POST: &str = "create_post";
    pub const CREATE_THREAD: &str = "create_thread";
    pub const LIST_POSTS: &str = "list_posts";
    pub const LIST_LINKEDIN_ORGANIZATIONS: &str = "list_linkedin_organizations";
    pub const LIST_ACCOUNTS: &str = "list_accounts";
    pub const UPLOAD_MEDIA: &str = "upload_media";
    pub const CHECK_ACCOUNT_HEALTH: &str = crate::diagnostics::HEALTH_CHECK_TOOL;
}

/// Exit code reported for a successful tool result
const EXIT_OK: i32 = 0;

/// Structured result handed back to the agent host
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip)]
    exit_code: i32,
}

impl ToolResult {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            exit_code: EXIT_OK,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            exit_code: 1,
        }
    }

    pub fn from_error(error: &SyndicastError) -> Self {
        Self {
            exit_code: error.exit_code(),
            ..Self::failure(error.to_string())
        }
    }

    /// Process exit code for hosts that surface one: 0 on success
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

/// A parsed and validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    CreatePost(CreatePostRequest),
    CreateThread(CreateThreadRequest),
    ListPosts(ListPostsQuery),
    ListLinkedInOrganizations(TargetHint),
    ListAccounts { platform: Option<String> },
    UploadMedia(PathBuf),
    CheckAccountHealth,
}

fn decode<T: serde::de::DeserializeOwned>(tool: &str, input: Value) -> Result<T> {
    let input = if input.is_null() { json!({}) } else { input };
    serde_json::from_value(input).map_err(|e| {
        SyndicastError::validation(format!("invalid arguments for {}: {}", tool, e))
    })
}

impl ToolCall {
    /// Deserialize and validate the arguments for tool `name`
    pub fn parse(name: &str, input: Value) -> Result<Self> {
        match name {
            names::CREATE_POST => {
                let args: CreatePostArgs = decode(name, input)?;
                Ok(ToolCall::CreatePost(args.into_request()?))
            }
            names::CREATE_THREAD => {
                // Item count is judged before any other argument, malformed ones included.
                if let Some(items) = CreateThreadArgs::ITEM_KEYS
                    .iter()
                    .find_map(|key| input.get(*key))
                    .and_then(Value::as_array)
                {
                    ensure_thread_len(items.len())?;
                }
                let args: CreateThreadArgs = decode(name, input)?;
                Ok(ToolCall::CreateThread(args.into_request()?))
            }
            names::LIST_POSTS => {
                let args: ListPostsArgs = decode(name, input)?;
                Ok(ToolCall::ListPosts(args.into_query()?))
            }
            names::LIST_LINKEDIN_ORGANIZATIONS => {
                let args: AccountArgs = decode(name, input)?;
                Ok(ToolCall::ListLinkedInOrganizations(args.into_hint()?))
            }
            names::LIST_ACCOUNTS => {
                let args: ListAccountsArgs = decode(name, input)?;
                Ok(ToolCall::ListAccounts {
                    platform: args.platform,
                })
            }
            names::UPLOAD_MEDIA => {
                let args: UploadMediaArgs = decode(name, input)?;
                Ok(ToolCall::UploadMedia(args.into_path()?))
            }
            names::CHECK_ACCOUNT_HEALTH => Ok(ToolCall::CheckAccountHealth),
            other => Err(SyndicastError::validation(format!(
                "unknown tool '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::CreatePost(_) => names::CREATE_POST,
            ToolCall::CreateThread(_) => names::CREATE_THREAD,
            ToolCall::ListPosts(_) => names::LIST_POSTS,
            ToolCall::ListLinkedInOrganizations(_) => names::LIST_LINKEDIN_ORGANIZATIONS,
            ToolCall::ListAccounts { .. } => names::LIST_ACCOUNTS,
            ToolCall::UploadMedia(_) => names::UPLOAD_MEDIA,
            ToolCall::CheckAccountHealth => names::CHECK_ACCOUNT_HEALTH,
        }
    }
}

fn to_data<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn published_data(created: &CreatedPost) -> Option<Value> {
    Some(json!({
        "postId": created.post_id,
        "status": created.status,
        "scheduledFor": created.scheduled_for,
    }))
}

/// Dispatches tool calls to a [`PublishService`]
pub struct ToolRegistry {
    service: PublishService,
}

impl ToolRegistry {
    pub fn new(service: PublishService) -> Self {
        Self { service }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        definitions()
    }

    /// Run one tool invocation to completion.
    ///
    /// May block on the confirmation prompt for publishing tools.
    pub async fn dispatch(&self, name: &str, input: Value) -> ToolResult {
        if !self.service.settings().enabled {
            warn!(tool = name, "Agent tools are disabled");
            return ToolResult::failure("agent tools are disabled");
        }

        let call = match ToolCall::parse(name, input) {
            Ok(call) => call,
            Err(e) => {
                warn!(tool = name, error = %e, "Rejected tool arguments");
                return ToolResult::from_error(&e);
            }
        };

        info!(tool = call.name(), "Running tool");
        match self.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool failed");
                ToolResult::from_error(&e)
            }
        }
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        match call {
            ToolCall::CreatePost(request) => {
                let mode = request.mode();
                let platforms = request.platforms.join(", ");
                Ok(match self.service.create_post(request).await? {
                    PublishOutcome::Published(created) => ToolResult::success(
                        format!("Post {} on {}", outcome_verb(&created, &mode), platforms),
                        published_data(&created),
                    ),
                    PublishOutcome::Cancelled => {
                        ToolResult::success("Post cancelled by user", None)
                    }
                })
            }
            ToolCall::CreateThread(request) => {
                let mode = request.mode();
                let platform = request.platform;
                let count = request.items.len();
                Ok(match self.service.create_thread(request).await? {
                    PublishOutcome::Published(created) => ToolResult::success(
                        format!(
                            "Thread of {} posts {} on {}",
                            count,
                            outcome_verb(&created, &mode),
                            platform
                        ),
                        published_data(&created),
                    ),
                    PublishOutcome::Cancelled => {
                        ToolResult::success("Thread cancelled by user", None)
                    }
                })
            }
            ToolCall::ListPosts(query) => {
                let page = self.service.list_posts(&query).await?;
                Ok(ToolResult::success(
                    format!(
                        "Found {} posts (page {} of {})",
                        page.pagination.total,
                        page.pagination.page,
                        page.pagination.pages.max(1)
                    ),
                    to_data(&page),
                ))
            }
            ToolCall::ListLinkedInOrganizations(hint) => {
                let listing = self.service.linkedin_organizations(&hint).await?;
                Ok(ToolResult::success(
                    format!(
                        "{} organization(s) for LinkedIn account {}",
                        listing.organizations.len(),
                        listing.account.account_id
                    ),
                    Some(json!({
                        "accountId": listing.account.account_id,
                        "organizations": listing.organizations,
                    })),
                ))
            }
            ToolCall::ListAccounts { platform } => {
                let accounts = self.service.list_accounts(platform.as_deref()).await?;
                Ok(ToolResult::success(
                    format!("{} connected account(s)", accounts.len()),
                    to_data(&accounts),
                ))
            }
            ToolCall::UploadMedia(path) => {
                let item = self.service.upload_media(&path).await?;
                Ok(ToolResult::success(
                    format!("Uploaded {} ({})", item.filename, item.kind),
                    to_data(&item),
                ))
            }
            ToolCall::CheckAccountHealth => {
                let health = self.service.account_health().await?;
                let unhealthy = health
                    .iter()
                    .filter(|h| !matches!(h.status.as_str(), "active" | "healthy" | "ok"))
                    .count();
                Ok(ToolResult::success(
                    format!(
                        "{} account(s) checked, {} need attention",
                        health.len(),
                        unhealthy
                    ),
                    to_data(&health),
                ))
            }
        }
    }
}

fn outcome_verb(created: &CreatedPost, mode: &PublishMode) -> String {
    match mode {
        PublishMode::Draft => "saved as draft".to_string(),
        PublishMode::Scheduled(at) => {
            format!("scheduled for {}", created.scheduled_for.as_deref().unwrap_or(at))
        }
        PublishMode::Queued => "added to queue".to_string(),
        PublishMode::PublishNow => "published".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::mock::{ApiCall, MockApi};
    use crate::config::AgentSettings;
    use crate::confirm::ScriptedGate;
    use crate::error::ApiError;

    fn registry(api: &MockApi, settings: AgentSettings, gate: ScriptedGate) -> ToolRegistry {
        ToolRegistry::new(PublishService::new(
            Arc::new(api.clone()),
            settings,
            Arc::new(gate),
        ))
    }

    fn no_confirm() -> AgentSettings {
        AgentSettings {
            enabled: true,
            confirm_destructive_actions: false,
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("delete_everything", json!({})).unwrap_err();
        assert!(err.to_string().contains("unknown tool 'delete_everything'"));
    }

    #[test]
    fn test_parse_thread_counts_items_first() {
        let err = ToolCall::parse(
            names::CREATE_THREAD,
            json!({ "items": [{ "content": "one" }], "is_draft": "not a bool" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least 2 items"));
    }

    #[test]
    fn test_parse_null_arguments() {
        let call = ToolCall::parse(names::LIST_POSTS, Value::Null).unwrap();
        assert_eq!(call, ToolCall::ListPosts(ListPostsQuery::default()));
    }

    #[test]
    fn test_parse_accepts_null_for_unset_options() {
        let call = ToolCall::parse(
            names::CREATE_POST,
            json!({
                "content": "hi",
                "platforms": ["twitter"],
                "is_draft": null,
                "use_queue": null,
                "media_paths": null
            }),
        )
        .unwrap();
        assert_eq!(call.name(), names::CREATE_POST);

        let call = ToolCall::parse(
            names::CREATE_THREAD,
            json!({
                "platform": "twitter",
                "items": [{ "content": "one" }, { "content": "two", "media_paths": null }],
                "isDraft": null,
                "useQueue": null
            }),
        )
        .unwrap();
        assert_eq!(call.name(), names::CREATE_THREAD);
    }

    #[test]
    fn test_parse_type_mismatch() {
        let err = ToolCall::parse(names::LIST_POSTS, json!({ "page": "two" })).unwrap_err();
        assert!(err.to_string().contains("invalid arguments for list_posts"));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_create_post_success_result() {
        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let result = registry(&api, no_confirm(), ScriptedGate::decline())
            .dispatch(
                names::CREATE_POST,
                json!({ "content": "hello", "platforms": ["twitter"] }),
            )
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Post published on twitter");
        assert_eq!(result.exit_code(), 0);
        let data = result.data.unwrap();
        assert!(data["postId"].as_str().unwrap().starts_with("post-"));
        assert_eq!(data["status"], "published");
    }

    #[tokio::test]
    async fn test_cancelled_is_success() {
        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let result = registry(&api, AgentSettings::default(), ScriptedGate::decline())
            .dispatch(
                names::CREATE_POST,
                json!({ "content": "hello", "platforms": ["twitter"] }),
            )
            .await;

        assert!(result.success);
        assert!(result.message.ends_with("cancelled by user"));
        assert!(!api.calls().contains(&ApiCall::CreatePost));
    }

    #[tokio::test]
    async fn test_disabled_agent_refuses_everything() {
        let api = MockApi::new().with_account("twitter", "A1", "alice");
        let settings = AgentSettings {
            enabled: false,
            confirm_destructive_actions: true,
        };
        let registry = registry(&api, settings, ScriptedGate::approve());

        for def in definitions() {
            let result = registry.dispatch(def.name, json!({})).await;
            assert!(!result.success);
            assert_eq!(result.message, "agent tools are disabled");
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_errors_become_failed_results() {
        let api = MockApi::new().fail_list_accounts(ApiError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        });
        let result = registry(&api, no_confirm(), ScriptedGate::approve())
            .dispatch(names::LIST_ACCOUNTS, json!({}))
            .await;

        assert!(!result.success);
        assert!(result.message.contains("invalid api key"));
        assert_eq!(result.exit_code(), 2);
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_scheduled_thread_message() {
        let api = MockApi::new().with_account("threads", "th_1", "alice");
        let result = registry(&api, no_confirm(), ScriptedGate::approve())
            .dispatch(
                names::CREATE_THREAD,
                json!({
                    "platform": "threads",
                    "items": [{ "content": "one" }, { "content": "two" }],
                    "schedule_for": "2024-12-25T10:00:00Z"
                }),
            )
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(
            result.message,
            "Thread of 2 posts scheduled for 2024-12-25T10:00:00Z on threads"
        );
        assert_eq!(result.data.unwrap()["scheduledFor"], "2024-12-25T10:00:00Z");
    }

    #[tokio::test]
    async fn test_check_account_health_counts_problems() {
        let api = MockApi::new().with_health(vec![
            crate::types::AccountHealth {
                platform: "twitter".to_string(),
                username: "alice".to_string(),
                status: "active".to_string(),
                message: None,
            },
            crate::types::AccountHealth {
                platform: "linkedin".to_string(),
                username: "alice".to_string(),
                status: "expired".to_string(),
                message: Some("Token expired on 2024-11-01".to_string()),
            },
        ]);
        let result = registry(&api, no_confirm(), ScriptedGate::approve())
            .dispatch(names::CHECK_ACCOUNT_HEALTH, Value::Null)
            .await;

        assert!(result.success);
        assert_eq!(result.message, "2 account(s) checked, 1 need attention");
    }
}
