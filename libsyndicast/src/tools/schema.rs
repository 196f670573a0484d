//! JSON Schema descriptions of every tool, as handed to the agent host

use serde::Serialize;
use serde_json::{json, Value};

use super::names;
use crate::service::query::MAX_PAGE_LIMIT;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn targeting_properties() -> Value {
    json!({
        "account_id": {
            "type": "string",
            "description": "Publish with this connected account id. Cannot be combined with username."
        },
        "username": {
            "type": "string",
            "description": "Publish with the connected account having this username (leading @ optional, case-insensitive). Cannot be combined with account_id."
        }
    })
}

fn mode_properties() -> Value {
    json!({
        "schedule_for": {
            "type": "string",
            "format": "date-time",
            "description": "RFC 3339 timestamp to publish at, e.g. 2024-12-25T10:00:00Z"
        },
        "is_draft": {
            "type": "boolean",
            "default": false,
            "description": "Save as a draft instead of publishing. Takes precedence over schedule_for and use_queue."
        },
        "use_queue": {
            "type": "boolean",
            "default": false,
            "description": "Add to the account's posting queue (next free slot). Ignored when schedule_for is set."
        }
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(extra)) = (base.as_object_mut(), extra) {
        target.extend(extra);
    }
    base
}

fn create_post() -> ToolDefinition {
    let properties = merge(
        json!({
            "content": {
                "type": "string",
                "description": "Text of the post"
            },
            "platforms": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "description": "Platforms to publish to, e.g. [\"twitter\", \"linkedin\"]. Each needs a connected account; \"x\" is accepted for twitter."
            },
            "title": {
                "type": "string",
                "description": "Optional title (used by platforms that support one)"
            },
            "media_paths": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Local files to upload and attach, in order"
            },
            "linkedin": {
                "type": "object",
                "description": "LinkedIn-only options",
                "properties": {
                    "organization_urn": {
                        "type": "string",
                        "description": "Post as this organization page (see list_linkedin_organizations)"
                    },
                    "document_title": {
                        "type": "string",
                        "description": "Title shown for an attached PDF/document"
                    },
                    "disable_link_preview": {
                        "type": "boolean",
                        "description": "Suppress the link preview card"
                    },
                    "first_comment": {
                        "type": "string",
                        "description": "Comment added right after publishing"
                    }
                }
            }
        }),
        merge(mode_properties(), targeting_properties()),
    );

    ToolDefinition {
        name: names::CREATE_POST,
        description: "Publish a post to one or more connected social accounts. \
                      Media files are uploaded first. Unless saved as a draft, the user \
                      is asked to confirm before anything is published.",
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": ["content", "platforms"]
        }),
    }
}

fn create_thread() -> ToolDefinition {
    let properties = merge(
        json!({
            "platform": {
                "type": "string",
                "enum": ["twitter", "threads"],
                "description": "Platform that hosts the thread"
            },
            "items": {
                "type": "array",
                "minItems": 2,
                "description": "Posts of the thread in order; each replies to the previous one",
                "items": {
                    "type": "object",
                    "properties": {
                        "content": { "type": "string" },
                        "media_paths": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["content"]
                }
            },
            "first_comment": {
                "type": "string",
                "description": "Reply added after the last item"
            }
        }),
        merge(mode_properties(), targeting_properties()),
    );

    ToolDefinition {
        name: names::CREATE_THREAD,
        description: "Publish a multi-post thread (at least 2 items) on twitter or threads \
                      from a single connected account.",
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": ["platform", "items"]
        }),
    }
}

fn list_posts() -> ToolDefinition {
    ToolDefinition {
        name: names::LIST_POSTS,
        description: "List posts known to the publishing service, newest first.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "page": { "type": "integer", "minimum": 1, "default": 1 },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_PAGE_LIMIT,
                    "default": 10
                },
                "status": {
                    "type": "string",
                    "description": "Only posts in this state, e.g. draft, scheduled, published, failed"
                },
                "platform": {
                    "type": "string",
                    "description": "Only posts targeting this platform"
                }
            }
        }),
    }
}

fn list_linkedin_organizations() -> ToolDefinition {
    ToolDefinition {
        name: names::LIST_LINKEDIN_ORGANIZATIONS,
        description: "List the LinkedIn organization pages an account can post as. \
                      Defaults to the first connected LinkedIn account.",
        input_schema: json!({
            "type": "object",
            "properties": targeting_properties()
        }),
    }
}

fn list_accounts() -> ToolDefinition {
    ToolDefinition {
        name: names::LIST_ACCOUNTS,
        description: "List connected social accounts with their ids and usernames.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "platform": {
                    "type": "string",
                    "description": "Only accounts on this platform"
                }
            }
        }),
    }
}

fn upload_media() -> ToolDefinition {
    ToolDefinition {
        name: names::UPLOAD_MEDIA,
        description: "Upload one local file and return its public URL and media type.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Local file path" }
            },
            "required": ["path"]
        }),
    }
}

fn check_account_health() -> ToolDefinition {
    ToolDefinition {
        name: names::CHECK_ACCOUNT_HEALTH,
        description: "Report token and connection status for every connected account. \
                      Run this when a post is rejected.",
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

/// Every tool the registry can dispatch
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        create_post(),
        create_thread(),
        list_posts(),
        list_linkedin_organizations(),
        list_accounts(),
        upload_media(),
        check_account_health(),
    ]
}
