//! Publish mode selection
//!
//! Precedence: draft, then explicit schedule, then queue, then publish now.
//! Exactly one signal reaches the create-post call.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SyndicastError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishMode {
    Draft,
    /// RFC 3339 timestamp
    Scheduled(String),
    /// Next free slot in the account's posting queue
    Queued,
    PublishNow,
}

/// The mode as sent on the wire. At most one field is ever set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModeSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_queue: Option<bool>,
}

impl PublishMode {
    pub fn resolve(is_draft: bool, schedule_for: Option<&str>, use_queue: bool) -> Self {
        if is_draft {
            PublishMode::Draft
        } else if let Some(at) = schedule_for {
            PublishMode::Scheduled(at.to_string())
        } else if use_queue {
            PublishMode::Queued
        } else {
            PublishMode::PublishNow
        }
    }

    pub fn signal(&self) -> ModeSignal {
        match self {
            PublishMode::Draft => ModeSignal {
                is_draft: Some(true),
                ..Default::default()
            },
            PublishMode::Scheduled(at) => ModeSignal {
                scheduled_for: Some(at.clone()),
                ..Default::default()
            },
            PublishMode::Queued => ModeSignal {
                use_queue: Some(true),
                ..Default::default()
            },
            PublishMode::PublishNow => ModeSignal {
                publish_now: Some(true),
                ..Default::default()
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            PublishMode::Draft => "draft".to_string(),
            PublishMode::Scheduled(at) => format!("scheduled for {}", at),
            PublishMode::Queued => "queued".to_string(),
            PublishMode::PublishNow => "publish now".to_string(),
        }
    }

    /// Verb phrase used in the confirmation prompt
    pub fn action(&self) -> &'static str {
        match self {
            PublishMode::Draft => "save draft",
            PublishMode::Scheduled(_) => "schedule post",
            PublishMode::Queued => "add post to queue",
            PublishMode::PublishNow => "publish post now",
        }
    }

    /// Publishing, scheduling and queueing need confirmation; drafts do not.
    pub fn is_destructive(&self) -> bool {
        !matches!(self, PublishMode::Draft)
    }
}

/// Schedule that can still take effect: a draft ignores `schedule_for`, so
/// it is neither parsed nor kept.
pub fn effective_schedule(is_draft: bool, raw: Option<&str>) -> Result<Option<String>> {
    if is_draft {
        if raw.is_some_and(|s| !s.trim().is_empty()) {
            debug!("Draft requested; ignoring schedule_for");
        }
        return Ok(None);
    }
    normalize_schedule(raw)
}

/// Parse an RFC 3339 timestamp and restate it in UTC (`...Z`).
///
/// Blank input means "not scheduled" and yields `None`.
pub fn normalize_schedule(raw: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
        SyndicastError::validation(format!(
            "schedule_for must be an RFC 3339 timestamp such as 2024-12-25T10:00:00Z, got '{}' ({})",
            raw, e
        ))
    })?;

    Ok(Some(
        parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

impl std::fmt::Display for PublishMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
