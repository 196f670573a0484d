//! Actionable failure reports for rejected post submissions

use std::fmt;

use crate::error::ApiError;

/// Tool the agent should run next when a submission fails
pub const HEALTH_CHECK_TOOL: &str = "check_account_health";

/// Usual reasons a create-post call is rejected
pub const LIKELY_CAUSES: [&str; 4] = [
    "The account's access token expired or lacks the required scopes; reconnect the account",
    "The platform or API rate limit was hit; wait before submitting again",
    "The content exceeds the platform's character limit",
    "The account was disconnected from the publishing service",
];

/// Where the failed submission was headed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTarget {
    Platforms(Vec<String>),
    Thread {
        platform: String,
        account_id: String,
        username: String,
    },
}

impl fmt::Display for SubmissionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionTarget::Platforms(platforms) => write!(f, "{}", platforms.join(", ")),
            SubmissionTarget::Thread {
                platform,
                account_id,
                username,
            } if username.is_empty() => write!(f, "{} (account {})", platform, account_id),
            SubmissionTarget::Thread {
                platform,
                account_id,
                username,
            } => write!(f, "{} (@{}, account {})", platform, username, account_id),
        }
    }
}

/// Everything needed to act on a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub remote_error: ApiError,
    pub target: SubmissionTarget,
    /// Content length in characters
    pub content_length: usize,
    pub mode_label: String,
}

impl Diagnostic {
    pub fn new(
        remote_error: ApiError,
        target: SubmissionTarget,
        content_length: usize,
        mode_label: String,
    ) -> Self {
        Self {
            remote_error,
            target,
            content_length,
            mode_label,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.remote_error)?;
        writeln!(f, "  Target: {}", self.target)?;
        writeln!(f, "  Content length: {} characters", self.content_length)?;
        writeln!(f, "  Mode: {}", self.mode_label)?;
        writeln!(f, "Likely causes:")?;
        for cause in LIKELY_CAUSES {
            writeln!(f, "  - {}", cause)?;
        }
        write!(
            f,
            "Run the '{}' tool to check the connected accounts.",
            HEALTH_CHECK_TOOL
        )
    }
}
