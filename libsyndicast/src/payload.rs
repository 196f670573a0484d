//! Create-post payload assembly and the confirmation preview

use serde::{Deserialize, Serialize};

use crate::accounts::ResolvedAccounts;
use crate::error::{Result, SyndicastError};
use crate::mode::ModeSignal;
use crate::types::{
    LinkedInOptions, MediaItem, PlatformEntry, PlatformExtension, ThreadItem, ThreadOptions,
};

/// A thread needs at least this many items
pub const MIN_THREAD_ITEMS: usize = 2;
/// Preview content is cut after this many characters
pub const PREVIEW_CONTENT_CHARS: usize = 280;
/// Preview content is wrapped at this column
pub const PREVIEW_WRAP_WIDTH: usize = 72;

/// Body of the create-post call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_items: Vec<MediaItem>,
    pub platforms: Vec<PlatformEntry>,
    #[serde(flatten)]
    pub signal: ModeSignal,
}

/// One entry per resolved platform; LinkedIn gets its extension fields.
///
/// An all-empty LinkedIn extension is left off entirely.
pub fn build_platform_entries(
    resolved: &ResolvedAccounts,
    linkedin: Option<&LinkedInOptions>,
) -> Vec<PlatformEntry> {
    resolved
        .iter()
        .map(|account| {
            let extension = match linkedin {
                Some(options) if account.platform == "linkedin" && !options.is_empty() => {
                    Some(PlatformExtension::LinkedIn(options.clone()))
                }
                _ => None,
            };

            PlatformEntry {
                platform: account.platform.clone(),
                account_id: account.account_id.clone(),
                extension,
            }
        })
        .collect()
}

/// Trim and lowercase a platform name; `x` is twitter
pub fn canonical_platform(name: &str) -> String {
    match name.trim().to_lowercase().as_str() {
        "x" => "twitter".to_string(),
        other => other.to_string(),
    }
}

/// Platforms that accept native threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPlatform {
    Twitter,
    Threads,
}

impl ThreadPlatform {
    pub fn parse(name: &str) -> Result<Self> {
        match canonical_platform(name).as_str() {
            "twitter" => Ok(ThreadPlatform::Twitter),
            "threads" => Ok(ThreadPlatform::Threads),
            other => Err(SyndicastError::validation(format!(
                "threads are only supported on twitter and threads, not '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadPlatform::Twitter => "twitter",
            ThreadPlatform::Threads => "threads",
        }
    }
}

impl std::fmt::Display for ThreadPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn ensure_thread_len(items: usize) -> Result<()> {
    if items < MIN_THREAD_ITEMS {
        return Err(SyndicastError::validation(format!(
            "a thread needs at least {} items, got {}",
            MIN_THREAD_ITEMS, items
        )));
    }
    Ok(())
}

/// Wrap thread items into the platform entry for `platform`
pub fn build_thread_entry(
    platform: ThreadPlatform,
    account_id: &str,
    items: Vec<ThreadItem>,
    first_comment: Option<String>,
) -> Result<PlatformEntry> {
    ensure_thread_len(items.len())?;
    if let Some(index) = items.iter().position(|item| item.content.trim().is_empty()) {
        return Err(SyndicastError::validation(format!(
            "thread item {} has empty content",
            index + 1
        )));
    }

    Ok(PlatformEntry {
        platform: platform.as_str().to_string(),
        account_id: account_id.to_string(),
        extension: Some(PlatformExtension::Thread(ThreadOptions {
            thread_items: items,
            first_comment,
        })),
    })
}

/// What the user sees before confirming
#[derive(Debug, Clone)]
pub struct Preview {
    /// `(platform, username)` pairs
    pub targets: Vec<(String, String)>,
    pub content: String,
    pub media_count: usize,
    pub mode_label: String,
    pub thread_items: Option<usize>,
}

impl Preview {
    pub fn for_accounts(resolved: &ResolvedAccounts) -> Vec<(String, String)> {
        resolved
            .iter()
            .map(|a| (a.platform.clone(), a.username.clone()))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let targets: Vec<String> = self
            .targets
            .iter()
            .map(|(platform, username)| {
                if username.is_empty() {
                    platform.clone()
                } else {
                    format!("{} (@{})", platform, username.trim_start_matches('@'))
                }
            })
            .collect();
        out.push_str(&format!("Platforms: {}\n", targets.join(", ")));

        if let Some(count) = self.thread_items {
            out.push_str(&format!("Thread:    {} items\n", count));
        }
        out.push_str(&format!("Mode:      {}\n", self.mode_label));
        out.push_str(&format!("Media:     {} file(s)\n", self.media_count));
        out.push_str("Content:\n");

        let shown = truncate_chars(&self.content, PREVIEW_CONTENT_CHARS);
        for line in wrap_text(&shown, PREVIEW_WRAP_WIDTH) {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }

        out
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max).collect();
    format!("{}...", kept.trim_end())
}

/// Greedy word wrap. Explicit newlines are kept; over-long words get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
