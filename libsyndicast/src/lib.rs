//! Syndicast - agent tools for multi-platform social publishing
//!
//! This library turns a single agent tool call into a post on one or more
//! social platforms: it picks the connected account for each platform,
//! uploads attached media, builds platform-specific payloads (LinkedIn
//! options, native threads), asks a human to confirm, and explains failures.

pub mod accounts;
pub mod api;
pub mod config;
pub mod confirm;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod media;
pub mod mode;
pub mod payload;
pub mod service;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use config::{AgentSettings, Config};
pub use error::{Result, SyndicastError};
pub use service::PublishService;
pub use tools::{ToolRegistry, ToolResult};
pub use types::{PublishOutcome, ThreadItem};
