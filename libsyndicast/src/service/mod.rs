//! Service layer for Syndicast
//!
//! `PublishService` is the single entry point the tool registry (or any
//! other front end) drives. It owns the API client, the confirmation gate
//! and the agent settings for one host process; nothing else is shared
//! between invocations.
//!
//! - [`publish`]: multi-platform `create_post` pipeline
//! - [`thread`]: single-platform `create_thread` pipeline
//! - [`query`]: read-only lookups (posts, accounts, organizations, health)
//!   and standalone media upload
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libsyndicast::api::MockApi;
//! use libsyndicast::config::AgentSettings;
//! use libsyndicast::confirm::StdinGate;
//! use libsyndicast::service::{CreatePostRequest, PublishService};
//!
//! # async fn example() -> libsyndicast::Result<()> {
//! let api = MockApi::new().with_account("twitter", "tw_1", "alice");
//! let service = PublishService::new(
//!     Arc::new(api),
//!     AgentSettings::default(),
//!     Arc::new(StdinGate),
//! );
//!
//! let request = CreatePostRequest::new("Hello from the pipeline", vec!["twitter".into()]);
//! let outcome = service.create_post(request).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod publish;
pub mod query;
pub mod thread;

pub use publish::CreatePostRequest;
pub use thread::{CreateThreadRequest, ThreadItemRequest};

use std::sync::Arc;

use tracing::debug;

use crate::api::ApiClient;
use crate::config::AgentSettings;
use crate::confirm::{ConfirmationGate, Decision};
use crate::error::Result;
use crate::mode::PublishMode;
use crate::payload::Preview;
use crate::types::ConnectedAccount;

/// Publish pipeline facade
#[derive(Clone)]
pub struct PublishService {
    api: Arc<dyn ApiClient>,
    settings: AgentSettings,
    gate: Arc<dyn ConfirmationGate>,
}

impl PublishService {
    pub fn new(
        api: Arc<dyn ApiClient>,
        settings: AgentSettings,
        gate: Arc<dyn ConfirmationGate>,
    ) -> Self {
        Self {
            api,
            settings,
            gate,
        }
    }

    pub fn settings(&self) -> AgentSettings {
        self.settings
    }

    pub fn api(&self) -> &dyn ApiClient {
        self.api.as_ref()
    }

    /// Current account list; fetched on every call
    async fn fetch_accounts(&self) -> Result<Vec<ConnectedAccount>> {
        let accounts = self.api.list_accounts().await?;
        debug!(count = accounts.len(), "Fetched connected accounts");
        Ok(accounts)
    }

    /// Run the confirmation gate for `mode`.
    ///
    /// Blocks the calling task until the gate answers. Drafts and a disabled
    /// confirmation setting skip the prompt.
    fn confirm(&self, mode: &PublishMode, preview: &Preview) -> Decision {
        if !self.settings.confirm_destructive_actions {
            debug!("Confirmation disabled; proceeding");
            return Decision::Approved;
        }
        if !mode.is_destructive() {
            debug!(mode = %mode, "No confirmation needed");
            return Decision::Approved;
        }

        self.gate.confirm(&preview.render(), mode.action())
    }
}
