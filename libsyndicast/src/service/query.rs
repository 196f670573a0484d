//! Read-only lookups and standalone media upload

use std::path::Path;

use tracing::{debug, info};

use super::PublishService;
use crate::accounts::{self, ResolvedAccount, TargetHint};
use crate::error::{Result, SyndicastError};
use crate::media::MediaUploader;
use crate::types::{
    AccountHealth, ConnectedAccount, LinkedInOrganization, ListPostsQuery, MediaItem, PostPage,
};

/// Largest page size the listing endpoint accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

impl ListPostsQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(SyndicastError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(SyndicastError::validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.limit
            )));
        }
        Ok(())
    }
}

/// Organizations for the LinkedIn account they were fetched with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationListing {
    pub account: ResolvedAccount,
    pub organizations: Vec<LinkedInOrganization>,
}

impl PublishService {
    pub async fn list_posts(&self, query: &ListPostsQuery) -> Result<PostPage> {
        query.validate()?;
        let page = self.api().list_posts(query).await?;
        debug!(
            returned = page.posts.len(),
            total = page.pagination.total,
            "Listed posts"
        );
        Ok(page)
    }

    /// Connected accounts, optionally only those on `platform`
    pub async fn list_accounts(&self, platform: Option<&str>) -> Result<Vec<ConnectedAccount>> {
        let platform = platform
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());
        let accounts = self.fetch_accounts().await?;

        Ok(match platform {
            Some(platform) => accounts
                .into_iter()
                .filter(|a| a.platform.to_lowercase() == platform)
                .collect(),
            None => accounts,
        })
    }

    /// Organization pages available to a LinkedIn account.
    ///
    /// Without a hint the first connected LinkedIn account is used.
    pub async fn linkedin_organizations(&self, hint: &TargetHint) -> Result<OrganizationListing> {
        let platform = vec!["linkedin".to_string()];
        let connected = self.fetch_accounts().await?;
        let resolved = accounts::resolve(&platform, &connected, hint)?;

        let Some(account) = resolved.get("linkedin").cloned() else {
            return Err(SyndicastError::validation(
                "no LinkedIn account resolved",
            ));
        };

        let organizations = self.api().linkedin_organizations(&account.account_id).await?;
        info!(
            account_id = %account.account_id,
            count = organizations.len(),
            "Fetched LinkedIn organizations"
        );

        Ok(OrganizationListing {
            account,
            organizations,
        })
    }

    pub async fn upload_media(&self, path: &Path) -> Result<MediaItem> {
        Ok(MediaUploader::new(self.api()).upload(path).await?)
    }

    pub async fn account_health(&self) -> Result<Vec<AccountHealth>> {
        Ok(self.api().account_health().await?)
    }
}
