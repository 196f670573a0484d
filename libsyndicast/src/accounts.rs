//! Account resolution: which connected account publishes to which platform
//!
//! Resolution always runs against the account list fetched for the current
//! invocation. Nothing here is cached.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ResolutionError, Result, SyndicastError};
use crate::types::ConnectedAccount;

/// Optional hint narrowing which connected account to use.
///
/// An account id and a username are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetHint {
    #[default]
    None,
    AccountId(String),
    /// Stored normalized: no leading `@`, lowercase
    Username(String),
}

impl TargetHint {
    /// Build a hint from the optional tool arguments. Blank values count as absent.
    pub fn from_args(account_id: Option<&str>, username: Option<&str>) -> Result<Self> {
        let account_id = account_id.map(str::trim).filter(|s| !s.is_empty());
        let username = username
            .map(normalize_username)
            .filter(|s| !s.is_empty());

        match (account_id, username) {
            (Some(_), Some(_)) => Err(SyndicastError::validation(
                "account_id and username are mutually exclusive; pass only one",
            )),
            (Some(id), None) => Ok(TargetHint::AccountId(id.to_string())),
            (None, Some(name)) => Ok(TargetHint::Username(name)),
            (None, None) => Ok(TargetHint::None),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TargetHint::None => "first connected account per platform".to_string(),
            TargetHint::AccountId(id) => format!("account id '{}'", id),
            TargetHint::Username(name) => format!("username '@{}'", name),
        }
    }

    fn matches(&self, account: &ConnectedAccount) -> bool {
        match self {
            TargetHint::None => true,
            TargetHint::AccountId(id) => account.account_id == *id,
            TargetHint::Username(name) => normalize_username(&account.username) == *name,
        }
    }
}

/// Strip surrounding whitespace and any leading `@`, then lowercase
pub fn normalize_username(username: &str) -> String {
    username.trim().trim_start_matches('@').to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub platform: String,
    pub account_id: String,
    pub username: String,
}

/// Resolved platform → account mapping, in the order platforms were requested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAccounts {
    entries: Vec<ResolvedAccount>,
}

impl ResolvedAccounts {
    pub fn get(&self, platform: &str) -> Option<&ResolvedAccount> {
        self.entries.iter().find(|e| e.platform == platform)
    }

    pub fn account_id(&self, platform: &str) -> Option<&str> {
        self.get(platform).map(|e| e.account_id.as_str())
    }

    pub fn username(&self, platform: &str) -> Option<&str> {
        self.get(platform).map(|e| e.username.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAccount> {
        self.entries.iter()
    }

    pub fn platforms(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.platform.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve as many platforms as possible and report the rest.
///
/// Returns the resolved mapping plus every requested platform that had no
/// matching account. With a hint in effect, a later matching account on the
/// same platform replaces an earlier one.
pub fn resolve_partial(
    requested: &[String],
    accounts: &[ConnectedAccount],
    hint: &TargetHint,
) -> (ResolvedAccounts, Vec<String>) {
    let mut found: HashMap<&str, &ConnectedAccount> = HashMap::new();

    for account in accounts {
        let platform = account.platform.to_lowercase();
        let Some(requested_name) = requested.iter().find(|p| **p == platform) else {
            continue;
        };
        let key = requested_name.as_str();

        match hint {
            TargetHint::None => {
                found.entry(key).or_insert(account);
            }
            _ if hint.matches(account) => {
                if let Some(previous) = found.insert(key, account) {
                    warn!(
                        platform = key,
                        previous = %previous.account_id,
                        replacement = %account.account_id,
                        "Targeting hint matched more than one account; using the later one"
                    );
                }
            }
            _ => {}
        }
    }

    let mut resolved = ResolvedAccounts::default();
    let mut missing = Vec::new();

    for platform in requested {
        match found.get(platform.as_str()) {
            Some(account) => {
                debug!(
                    platform = %platform,
                    account_id = %account.account_id,
                    username = %account.username,
                    "Resolved account"
                );
                resolved.entries.push(ResolvedAccount {
                    platform: platform.clone(),
                    account_id: account.account_id.clone(),
                    username: account.username.clone(),
                });
            }
            None => missing.push(platform.clone()),
        }
    }

    (resolved, missing)
}

/// Resolve every requested platform or fail naming all the missing ones
pub fn resolve(
    requested: &[String],
    accounts: &[ConnectedAccount],
    hint: &TargetHint,
) -> std::result::Result<ResolvedAccounts, ResolutionError> {
    let (resolved, missing) = resolve_partial(requested, accounts, hint);

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(ResolutionError {
            missing,
            hint: hint.describe(),
        })
    }
}
