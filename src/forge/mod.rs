pub mod github;
pub mod resolve;

#[cfg(test)]
pub(crate) mod fake;

pub use self::github::GitHubSession;
pub use self::resolve::resolve_url;

use crate::error::Result;
use crate::model::RepoRef;
use serde::{Deserialize, Serialize};

/// Repository-level metadata returned by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub owner: String,
    pub stargazers: u64,
    pub fork_count: u64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStat {
    pub author: String,
    pub total: u64,
}

/// Commit total for one week; `week` is the unix timestamp of the week start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekActivity {
    pub week: i64,
    pub total: u64,
}

/// Authenticated handle onto the forge API.
///
/// Implementations block until the forge answers. Statistics endpoints may
/// return an empty list while the forge is still computing them.
pub trait ForgeSession {
    fn repository(&self, repo: &RepoRef) -> Result<RepoInfo>;

    fn contributor_stats(&self, repo: &RepoRef) -> Result<Vec<ContributorStat>>;

    fn branches(&self, repo: &RepoRef) -> Result<Vec<String>>;

    /// Weekly commit totals for the past year, oldest week first.
    fn commit_activity(&self, repo: &RepoRef) -> Result<Vec<WeekActivity>>;

    /// Every repository visible to the authenticated account.
    fn list_repositories(&self) -> Result<Vec<RepoRef>>;
}
