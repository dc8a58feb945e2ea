use crate::error::Result;
use crate::forge::ForgeSession;
use crate::model::{AuthorCommits, RepoRef, RepoStatsRecord};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Also fetch the weekly commit histogram.
    pub weekly_activity: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { weekly_activity: true }
    }
}

/// Fetch the statistics record for `repo`.
///
/// The forge sometimes reports no contributors while it warms its statistics
/// cache. A result with zero total commits is therefore fetched a second
/// time, and whatever that second attempt returns is accepted.
pub fn fetch_stats<S>(session: &S, repo: &RepoRef, options: FetchOptions) -> Result<RepoStatsRecord>
where
    S: ForgeSession + ?Sized,
{
    let record = fetch_once(session, repo, options)?;
    if record.total_commits() >= 1 {
        return Ok(record);
    }

    debug!(repo = %repo, "zero commits reported, retrying once");
    let retried = fetch_once(session, repo, options)?;
    if retried.total_commits() < 1 {
        warn!(repo = %repo, "still zero commits after retry, accepting as-is");
    }
    Ok(retried)
}

fn fetch_once<S>(session: &S, repo: &RepoRef, options: FetchOptions) -> Result<RepoStatsRecord>
where
    S: ForgeSession + ?Sized,
{
    let info = session.repository(repo)?;

    let contributors: Vec<AuthorCommits> = session
        .contributor_stats(repo)?
        .into_iter()
        .map(|c| AuthorCommits::new(c.author, c.total))
        .collect();

    let branches = session.branches(repo)?.len() as u64;

    let weekly: Option<Vec<u64>> = if options.weekly_activity {
        let weeks = session.commit_activity(repo)?;
        (!weeks.is_empty()).then(|| weeks.into_iter().map(|w| w.total).collect())
    } else {
        None
    };

    let record = RepoStatsRecord::new(info.owner, info.name)
        .with_stargazers(info.stargazers)
        .with_fork_count(info.fork_count)
        .with_branches(branches)
        .with_language(info.language)
        .with_weekly_commits(weekly)
        .with_commits_by_author(contributors);

    debug!(
        repo = %repo,
        total_commits = record.total_commits(),
        contributors = record.num_contributors(),
        branches,
        "fetched stats"
    );
    Ok(record)
}
