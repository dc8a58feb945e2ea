use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Canonical host of the forge every repository URL must point at.
pub const FORGE_HOST: &str = "github.com";

/// Owner/name pair identifying one repository on the forge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("https://{}/{}/{}", FORGE_HOST, self.owner, self.name)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCommits {
    pub author: String,
    pub commits: u64,
}

impl AuthorCommits {
    pub fn new(author: impl Into<String>, commits: u64) -> Self {
        Self {
            author: author.into(),
            commits,
        }
    }
}

/// One snapshot of a repository's metrics.
///
/// `num_contributors` and `total_commits` are derived from
/// `commits_by_author` when the record is built and cannot be set
/// independently, so `total_commits` always equals the per-author sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatsRecord {
    pub repo_name: String,
    pub repo_owner: String,
    pub stargazers: u64,
    pub fork_count: u64,
    pub branches: u64,
    num_contributors: u64,
    commits_by_author: Vec<AuthorCommits>,
    total_commits: u64,
    pub language: Option<String>,
    pub weekly_commits: Option<Vec<u64>>,
}

impl RepoStatsRecord {
    pub fn new(repo_owner: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            repo_owner: repo_owner.into(),
            stargazers: 0,
            fork_count: 0,
            branches: 0,
            num_contributors: 0,
            commits_by_author: Vec::new(),
            total_commits: 0,
            language: None,
            weekly_commits: None,
        }
    }

    pub fn with_stargazers(mut self, stargazers: u64) -> Self {
        self.stargazers = stargazers;
        self
    }

    pub fn with_fork_count(mut self, fork_count: u64) -> Self {
        self.fork_count = fork_count;
        self
    }

    pub fn with_branches(mut self, branches: u64) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_weekly_commits(mut self, weekly: Option<Vec<u64>>) -> Self {
        self.weekly_commits = weekly;
        self
    }

    pub fn with_commits_by_author(mut self, commits: Vec<AuthorCommits>) -> Self {
        self.num_contributors = commits.len() as u64;
        self.total_commits = commits.iter().map(|c| c.commits).sum();
        self.commits_by_author = commits;
        self
    }

    pub fn commits_by_author(&self) -> &[AuthorCommits] {
        &self.commits_by_author
    }

    pub fn total_commits(&self) -> u64 {
        self.total_commits
    }

    pub fn num_contributors(&self) -> u64 {
        self.num_contributors
    }

    pub fn weekly_total(&self) -> u64 {
        self.weekly_commits
            .as_deref()
            .map(|w| w.iter().sum())
            .unwrap_or(0)
    }

    /// Every field rendered for display, sorted by field name.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let authors = self
            .commits_by_author
            .iter()
            .map(|c| format!("({}, {})", c.author, c.commits))
            .collect::<Vec<_>>()
            .join(", ");
        let weekly = match &self.weekly_commits {
            Some(w) => format!("{w:?}"),
            None => "None".to_string(),
        };
        let mut fields = vec![
            ("branches", self.branches.to_string()),
            ("commits_by_author", format!("[{authors}]")),
            ("fork_count", self.fork_count.to_string()),
            (
                "language",
                self.language.clone().unwrap_or_else(|| "None".to_string()),
            ),
            ("num_contributors", self.num_contributors.to_string()),
            ("repo_name", self.repo_name.clone()),
            ("repo_owner", self.repo_owner.clone()),
            ("stargazers", self.stargazers.to_string()),
            ("total_commits", self.total_commits.to_string()),
            ("weekly_commits", weekly),
        ];
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub store_path: String,
    pub records: Vec<RepoStatsRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitTier {
    Low,
    Mid,
    High,
    Highest,
}

impl CommitTier {
    pub fn for_commits(total_commits: u64) -> Self {
        match total_commits {
            0..=9 => CommitTier::Low,
            10..=99 => CommitTier::Mid,
            100..=999 => CommitTier::High,
            _ => CommitTier::Highest,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CommitTier::Low => "#8400FF",
            CommitTier::Mid => "#FF00FF",
            CommitTier::High => "#FF0088",
            CommitTier::Highest => "#FF0000",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub repo_name: String,
    pub repo_owner: String,
    pub x: u64,
    pub y: u64,
    pub stargazers: u64,
    pub fork_count: u64,
    pub num_contributors: u64,
    pub total_commits: u64,
    pub tier: CommitTier,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub total_commits: u64,
    pub active_repos: usize,
    pub total_repos: usize,
    pub series: Vec<ActivitySeries>,
}

impl ActivityOutput {
    pub fn summary(&self) -> String {
        format!(
            "{} commits, in {} active repos (out of {} total repos), during past 52 weeks",
            self.total_commits, self.active_repos, self.total_repos
        )
    }
}
