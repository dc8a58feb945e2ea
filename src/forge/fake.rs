use super::{ContributorStat, ForgeSession, RepoInfo, WeekActivity};
use crate::error::{KpiError, Result};
use crate::model::RepoRef;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

#[derive(Default)]
pub struct FakeRepo {
    pub info: Option<RepoInfo>,
    /// Successive answers to `contributor_stats`; the last one repeats.
    pub contributor_answers: VecDeque<Vec<ContributorStat>>,
    pub branches: Vec<String>,
    pub weeks: Vec<WeekActivity>,
}

/// In-memory forge used by fetch and batch tests.
#[derive(Default)]
pub struct FakeSession {
    repos: RefCell<HashMap<RepoRef, FakeRepo>>,
    contributor_calls: Cell<usize>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(self, owner: &str, name: &str, contributors: &[(&str, u64)]) -> Self {
        self.with_answers(owner, name, vec![contributors.to_vec()])
    }

    pub fn with_answers(self, owner: &str, name: &str, answers: Vec<Vec<(&str, u64)>>) -> Self {
        let repo = RepoRef::new(owner, name);
        let fake = FakeRepo {
            info: Some(RepoInfo {
                name: name.to_string(),
                owner: owner.to_string(),
                stargazers: 7,
                fork_count: 2,
                language: Some("Rust".to_string()),
            }),
            contributor_answers: answers
                .into_iter()
                .map(|a| {
                    a.into_iter()
                        .map(|(author, total)| ContributorStat {
                            author: author.to_string(),
                            total,
                        })
                        .collect()
                })
                .collect(),
            branches: vec!["main".to_string(), "dev".to_string()],
            weeks: vec![
                WeekActivity { week: 0, total: 1 },
                WeekActivity { week: 604_800, total: 4 },
            ],
        };
        self.repos.borrow_mut().insert(repo, fake);
        self
    }

    pub fn contributor_calls(&self) -> usize {
        self.contributor_calls.get()
    }

    fn missing(repo: &RepoRef) -> KpiError {
        KpiError::Api {
            status: 404,
            url: repo.url(),
            message: "Not Found".to_string(),
        }
    }
}

impl ForgeSession for FakeSession {
    fn repository(&self, repo: &RepoRef) -> Result<RepoInfo> {
        self.repos
            .borrow()
            .get(repo)
            .and_then(|r| r.info.clone())
            .ok_or_else(|| Self::missing(repo))
    }

    fn contributor_stats(&self, repo: &RepoRef) -> Result<Vec<ContributorStat>> {
        self.contributor_calls.set(self.contributor_calls.get() + 1);
        let mut repos = self.repos.borrow_mut();
        let fake = repos.get_mut(repo).ok_or_else(|| Self::missing(repo))?;
        if fake.contributor_answers.len() > 1 {
            Ok(fake.contributor_answers.pop_front().unwrap_or_default())
        } else {
            Ok(fake.contributor_answers.front().cloned().unwrap_or_default())
        }
    }

    fn branches(&self, repo: &RepoRef) -> Result<Vec<String>> {
        self.repos
            .borrow()
            .get(repo)
            .map(|r| r.branches.clone())
            .ok_or_else(|| Self::missing(repo))
    }

    fn commit_activity(&self, repo: &RepoRef) -> Result<Vec<WeekActivity>> {
        self.repos
            .borrow()
            .get(repo)
            .map(|r| r.weeks.clone())
            .ok_or_else(|| Self::missing(repo))
    }

    fn list_repositories(&self) -> Result<Vec<RepoRef>> {
        let mut repos: Vec<RepoRef> = self.repos.borrow().keys().cloned().collect();
        repos.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        Ok(repos)
    }
}
