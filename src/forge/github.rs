use super::{ContributorStat, ForgeSession, RepoInfo, WeekActivity};
use crate::auth::Credentials;
use crate::error::{KpiError, Result};
use crate::model::RepoRef;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("repokpi/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct RawOwner {
    login: String,
}

#[derive(Deserialize)]
struct RawRepo {
    name: String,
    owner: RawOwner,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
}

#[derive(Deserialize)]
struct RawContributor {
    author: Option<RawOwner>,
    total: u64,
}

#[derive(Deserialize)]
struct RawBranch {
    name: String,
}

#[derive(Deserialize)]
struct RawWeek {
    week: i64,
    total: u64,
}

#[derive(Deserialize)]
struct RawError {
    message: String,
}

/// Blocking GitHub REST session.
pub struct GitHubSession {
    client: Client,
    api_url: String,
    credentials: Credentials,
}

impl GitHubSession {
    /// Build a session; no request is made until the first call.
    pub fn new(api_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%url, ?query, "GET");
        let request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(query);
        let response = self.authorize(request).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(KpiError::Api {
                status: status.as_u16(),
                url,
                message: error_message(&body),
            });
        }
        Ok(response)
    }

    /// Statistics endpoints answer 202 while the forge is still computing.
    fn get_stats<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let response = self.get(path, &[])?;
        match response.status() {
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                debug!(path, status = %response.status(), "statistics not ready");
                Ok(Vec::new())
            }
            _ => Ok(response.json()?),
        }
    }

    fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<T> = self
                .get(path, &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])?
                .json()?;
            let len = batch.len();
            all.extend(batch);
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(all)
    }
}

impl ForgeSession for GitHubSession {
    fn repository(&self, repo: &RepoRef) -> Result<RepoInfo> {
        let raw: RawRepo = self
            .get(&format!("/repos/{}/{}", repo.owner, repo.name), &[])?
            .json()?;
        Ok(raw.into())
    }

    fn contributor_stats(&self, repo: &RepoRef) -> Result<Vec<ContributorStat>> {
        let raw: Vec<RawContributor> =
            self.get_stats(&format!("/repos/{}/{}/stats/contributors", repo.owner, repo.name))?;
        Ok(raw.into_iter().map(Into::into).collect())
    }

    fn branches(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let raw: Vec<RawBranch> =
            self.get_paginated(&format!("/repos/{}/{}/branches", repo.owner, repo.name))?;
        Ok(raw.into_iter().map(|b| b.name).collect())
    }

    fn commit_activity(&self, repo: &RepoRef) -> Result<Vec<WeekActivity>> {
        let raw: Vec<RawWeek> =
            self.get_stats(&format!("/repos/{}/{}/stats/commit_activity", repo.owner, repo.name))?;
        Ok(raw
            .into_iter()
            .map(|w| WeekActivity {
                week: w.week,
                total: w.total,
            })
            .collect())
    }

    fn list_repositories(&self) -> Result<Vec<RepoRef>> {
        let raw: Vec<RawRepo> = self.get_paginated("/user/repos")?;
        Ok(raw
            .into_iter()
            .map(|r| RepoRef::new(r.owner.login, r.name))
            .collect())
    }
}

impl From<RawRepo> for RepoInfo {
    fn from(raw: RawRepo) -> Self {
        RepoInfo {
            name: raw.name,
            owner: raw.owner.login,
            stargazers: raw.stargazers_count,
            fork_count: raw.forks_count,
            language: raw.language,
        }
    }
}

impl From<RawContributor> for ContributorStat {
    fn from(raw: RawContributor) -> Self {
        ContributorStat {
            author: raw
                .author
                .map(|a| a.login)
                .unwrap_or_else(|| "ghost".to_string()),
            total: raw.total,
        }
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<RawError>(body) {
        Ok(err) => err.message,
        Err(_) => body.chars().take(200).collect(),
    }
}
