//! Repository search against the GitHub REST API.
//!
//! Results are sorted by stars and capped by the caller. Rate limiting is
//! reported separately from other failures so the UI can show when to retry.

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::ClientConfig;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "skillswap";

/// Fallback wait when a rate-limited response has no reset header.
const DEFAULT_RESET_SECS: i64 = 60;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("GitHub API rate limit exceeded")]
    RateLimited { reset_at: OffsetDateTime },

    #[error("GitHub API error: {status}")]
    Api { status: u16 },

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryOwner {
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub owner: RepositoryOwner,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    id: u64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    owner: RawOwner,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
    avatar_url: String,
    html_url: String,
}

impl From<RawRepository> for Repository {
    fn from(r: RawRepository) -> Self {
        Self {
            id: r.id,
            name: r.name,
            full_name: r.full_name,
            description: r.description,
            url: r.html_url,
            stars: r.stargazers_count,
            forks: r.forks_count,
            language: r.language,
            owner: RepositoryOwner {
                login: r.owner.login,
                avatar_url: r.owner.avatar_url,
                url: r.owner.html_url,
            },
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
struct RateLimitResources {
    core: RawRate,
}

#[derive(Debug, Deserialize)]
struct RawRate {
    limit: u32,
    remaining: u32,
    reset: i64,
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(config: &ClientConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.github_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Most-starred repositories matching `term`, at most `limit` of them.
    pub async fn search_repositories(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Repository>, SearchError> {
        let url = format!("{}/search/repositories", self.base_url);
        let per_page = limit.to_string();
        debug!(%term, limit, "searching repositories");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, ACCEPT_V3)
            .query(&[
                ("q", term),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = reset_time(response.headers());
            warn!(%reset_at, "repository search rate limited");
            return Err(SearchError::RateLimited { reset_at });
        }
        if !status.is_success() {
            warn!(%status, "repository search failed");
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .take(limit as usize)
            .map(Repository::from)
            .collect())
    }

    pub async fn check_rate_limit(&self) -> Result<RateLimitStatus, SearchError> {
        let url = format!("{}/rate_limit", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, ACCEPT_V3)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }
        let body: RateLimitResponse = response.json().await?;
        let core = body.resources.core;
        Ok(RateLimitStatus {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: OffsetDateTime::from_unix_timestamp(core.reset)
                .unwrap_or_else(|_| OffsetDateTime::now_utc()),
        })
    }
}

fn reset_time(headers: &header::HeaderMap) -> OffsetDateTime {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(|| OffsetDateTime::now_utc() + Duration::seconds(DEFAULT_RESET_SECS))
}
