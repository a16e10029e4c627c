use crate::config::Config;
use crate::errors::{Result, SignalError};
use crate::models::profile::{ActivityRecord, ContributionBreakdown, UserProfile};
use crate::sources::base::ProfileSource;
use crate::util;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const USER_QUERY: &str = r#"
  query($userName: String!, $repoCount: Int!) {
    user(login: $userName) {
      login
      name
      avatarUrl
      createdAt
      followers {
        totalCount
      }
      following {
        totalCount
      }
      repositories(first: $repoCount, ownerAffiliations: OWNER, orderBy: {field: STARGAZERS, direction: DESC}) {
        totalCount
        nodes {
          name
          stargazerCount
          forkCount
        }
      }
      contributionsCollection {
        totalCommitContributions
        totalPullRequestContributions
        totalIssueContributions
        totalRepositoryContributions
        contributionCalendar {
          totalContributions
          weeks {
            contributionDays {
              contributionCount
              date
            }
          }
        }
      }
    }
  }
"#;

const USER_EXISTS_QUERY: &str = "query($userName: String!) { user(login: $userName) { login } }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope<U> {
    user: Option<U>,
}

#[derive(Debug, Deserialize)]
struct LoginOnly {
    #[allow(dead_code)]
    login: String,
}

#[derive(Debug, Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    #[allow(dead_code)]
    name: String,
    stargazer_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    total_count: u64,
    #[serde(default)]
    nodes: Vec<Option<RepositoryNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDay {
    contribution_count: u32,
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarWeek {
    contribution_days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionCalendar {
    total_contributions: u64,
    weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    total_commit_contributions: u64,
    total_pull_request_contributions: u64,
    total_issue_contributions: u64,
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubUser {
    login: String,
    name: Option<String>,
    avatar_url: String,
    created_at: String,
    followers: TotalCount,
    following: TotalCount,
    repositories: RepositoryConnection,
    contributions_collection: ContributionsCollection,
}

impl GitHubUser {
    /// 转换为计算核心使用的档案
    fn into_profile(self) -> Result<UserProfile> {
        let repos: Vec<RepositoryNode> = self.repositories.nodes.into_iter().flatten().collect();

        // 仓库按 star 数降序返回
        let total_stars = repos.iter().map(|r| r.stargazer_count).sum();
        let top_repo_stars = repos.first().map(|r| r.stargazer_count).unwrap_or(0);

        let collection = self.contributions_collection;
        let mut contribution_days = Vec::new();
        for week in collection.contribution_calendar.weeks {
            for day in week.contribution_days {
                contribution_days.push(ActivityRecord {
                    date: util::parse_iso_date(&day.date)?,
                    count: day.contribution_count,
                });
            }
        }

        Ok(UserProfile {
            login: self.login,
            name: self.name,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
            followers: self.followers.total_count,
            following: self.following.total_count,
            total_repos: self.repositories.total_count,
            total_stars,
            top_repo_stars,
            contributions: ContributionBreakdown {
                total: collection.contribution_calendar.total_contributions,
                commits: collection.total_commit_contributions,
                prs: collection.total_pull_request_contributions,
                issues: collection.total_issue_contributions,
            },
            contribution_days,
        })
    }
}

/// GitHub GraphQL 数据源
pub struct GitHubSource {
    client: Client,
    endpoint: String,
    token: Option<String>,
    repository_page_size: u32,
    request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl GitHubSource {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("signal_stock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SignalError::RequestError)?;

        if config.github_token.is_none() {
            warn!("GITHUB_TOKEN is not set, GitHub will reject GraphQL requests");
        }

        Ok(Self {
            client,
            endpoint: config.github_endpoint.clone(),
            token: config.github_token.clone(),
            repository_page_size: config.repository_page_size,
            request_interval: Duration::from_millis(config.min_request_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// 等待请求频率限制
    async fn wait_for_rate_limit(&self) {
        if self.request_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(time) = *last {
            let elapsed = time.elapsed();
            if elapsed < self.request_interval {
                let wait_time = self.request_interval - elapsed;
                debug!("Waiting {:?} before the next GitHub request", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Posts a query; non-2xx answers become `UpstreamStatus`
    async fn post_query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<GraphQlResponse<T>> {
        self.wait_for_rate_limit().await;

        let mut request = self.client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SignalError::UpstreamStatus { status: status.as_u16() });
        }

        let text = response.text().await?;
        debug!("GraphQL response: {} bytes", text.len());
        Ok(serde_json::from_str(&text)?)
    }
}

/// Maps a GraphQL `errors` array onto the error taxonomy
fn graphql_error(login: &str, errors: &[GraphQlErrorEntry]) -> SignalError {
    if errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")) {
        return SignalError::NotFound(login.to_string());
    }
    let message = errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "empty errors array".to_string());
    SignalError::GraphQlError(message)
}

#[async_trait]
impl ProfileSource for GitHubSource {
    fn source_name(&self) -> &'static str {
        "GitHub"
    }

    async fn fetch_profile(&self, login: &str) -> Result<UserProfile> {
        info!("Fetching data for: {}", login);

        let response: GraphQlResponse<UserEnvelope<GitHubUser>> = self
            .post_query(
                USER_QUERY,
                json!({ "userName": login, "repoCount": self.repository_page_size }),
            )
            .await?;

        if let Some(errors) = response.errors.as_deref().filter(|e| !e.is_empty()) {
            return Err(graphql_error(login, errors));
        }

        let user = response
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| SignalError::NotFound(login.to_string()))?;

        let profile = user.into_profile()?;
        info!(
            "Fetched {}: {} days of activity, {} stars, {} followers",
            profile.login, profile.contribution_days.len(), profile.total_stars, profile.followers
        );
        Ok(profile)
    }

    async fn user_exists(&self, login: &str) -> Result<bool> {
        let response: GraphQlResponse<UserEnvelope<LoginOnly>> = match self
            .post_query(USER_EXISTS_QUERY, json!({ "userName": login }))
            .await
        {
            Ok(response) => response,
            Err(SignalError::UpstreamStatus { status }) => {
                debug!("Existence check for {} got status {}", login, status);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        Ok(response.data.and_then(|d| d.user).is_some())
    }
}
