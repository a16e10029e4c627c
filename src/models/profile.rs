use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单日贡献记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub count: u32,
}

impl ActivityRecord {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Contribution totals for the calendar year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub total: u64,
    #[serde(default)]
    pub commits: u64,
    #[serde(default)]
    pub prs: u64,
    #[serde(default)]
    pub issues: u64,
}

/// Public GitHub account data the price is derived from.
///
/// `contribution_days` is chronological with one entry per calendar day,
/// zero-count days included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub total_repos: u64,
    #[serde(default)]
    pub total_stars: u64,
    #[serde(default)]
    pub top_repo_stars: u64,
    #[serde(default)]
    pub contributions: ContributionBreakdown,
    #[serde(default)]
    pub contribution_days: Vec<ActivityRecord>,
}

impl UserProfile {
    /// 创建只有登录名的空档案，其余字段用 builder 方法补充
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            name: None,
            avatar_url: String::new(),
            created_at: String::new(),
            followers: 0,
            following: 0,
            total_repos: 0,
            total_stars: 0,
            top_repo_stars: 0,
            contributions: ContributionBreakdown::default(),
            contribution_days: Vec::new(),
        }
    }

    pub fn with_followers(mut self, followers: u64) -> Self {
        self.followers = followers;
        self
    }

    pub fn with_stars(mut self, total_stars: u64, top_repo_stars: u64) -> Self {
        self.total_stars = total_stars;
        self.top_repo_stars = top_repo_stars;
        self
    }

    /// Sets the activity sequence; the calendar total follows the day counts.
    pub fn with_days(mut self, days: Vec<ActivityRecord>) -> Self {
        self.contributions.total = days.iter().map(|d| d.count as u64).sum();
        self.contribution_days = days;
        self
    }

    pub fn with_contributions_total(mut self, total: u64) -> Self {
        self.contributions.total = total;
        self
    }

    pub fn active_days(&self) -> usize {
        self.contribution_days.iter().filter(|d| d.is_active()).count()
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            login: self.login.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at.clone(),
            followers: self.followers,
            following: self.following,
            total_repos: self.total_repos,
            total_stars: self.total_stars,
            contributions: self.contributions.clone(),
        }
    }
}

/// 返回给展示层的用户信息（不含每日数据）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub created_at: String,
    pub followers: u64,
    pub following: u64,
    pub total_repos: u64,
    pub total_stars: u64,
    pub contributions: ContributionBreakdown,
}
