use crate::errors::{Result, SignalError};

pub const DEFAULT_GITHUB_ENDPOINT: &str = "https://api.github.com/graphql";

/// 评分基准值
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub yearly_contributions: f64,
    pub daily_streak: f64,
    pub active_ratio: f64,
    pub stars: f64,
    pub top_repo_stars: f64,
    pub followers: f64,
    /// Recognition split between total stars and the best repository
    pub recognition_total_weight: f64,
    pub recognition_top_weight: f64,
    /// 动量比较的窗口天数（最近N天 vs 之前N天）
    pub momentum_window: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            yearly_contributions: 1000.0,
            daily_streak: 30.0,
            active_ratio: 0.6,
            stars: 1000.0,
            top_repo_stars: 500.0,
            followers: 500.0,
            recognition_total_weight: 0.7,
            recognition_top_weight: 0.3,
            momentum_window: 30,
        }
    }
}

/// Weights of the five metrics. Only the diagnostic breakdown combines them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricWeights {
    pub volume: f64,
    pub consistency: f64,
    pub recognition: f64,
    pub social_proof: f64,
    pub momentum: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            volume: 0.25,
            consistency: 0.25,
            recognition: 0.20,
            social_proof: 0.15,
            momentum: 0.15,
        }
    }
}

/// K线模拟参数
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub milestones: Vec<u64>,
    pub short_window: usize,
    pub long_window: usize,
    pub active_week_threshold: u64,
    pub light_week_threshold: u64,
    pub max_base_gain: f64,
    /// Weekly average at which active-week intensity saturates (log scale)
    pub active_intensity_reference: f64,
    pub light_week_gain: f64,
    /// Weekly total that gives a light week full intensity
    pub light_week_scale: f64,
    pub diminishing_scale: f64,
    pub diminishing_floor: f64,
    pub milestone_weight: f64,
    pub flat_penalty: f64,
    pub price_floor: f64,
    pub ipo_base: f64,
    pub ipo_cap: f64,
    pub ipo_per_contribution: f64,
    pub ipo_window: usize,
    pub reputation_stars_baseline: f64,
    pub reputation_followers_baseline: f64,
    pub reputation_stars_weight: f64,
    pub reputation_followers_weight: f64,
    pub reputation_max_bonus: f64,
    pub trivial_series_len: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            milestones: vec![100, 500, 1000, 2500, 5000],
            short_window: 7,
            long_window: 14,
            active_week_threshold: 10,
            light_week_threshold: 3,
            max_base_gain: 2.0,
            active_intensity_reference: 10.0,
            light_week_gain: 0.5,
            light_week_scale: 10.0,
            diminishing_scale: 800.0,
            diminishing_floor: 0.4,
            milestone_weight: 0.5,
            flat_penalty: 0.3,
            price_floor: 1.0,
            ipo_base: 5.0,
            ipo_cap: 45.0,
            ipo_per_contribution: 3.0,
            ipo_window: 7,
            reputation_stars_baseline: 50000.0,
            reputation_followers_baseline: 10000.0,
            reputation_stars_weight: 0.6,
            reputation_followers_weight: 0.4,
            reputation_max_bonus: 0.25,
            trivial_series_len: 7,
        }
    }
}

/// Everything the computation core needs. Defaults reproduce the reference chart exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    pub scoring: ScoringConfig,
    pub weights: MetricWeights,
    pub simulation: SimulationConfig,
}

pub struct Config {
    pub github_endpoint: String,
    pub github_token: Option<String>,
    pub request_timeout_secs: u64,
    pub min_request_interval_ms: u64,
    pub repository_page_size: u32,
    pub model: ModelConfig,
}

impl Config {
    pub fn new() -> Self {
        Self {
            github_endpoint: DEFAULT_GITHUB_ENDPOINT.to_string(),
            github_token: None,
            request_timeout_secs: 30,
            min_request_interval_ms: 0,
            repository_page_size: 100,
            model: ModelConfig::default(),
        }
    }

    /// 从环境变量读取 GITHUB_TOKEN 和 SIGNAL_GITHUB_ENDPOINT
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                config.github_token = Some(token);
            }
        }
        if let Ok(endpoint) = std::env::var("SIGNAL_GITHUB_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.github_endpoint = endpoint;
            }
        }
        config
    }

    pub fn with_github_endpoint(mut self, endpoint: &str) -> Self {
        self.github_endpoint = endpoint.to_string();
        self
    }

    pub fn with_github_token(mut self, token: &str) -> Self {
        self.github_token = Some(token.to_string());
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_min_request_interval_ms(mut self, millis: u64) -> Self {
        self.min_request_interval_ms = millis;
        self
    }

    pub fn with_repository_page_size(mut self, size: u32) -> Self {
        self.repository_page_size = size;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Reject settings the fetch layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.github_endpoint.starts_with("http://") && !self.github_endpoint.starts_with("https://") {
            return Err(SignalError::ConfigError(format!(
                "Invalid GitHub endpoint: {}", self.github_endpoint
            )));
        }
        // GitHub 的 first 参数上限是 100
        if self.repository_page_size == 0 || self.repository_page_size > 100 {
            return Err(SignalError::ConfigError(format!(
                "Repository page size must be within 1..=100, got {}", self.repository_page_size
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(SignalError::ConfigError("Request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
