use std::fmt;

use crate::config::{MetricWeights, ModelConfig};
use crate::engine::scorer;
use crate::models::profile::UserProfile;
use crate::models::stock::MetricScores;

/// Diagnostic view of the metrics.
///
/// `illustrative_price` maps the weighted score onto $1..$500 with
/// `1 + 499 * (weighted / 100)^1.5`. It is NOT the quoted price, which
/// always comes from the candle series.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub login: String,
    pub metrics: MetricScores,
    pub weights: MetricWeights,
    pub weighted_score: f64,
    pub illustrative_price: f64,
    pub longest_streak: usize,
    pub current_streak: usize,
}

pub fn weighted_score(metrics: &MetricScores, weights: &MetricWeights) -> f64 {
    metrics.volume * weights.volume
        + metrics.consistency * weights.consistency
        + metrics.recognition * weights.recognition
        + metrics.social_proof * weights.social_proof
        + metrics.momentum * weights.momentum
}

pub fn illustrative_price(weighted: f64) -> f64 {
    let normalized = (weighted / 100.0).clamp(0.0, 1.0);
    1.0 + 499.0 * normalized.powf(1.5)
}

pub fn breakdown(profile: &UserProfile, config: &ModelConfig) -> ScoreBreakdown {
    let metrics = scorer::score_metrics(profile, &config.scoring);
    let weighted = weighted_score(&metrics, &config.weights);

    ScoreBreakdown {
        login: profile.login.clone(),
        metrics,
        weights: config.weights.clone(),
        weighted_score: weighted,
        illustrative_price: illustrative_price(weighted),
        longest_streak: scorer::longest_streak(&profile.contribution_days),
        current_streak: scorer::current_streak(&profile.contribution_days),
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SIGNAL Score Breakdown ===")?;
        writeln!(f, "User: {}", self.login)?;
        writeln!(f)?;
        writeln!(f, "Metrics (0-100):")?;
        writeln!(f, "  Volume:      {:.1} (weight: {})", self.metrics.volume, self.weights.volume)?;
        writeln!(f, "  Consistency: {:.1} (weight: {})", self.metrics.consistency, self.weights.consistency)?;
        writeln!(f, "  Recognition: {:.1} (weight: {})", self.metrics.recognition, self.weights.recognition)?;
        writeln!(f, "  Social:      {:.1} (weight: {})", self.metrics.social_proof, self.weights.social_proof)?;
        writeln!(f, "  Momentum:    {:.1} (weight: {})", self.metrics.momentum, self.weights.momentum)?;
        writeln!(f)?;
        writeln!(f, "Streaks: longest {} days, current {} days", self.longest_streak, self.current_streak)?;
        writeln!(f, "Weighted Score: {:.1}/100", self.weighted_score)?;
        write!(f, "Stock Price: ${:.2}", self.illustrative_price)
    }
}
