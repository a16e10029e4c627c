//! Scoring and candlestick generation.
//!
//! Pure computation: a `UserProfile` goes in, a `StockResult` comes out.
//! Normalizer output feeds the scorer and the simulator independently and
//! the composer packages both.

pub mod breakdown;
pub mod composer;
pub mod normalizer;
pub mod scorer;
pub mod simulator;

use log::debug;

use crate::config::ModelConfig;
use crate::models::profile::UserProfile;
use crate::models::stock::StockResult;
use self::breakdown::ScoreBreakdown;
use self::normalizer::Normalized;
use self::simulator::CandleSimulator;

#[derive(Debug, Clone, Default)]
pub struct StockEngine {
    config: ModelConfig,
}

impl StockEngine {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn compute(&self, profile: &UserProfile) -> StockResult {
        let simulation = &self.config.simulation;
        let metrics = scorer::score_metrics(profile, &self.config.scoring);

        let candlesticks = match normalizer::normalize(profile, simulation) {
            Normalized::Unlisted(candles) => candles,
            Normalized::Listed(history) => {
                CandleSimulator::new(simulation, history.reputation_multiplier)
                    .simulate(history.days, history.ipo_price)
            }
        };

        let result = composer::compose(metrics, candlesticks, simulation);
        debug!(
            "{}: {} candles, price {:.2} ({:+.2}% {})",
            profile.login,
            result.candlesticks.len(),
            result.price,
            result.change,
            result.change_direction.as_str()
        );
        result
    }

    pub fn breakdown(&self, profile: &UserProfile) -> ScoreBreakdown {
        breakdown::breakdown(profile, &self.config)
    }
}

/// Computes the stock with the default model
pub fn compute_stock(profile: &UserProfile) -> StockResult {
    StockEngine::default().compute(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ActivityRecord;
    use crate::models::stock::ChangeDirection;
    use chrono::NaiveDate;

    fn profile_with(counts: &[u32]) -> UserProfile {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let days = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ActivityRecord::new(start + chrono::Duration::days(i as i64), c))
            .collect();
        UserProfile::new("dev").with_days(days)
    }

    #[test]
    fn idle_account_gets_flat_week() {
        let result = compute_stock(&profile_with(&[0; 365]));
        assert_eq!(result.candlesticks.len(), 7);
        assert!(result
            .candlesticks
            .iter()
            .all(|c| c.open == 1.0 && c.high == 1.0 && c.low == 1.0 && c.close == 1.0));
        assert!(result.candlesticks.iter().all(|c| !c.is_green && c.volume == 0));
        assert_eq!(result.price, 1.0);
        assert_eq!(result.change, 0.0);
        assert_eq!(result.change_direction, ChangeDirection::Neutral);
    }

    #[test]
    fn leading_idle_days_are_not_charted() {
        let mut counts = vec![0; 10];
        counts.extend([3, 0, 5]);
        let result = compute_stock(&profile_with(&counts));
        assert_eq!(result.candlesticks.len(), 3);
        assert_eq!(result.candlesticks[0].date, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        // IPO = 5 + 3 * mean(3, 0, 5)
        assert_eq!(result.candlesticks[0].open, 13.0);
    }

    #[test]
    fn first_week_of_fives_is_deterministic() {
        let mut counts = vec![5; 7];
        counts.extend(vec![0; 23]);
        let profile = profile_with(&counts);

        let first = compute_stock(&profile);
        let second = compute_stock(&profile);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.candlesticks.len(), 30);
        assert_eq!(first.candlesticks[0].open, 20.0);
        // last days are dormant: -0.3 each
        assert_eq!(first.change_direction, ChangeDirection::Down);
        assert_eq!(first.price, first.candlesticks[29].close);
    }

    #[test]
    fn scores_do_not_move_the_price() {
        let mut counts = vec![2; 40];
        counts.extend(vec![9; 20]);
        let plain = profile_with(&counts);
        let mut famous = plain.clone();
        famous.top_repo_stars = 400;
        famous.following = 900;

        // 只有 totalStars/followers 影响价格，topRepoStars 只影响评分
        let a = compute_stock(&plain);
        let b = compute_stock(&famous);
        assert_eq!(a.candlesticks, b.candlesticks);
        assert_ne!(a.metrics.recognition, b.metrics.recognition);
    }
}
