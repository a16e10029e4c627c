//! Display scores. None of these feed the price path.

use crate::config::ScoringConfig;
use crate::models::profile::{ActivityRecord, UserProfile};
use crate::models::stock::MetricScores;
use crate::util;

const MAX_SCORE: f64 = 100.0;

/// Points for `value / baseline`, scaled so the baseline earns `cap`, never above `cap`
fn ratio_points(value: f64, baseline: f64, cap: f64) -> f64 {
    if baseline <= 0.0 {
        return if value > 0.0 { cap } else { 0.0 };
    }
    (value / baseline * cap).clamp(0.0, cap)
}

fn log_points(value: u64, baseline: f64) -> f64 {
    util::log_scale(value as f64, baseline + 1.0)
}

pub fn volume_score(profile: &UserProfile, config: &ScoringConfig) -> f64 {
    let normalized = log_points(profile.contributions.total, config.yearly_contributions);
    (normalized * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

pub fn longest_streak(days: &[ActivityRecord]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for day in days {
        if day.is_active() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Active days counted back from the most recent one
pub fn current_streak(days: &[ActivityRecord]) -> usize {
    days.iter().rev().take_while(|d| d.is_active()).count()
}

/// Longest streak and active-day ratio, 50 points each
pub fn consistency_score(days: &[ActivityRecord], config: &ScoringConfig) -> f64 {
    let half = MAX_SCORE / 2.0;
    let streak_points = ratio_points(longest_streak(days) as f64, config.daily_streak, half);

    let active_ratio = if days.is_empty() {
        0.0
    } else {
        days.iter().filter(|d| d.is_active()).count() as f64 / days.len() as f64
    };
    let ratio_score = ratio_points(active_ratio, config.active_ratio, half);

    (streak_points + ratio_score).clamp(0.0, MAX_SCORE)
}

/// Total stars and best repository, 70/30 by default
pub fn recognition_score(profile: &UserProfile, config: &ScoringConfig) -> f64 {
    let total_stars_score = log_points(profile.total_stars, config.stars);
    let top_repo_score = log_points(profile.top_repo_stars, config.top_repo_stars);

    let combined = (total_stars_score * config.recognition_total_weight
        + top_repo_score * config.recognition_top_weight) * MAX_SCORE;
    combined.clamp(0.0, MAX_SCORE)
}

pub fn social_proof_score(profile: &UserProfile, config: &ScoringConfig) -> f64 {
    let normalized = log_points(profile.followers, config.followers);
    (normalized * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Sums of the trailing window and the window right before it
pub fn momentum_windows(days: &[ActivityRecord], window: usize) -> (u64, u64) {
    let len = days.len();
    let recent_start = len.saturating_sub(window);
    let previous_start = len.saturating_sub(window * 2);

    let total = |slice: &[ActivityRecord]| slice.iter().map(|d| d.count as u64).sum::<u64>();
    (total(&days[recent_start..]), total(&days[previous_start..recent_start]))
}

/// 最近窗口与之前窗口的活跃度对比：持平 50，翻倍 100，归零 0
pub fn momentum_score(days: &[ActivityRecord], config: &ScoringConfig) -> f64 {
    let (recent_total, previous_total) = momentum_windows(days, config.momentum_window);

    if previous_total == 0 {
        return if recent_total > 0 { 75.0 } else { 50.0 };
    }

    let change_ratio = recent_total as f64 / previous_total as f64;
    (50.0 + (change_ratio - 1.0) * 50.0).clamp(0.0, MAX_SCORE)
}

pub fn score_metrics(profile: &UserProfile, config: &ScoringConfig) -> MetricScores {
    let days = profile.contribution_days.as_slice();
    MetricScores {
        volume: volume_score(profile, config),
        consistency: consistency_score(days, config),
        recognition: recognition_score(profile, config),
        social_proof: social_proof_score(profile, config),
        momentum: momentum_score(days, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn days_from(counts: &[u32]) -> Vec<ActivityRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ActivityRecord::new(start + chrono::Duration::days(i as i64), c))
            .collect()
    }

    fn windows(previous: &[u32], recent: &[u32]) -> Vec<ActivityRecord> {
        let mut counts = previous.to_vec();
        counts.extend_from_slice(recent);
        days_from(&counts)
    }

    #[test]
    fn volume_saturates_at_baseline() {
        let config = ScoringConfig::default();
        let base = UserProfile::new("dev");
        assert_eq!(volume_score(&base.clone().with_contributions_total(0), &config), 0.0);
        assert!((volume_score(&base.clone().with_contributions_total(1000), &config) - 100.0).abs() < 1e-9);
        assert_eq!(volume_score(&base.with_contributions_total(50_000), &config), 100.0);
    }

    #[test]
    fn streaks() {
        let days = days_from(&[1, 1, 0, 3, 3, 3, 0, 2, 2]);
        assert_eq!(longest_streak(&days), 3);
        assert_eq!(current_streak(&days), 2);
        assert_eq!(current_streak(&days_from(&[1, 0])), 0);
    }

    #[test]
    fn consistency_sub_scores_cap_at_fifty() {
        let config = ScoringConfig::default();
        // 60 天全勤：两项都封顶
        assert_eq!(consistency_score(&days_from(&[1; 60]), &config), 100.0);
        assert_eq!(consistency_score(&days_from(&[0; 60]), &config), 0.0);
        assert_eq!(consistency_score(&[], &config), 0.0);

        // streak 15/30 -> 25, ratio 0.5/0.6 -> 41.67
        let mut counts = vec![1; 15];
        counts.extend(vec![0; 15]);
        let score = consistency_score(&days_from(&counts), &config);
        assert!((score - (25.0 + 0.5 / 0.6 * 50.0)).abs() < 1e-9);
    }

    #[test]
    fn recognition_weights_total_over_top_repo() {
        let config = ScoringConfig::default();
        let profile = UserProfile::new("dev").with_stars(1000, 0);
        assert!((recognition_score(&profile, &config) - 70.0).abs() < 1e-9);
        let profile = UserProfile::new("dev").with_stars(0, 500);
        assert!((recognition_score(&profile, &config) - 30.0).abs() < 1e-9);
        let profile = UserProfile::new("dev").with_stars(1_000_000, 500_000);
        assert_eq!(recognition_score(&profile, &config), 100.0);
    }

    #[test]
    fn recognition_split_is_configurable() {
        let config = ScoringConfig {
            recognition_total_weight: 0.5,
            recognition_top_weight: 0.5,
            ..ScoringConfig::default()
        };
        let profile = UserProfile::new("dev").with_stars(1000, 0);
        assert!((recognition_score(&profile, &config) - 50.0).abs() < 1e-9);
        let profile = UserProfile::new("dev").with_stars(0, 500);
        assert!((recognition_score(&profile, &config) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn social_proof_log_scale() {
        let config = ScoringConfig::default();
        assert_eq!(social_proof_score(&UserProfile::new("dev"), &config), 0.0);
        let profile = UserProfile::new("dev").with_followers(500);
        assert!((social_proof_score(&profile, &config) - 100.0).abs() < 1e-9);
        let profile = UserProfile::new("dev").with_followers(22);
        let score = social_proof_score(&profile, &config);
        assert!(score > 40.0 && score < 60.0);
    }

    #[test]
    fn momentum_flat_activity_is_fifty() {
        let config = ScoringConfig::default();
        let days = windows(&[2; 30], &[2; 30]);
        assert_eq!(momentum_score(&days, &config), 50.0);
    }

    #[test]
    fn momentum_from_nothing() {
        let config = ScoringConfig::default();
        assert_eq!(momentum_score(&windows(&[0; 30], &[1; 30]), &config), 75.0);
        assert_eq!(momentum_score(&windows(&[0; 30], &[0; 30]), &config), 50.0);
        assert_eq!(momentum_score(&[], &config), 50.0);
    }

    #[test]
    fn momentum_doubled_and_halved() {
        let config = ScoringConfig::default();
        assert_eq!(momentum_score(&windows(&[1; 30], &[2; 30]), &config), 100.0);
        assert_eq!(momentum_score(&windows(&[2; 30], &[1; 30]), &config), 25.0);
        assert_eq!(momentum_score(&windows(&[4; 30], &[1; 30]), &config), 12.5);
        assert_eq!(momentum_score(&windows(&[4; 30], &[0; 30]), &config), 0.0);
        assert_eq!(momentum_score(&windows(&[1; 30], &[9; 30]), &config), 100.0);
    }

    #[test]
    fn momentum_windows_clip_short_history() {
        let days = days_from(&[1; 40]);
        assert_eq!(momentum_windows(&days, 30), (30, 10));
        let days = days_from(&[1; 20]);
        assert_eq!(momentum_windows(&days, 30), (20, 0));
    }

    #[test]
    fn alternate_baselines() {
        let config = ScoringConfig {
            followers: 9.0,
            ..ScoringConfig::default()
        };
        let profile = UserProfile::new("dev").with_followers(9);
        assert!((social_proof_score(&profile, &config) - 100.0).abs() < 1e-9);
    }
}
