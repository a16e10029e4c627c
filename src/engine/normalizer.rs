use log::debug;

use crate::config::SimulationConfig;
use crate::models::profile::{ActivityRecord, UserProfile};
use crate::models::stock::Candle;
use crate::util;

/// Trimmed history ready for the simulator
#[derive(Debug, Clone, PartialEq)]
pub struct ListedHistory<'a> {
    /// Days starting at the first active one
    pub days: &'a [ActivityRecord],
    pub ipo_price: f64,
    pub reputation_multiplier: f64,
}

/// 归一化结果：从未有过贡献的账号直接给出平盘序列
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<'a> {
    Unlisted(Vec<Candle>),
    Listed(ListedHistory<'a>),
}

pub fn first_active_index(days: &[ActivityRecord]) -> Option<usize> {
    days.iter().position(|d| d.is_active())
}

/// `ipo_base + min(ipo_cap, mean(first week) * ipo_per_contribution)`
pub fn ipo_price(trimmed: &[ActivityRecord], config: &SimulationConfig) -> f64 {
    let window = config.ipo_window.max(1).min(trimmed.len());
    let counts: Vec<u32> = trimmed[..window].iter().map(|d| d.count).collect();
    let first_week_avg = util::mean(&counts);
    config.ipo_base + config.ipo_cap.min(first_week_avg * config.ipo_per_contribution)
}

/// Scalar in [1.0, 1 + reputation_max_bonus] amplifying positive price moves
pub fn reputation_multiplier(total_stars: u64, followers: u64, config: &SimulationConfig) -> f64 {
    let stars_score = util::log_scale(total_stars as f64, config.reputation_stars_baseline).clamp(0.0, 1.0);
    let followers_score = util::log_scale(followers as f64, config.reputation_followers_baseline).clamp(0.0, 1.0);

    let combined = (stars_score * config.reputation_stars_weight
        + followers_score * config.reputation_followers_weight)
        .clamp(0.0, 1.0);

    1.0 + combined * config.reputation_max_bonus
}

/// Last `trivial_series_len` raw days as flat candles at the price floor
pub fn unlisted_series(days: &[ActivityRecord], config: &SimulationConfig) -> Vec<Candle> {
    let start = days.len().saturating_sub(config.trivial_series_len);
    days[start..]
        .iter()
        .map(|d| Candle::flat(d.date, config.price_floor))
        .collect()
}

pub fn normalize<'a>(profile: &'a UserProfile, config: &SimulationConfig) -> Normalized<'a> {
    let all_days = profile.contribution_days.as_slice();

    let first_active = match first_active_index(all_days) {
        Some(index) => index,
        None => {
            debug!("{} has no active days, emitting flat series", profile.login);
            return Normalized::Unlisted(unlisted_series(all_days, config));
        }
    };

    let days = &all_days[first_active..];
    let ipo_price = ipo_price(days, config);
    let reputation_multiplier = reputation_multiplier(profile.total_stars, profile.followers, config);

    debug!(
        "{}: listed on {} after trimming {} idle days, IPO {:.2}, reputation x{:.4}",
        profile.login, days[0].date, first_active, ipo_price, reputation_multiplier
    );

    Normalized::Listed(ListedHistory {
        days,
        ipo_price,
        reputation_multiplier,
    })
}
