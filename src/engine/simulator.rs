//! Day-by-day price walk over the trimmed activity history.
//!
//! Each day opens at the previous close, so the walk is a strict left fold:
//! the carried state is the running price (rounded to cents), the cumulative
//! contribution count and the index of the next milestone.

use log::{debug, trace};

use crate::config::SimulationConfig;
use crate::models::profile::ActivityRecord;
use crate::models::stock::Candle;
use crate::util;

/// Price movement for one day. The two variants carry different units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceMove {
    /// Percentage growth applied multiplicatively
    PercentGain(f64),
    /// Absolute dollar drop
    FlatPenalty(f64),
}

impl PriceMove {
    pub fn apply(&self, price: f64) -> f64 {
        match *self {
            PriceMove::PercentGain(percent) => price * (1.0 + percent / 100.0),
            PriceMove::FlatPenalty(dollars) => price - dollars,
        }
    }
}

/// 按最近7天/14天活跃度划分的价格阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPhase {
    ActiveWeek,
    LightWeek,
    Dormant,
    CoolingOff,
}

/// Trailing sums ending at (and including) one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingWindows {
    pub short_total: u64,
    pub short_avg: f64,
    pub long_total: u64,
}

impl RollingWindows {
    pub fn at(days: &[ActivityRecord], index: usize, config: &SimulationConfig) -> Self {
        let short = trailing(days, index, config.short_window);
        let long = trailing(days, index, config.long_window);

        let short_total = sum_counts(short);
        Self {
            short_total,
            short_avg: short_total as f64 / short.len() as f64,
            long_total: sum_counts(long),
        }
    }
}

fn trailing(days: &[ActivityRecord], index: usize, window: usize) -> &[ActivityRecord] {
    let start = (index + 1).saturating_sub(window.max(1));
    &days[start..=index]
}

fn sum_counts(days: &[ActivityRecord]) -> u64 {
    days.iter().map(|d| d.count as u64).sum()
}

/// One-shot cumulative contribution milestones
#[derive(Debug, Clone)]
pub struct MilestoneTracker<'a> {
    thresholds: &'a [u64],
    cumulative: u64,
    next_index: usize,
}

impl<'a> MilestoneTracker<'a> {
    pub fn new(thresholds: &'a [u64]) -> Self {
        Self {
            thresholds,
            cumulative: 0,
            next_index: 0,
        }
    }

    pub fn cumulative(&self) -> u64 {
        self.cumulative
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Adds one day's count and returns the boost of every milestone crossed by it.
    /// Milestone `i` is worth `2 + i`.
    pub fn advance(&mut self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }

        let previous = self.cumulative;
        self.cumulative += count as u64;

        let mut boost = 0.0;
        while let Some(&threshold) = self.thresholds.get(self.next_index) {
            if previous < threshold && self.cumulative >= threshold {
                boost += 2.0 + self.next_index as f64;
                self.next_index += 1;
            } else {
                break;
            }
        }
        boost
    }
}

pub struct CandleSimulator<'a> {
    config: &'a SimulationConfig,
    reputation_multiplier: f64,
}

impl<'a> CandleSimulator<'a> {
    pub fn new(config: &'a SimulationConfig, reputation_multiplier: f64) -> Self {
        Self {
            config,
            reputation_multiplier,
        }
    }

    /// Picks the tier for the day; tiers are checked in priority order.
    pub fn price_move(&self, windows: &RollingWindows, running_price: f64, milestone_boost: f64) -> (MarketPhase, PriceMove) {
        let config = self.config;

        if windows.short_total >= config.active_week_threshold {
            let intensity = util::log_scale(windows.short_avg, config.active_intensity_reference).min(1.0);
            let base_gain = config.max_base_gain * intensity * self.reputation_multiplier;
            // 价格越高涨幅越小，但不低于 diminishing_floor
            let diminishing_factor = config.diminishing_floor.max(1.0 - running_price / config.diminishing_scale);
            let percent = base_gain * diminishing_factor + milestone_boost * config.milestone_weight;
            (MarketPhase::ActiveWeek, PriceMove::PercentGain(percent))
        } else if windows.short_total >= config.light_week_threshold {
            let intensity = windows.short_total as f64 / config.light_week_scale;
            let percent = config.light_week_gain * intensity * self.reputation_multiplier;
            (MarketPhase::LightWeek, PriceMove::PercentGain(percent))
        } else if windows.long_total == 0 {
            (MarketPhase::Dormant, PriceMove::FlatPenalty(config.flat_penalty))
        } else {
            (MarketPhase::CoolingOff, PriceMove::PercentGain(0.0))
        }
    }

    pub fn simulate(&self, days: &[ActivityRecord], ipo_price: f64) -> Vec<Candle> {
        let config = self.config;
        let mut running_price = ipo_price;
        let mut milestones = MilestoneTracker::new(&config.milestones);
        let mut candles = Vec::with_capacity(days.len());

        for (index, day) in days.iter().enumerate() {
            let milestone_boost = milestones.advance(day.count);
            if milestone_boost > 0.0 {
                debug!(
                    "{}: milestone reached at {} contributions, boost {}",
                    day.date, milestones.cumulative(), milestone_boost
                );
            }

            let windows = RollingWindows::at(days, index, config);
            let (phase, movement) = self.price_move(&windows, running_price, milestone_boost);

            let open = running_price;
            let close = movement.apply(open).max(config.price_floor);

            // 影线只用于展示
            let variance = (close - open).abs() * 0.3 + 0.1;
            let high = open.max(close) + variance;
            let low = open.min(close) - variance * 0.5;

            trace!("{} {:?} {:?} open {:.4} close {:.4}", day.date, phase, movement, open, close);

            let close = util::round2(close);
            candles.push(Candle {
                date: day.date,
                open: util::round2(open),
                high: util::round2(high),
                low: util::round2(low),
                close,
                volume: day.count,
                is_green: day.is_active(),
            });

            running_price = close;
        }

        candles
    }
}
