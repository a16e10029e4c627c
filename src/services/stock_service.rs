use crate::config::Config;
use crate::engine::breakdown::ScoreBreakdown;
use crate::engine::StockEngine;
use crate::errors::Result;
use crate::models::stock::StockReport;
use crate::sources::base::ProfileSource;
use log::{error, info};
use std::sync::Arc;

/// 获取账号数据并计算股价
pub struct StockService {
    engine: StockEngine,
    source: Arc<dyn ProfileSource + Send + Sync>,
}

impl StockService {
    pub fn new(config: Config, source: Arc<dyn ProfileSource + Send + Sync>) -> Self {
        Self {
            engine: StockEngine::new(config.model),
            source,
        }
    }

    pub fn engine(&self) -> &StockEngine {
        &self.engine
    }

    /// Fetch, compute and package the account's stock.
    /// `NotFound` from the source is passed through untouched.
    pub async fn lookup(&self, login: &str) -> Result<StockReport> {
        let profile = match self.source.fetch_profile(login).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("Error fetching {} from {}: {}", login, self.source.source_name(), e);
                return Err(e);
            }
        };

        let stock = self.engine.compute(&profile);
        info!(
            "{} trades at ${:.2} ({:+.2}%, {})",
            profile.login, stock.price, stock.change, stock.change_direction.as_str()
        );

        Ok(StockReport {
            user: profile.summary(),
            stock,
        })
    }

    pub async fn breakdown(&self, login: &str) -> Result<ScoreBreakdown> {
        let profile = self.source.fetch_profile(login).await?;
        Ok(self.engine.breakdown(&profile))
    }

    pub async fn exists(&self, login: &str) -> Result<bool> {
        self.source.user_exists(login).await
    }
}
