// 公开导出的模块，供外部使用
pub mod models;
pub mod engine;
pub mod errors;
pub mod config;

// 数据获取和编排，主程序使用
pub mod sources;
pub mod services;
#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::profile::{ActivityRecord, UserProfile, UserSummary};
pub use models::stock::{Candle, ChangeDirection, MetricScores, StockReport, StockResult};
pub use engine::{compute_stock, StockEngine};
pub use errors::{Result, SignalError};
