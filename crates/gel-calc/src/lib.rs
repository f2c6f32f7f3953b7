//! # Gel Calculation Engine
//!
//! 配方換算、需求彙總、庫存扣帳、跑道預測、縫製流程、採購估算與生產歷史

pub mod demand;
pub mod history;
pub mod ledger;
pub mod pipeline;
pub mod purchasing;
pub mod recipe;
pub mod runway;
pub mod warehouse;

// Re-export 主要類型
pub use demand::{DemandAggregator, Requirements};
pub use history::{DayTotal, HistoryCalculator, HistoryRange, HourTotal};
pub use ledger::LedgerCalculator;
pub use pipeline::{SewingPipeline, Transfer};
pub use purchasing::{Money, ProductCost, PurchaseCosts, PurchaseEstimate, PurchaseEstimator, RollKilograms};
pub use recipe::UsageCalculator;
pub use runway::{Constraint, Days, MaterialDays, MaterialRunway, ProductRunway, RunwayCalculator};
pub use warehouse::{ProductionReceipt, Warehouse};

use gel_core::{FabricUsage, MaterialUsage};
use serde::Serialize;

/// 預測結果（依目前計劃）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionReport {
    /// 每日原料用量
    pub daily_usage: MaterialUsage,

    /// 每日布料用量（片）
    pub daily_fabric_usage: FabricUsage,

    /// 整體原料跑道
    pub runway: MaterialRunway,

    /// 各產品跑道
    pub products: Vec<ProductRunway>,
}

impl ProjectionReport {
    /// 跑道最短的產品（全部無限時為 None）
    pub fn tightest_product(&self) -> Option<&ProductRunway> {
        self.products
            .iter()
            .filter(|p| !p.days.is_unbounded())
            .min_by_key(|p| p.days)
    }
}
