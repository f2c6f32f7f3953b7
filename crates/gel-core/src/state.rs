//! 倉庫完整狀態（載入/快照）

use serde::{Deserialize, Serialize};

use crate::config::{PriceConfig, RecipeConfig};
use crate::inventory::StockLedger;
use crate::log::ProductionLog;
use crate::plan::ProductionPlan;
use crate::product::Product;
use crate::stage::StageCounts;
use crate::Result;

/// 倉庫狀態
///
/// 所有操作都針對同一份一致的快照執行，完成後才套用變更。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseState {
    pub products: Vec<Product>,
    pub stock: StockLedger,
    pub plan: ProductionPlan,
    pub recipe: RecipeConfig,
    pub prices: PriceConfig,

    /// 待縫製
    pub to_sew: StageCounts,

    /// 縫製中
    pub sewing: StageCounts,

    /// 生產紀錄（依時間排序）
    pub logs: Vec<ProductionLog>,
}

impl Default for WarehouseState {
    fn default() -> Self {
        Self {
            products: Product::default_catalog(),
            stock: StockLedger::default(),
            plan: ProductionPlan::default(),
            recipe: RecipeConfig::default(),
            prices: PriceConfig::default(),
            to_sew: StageCounts::default(),
            sewing: StageCounts::default(),
            logs: Vec::new(),
        }
    }
}

impl WarehouseState {
    /// 依ID查找產品
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn product_mut(&mut self, product_id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == product_id)
    }

    /// 序列化為 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 從 JSON 還原，紀錄依時間排序
    pub fn from_json(json: &str) -> Result<Self> {
        let mut state: WarehouseState = serde_json::from_str(json)?;
        state.logs.sort_by_key(|l| l.timestamp);
        Ok(state)
    }
}
