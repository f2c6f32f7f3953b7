//! 持久化介面

use gel_core::{
    FabricInventory, MaterialInventory, PriceConfig, Product, ProductionLog, ProductionPlan,
    RecipeConfig, Stage, StageCounts, StockLedger, WarehouseState,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// 一次載入的所有資料
///
/// 單例資料可能尚未建立（`None`），轉為倉庫狀態時以預設值補上。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecords {
    pub products: Vec<Product>,
    pub inventory: Option<MaterialInventory>,
    pub fabric: Option<FabricInventory>,
    pub plan: ProductionPlan,
    pub recipe: Option<RecipeConfig>,
    pub prices: Option<PriceConfig>,
    pub to_sew: StageCounts,
    pub sewing: StageCounts,
    pub logs: Vec<ProductionLog>,
}

impl StoredRecords {
    /// 轉為倉庫狀態；沒有任何產品時使用預設目錄
    pub fn into_state(self) -> WarehouseState {
        let products = if self.products.is_empty() {
            Product::default_catalog()
        } else {
            self.products
        };

        let mut logs = self.logs;
        logs.sort_by_key(|l| l.timestamp);

        WarehouseState {
            products,
            stock: StockLedger::new(
                self.inventory.unwrap_or_default(),
                self.fabric.unwrap_or_default(),
            ),
            plan: self.plan,
            recipe: self.recipe.unwrap_or_default(),
            prices: self.prices.unwrap_or_default(),
            to_sew: self.to_sew,
            sewing: self.sewing,
            logs,
        }
    }
}

/// 倉庫持久化
///
/// 計劃與階段列以自然鍵 upsert；庫存、布料、配方與價格為單例更新；
/// 生產紀錄只新增；產品支援完整的增刪改。
pub trait WarehouseStore {
    /// 載入全部資料
    fn load_all(&self) -> Result<StoredRecords>;

    fn update_inventory(&mut self, inventory: &MaterialInventory) -> Result<()>;

    fn update_fabric(&mut self, fabric: &FabricInventory) -> Result<()>;

    fn update_recipe(&mut self, recipe: &RecipeConfig) -> Result<()>;

    fn update_prices(&mut self, prices: &PriceConfig) -> Result<()>;

    fn upsert_plan(&mut self, product_id: &str, units_per_day: Decimal) -> Result<()>;

    fn delete_plan(&mut self, product_id: &str) -> Result<()>;

    fn upsert_stage(&mut self, stage: Stage, product_id: &str, qty: u64) -> Result<()>;

    fn insert_logs(&mut self, logs: &[ProductionLog]) -> Result<()>;

    fn insert_product(&mut self, product: &Product) -> Result<()>;

    fn update_product(&mut self, product: &Product) -> Result<()>;

    /// 刪除產品（不存在時視為成功）
    fn delete_product(&mut self, product_id: &str) -> Result<()>;
}
