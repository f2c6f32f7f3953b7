//! 記憶體儲存（測試與示範用）

use std::collections::BTreeMap;

use gel_core::{
    FabricInventory, MaterialInventory, PriceConfig, Product, ProductionLog, ProductionPlan,
    RecipeConfig, Stage, StageCounts,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::{StoredRecords, WarehouseStore};
use crate::{Result, StoreError};

/// 記憶體儲存
///
/// 可匯出/匯入 JSON；`fail_writes` 開啟時所有寫入都回傳 `Backend` 錯誤。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    products: BTreeMap<String, Product>,
    inventory: Option<MaterialInventory>,
    fabric: Option<FabricInventory>,
    plan: BTreeMap<String, Decimal>,
    recipe: Option<RecipeConfig>,
    prices: Option<PriceConfig>,
    to_sew: BTreeMap<String, u64>,
    sewing: BTreeMap<String, u64>,
    logs: Vec<ProductionLog>,

    #[serde(skip)]
    fail_writes: bool,

    /// 成功寫入次數
    #[serde(skip)]
    writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以既有紀錄建立
    pub fn from_records(records: StoredRecords) -> Self {
        Self {
            products: records
                .products
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            inventory: records.inventory,
            fabric: records.fabric,
            plan: records
                .plan
                .iter()
                .map(|(id, units)| (id.to_string(), units))
                .collect(),
            recipe: records.recipe,
            prices: records.prices,
            to_sew: records
                .to_sew
                .iter()
                .map(|(id, qty)| (id.to_string(), qty))
                .collect(),
            sewing: records
                .sewing
                .iter()
                .map(|(id, qty)| (id.to_string(), qty))
                .collect(),
            logs: records.logs,
            ..Self::default()
        }
    }

    /// 模擬後端故障
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn write<T>(&mut self, op: &str, apply: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.fail_writes {
            return Err(StoreError::Backend(format!("{} 寫入失敗", op)));
        }
        let value = apply(self)?;
        self.writes += 1;
        Ok(value)
    }
}

impl WarehouseStore for InMemoryStore {
    fn load_all(&self) -> Result<StoredRecords> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        let mut logs = self.logs.clone();
        logs.sort_by_key(|l| l.timestamp);

        Ok(StoredRecords {
            products,
            inventory: self.inventory,
            fabric: self.fabric,
            plan: self
                .plan
                .iter()
                .map(|(id, units)| (id.clone(), *units))
                .collect::<ProductionPlan>(),
            recipe: self.recipe,
            prices: self.prices,
            to_sew: self
                .to_sew
                .iter()
                .map(|(id, qty)| (id.clone(), *qty))
                .collect::<StageCounts>(),
            sewing: self
                .sewing
                .iter()
                .map(|(id, qty)| (id.clone(), *qty))
                .collect::<StageCounts>(),
            logs,
        })
    }

    fn update_inventory(&mut self, inventory: &MaterialInventory) -> Result<()> {
        self.write("inventory", |s| {
            s.inventory = Some(*inventory);
            Ok(())
        })
    }

    fn update_fabric(&mut self, fabric: &FabricInventory) -> Result<()> {
        self.write("fabric", |s| {
            s.fabric = Some(*fabric);
            Ok(())
        })
    }

    fn update_recipe(&mut self, recipe: &RecipeConfig) -> Result<()> {
        self.write("recipe", |s| {
            s.recipe = Some(*recipe);
            Ok(())
        })
    }

    fn update_prices(&mut self, prices: &PriceConfig) -> Result<()> {
        self.write("prices", |s| {
            s.prices = Some(*prices);
            Ok(())
        })
    }

    fn upsert_plan(&mut self, product_id: &str, units_per_day: Decimal) -> Result<()> {
        self.write("plan", |s| {
            s.plan.insert(product_id.to_string(), units_per_day);
            Ok(())
        })
    }

    fn delete_plan(&mut self, product_id: &str) -> Result<()> {
        self.write("plan", |s| {
            s.plan.remove(product_id);
            Ok(())
        })
    }

    fn upsert_stage(&mut self, stage: Stage, product_id: &str, qty: u64) -> Result<()> {
        self.write("stage", |s| {
            let rows = match stage {
                Stage::AwaitingSewing => &mut s.to_sew,
                Stage::InSewing => &mut s.sewing,
            };
            rows.insert(product_id.to_string(), qty);
            Ok(())
        })
    }

    fn insert_logs(&mut self, logs: &[ProductionLog]) -> Result<()> {
        self.write("logs", |s| {
            if let Some(dup) = logs.iter().find(|l| s.logs.iter().any(|e| e.id == l.id)) {
                return Err(StoreError::Duplicate(dup.id.to_string()));
            }
            s.logs.extend_from_slice(logs);
            Ok(())
        })
    }

    fn insert_product(&mut self, product: &Product) -> Result<()> {
        self.write("products", |s| {
            if s.products.contains_key(&product.id) {
                return Err(StoreError::Duplicate(product.id.clone()));
            }
            s.products.insert(product.id.clone(), product.clone());
            Ok(())
        })
    }

    fn update_product(&mut self, product: &Product) -> Result<()> {
        self.write("products", |s| match s.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "product",
                key: product.id.clone(),
            }),
        })
    }

    fn delete_product(&mut self, product_id: &str) -> Result<()> {
        self.write("products", |s| {
            s.products.remove(product_id);
            Ok(())
        })
    }
}
