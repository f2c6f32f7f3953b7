//! 倉庫工作階段：倉庫 + 儲存 + 髒標記同步

use chrono::{DateTime, Utc};
use gel_calc::{ProductionReceipt, Transfer, Warehouse};
use gel_core::{
    Coefficients, FabricInventory, FabricUsage, MaterialInventory, MaterialUsage, PriceConfig,
    Product, ProductPatch, ProductQuantities, RecipeConfig, Stage,
};
use rust_decimal::Decimal;

use crate::dirty_tracking::{DirtyEntity, DirtyTracker, ProductChange};
use crate::store::WarehouseStore;
use crate::Result;

/// 同步策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// 僅在呼叫 `flush` 時寫回
    #[default]
    Manual,
    /// 每個操作成功後立即寫回
    WriteThrough,
}

/// 倉庫工作階段
///
/// 領域錯誤不會改變任何狀態也不會留下標記。寫回失敗時記憶體中的變更保留，
/// 標記也保留到下一次 `flush`；不會自動重試。
pub struct WarehouseSession<S: WarehouseStore> {
    warehouse: Warehouse,
    store: S,
    tracker: DirtyTracker,
    policy: SyncPolicy,
}

impl<S: WarehouseStore> WarehouseSession<S> {
    /// 從儲存載入
    ///
    /// 儲存中沒有產品時使用預設目錄，並標記為待新增。
    pub fn open(store: S) -> Result<Self> {
        let records = store.load_all()?;
        let seeded = records.products.is_empty();
        let warehouse = Warehouse::new(records.into_state());

        let mut tracker = DirtyTracker::new();
        if seeded {
            for product in warehouse.products() {
                tracker.mark_product(&product.id, ProductChange::Inserted);
            }
        }

        tracing::info!(
            "載入倉庫：{} 項產品，{} 筆生產紀錄",
            warehouse.products().len(),
            warehouse.logs().len()
        );

        Ok(Self {
            warehouse,
            store,
            tracker,
            policy: SyncPolicy::default(),
        })
    }

    /// 建構器模式：設置同步策略
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 建構器模式：調整倉庫設定（例如歷史時區）
    pub fn map_warehouse(mut self, f: impl FnOnce(Warehouse) -> Warehouse) -> Self {
        self.warehouse = f(self.warehouse);
        self
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.tracker.is_clean()
    }

    pub fn into_parts(self) -> (Warehouse, S) {
        (self.warehouse, self.store)
    }

    // ===== 生產 =====

    pub fn register_production(
        &mut self,
        request: &ProductQuantities,
        at: DateTime<Utc>,
    ) -> Result<ProductionReceipt> {
        let receipt = self.warehouse.register_production(request, at)?;

        self.tracker.mark_dirty(DirtyEntity::Inventory);
        self.tracker.mark_dirty(DirtyEntity::Fabric);
        self.mark_stage(Stage::AwaitingSewing, &receipt.sewing_added);
        self.tracker.record_logs(receipt.logs.iter().cloned());

        self.sync()?;
        Ok(receipt)
    }

    // ===== 庫存 =====

    pub fn add_stock(&mut self, delta: &MaterialUsage) -> Result<()> {
        self.warehouse.add_stock(delta)?;
        self.tracker.mark_dirty(DirtyEntity::Inventory);
        self.sync()
    }

    pub fn add_fabric(&mut self, delta: &FabricUsage) -> Result<()> {
        self.warehouse.add_fabric(delta)?;
        self.tracker.mark_dirty(DirtyEntity::Fabric);
        self.sync()
    }

    pub fn set_inventory(&mut self, inventory: MaterialInventory) -> Result<()> {
        self.warehouse.set_inventory(inventory);
        self.tracker.mark_dirty(DirtyEntity::Inventory);
        self.sync()
    }

    pub fn set_fabric(&mut self, fabric: FabricInventory) -> Result<()> {
        self.warehouse.set_fabric(fabric);
        self.tracker.mark_dirty(DirtyEntity::Fabric);
        self.sync()
    }

    // ===== 縫製 =====

    pub fn send_to_sewing(&mut self, dispatch: &ProductQuantities) -> Result<Vec<Transfer>> {
        let moved = self.warehouse.send_to_sewing(dispatch);
        self.mark_stage(Stage::AwaitingSewing, &moved);
        self.mark_stage(Stage::InSewing, &moved);
        self.sync()?;
        Ok(moved)
    }

    pub fn send_all_to_sewing(&mut self) -> Result<Vec<Transfer>> {
        let moved = self.warehouse.send_all_to_sewing();
        self.mark_stage(Stage::AwaitingSewing, &moved);
        self.mark_stage(Stage::InSewing, &moved);
        self.sync()?;
        Ok(moved)
    }

    pub fn retire_from_sewing(&mut self, dispatch: &ProductQuantities) -> Result<Vec<Transfer>> {
        let retired = self.warehouse.retire_from_sewing(dispatch);
        self.mark_stage(Stage::InSewing, &retired);
        self.sync()?;
        Ok(retired)
    }

    pub fn retire_all(&mut self) -> Result<Vec<Transfer>> {
        let retired = self.warehouse.retire_all();
        self.mark_stage(Stage::InSewing, &retired);
        self.sync()?;
        Ok(retired)
    }

    // ===== 計劃與配置 =====

    pub fn set_plan_units(&mut self, product_id: &str, units_per_day: Decimal) -> Result<()> {
        self.warehouse.set_plan_units(product_id, units_per_day)?;
        self.tracker
            .mark_dirty(DirtyEntity::Plan(product_id.to_string()));
        self.sync()
    }

    pub fn set_recipe(&mut self, recipe: RecipeConfig) -> Result<()> {
        self.warehouse.set_recipe(recipe)?;
        self.tracker.mark_dirty(DirtyEntity::Recipe);
        self.sync()
    }

    pub fn set_coefficients(&mut self, coefficients: Coefficients) -> Result<()> {
        self.warehouse.set_coefficients(coefficients)?;
        self.tracker.mark_dirty(DirtyEntity::Recipe);
        self.sync()
    }

    pub fn set_prices(&mut self, prices: PriceConfig) -> Result<()> {
        self.warehouse.set_prices(prices)?;
        self.tracker.mark_dirty(DirtyEntity::Prices);
        self.sync()
    }

    // ===== 產品目錄 =====

    pub fn add_product(&mut self, product: Product) -> Result<()> {
        let product_id = product.id.clone();
        self.warehouse.add_product(product)?;
        self.tracker
            .mark_product(&product_id, ProductChange::Inserted);
        self.sync()
    }

    pub fn create_product(&mut self, name: impl Into<String>, weight_g: Decimal) -> Result<Product> {
        let product = self.warehouse.create_product(name, weight_g)?;
        self.tracker
            .mark_product(&product.id, ProductChange::Inserted);
        self.sync()?;
        Ok(product)
    }

    pub fn update_product(&mut self, product_id: &str, patch: ProductPatch) -> Result<Product> {
        let product = self.warehouse.update_product(product_id, patch)?;
        self.tracker
            .mark_product(product_id, ProductChange::Updated);
        self.sync()?;
        Ok(product)
    }

    pub fn delete_product(&mut self, product_id: &str) -> Result<Product> {
        let removed = self.warehouse.delete_product(product_id)?;
        self.tracker
            .mark_product(product_id, ProductChange::Deleted);
        self.tracker
            .mark_dirty(DirtyEntity::Plan(product_id.to_string()));
        self.sync()?;
        Ok(removed)
    }

    // ===== 同步 =====

    /// 寫回所有待同步的變更，回傳寫入次數
    ///
    /// 失敗時已寫入的項目清除標記，其餘保留。
    pub fn flush(&mut self) -> Result<usize> {
        if self.tracker.is_clean() {
            return Ok(0);
        }

        let mut written = 0;
        match self.write_pending(&mut written) {
            Ok(()) => {
                tracing::info!("同步完成：{} 筆寫入", written);
                Ok(written)
            }
            Err(e) => {
                tracing::warn!("同步失敗（已寫入 {} 筆）: {}", written, e);
                Err(e)
            }
        }
    }

    fn write_pending(&mut self, written: &mut usize) -> Result<()> {
        // 產品先寫，計劃列才有對應的產品
        for (product_id, change) in self.tracker.product_changes() {
            match change {
                ProductChange::Inserted => {
                    if let Some(product) = self.warehouse.product(&product_id) {
                        self.store.insert_product(product)?;
                    }
                }
                ProductChange::Updated => {
                    if let Some(product) = self.warehouse.product(&product_id) {
                        self.store.update_product(product)?;
                    }
                }
                ProductChange::Deleted => self.store.delete_product(&product_id)?,
            }
            self.tracker.clear_product(&product_id);
            *written += 1;
        }

        for entity in self.tracker.dirty_entities() {
            let state = self.warehouse.state();
            match &entity {
                DirtyEntity::Inventory => self.store.update_inventory(&state.stock.materials)?,
                DirtyEntity::Fabric => self.store.update_fabric(&state.stock.fabric)?,
                DirtyEntity::Recipe => self.store.update_recipe(&state.recipe)?,
                DirtyEntity::Prices => self.store.update_prices(&state.prices)?,
                DirtyEntity::Plan(product_id) => {
                    if state.product(product_id).is_some() {
                        self.store
                            .upsert_plan(product_id, state.plan.units_for(product_id))?;
                    } else {
                        self.store.delete_plan(product_id)?;
                    }
                }
                DirtyEntity::Stage(stage, product_id) => {
                    let counts = match stage {
                        Stage::AwaitingSewing => &state.to_sew,
                        Stage::InSewing => &state.sewing,
                    };
                    self.store
                        .upsert_stage(*stage, product_id, counts.get(product_id))?;
                }
            }
            self.tracker.mark_clean(&entity);
            *written += 1;
        }

        if !self.tracker.pending_logs().is_empty() {
            self.store.insert_logs(self.tracker.pending_logs())?;
            self.tracker.clear_logs();
            *written += 1;
        }

        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        match self.policy {
            SyncPolicy::Manual => Ok(()),
            SyncPolicy::WriteThrough => self.flush().map(|_| ()),
        }
    }

    fn mark_stage(&mut self, stage: Stage, transfers: &[Transfer]) {
        for transfer in transfers {
            self.tracker
                .mark_dirty(DirtyEntity::Stage(stage, transfer.product_id.clone()));
        }
    }
}
