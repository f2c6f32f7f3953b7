//! 倉庫聚合：持有完整狀態並提供所有用例

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use gel_core::{
    Coefficients, FabricInventory, FabricUsage, GelError, MaterialInventory, MaterialUsage,
    PriceConfig, Product, ProductPatch, ProductQuantities, ProductionLog, RecipeConfig, Result,
    StageCounts, StockLedger, WarehouseState,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::demand::{DemandAggregator, Requirements};
use crate::history::{DayTotal, HistoryCalculator, HistoryRange, HourTotal};
use crate::ledger::LedgerCalculator;
use crate::pipeline::{SewingPipeline, Transfer};
use crate::purchasing::{PurchaseEstimate, PurchaseEstimator};
use crate::runway::{MaterialRunway, ProductRunway, RunwayCalculator};
use crate::ProjectionReport;

/// 登記生產的結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionReceipt {
    /// 新增的生產紀錄（每個數量大於 0 的產品一筆）
    pub logs: Vec<ProductionLog>,

    /// 扣減的原料與布料
    pub consumed: Requirements,

    /// 加入待縫製的件數
    pub sewing_added: Vec<Transfer>,
}

/// 倉庫
///
/// 單一寫入者；每個操作都在一致的記憶體快照上執行完畢才返回。
#[derive(Debug, Clone, Default)]
pub struct Warehouse {
    state: WarehouseState,

    /// 歷史分桶使用的時區
    history_offset: Option<FixedOffset>,
}

impl Warehouse {
    /// 以既有狀態建立倉庫
    pub fn new(state: WarehouseState) -> Self {
        Self {
            state,
            history_offset: None,
        }
    }

    /// 建構器模式：設置歷史分桶時區（預設 UTC）
    pub fn with_history_offset(mut self, offset: FixedOffset) -> Self {
        self.history_offset = Some(offset);
        self
    }

    pub fn state(&self) -> &WarehouseState {
        &self.state
    }

    pub fn into_state(self) -> WarehouseState {
        self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.state.products
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.state.product(product_id)
    }

    pub fn stock(&self) -> &StockLedger {
        &self.state.stock
    }

    pub fn to_sew(&self) -> &StageCounts {
        &self.state.to_sew
    }

    pub fn sewing(&self) -> &StageCounts {
        &self.state.sewing
    }

    pub fn logs(&self) -> &[ProductionLog] {
        &self.state.logs
    }

    fn coefficients(&self) -> &Coefficients {
        &self.state.recipe.coefficients
    }

    fn offset(&self) -> FixedOffset {
        self.history_offset.unwrap_or_else(|| Utc.fix())
    }

    // ===== 預測 =====

    /// 依計劃的每日原料用量
    pub fn daily_usage(&self) -> MaterialUsage {
        DemandAggregator::daily_usage(&self.state.products, &self.state.plan, self.coefficients())
    }

    /// 依計劃的每日布料用量
    pub fn daily_fabric_usage(&self) -> FabricUsage {
        DemandAggregator::daily_fabric_usage(&self.state.products, &self.state.plan)
    }

    /// 整體原料跑道
    pub fn runway(&self) -> MaterialRunway {
        RunwayCalculator::runway(&self.state.stock.materials, &self.daily_usage())
    }

    /// 各產品跑道
    pub fn product_runway(&self) -> Vec<ProductRunway> {
        RunwayCalculator::product_runway(
            &self.state.products,
            &self.state.plan,
            self.coefficients(),
            &self.state.stock,
        )
    }

    /// 目前計劃下的完整預測
    pub fn projection(&self) -> ProjectionReport {
        let report = ProjectionReport {
            daily_usage: self.daily_usage(),
            daily_fabric_usage: self.daily_fabric_usage(),
            runway: self.runway(),
            products: self.product_runway(),
        };

        tracing::info!(
            "預測完成：最短 {} 天，瓶頸 {}",
            report.runway.min_days,
            report
                .runway
                .bottleneck
                .map(|m| m.label())
                .unwrap_or("—")
        );
        report
    }

    // ===== 生產 =====

    /// 試算生產請求，不修改任何狀態
    pub fn check_production(&self, request: &ProductQuantities) -> Result<Requirements> {
        LedgerCalculator::check(
            &self.state.stock,
            &self.state.products,
            self.coefficients(),
            request,
        )
    }

    /// 登記生產
    ///
    /// 扣帳、寫入紀錄與增加待縫製為同一交易：任一步失敗時狀態不變。
    pub fn register_production(
        &mut self,
        request: &ProductQuantities,
        at: DateTime<Utc>,
    ) -> Result<ProductionReceipt> {
        let total = request
            .values()
            .try_fold(Decimal::ZERO, |acc, q| acc.checked_add((*q).max(Decimal::ZERO)))
            .ok_or_else(|| GelError::QuantityOverflow("生產數量合計".to_string()))?;
        if total <= Decimal::ZERO {
            tracing::warn!("拒絕登記：生產數量為空");
            return Err(GelError::EmptyProduction);
        }

        tracing::info!("開始登記生產：{} 項產品，共 {} 件", request.len(), total);

        let consumed = LedgerCalculator::check_and_debit(
            &mut self.state.stock,
            &self.state.products,
            &self.state.recipe.coefficients,
            request,
        )
        .map_err(|e| {
            tracing::warn!("登記失敗: {}", e);
            e
        })?;

        let logs: Vec<ProductionLog> = request
            .iter()
            .filter(|(_, qty)| **qty > Decimal::ZERO)
            .map(|(id, qty)| ProductionLog::new(id.clone(), *qty, at))
            .collect();
        self.state.logs.extend(logs.iter().cloned());
        self.state.logs.sort_by_key(|l| l.timestamp);

        let sewing_added = SewingPipeline::produce(&mut self.state.to_sew, request);

        tracing::info!("登記完成：新增 {} 筆紀錄", logs.len());

        Ok(ProductionReceipt {
            logs,
            consumed,
            sewing_added,
        })
    }

    // ===== 庫存 =====

    /// 收貨：原料加量（可為負）
    pub fn add_stock(&mut self, delta: &MaterialUsage) -> Result<()> {
        self.state.stock.add_stock(delta)?;
        tracing::debug!("原料入庫: {:?}", delta);
        Ok(())
    }

    /// 收貨：布料加量（可為負）
    pub fn add_fabric(&mut self, delta: &FabricUsage) -> Result<()> {
        self.state.stock.add_fabric(delta)?;
        tracing::debug!("布料入庫: {:?}", delta);
        Ok(())
    }

    /// 直接覆寫原料庫存（盤點修正）
    pub fn set_inventory(&mut self, inventory: MaterialInventory) {
        self.state.stock.materials = inventory;
    }

    /// 直接覆寫布料庫存（盤點修正）
    pub fn set_fabric(&mut self, fabric: FabricInventory) {
        self.state.stock.fabric = fabric;
    }

    // ===== 縫製 =====

    /// 送縫；目錄以外的產品ID會被忽略
    pub fn send_to_sewing(&mut self, dispatch: &ProductQuantities) -> Vec<Transfer> {
        let dispatch = self.catalog_only(dispatch);
        SewingPipeline::send_to_sewing(&mut self.state.to_sew, &mut self.state.sewing, &dispatch)
    }

    pub fn send_all_to_sewing(&mut self) -> Vec<Transfer> {
        SewingPipeline::send_all_to_sewing(&mut self.state.to_sew, &mut self.state.sewing)
    }

    /// 完成縫製；目錄以外的產品ID會被忽略
    pub fn retire_from_sewing(&mut self, dispatch: &ProductQuantities) -> Vec<Transfer> {
        let dispatch = self.catalog_only(dispatch);
        SewingPipeline::retire_from_sewing(&mut self.state.sewing, &dispatch)
    }

    /// 全部完成（含已刪除產品殘留的件數）
    pub fn retire_all(&mut self) -> Vec<Transfer> {
        SewingPipeline::retire_all(&mut self.state.sewing)
    }

    fn catalog_only(&self, dispatch: &ProductQuantities) -> ProductQuantities {
        dispatch
            .iter()
            .filter(|(id, _)| self.state.product(id).is_some())
            .map(|(id, qty)| (id.clone(), *qty))
            .collect()
    }

    // ===== 計劃與配置 =====

    /// 設置產品每日計劃件數
    pub fn set_plan_units(&mut self, product_id: &str, units_per_day: Decimal) -> Result<()> {
        if self.state.product(product_id).is_none() {
            return Err(GelError::UnknownProduct(product_id.to_string()));
        }
        if units_per_day < Decimal::ZERO {
            return Err(GelError::invalid(
                format!("plan[{}]", product_id),
                format!("每日件數不得為負: {}", units_per_day),
            ));
        }
        self.state.plan.set(product_id, units_per_day);
        Ok(())
    }

    pub fn plan_units(&self, product_id: &str) -> Decimal {
        self.state.plan.units_for(product_id)
    }

    /// 更新配方（係數 + 凝膠密度）
    pub fn set_recipe(&mut self, recipe: RecipeConfig) -> Result<()> {
        recipe.validate()?;
        self.state.recipe = recipe;
        tracing::info!("配方已更新");
        Ok(())
    }

    pub fn set_coefficients(&mut self, coefficients: Coefficients) -> Result<()> {
        let recipe = RecipeConfig {
            coefficients,
            ..self.state.recipe
        };
        self.set_recipe(recipe)
    }

    pub fn recipe(&self) -> &RecipeConfig {
        &self.state.recipe
    }

    pub fn set_prices(&mut self, prices: PriceConfig) -> Result<()> {
        prices.validate()?;
        self.state.prices = prices;
        Ok(())
    }

    pub fn prices(&self) -> &PriceConfig {
        &self.state.prices
    }

    // ===== 產品目錄 =====

    /// 新增產品（ID 不可重複）
    pub fn add_product(&mut self, product: Product) -> Result<()> {
        product.validate()?;
        if self.state.product(&product.id).is_some() {
            return Err(GelError::DuplicateProduct(product.id));
        }
        tracing::info!("新增產品 {} ({})", product.id, product.name);
        self.state.products.push(product);
        Ok(())
    }

    /// 以產生的ID建立產品
    pub fn create_product(
        &mut self,
        name: impl Into<String>,
        weight_g: Decimal,
    ) -> Result<Product> {
        let mut id = Product::generate_id();
        while self.state.product(&id).is_some() {
            id = Product::generate_id();
        }

        let product = Product::new(id, name, weight_g);
        self.add_product(product.clone())?;
        Ok(product)
    }

    /// 部分更新產品，驗證失敗時不修改
    pub fn update_product(&mut self, product_id: &str, patch: ProductPatch) -> Result<Product> {
        let current = self
            .state
            .product_mut(product_id)
            .ok_or_else(|| GelError::UnknownProduct(product_id.to_string()))?;

        let mut updated = current.clone();
        updated.apply(patch);
        updated.validate()?;
        *current = updated.clone();

        tracing::debug!("產品 {} 已更新", product_id);
        Ok(updated)
    }

    /// 刪除產品並移除其計劃；縫製階段的件數保留
    pub fn delete_product(&mut self, product_id: &str) -> Result<Product> {
        let index = self
            .state
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| GelError::UnknownProduct(product_id.to_string()))?;

        let removed = self.state.products.remove(index);
        self.state.plan.remove(product_id);
        tracing::info!("刪除產品 {}", product_id);
        Ok(removed)
    }

    // ===== 採購與歷史 =====

    /// 依每日件數估算 `days` 天的採購
    pub fn estimate_purchase(&self, units_per_day: &ProductQuantities, days: u32) -> PurchaseEstimate {
        PurchaseEstimator::estimate(
            &self.state.products,
            units_per_day,
            days,
            self.coefficients(),
            &self.state.prices,
        )
    }

    /// 以 `today` 結尾的每日生產件數
    pub fn daily_history(&self, today: NaiveDate, range: HistoryRange) -> Vec<DayTotal> {
        HistoryCalculator::daily_totals(&self.state.logs, today, range, self.offset())
    }

    /// 指定日期的每小時生產件數
    pub fn hourly_history(&self, day: NaiveDate) -> Vec<HourTotal> {
        HistoryCalculator::hourly_totals(&self.state.logs, day, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gel_core::{Fabric, FabricAmounts, Material, MaterialAmounts};

    fn request(pairs: &[(&str, i64)]) -> ProductQuantities {
        pairs
            .iter()
            .map(|(id, q)| (id.to_string(), Decimal::from(*q)))
            .collect()
    }

    fn stocked() -> Warehouse {
        let mut warehouse = Warehouse::default();
        warehouse.set_inventory(MaterialAmounts::new(
            Decimal::from(10),
            Decimal::from(10),
            Decimal::from(10),
            Decimal::from(10),
            Decimal::from(10),
        ));
        warehouse.set_fabric(
            FabricAmounts::zero()
                .with(Fabric::GorroNariz, Decimal::from(20))
                .with(Fabric::GorroDetras, Decimal::from(20))
                .with(Fabric::RodilleraM, Decimal::from(20))
                .with(Fabric::RodilleraXl, Decimal::from(20)),
        );
        warehouse
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 3, h, 0, 0).unwrap()
    }

    #[test]
    fn test_register_production_commits_everything() {
        let mut warehouse = stocked();

        let receipt = warehouse
            .register_production(&request(&[("gorro", 3), ("rodilleraM", 0)]), at(10))
            .unwrap();

        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(warehouse.logs().len(), 1);
        assert_eq!(warehouse.to_sew().get("gorro"), 3);
        assert_eq!(warehouse.to_sew().get("rodilleraM"), 0);
        assert_eq!(warehouse.stock().fabric.gorro_nariz, Decimal::from(17));
        // 3 × 0.8 × 0.15 = 0.36
        assert_eq!(warehouse.stock().materials.acrylamide_kg, Decimal::new(964, 2));
    }

    #[test]
    fn test_register_production_failure_leaves_state() {
        let mut warehouse = stocked();
        let before = warehouse.state().clone();

        let err = warehouse
            .register_production(&request(&[("gorro", 30)]), at(10))
            .unwrap_err();

        assert!(err.lacks().iter().any(|l| l == "Tela gorro nariz"));
        assert_eq!(warehouse.state(), &before);
    }

    #[test]
    fn test_empty_production_rejected() {
        let mut warehouse = stocked();

        let err = warehouse
            .register_production(&request(&[("gorro", 0), ("rodilleraM", -2)]), at(10))
            .unwrap_err();

        assert!(matches!(err, GelError::EmptyProduction));
        assert!(warehouse.logs().is_empty());
    }

    #[test]
    fn test_overflowing_request_is_an_error() {
        let mut warehouse = Warehouse::default();
        let before = warehouse.state().clone();
        let half = Decimal::MAX / Decimal::from(2) + Decimal::ONE;
        let request: ProductQuantities = [
            ("gorro".to_string(), half),
            ("rodilleraM".to_string(), half),
        ]
        .into_iter()
        .collect();

        let err = warehouse.register_production(&request, at(10)).unwrap_err();

        assert!(matches!(err, GelError::QuantityOverflow(_)));
        assert_eq!(warehouse.state(), &before);
    }

    #[test]
    fn test_overflowing_receipt_is_an_error() {
        let mut warehouse = stocked();
        let before = warehouse.stock().clone();

        let err = warehouse
            .add_fabric(&FabricAmounts::zero().with(Fabric::RodilleraM, Decimal::MAX))
            .unwrap_err();

        assert!(matches!(err, GelError::QuantityOverflow(_)));
        assert_eq!(warehouse.stock(), &before);
    }

    #[test]
    fn test_logs_stay_sorted() {
        let mut warehouse = stocked();
        warehouse
            .register_production(&request(&[("gorro", 1)]), at(15))
            .unwrap();
        warehouse
            .register_production(&request(&[("rodilleraM", 1)]), at(9))
            .unwrap();

        let times: Vec<_> = warehouse.logs().iter().map(|l| l.timestamp).collect();
        assert_eq!(times, vec![at(9), at(15)]);
    }

    #[test]
    fn test_sewing_flow() {
        let mut warehouse = stocked();
        warehouse
            .register_production(&request(&[("gorro", 4)]), at(10))
            .unwrap();

        warehouse.send_to_sewing(&request(&[("gorro", 3)]));
        assert_eq!(warehouse.to_sew().get("gorro"), 1);
        assert_eq!(warehouse.sewing().get("gorro"), 3);

        warehouse.send_all_to_sewing();
        warehouse.retire_from_sewing(&request(&[("gorro", 1)]));
        assert_eq!(warehouse.sewing().get("gorro"), 3);

        warehouse.retire_all();
        assert_eq!(warehouse.sewing().total(), 0);
    }

    #[test]
    fn test_dispatch_ignores_ids_outside_catalog() {
        let mut warehouse = stocked();
        warehouse
            .register_production(&request(&[("rodilleraM", 2)]), at(10))
            .unwrap();
        warehouse.send_all_to_sewing();
        warehouse.delete_product("rodilleraM").unwrap();

        assert!(warehouse
            .retire_from_sewing(&request(&[("rodilleraM", 2)]))
            .is_empty());
        assert!(warehouse
            .send_to_sewing(&request(&[("cuello", 5)]))
            .is_empty());
        assert_eq!(warehouse.sewing().get("rodilleraM"), 2);

        let retired = warehouse.retire_all();
        assert_eq!(retired.len(), 1);
        assert_eq!(warehouse.sewing().total(), 0);
    }

    #[test]
    fn test_plan_edit_rules() {
        let mut warehouse = Warehouse::default();

        warehouse.set_plan_units("gorro", Decimal::from(12)).unwrap();
        assert_eq!(warehouse.plan_units("gorro"), Decimal::from(12));

        assert!(matches!(
            warehouse.set_plan_units("cuello", Decimal::ONE),
            Err(GelError::UnknownProduct(_))
        ));
        assert!(matches!(
            warehouse.set_plan_units("gorro", Decimal::from(-1)),
            Err(GelError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_projection_uses_plan() {
        let mut warehouse = stocked();
        warehouse.set_plan_units("gorro", Decimal::from(10)).unwrap();

        let report = warehouse.projection();

        assert_eq!(report.daily_fabric_usage.gorro_nariz, Decimal::from(10));
        // Bisacrilamida 10 g / 7.2 g 每天，比布料的 2 天更短
        assert_eq!(report.runway.bottleneck, Some(Material::Bis));
        let gorro = &report.products[0];
        assert_eq!(gorro.days, report.runway.min_days);
        assert_eq!(gorro.bottleneck_label(), Some("Bisacrilamida (g)"));
    }

    #[test]
    fn test_product_crud() {
        let mut warehouse = Warehouse::default();

        let created = warehouse
            .create_product("Cuello", Decimal::from(300))
            .unwrap();
        assert!(created.id.starts_with("p_"));
        assert_eq!(warehouse.products().len(), 4);

        let updated = warehouse
            .update_product(&created.id, ProductPatch::weight_g(Decimal::from(350)))
            .unwrap();
        assert_eq!(updated.weight_g, Decimal::from(350));

        let err = warehouse
            .update_product(&created.id, ProductPatch::weight_g(Decimal::ZERO))
            .unwrap_err();
        assert!(matches!(err, GelError::InvalidConfiguration { .. }));
        assert_eq!(
            warehouse.product(&created.id).unwrap().weight_g,
            Decimal::from(350)
        );

        warehouse.set_plan_units(&created.id, Decimal::from(5)).unwrap();
        warehouse.delete_product(&created.id).unwrap();
        assert_eq!(warehouse.plan_units(&created.id), Decimal::ZERO);
        assert!(matches!(
            warehouse.delete_product(&created.id),
            Err(GelError::UnknownProduct(_))
        ));
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let mut warehouse = Warehouse::default();
        let err = warehouse
            .add_product(Product::new("gorro", "Otro", Decimal::from(100)))
            .unwrap_err();
        assert!(matches!(err, GelError::DuplicateProduct(id) if id == "gorro"));
    }

    #[test]
    fn test_invalid_recipe_rejected() {
        let mut warehouse = Warehouse::default();
        let bad = Coefficients::default().with(Material::Water, Decimal::from(-1));

        assert!(warehouse.set_coefficients(bad).is_err());
        assert_eq!(warehouse.recipe(), &RecipeConfig::default());
    }

    #[test]
    fn test_history_through_warehouse() {
        let mut warehouse = stocked();
        warehouse
            .register_production(&request(&[("gorro", 2), ("rodilleraXL", 1)]), at(8))
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let days = warehouse.daily_history(today, HistoryRange::Week);
        assert_eq!(HistoryCalculator::period_total(&days), Decimal::from(3));

        let hours = warehouse.hourly_history(today);
        assert_eq!(hours[8].total, Decimal::from(3));
    }
}
