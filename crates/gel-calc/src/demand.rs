//! 需求彙總：每日原料/布料用量與生產請求所需總量

use gel_core::{
    Coefficients, FabricUsage, GelError, MaterialUsage, Product, ProductQuantities,
    ProductionPlan,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::recipe::UsageCalculator;

/// 一次生產請求所需的原料與布料
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub materials: MaterialUsage,
    pub fabric: FabricUsage,
}

/// 需求彙總器
pub struct DemandAggregator;

impl DemandAggregator {
    /// 依計劃計算每日原料用量
    pub fn daily_usage(
        products: &[Product],
        plan: &ProductionPlan,
        coefficients: &Coefficients,
    ) -> MaterialUsage {
        products
            .iter()
            .map(|p| UsageCalculator::usage_per_unit(p, coefficients).scaled(plan.units_for(&p.id)))
            .sum()
    }

    /// 依計劃計算每日布料用量（片）
    ///
    /// 預測用途：超出範圍時飽和，不回傳錯誤。
    pub fn daily_fabric_usage(products: &[Product], plan: &ProductionPlan) -> FabricUsage {
        let mut total = FabricUsage::zero();
        for product in products {
            let units = plan.units_for(&product.id);
            for req in &product.fabrics {
                let current = total.get(req.fabric);
                *total.get_mut(req.fabric) =
                    current.saturating_add(req.units_per_product.saturating_mul(units));
            }
        }
        total
    }

    /// 生產請求所需總量
    ///
    /// 負數視為 0；請求中出現目錄以外且數量大於 0 的產品時回傳 `UnknownProduct`，
    /// 任何合計溢位時回傳 `QuantityOverflow`。
    pub fn requirements(
        products: &[Product],
        request: &ProductQuantities,
        coefficients: &Coefficients,
    ) -> gel_core::Result<Requirements> {
        if let Some((unknown, _)) = request
            .iter()
            .find(|(id, qty)| **qty > Decimal::ZERO && !products.iter().any(|p| &p.id == *id))
        {
            return Err(GelError::UnknownProduct(unknown.clone()));
        }

        let mut required = Requirements::default();
        for product in products {
            let qty = request
                .get(&product.id)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);
            if qty.is_zero() {
                continue;
            }

            let overflow = || GelError::QuantityOverflow(format!("產品 {} 需求", product.id));

            required.materials = UsageCalculator::usage_per_unit(product, coefficients)
                .checked_scaled(qty)
                .and_then(|usage| required.materials.checked_add(&usage))
                .ok_or_else(overflow)?;
            for req in &product.fabrics {
                let current = required.fabric.get(req.fabric);
                *required.fabric.get_mut(req.fabric) = req
                    .units_per_product
                    .checked_mul(qty)
                    .and_then(|pieces| current.checked_add(pieces))
                    .ok_or_else(overflow)?;
            }

            tracing::debug!("產品 {} 需求 {} 件", product.id, qty);
        }

        Ok(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gel_core::{Fabric, Material};

    fn plan() -> ProductionPlan {
        ProductionPlan::new()
            .with_units("gorro", Decimal::from(10))
            .with_units("rodilleraM", Decimal::from(4))
    }

    #[test]
    fn test_daily_usage_sums_products() {
        let products = Product::default_catalog();
        let usage = DemandAggregator::daily_usage(&products, &plan(), &Coefficients::default());

        // gorro: 0.8 kg × 10 = 8 kg 凝膠；rodilleraM: 0.5 kg × 4 = 2 kg 凝膠
        assert_eq!(usage.acrylamide_kg, Decimal::new(15, 1));
        assert_eq!(usage.glycerin_kg, Decimal::new(45, 1));
        assert_eq!(usage.bis_g, Decimal::from(9));
    }

    #[test]
    fn test_daily_fabric_usage_mapping() {
        let products = Product::default_catalog();
        let usage = DemandAggregator::daily_fabric_usage(&products, &plan());

        assert_eq!(usage.get(Fabric::GorroNariz), Decimal::from(10));
        assert_eq!(usage.get(Fabric::GorroDetras), Decimal::from(10));
        assert_eq!(usage.get(Fabric::RodilleraM), Decimal::from(4));
        assert_eq!(usage.get(Fabric::RodilleraXl), Decimal::ZERO);
    }

    #[test]
    fn test_empty_plan_uses_nothing() {
        let products = Product::default_catalog();
        let usage =
            DemandAggregator::daily_usage(&products, &ProductionPlan::new(), &Coefficients::default());
        assert!(usage.is_zero());
    }

    #[test]
    fn test_requirements_for_request() {
        let products = Product::default_catalog();
        let request: ProductQuantities = [
            ("gorro".to_string(), Decimal::from(5)),
            ("rodilleraXL".to_string(), Decimal::from(-3)),
        ]
        .into_iter()
        .collect();

        let required =
            DemandAggregator::requirements(&products, &request, &Coefficients::default()).unwrap();

        assert_eq!(required.materials.acrylamide_kg, Decimal::new(6, 1));
        assert_eq!(required.fabric.get(Fabric::GorroNariz), Decimal::from(5));
        assert_eq!(required.fabric.get(Fabric::RodilleraXl), Decimal::ZERO);
    }

    #[test]
    fn test_requirements_unknown_product() {
        let products = Product::default_catalog();
        let request: ProductQuantities = [("cuello".to_string(), Decimal::ONE)].into_iter().collect();

        let err = DemandAggregator::requirements(&products, &request, &Coefficients::default())
            .unwrap_err();
        assert!(matches!(err, GelError::UnknownProduct(id) if id == "cuello"));
    }

    #[test]
    fn test_requirements_overflow_is_an_error() {
        let products = Product::default_catalog();
        let coefficients = Coefficients::default().with(Material::Bis, Decimal::from(10));
        let request: ProductQuantities =
            [("gorro".to_string(), Decimal::MAX)].into_iter().collect();

        let err = DemandAggregator::requirements(&products, &request, &coefficients).unwrap_err();
        assert!(matches!(err, GelError::QuantityOverflow(_)));
    }

    #[test]
    fn test_daily_usage_saturates_on_huge_plan() {
        let products = Product::default_catalog();
        let coefficients = Coefficients::default().with(Material::Glycerin, Decimal::from(10));
        let plan = ProductionPlan::new()
            .with_units("gorro", Decimal::MAX)
            .with_units("rodilleraM", Decimal::MAX);

        let usage = DemandAggregator::daily_usage(&products, &plan, &coefficients);
        let fabric = DemandAggregator::daily_fabric_usage(&products, &plan);

        assert_eq!(usage.glycerin_kg, Decimal::MAX);
        assert_eq!(fabric.get(Fabric::GorroNariz), Decimal::MAX);
    }
}
