//! 採購估算：依每日件數與天數估算原料、布捲公斤數與成本

use gel_core::{
    Coefficients, FabricRoll, MaterialAmounts, MaterialUsage, PriceConfig, Product,
    ProductQuantities,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::recipe::UsageCalculator;

/// 各布捲所需公斤數
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RollKilograms {
    pub gorro_kg: Decimal,
    pub rodillera_kg: Decimal,
}

impl RollKilograms {
    pub fn get(&self, roll: FabricRoll) -> Decimal {
        match roll {
            FabricRoll::Gorro => self.gorro_kg,
            FabricRoll::Rodillera => self.rodillera_kg,
        }
    }

    fn get_mut(&mut self, roll: FabricRoll) -> &mut Decimal {
        match roll {
            FabricRoll::Gorro => &mut self.gorro_kg,
            FabricRoll::Rodillera => &mut self.rodillera_kg,
        }
    }
}

/// 金額（美元與披索）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Money {
    pub usd: Decimal,
    pub ars: Decimal,
}

impl Money {
    fn from_usd(usd: Decimal, rate: Decimal) -> Self {
        Self {
            usd,
            ars: usd.saturating_mul(rate),
        }
    }
}

/// 採購成本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurchaseCosts {
    pub subtotal: Money,
    pub iva: Money,
    pub total: Money,
}

/// 單一產品成本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCost {
    pub product_id: String,
    pub name: String,

    /// 期間內總件數
    pub qty: Decimal,

    pub unit: Money,
    pub total: Money,
}

/// 採購估算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseEstimate {
    pub days: u32,
    pub total_units: Decimal,
    pub materials: MaterialUsage,
    pub fabric: RollKilograms,
    pub costs: PurchaseCosts,
    pub per_product: Vec<ProductCost>,
}

/// 採購估算器
pub struct PurchaseEstimator;

impl PurchaseEstimator {
    /// 估算 `days` 天（至少 1 天）的採購量與成本
    ///
    /// 每日件數為負時視為 0。稅前小計 = 原料用量 × 單價 + 布捲公斤 × 每公斤價格。
    /// 金額與數量超出範圍時飽和。
    pub fn estimate(
        products: &[Product],
        units_per_day: &ProductQuantities,
        days: u32,
        coefficients: &Coefficients,
        prices: &PriceConfig,
    ) -> PurchaseEstimate {
        let days = days.max(1);
        let rate = prices.effective_rate();
        let unit_prices = prices.material_prices();

        let mut materials = MaterialUsage::zero();
        // 先累計各布捲件數，最後一次換算公斤
        let mut roll_units = RollKilograms::default();
        let mut total_units = Decimal::ZERO;
        let mut per_product = Vec::with_capacity(products.len());

        for product in products {
            let qty = units_per_day
                .get(&product.id)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO)
                .saturating_mul(Decimal::from(days));
            total_units = total_units.saturating_add(qty);

            let usage = UsageCalculator::usage_per_unit(product, coefficients);
            materials.accumulate(&usage.scaled(qty));

            let mut unit_usd = Self::material_cost(&usage, &unit_prices);
            for roll in product.fabric_rolls() {
                let units = roll_units.get_mut(roll);
                *units = units.saturating_add(qty);
                unit_usd = unit_usd
                    .saturating_add(Self::per_yield(prices.fabric_price_per_kg(roll), prices, roll));
            }

            per_product.push(ProductCost {
                product_id: product.id.clone(),
                name: product.name.clone(),
                qty,
                unit: Money::from_usd(unit_usd, rate),
                total: Money::from_usd(unit_usd.saturating_mul(qty), rate),
            });
        }

        let fabric = RollKilograms {
            gorro_kg: Self::per_yield(roll_units.gorro_kg, prices, FabricRoll::Gorro),
            rodillera_kg: Self::per_yield(roll_units.rodillera_kg, prices, FabricRoll::Rodillera),
        };

        let subtotal_usd = [FabricRoll::Gorro, FabricRoll::Rodillera]
            .into_iter()
            .map(|roll| fabric.get(roll).saturating_mul(prices.fabric_price_per_kg(roll)))
            .fold(Self::material_cost(&materials, &unit_prices), Decimal::saturating_add);
        let iva_usd = subtotal_usd.saturating_mul(prices.iva);

        tracing::debug!(
            "採購估算：{} 天，共 {} 件，小計 US$ {}",
            days,
            total_units,
            subtotal_usd
        );

        PurchaseEstimate {
            days,
            total_units,
            materials,
            fabric,
            costs: PurchaseCosts {
                subtotal: Money::from_usd(subtotal_usd, rate),
                iva: Money::from_usd(iva_usd, rate),
                total: Money::from_usd(subtotal_usd.saturating_add(iva_usd), rate),
            },
            per_product,
        }
    }

    fn material_cost(usage: &MaterialUsage, unit_prices: &MaterialAmounts) -> Decimal {
        usage
            .iter()
            .map(|(material, qty)| qty.saturating_mul(unit_prices.get(material)))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// `value / 每公斤產量`；產量為 0 時不計
    fn per_yield(value: Decimal, prices: &PriceConfig, roll: FabricRoll) -> Decimal {
        value
            .checked_div(prices.products_per_kg(roll))
            .unwrap_or(Decimal::ZERO)
    }
}
