//! 跑道計算：庫存可支撐天數與瓶頸

use gel_core::{
    Coefficients, Fabric, Material, MaterialInventory, MaterialUsage, Product, ProductionPlan,
    StockLedger,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::recipe::UsageCalculator;

/// 可支撐天數
///
/// `Finite` 排在 `Unbounded` 之前，衍生的排序即「天數較少者較小」。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Days {
    Finite(Decimal),
    /// 每日用量為零，永不耗盡
    Unbounded,
}

impl Days {
    /// `daily <= 0` 時為無限，否則為 `stock / daily`
    pub fn of(stock: Decimal, daily: Decimal) -> Days {
        if daily <= Decimal::ZERO {
            return Days::Unbounded;
        }
        stock
            .checked_div(daily)
            .map(Days::Finite)
            .unwrap_or(Days::Unbounded)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Days::Unbounded)
    }

    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Days::Finite(d) => Some(*d),
            Days::Unbounded => None,
        }
    }
}

impl std::fmt::Display for Days {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Days::Finite(d) => write!(f, "{:.1}", d),
            Days::Unbounded => f.write_str("—"),
        }
    }
}

/// 跑道限制來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Constraint {
    Material(Material),
    Fabric(Fabric),
}

impl Constraint {
    pub fn label(&self) -> &'static str {
        match self {
            Constraint::Material(m) => m.label(),
            Constraint::Fabric(f) => f.label(),
        }
    }
}

/// 單一原料的跑道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialDays {
    pub material: Material,
    pub days: Days,
}

/// 整體原料跑道
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialRunway {
    /// 依固定順序的各原料天數
    pub per_material: Vec<MaterialDays>,

    /// 最短天數
    pub min_days: Days,

    /// 瓶頸原料（全部無限時為 None）
    pub bottleneck: Option<Material>,
}

/// 單一產品的跑道
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRunway {
    pub product_id: String,
    pub name: String,
    pub days: Days,
    pub bottleneck: Option<Constraint>,
}

impl ProductRunway {
    pub fn bottleneck_label(&self) -> Option<&'static str> {
        self.bottleneck.map(|c| c.label())
    }
}

/// 跑道計算器
pub struct RunwayCalculator;

impl RunwayCalculator {
    /// 依每日總用量計算各原料跑道與整體瓶頸
    pub fn runway(inventory: &MaterialInventory, daily_usage: &MaterialUsage) -> MaterialRunway {
        let per_material: Vec<MaterialDays> = Material::ALL
            .into_iter()
            .map(|material| MaterialDays {
                material,
                days: Days::of(inventory.get(material), daily_usage.get(material)),
            })
            .collect();

        let (bottleneck, min_days) =
            Self::pick_bottleneck(per_material.iter().map(|d| (d.material, d.days)));

        MaterialRunway {
            per_material,
            min_days,
            bottleneck,
        }
    }

    /// 各產品的跑道（含布料）
    ///
    /// 候選限制依序為五種原料再加上產品的布料需求；嚴格小於才替換目前最小值。
    pub fn product_runway(
        products: &[Product],
        plan: &ProductionPlan,
        coefficients: &Coefficients,
        stock: &StockLedger,
    ) -> Vec<ProductRunway> {
        products
            .iter()
            .map(|product| {
                let qty_per_day = plan.units_for(&product.id);
                if qty_per_day <= Decimal::ZERO {
                    return ProductRunway {
                        product_id: product.id.clone(),
                        name: product.name.clone(),
                        days: Days::Unbounded,
                        bottleneck: None,
                    };
                }

                let per_unit = UsageCalculator::usage_per_unit(product, coefficients);
                let materials = per_unit.iter().map(|(material, usage)| {
                    (
                        Constraint::Material(material),
                        Days::of(stock.materials.get(material), usage.saturating_mul(qty_per_day)),
                    )
                });
                let fabrics = product.fabrics.iter().map(|req| {
                    (
                        Constraint::Fabric(req.fabric),
                        Days::of(
                            stock.fabric.get(req.fabric),
                            req.units_per_product.saturating_mul(qty_per_day),
                        ),
                    )
                });

                let (bottleneck, days) = Self::pick_bottleneck(materials.chain(fabrics));
                tracing::debug!("產品 {} 跑道 {} 天", product.id, days);

                ProductRunway {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    days,
                    bottleneck,
                }
            })
            .collect()
    }

    /// 依序挑出天數最少者，平手保留先出現者
    fn pick_bottleneck<K>(candidates: impl Iterator<Item = (K, Days)>) -> (Option<K>, Days) {
        let mut best: (Option<K>, Days) = (None, Days::Unbounded);
        for (key, days) in candidates {
            if days < best.1 {
                best = (Some(key), days);
            }
        }
        best
    }
}
