//! 生產計劃模型

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品ID → 數量（生產請求、派工單共用）
pub type ProductQuantities = BTreeMap<String, Decimal>;

/// 每日生產計劃（產品ID → 每日件數）
///
/// 僅用於預測，不會扣減庫存。未列出的產品視為 0。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    units_per_day: BTreeMap<String, Decimal>,
}

impl ProductionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置產品每日件數
    pub fn with_units(mut self, product_id: impl Into<String>, units_per_day: Decimal) -> Self {
        self.set(product_id, units_per_day);
        self
    }

    /// 產品每日件數（未設定為 0）
    pub fn units_for(&self, product_id: &str) -> Decimal {
        self.units_per_day
            .get(product_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 設置產品每日件數
    pub fn set(&mut self, product_id: impl Into<String>, units_per_day: Decimal) {
        self.units_per_day.insert(product_id.into(), units_per_day);
    }

    /// 移除產品的計劃，回傳原本的每日件數
    pub fn remove(&mut self, product_id: &str) -> Option<Decimal> {
        self.units_per_day.remove(product_id)
    }

    /// 依產品ID迭代已設定的項目
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.units_per_day.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 所有產品每日件數合計
    pub fn total_units(&self) -> Decimal {
        self.units_per_day
            .values()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    }

    pub fn is_empty(&self) -> bool {
        self.units_per_day.values().all(|v| v.is_zero())
    }
}

impl FromIterator<(String, Decimal)> for ProductionPlan {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            units_per_day: iter.into_iter().collect(),
        }
    }
}
