//! 縫製階段計數

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 縫製流程階段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// 待縫製
    AwaitingSewing,
    /// 縫製中
    InSewing,
}

/// 單一階段內各產品的件數（不可為負）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    counts: BTreeMap<String, u64>,
}

impl StageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 產品件數（未記錄為 0）
    pub fn get(&self, product_id: &str) -> u64 {
        self.counts.get(product_id).copied().unwrap_or(0)
    }

    /// 覆寫產品件數
    pub fn set(&mut self, product_id: impl Into<String>, qty: u64) {
        self.counts.insert(product_id.into(), qty);
    }

    /// 增加件數，回傳新值
    pub fn add(&mut self, product_id: &str, qty: u64) -> u64 {
        let entry = self.counts.entry(product_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(qty);
        *entry
    }

    /// 扣除至多 `qty` 件，回傳實際扣除數
    pub fn take(&mut self, product_id: &str, qty: u64) -> u64 {
        match self.counts.get_mut(product_id) {
            Some(available) => {
                let taken = qty.min(*available);
                *available -= taken;
                taken
            }
            None => 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 所有產品件數合計
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl FromIterator<(String, u64)> for StageCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
