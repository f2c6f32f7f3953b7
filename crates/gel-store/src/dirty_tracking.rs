//! 髒標記追蹤

use std::collections::{BTreeMap, BTreeSet};

use gel_core::{ProductionLog, Stage};

/// 需要寫回的實體
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirtyEntity {
    Inventory,
    Fabric,
    Recipe,
    Prices,
    /// 計劃列（依產品ID）
    Plan(String),
    /// 階段列（依階段 + 產品ID）
    Stage(Stage, String),
}

/// 產品目錄變更種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductChange {
    Inserted,
    Updated,
    Deleted,
}

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_entities: BTreeSet<DirtyEntity>,
    products: BTreeMap<String, ProductChange>,
    pending_logs: Vec<ProductionLog>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記實體為髒
    pub fn mark_dirty(&mut self, entity: DirtyEntity) {
        self.dirty_entities.insert(entity);
    }

    /// 檢查實體是否為髒
    pub fn is_dirty(&self, entity: &DirtyEntity) -> bool {
        self.dirty_entities.contains(entity)
    }

    /// 清除單一實體的標記（寫回成功後）
    pub fn mark_clean(&mut self, entity: &DirtyEntity) {
        self.dirty_entities.remove(entity);
    }

    /// 記錄產品變更，與尚未寫回的變更合併
    ///
    /// 新增後刪除等於沒發生；刪除後再新增視為更新。
    pub fn mark_product(&mut self, product_id: &str, change: ProductChange) {
        use ProductChange::*;

        let merged = match (self.products.get(product_id).copied(), change) {
            (None, change) => Some(change),
            (Some(Inserted), Updated) => Some(Inserted),
            (Some(Inserted), Deleted) => None,
            (Some(Deleted), Inserted) => Some(Updated),
            (Some(_), change) => Some(change),
        };

        match merged {
            Some(change) => {
                self.products.insert(product_id.to_string(), change);
            }
            None => {
                self.products.remove(product_id);
            }
        }
    }

    pub fn product_change(&self, product_id: &str) -> Option<ProductChange> {
        self.products.get(product_id).copied()
    }

    pub fn clear_product(&mut self, product_id: &str) {
        self.products.remove(product_id);
    }

    /// 待寫入的生產紀錄
    pub fn record_logs(&mut self, logs: impl IntoIterator<Item = ProductionLog>) {
        self.pending_logs.extend(logs);
    }

    pub fn pending_logs(&self) -> &[ProductionLog] {
        &self.pending_logs
    }

    pub fn clear_logs(&mut self) {
        self.pending_logs.clear();
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_entities.clear();
        self.products.clear();
        self.pending_logs.clear();
    }

    pub fn is_clean(&self) -> bool {
        self.dirty_entities.is_empty() && self.products.is_empty() && self.pending_logs.is_empty()
    }

    /// 獲取所有髒實體（固定順序）
    pub fn dirty_entities(&self) -> Vec<DirtyEntity> {
        self.dirty_entities.iter().cloned().collect()
    }

    /// 獲取所有產品變更
    pub fn product_changes(&self) -> Vec<(String, ProductChange)> {
        self.products
            .iter()
            .map(|(id, change)| (id.clone(), *change))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_mark_and_clean() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty(DirtyEntity::Inventory);
        tracker.mark_dirty(DirtyEntity::Plan("gorro".into()));
        tracker.mark_dirty(DirtyEntity::Inventory);

        assert_eq!(tracker.dirty_entities().len(), 2);
        assert!(tracker.is_dirty(&DirtyEntity::Inventory));

        tracker.mark_clean(&DirtyEntity::Inventory);
        assert!(!tracker.is_dirty(&DirtyEntity::Inventory));
        assert!(!tracker.is_clean());

        tracker.clear();
        assert!(tracker.is_clean());
    }

    #[rstest]
    #[case(ProductChange::Inserted, ProductChange::Updated, Some(ProductChange::Inserted))]
    #[case(ProductChange::Inserted, ProductChange::Deleted, None)]
    #[case(ProductChange::Updated, ProductChange::Deleted, Some(ProductChange::Deleted))]
    #[case(ProductChange::Deleted, ProductChange::Inserted, Some(ProductChange::Updated))]
    #[case(ProductChange::Updated, ProductChange::Updated, Some(ProductChange::Updated))]
    fn test_product_change_merging(
        #[case] first: ProductChange,
        #[case] second: ProductChange,
        #[case] expected: Option<ProductChange>,
    ) {
        let mut tracker = DirtyTracker::new();
        tracker.mark_product("p_abc123", first);
        tracker.mark_product("p_abc123", second);

        assert_eq!(tracker.product_change("p_abc123"), expected);
    }
}
