//! 生產紀錄模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 生產紀錄（只追加，不修改）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLog {
    /// 紀錄ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 生產數量（> 0）
    pub qty: Decimal,

    /// 生產時間
    pub timestamp: DateTime<Utc>,
}

impl ProductionLog {
    /// 創建新的生產紀錄
    pub fn new(product_id: impl Into<String>, qty: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product_id.into(),
            qty,
            timestamp,
        }
    }
}
