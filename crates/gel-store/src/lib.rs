//! # Gel Store
//!
//! 持久化介面、記憶體儲存、髒標記追蹤與同步

pub mod dirty_tracking;
pub mod memory;
pub mod session;
pub mod store;

// Re-export 主要類型
pub use dirty_tracking::{DirtyEntity, DirtyTracker, ProductChange};
pub use memory::InMemoryStore;
pub use session::{SyncPolicy, WarehouseSession};
pub use store::{StoredRecords, WarehouseStore};

/// 儲存層錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("找不到 {entity}: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("資料已存在: {0}")]
    Duplicate(String),

    #[error("後端錯誤: {0}")]
    Backend(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] gel_core::GelError),
}

impl StoreError {
    /// 是否為領域錯誤（狀態未變更）
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
