//! # Gel Core
//!
//! 核心資料模型與類型定義：產品、配方、原料/布料庫存、生產計劃、縫製階段與生產紀錄

pub mod config;
pub mod fabric;
pub mod inventory;
pub mod log;
pub mod material;
pub mod plan;
pub mod product;
pub mod stage;
pub mod state;

// Re-export 主要類型
pub use config::{Coefficients, PriceConfig, RecipeConfig};
pub use fabric::{Fabric, FabricAmounts, FabricInventory, FabricRequirement, FabricRoll, FabricUsage};
pub use inventory::{StockLedger, STOCK_TOLERANCE};
pub use log::ProductionLog;
pub use material::{Material, MaterialAmounts, MaterialInventory, MaterialUsage};
pub use plan::{ProductQuantities, ProductionPlan};
pub use product::{Product, ProductPatch};
pub use stage::{Stage, StageCounts};
pub use state::WarehouseState;

/// 核心錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum GelError {
    #[error("材料/布料庫存不足: {}", lacks.join(", "))]
    InsufficientStock { lacks: Vec<String> },

    #[error("找不到產品: {0}")]
    UnknownProduct(String),

    #[error("產品已存在: {0}")]
    DuplicateProduct(String),

    #[error("生產數量為空")]
    EmptyProduction,

    #[error("數量超出可表示範圍: {0}")]
    QuantityOverflow(String),

    #[error("無效的配置 ({field}): {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("其他錯誤: {0}")]
    Other(String),
}

impl GelError {
    /// 建立配置錯誤
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 缺料清單（僅 InsufficientStock 有值）
    pub fn lacks(&self) -> &[String] {
        match self {
            Self::InsufficientStock { lacks } => lacks,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, GelError>;
