//! 庫存帳（原料 + 布料）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fabric::{FabricInventory, FabricUsage};
use crate::material::{MaterialInventory, MaterialUsage};
use crate::{GelError, Result};

/// 原料比對的容差（吸收累積誤差）
pub const STOCK_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// 庫存帳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedger {
    /// 原料庫存
    pub materials: MaterialInventory,

    /// 布料庫存（片）
    pub fabric: FabricInventory,
}

impl StockLedger {
    /// 創建新的庫存帳
    pub fn new(materials: MaterialInventory, fabric: FabricInventory) -> Self {
        Self { materials, fabric }
    }

    /// 列出所有不足的項目（不修改庫存）
    ///
    /// 原料比對容許 [`STOCK_TOLERANCE`]，布料為整片計數，精確比對。
    pub fn shortages(&self, materials: &MaterialUsage, fabric: &FabricUsage) -> Vec<String> {
        let mut lacks = Vec::new();

        for (material, needed) in materials.iter() {
            if needed > self.materials.get(material).saturating_add(STOCK_TOLERANCE) {
                lacks.push(material.name().to_string());
            }
        }

        for (kind, needed) in fabric.iter() {
            if needed > self.fabric.get(kind) {
                lacks.push(kind.name().to_string());
            }
        }

        lacks
    }

    /// 檢查並扣帳
    ///
    /// 任一項不足即整筆拒絕，回傳全部缺料名稱，庫存保持原狀。
    pub fn debit(&mut self, materials: &MaterialUsage, fabric: &FabricUsage) -> Result<()> {
        let lacks = self.shortages(materials, fabric);
        if !lacks.is_empty() {
            return Err(GelError::InsufficientStock { lacks });
        }

        let next_materials = self
            .materials
            .checked_sub(materials)
            .ok_or_else(|| GelError::QuantityOverflow("原料扣帳".to_string()))?;
        let next_fabric = self
            .fabric
            .checked_sub(fabric)
            .ok_or_else(|| GelError::QuantityOverflow("布料扣帳".to_string()))?;

        self.materials = next_materials;
        self.fabric = next_fabric;
        Ok(())
    }

    /// 收貨入庫（可為負數，用於盤點修正）
    ///
    /// 任一項溢位時整筆拒絕。
    pub fn add_stock(&mut self, delta: &MaterialUsage) -> Result<()> {
        self.materials = self
            .materials
            .checked_add(delta)
            .ok_or_else(|| GelError::QuantityOverflow("原料入庫".to_string()))?;
        Ok(())
    }

    /// 布料入庫（可為負數）
    pub fn add_fabric(&mut self, delta: &FabricUsage) -> Result<()> {
        self.fabric = self
            .fabric
            .checked_add(delta)
            .ok_or_else(|| GelError::QuantityOverflow("布料入庫".to_string()))?;
        Ok(())
    }
}
