//! 產品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fabric::{Fabric, FabricRequirement, FabricRoll};
use crate::{GelError, Result};

/// 可銷售產品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID（唯一）
    pub id: String,

    /// 名稱
    pub name: String,

    /// 重量（g）
    pub weight_g: Decimal,

    /// 凝膠佔比（0..=1）
    pub gel_fraction: Decimal,

    /// 布料需求（每單位產品）
    #[serde(default)]
    pub fabrics: Vec<FabricRequirement>,
}

impl Product {
    /// 創建新的產品（無布料需求）
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight_g: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight_g,
            gel_fraction: Decimal::ONE,
            fabrics: Vec::new(),
        }
    }

    /// 產生新產品ID（`p_` + 6 碼）
    pub fn generate_id() -> String {
        let raw = Uuid::new_v4().simple().to_string();
        format!("p_{}", &raw[..6])
    }

    /// 建構器模式：設置凝膠佔比
    pub fn with_gel_fraction(mut self, gel_fraction: Decimal) -> Self {
        self.gel_fraction = gel_fraction;
        self
    }

    /// 建構器模式：添加布料需求
    pub fn with_fabric(mut self, fabric: Fabric, units_per_product: Decimal) -> Self {
        self.fabrics.push(FabricRequirement::new(fabric, units_per_product));
        self
    }

    /// 每單位產品的凝膠重量（kg）
    pub fn gel_kg(&self) -> Decimal {
        (self.weight_g / Decimal::from(1000)).saturating_mul(self.gel_fraction)
    }

    /// 產品使用的布捲（去重，依布料宣告順序）
    pub fn fabric_rolls(&self) -> Vec<FabricRoll> {
        let mut rolls: Vec<FabricRoll> = Vec::new();
        for req in &self.fabrics {
            let roll = req.fabric.roll();
            if !rolls.contains(&roll) {
                rolls.push(roll);
            }
        }
        rolls
    }

    /// 套用部分更新
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(weight_g) = patch.weight_g {
            self.weight_g = weight_g;
        }
        if let Some(gel_fraction) = patch.gel_fraction {
            self.gel_fraction = gel_fraction;
        }
        if let Some(fabrics) = patch.fabrics {
            self.fabrics = fabrics;
        }
    }

    /// 驗證：重量 > 0，凝膠佔比介於 0 與 1，布料用量不得為負
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(GelError::invalid("product.id", "產品ID不可為空"));
        }
        if self.weight_g <= Decimal::ZERO {
            return Err(GelError::invalid(
                format!("product[{}].weight_g", self.id),
                format!("重量必須大於零: {}", self.weight_g),
            ));
        }
        if self.gel_fraction < Decimal::ZERO || self.gel_fraction > Decimal::ONE {
            return Err(GelError::invalid(
                format!("product[{}].gel_fraction", self.id),
                format!("凝膠佔比必須介於 0 與 1: {}", self.gel_fraction),
            ));
        }
        if let Some(req) = self.fabrics.iter().find(|r| r.units_per_product < Decimal::ZERO) {
            return Err(GelError::invalid(
                format!("product[{}].fabrics", self.id),
                format!("{} 用量不得為負", req.fabric.name()),
            ));
        }
        Ok(())
    }

    /// 預設產品目錄：頭套、護膝 XL、護膝 M
    pub fn default_catalog() -> Vec<Product> {
        vec![
            Product::new("gorro", "Gorro Migraña", Decimal::from(800))
                .with_fabric(Fabric::GorroNariz, Decimal::ONE)
                .with_fabric(Fabric::GorroDetras, Decimal::ONE),
            Product::new("rodilleraXL", "Rodillera XL", Decimal::from(700))
                .with_fabric(Fabric::RodilleraXl, Decimal::ONE),
            Product::new("rodilleraM", "Rodillera M", Decimal::from(500))
                .with_fabric(Fabric::RodilleraM, Decimal::ONE),
        ]
    }
}

/// 產品部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub weight_g: Option<Decimal>,
    pub gel_fraction: Option<Decimal>,
    pub fabrics: Option<Vec<FabricRequirement>>,
}

impl ProductPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn weight_g(weight_g: Decimal) -> Self {
        Self {
            weight_g: Some(weight_g),
            ..Self::default()
        }
    }
}
