//! 配方與價格配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fabric::FabricRoll;
use crate::material::{Material, MaterialAmounts};
use crate::{GelError, Result};

/// 配方係數（每公斤凝膠所需原料），全製程共用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coefficients {
    pub acrylamide_kg_per_kg_gel: Decimal,
    pub glycerin_kg_per_kg_gel: Decimal,
    pub water_l_per_kg_gel: Decimal,
    pub photoinitiator_ml_per_kg_gel: Decimal,
    pub bis_g_per_kg_gel: Decimal,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            acrylamide_kg_per_kg_gel: Decimal::new(15, 2),
            glycerin_kg_per_kg_gel: Decimal::new(45, 2),
            water_l_per_kg_gel: Decimal::new(40, 2),
            photoinitiator_ml_per_kg_gel: Decimal::new(19, 2),
            bis_g_per_kg_gel: Decimal::new(9, 1),
        }
    }
}

impl Coefficients {
    /// 建構器模式：設置單一原料係數
    pub fn with(mut self, material: Material, per_kg_gel: Decimal) -> Self {
        match material {
            Material::Acrylamide => self.acrylamide_kg_per_kg_gel = per_kg_gel,
            Material::Glycerin => self.glycerin_kg_per_kg_gel = per_kg_gel,
            Material::Water => self.water_l_per_kg_gel = per_kg_gel,
            Material::Photoinitiator => self.photoinitiator_ml_per_kg_gel = per_kg_gel,
            Material::Bis => self.bis_g_per_kg_gel = per_kg_gel,
        }
        self
    }

    pub fn get(&self, material: Material) -> Decimal {
        self.as_amounts().get(material)
    }

    /// 以原料數量結構表示（每公斤凝膠）
    pub fn as_amounts(&self) -> MaterialAmounts {
        MaterialAmounts::new(
            self.acrylamide_kg_per_kg_gel,
            self.glycerin_kg_per_kg_gel,
            self.water_l_per_kg_gel,
            self.photoinitiator_ml_per_kg_gel,
            self.bis_g_per_kg_gel,
        )
    }

    /// 驗證：所有係數不得為負
    pub fn validate(&self) -> Result<()> {
        for (material, value) in self.as_amounts().iter() {
            if value < Decimal::ZERO {
                return Err(GelError::invalid(
                    format!("coefficients.{:?}", material),
                    format!("係數不得為負: {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// 配方配置（係數 + 凝膠密度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeConfig {
    pub coefficients: Coefficients,

    /// 凝膠密度（kg/L），僅供顯示與換算
    pub gel_density_kg_per_l: Decimal,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            coefficients: Coefficients::default(),
            gel_density_kg_per_l: Decimal::ONE,
        }
    }
}

impl RecipeConfig {
    pub fn new(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            ..Self::default()
        }
    }

    /// 建構器模式：設置凝膠密度
    pub fn with_gel_density(mut self, kg_per_l: Decimal) -> Self {
        self.gel_density_kg_per_l = kg_per_l;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.coefficients.validate()?;
        if self.gel_density_kg_per_l <= Decimal::ZERO {
            return Err(GelError::invalid(
                "gel_density_kg_per_l",
                format!("密度必須大於零: {}", self.gel_density_kg_per_l),
            ));
        }
        Ok(())
    }
}

/// 採購價格配置
///
/// 原料以美元計價；布料以布捲公斤計價，並以每公斤可裁產品數換算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub acrylamide_usd_per_kg: Decimal,
    pub glycerin_usd_per_kg: Decimal,
    pub water_usd_per_l: Decimal,
    pub photoinitiator_usd_per_ml: Decimal,
    pub bis_usd_per_g: Decimal,

    /// 頭套布（前片 + 後片）每公斤價格
    pub tela_gorro_usd_per_kg: Decimal,

    /// 護膝布（M / XL）每公斤價格
    pub tela_rodillera_usd_per_kg: Decimal,

    /// 每公斤頭套布可做的頭套數
    pub gorros_per_kg: Decimal,

    /// 每公斤護膝布可做的護膝數
    pub rodilleras_per_kg: Decimal,

    /// 增值稅率（0.21 = 21%）
    pub iva: Decimal,

    /// 匯率（ARS / USD）
    pub exchange_rate: Decimal,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            acrylamide_usd_per_kg: Decimal::ZERO,
            glycerin_usd_per_kg: Decimal::ZERO,
            water_usd_per_l: Decimal::ZERO,
            photoinitiator_usd_per_ml: Decimal::ZERO,
            bis_usd_per_g: Decimal::ZERO,
            tela_gorro_usd_per_kg: Decimal::ZERO,
            tela_rodillera_usd_per_kg: Decimal::ZERO,
            gorros_per_kg: Decimal::from(11),
            rodilleras_per_kg: Decimal::from(17),
            iva: Decimal::new(21, 2),
            exchange_rate: Decimal::from(1380),
        }
    }
}

impl PriceConfig {
    /// 建構器模式：設置原料單價
    pub fn with_material_price(mut self, material: Material, usd_per_unit: Decimal) -> Self {
        match material {
            Material::Acrylamide => self.acrylamide_usd_per_kg = usd_per_unit,
            Material::Glycerin => self.glycerin_usd_per_kg = usd_per_unit,
            Material::Water => self.water_usd_per_l = usd_per_unit,
            Material::Photoinitiator => self.photoinitiator_usd_per_ml = usd_per_unit,
            Material::Bis => self.bis_usd_per_g = usd_per_unit,
        }
        self
    }

    /// 建構器模式：設置布捲每公斤價格
    pub fn with_fabric_price(mut self, roll: FabricRoll, usd_per_kg: Decimal) -> Self {
        match roll {
            FabricRoll::Gorro => self.tela_gorro_usd_per_kg = usd_per_kg,
            FabricRoll::Rodillera => self.tela_rodillera_usd_per_kg = usd_per_kg,
        }
        self
    }

    /// 建構器模式：設置稅率
    pub fn with_iva(mut self, iva: Decimal) -> Self {
        self.iva = iva;
        self
    }

    /// 建構器模式：設置匯率
    pub fn with_exchange_rate(mut self, rate: Decimal) -> Self {
        self.exchange_rate = rate;
        self
    }

    /// 原料單價（以原料數量結構表示）
    pub fn material_prices(&self) -> MaterialAmounts {
        MaterialAmounts::new(
            self.acrylamide_usd_per_kg,
            self.glycerin_usd_per_kg,
            self.water_usd_per_l,
            self.photoinitiator_usd_per_ml,
            self.bis_usd_per_g,
        )
    }

    /// 布捲每公斤價格
    pub fn fabric_price_per_kg(&self, roll: FabricRoll) -> Decimal {
        match roll {
            FabricRoll::Gorro => self.tela_gorro_usd_per_kg,
            FabricRoll::Rodillera => self.tela_rodillera_usd_per_kg,
        }
    }

    /// 每公斤布捲可做的產品數
    pub fn products_per_kg(&self, roll: FabricRoll) -> Decimal {
        match roll {
            FabricRoll::Gorro => self.gorros_per_kg,
            FabricRoll::Rodillera => self.rodilleras_per_kg,
        }
    }

    /// 實際使用的匯率（未設定時視為 1）
    pub fn effective_rate(&self) -> Decimal {
        if self.exchange_rate.is_zero() {
            Decimal::ONE
        } else {
            self.exchange_rate
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (material, price) in self.material_prices().iter() {
            if price < Decimal::ZERO {
                return Err(GelError::invalid(
                    format!("prices.{:?}", material),
                    format!("價格不得為負: {}", price),
                ));
            }
        }
        for roll in [FabricRoll::Gorro, FabricRoll::Rodillera] {
            if self.fabric_price_per_kg(roll) < Decimal::ZERO {
                return Err(GelError::invalid(
                    format!("prices.{:?}", roll),
                    "價格不得為負",
                ));
            }
            if self.products_per_kg(roll) <= Decimal::ZERO {
                return Err(GelError::invalid(
                    format!("yield.{:?}", roll),
                    "每公斤產量必須大於零",
                ));
            }
        }
        if self.iva < Decimal::ZERO {
            return Err(GelError::invalid("iva", "稅率不得為負"));
        }
        if self.exchange_rate < Decimal::ZERO {
            return Err(GelError::invalid("exchange_rate", "匯率不得為負"));
        }
        Ok(())
    }
}
