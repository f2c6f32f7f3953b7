//! 原料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 凝膠原料
///
/// 宣告順序即固定的迭代順序（瓶頸判定的平手規則依此順序）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Material {
    /// 丙烯醯胺（kg）
    Acrylamide,
    /// 甘油（kg）
    Glycerin,
    /// 蒸餾水（L）
    Water,
    /// 光起始劑 1173（mL）
    Photoinitiator,
    /// 雙丙烯醯胺（g）
    Bis,
}

impl Material {
    /// 固定迭代順序
    pub const ALL: [Material; 5] = [
        Material::Acrylamide,
        Material::Glycerin,
        Material::Water,
        Material::Photoinitiator,
        Material::Bis,
    ];

    /// 缺料訊息使用的名稱
    pub fn name(self) -> &'static str {
        match self {
            Material::Acrylamide => "Acrilamida",
            Material::Glycerin => "Glicerina",
            Material::Water => "Agua destilada",
            Material::Photoinitiator => "1173",
            Material::Bis => "Bisacrilamida",
        }
    }

    /// 帶單位的顯示名稱（跑道/瓶頸報表）
    pub fn label(self) -> &'static str {
        match self {
            Material::Acrylamide => "Acrilamida (kg)",
            Material::Glycerin => "Glicerina (kg)",
            Material::Water => "Agua destilada (L)",
            Material::Photoinitiator => "Fotoiniciador 1173 (mL)",
            Material::Bis => "Bisacrilamida (g)",
        }
    }

    /// 計量單位
    pub fn unit(self) -> &'static str {
        match self {
            Material::Acrylamide | Material::Glycerin => "kg",
            Material::Water => "L",
            Material::Photoinitiator => "mL",
            Material::Bis => "g",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 五種原料的數量（庫存、用量、增減量共用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAmounts {
    pub acrylamide_kg: Decimal,
    pub glycerin_kg: Decimal,
    pub water_l: Decimal,
    pub photoinitiator_ml: Decimal,
    pub bis_g: Decimal,
}

/// 原料庫存
pub type MaterialInventory = MaterialAmounts;

/// 原料用量（每單位或每日）
pub type MaterialUsage = MaterialAmounts;

impl MaterialAmounts {
    /// 全部為零
    pub fn zero() -> Self {
        Self::default()
    }

    /// 建立數量
    pub fn new(
        acrylamide_kg: Decimal,
        glycerin_kg: Decimal,
        water_l: Decimal,
        photoinitiator_ml: Decimal,
        bis_g: Decimal,
    ) -> Self {
        Self {
            acrylamide_kg,
            glycerin_kg,
            water_l,
            photoinitiator_ml,
            bis_g,
        }
    }

    /// 建構器模式：設置單一原料數量
    pub fn with(mut self, material: Material, quantity: Decimal) -> Self {
        *self.get_mut(material) = quantity;
        self
    }

    pub fn get(&self, material: Material) -> Decimal {
        match material {
            Material::Acrylamide => self.acrylamide_kg,
            Material::Glycerin => self.glycerin_kg,
            Material::Water => self.water_l,
            Material::Photoinitiator => self.photoinitiator_ml,
            Material::Bis => self.bis_g,
        }
    }

    pub fn get_mut(&mut self, material: Material) -> &mut Decimal {
        match material {
            Material::Acrylamide => &mut self.acrylamide_kg,
            Material::Glycerin => &mut self.glycerin_kg,
            Material::Water => &mut self.water_l,
            Material::Photoinitiator => &mut self.photoinitiator_ml,
            Material::Bis => &mut self.bis_g,
        }
    }

    /// 依固定順序迭代
    pub fn iter(&self) -> impl Iterator<Item = (Material, Decimal)> + '_ {
        Material::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// 乘上係數（例如每單位用量 × 數量），超出範圍時飽和
    pub fn scaled(&self, factor: Decimal) -> Self {
        let mut out = *self;
        for m in Material::ALL {
            *out.get_mut(m) = out.get(m).saturating_mul(factor);
        }
        out
    }

    /// 逐項相加，超出範圍時飽和
    pub fn accumulate(&mut self, other: &MaterialAmounts) {
        for m in Material::ALL {
            *self.get_mut(m) = self.get(m).saturating_add(other.get(m));
        }
    }

    /// 逐項相減
    pub fn subtract(&mut self, other: &MaterialAmounts) {
        for m in Material::ALL {
            *self.get_mut(m) = self.get(m).saturating_sub(other.get(m));
        }
    }

    /// 乘上係數；任一項溢位時回傳 `None`
    pub fn checked_scaled(&self, factor: Decimal) -> Option<Self> {
        let mut out = *self;
        for m in Material::ALL {
            *out.get_mut(m) = out.get(m).checked_mul(factor)?;
        }
        Some(out)
    }

    /// 逐項相加；任一項溢位時回傳 `None`
    pub fn checked_add(&self, other: &MaterialAmounts) -> Option<Self> {
        let mut out = *self;
        for m in Material::ALL {
            *out.get_mut(m) = out.get(m).checked_add(other.get(m))?;
        }
        Some(out)
    }

    /// 逐項相減；任一項溢位時回傳 `None`
    pub fn checked_sub(&self, other: &MaterialAmounts) -> Option<Self> {
        let mut out = *self;
        for m in Material::ALL {
            *out.get_mut(m) = out.get(m).checked_sub(other.get(m))?;
        }
        Some(out)
    }

    /// 是否全部為零
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, q)| q.is_zero())
    }
}

impl std::ops::Add for MaterialAmounts {
    type Output = MaterialAmounts;

    fn add(mut self, rhs: MaterialAmounts) -> MaterialAmounts {
        self.accumulate(&rhs);
        self
    }
}

impl std::iter::Sum for MaterialAmounts {
    fn sum<I: Iterator<Item = MaterialAmounts>>(iter: I) -> Self {
        iter.fold(MaterialAmounts::zero(), |acc, x| acc + x)
    }
}
